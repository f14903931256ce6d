//! 교통 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 데이터셋 통계
//! traffic stats --input data/torino.csv
//!
//! # 평일 출근 시간대 혼잡 분석
//! traffic analyze --input data/torino.csv --hour-start 7 --hour-end 9
//!
//! # 모델 학습 후 저장
//! traffic train --input data/torino.csv --output models/traffic_model.json
//!
//! # 월요일 08시, 검지기 230 교통량 예측
//! traffic predict --input data/torino.csv --hour 8 --weekday 0 --detid 230
//!
//! # flow와 각 컬럼의 상관계수
//! traffic correlation --input data/torino.csv --target flow
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use traffic_analytics::PredictionQuery;
use traffic_cli::commands::analyze::{self, AnalyzeConfig};
use traffic_cli::commands::common::{is_input_error, FilterArgs};
use traffic_cli::commands::correlation::{self, CorrelationConfig};
use traffic_cli::commands::predict::{self, PredictConfig};
use traffic_cli::commands::stats::{self, StatsConfig};
use traffic_cli::commands::train::{self, TrainConfig};
use traffic_core::{init_logging, AppConfig, LogConfig};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Parser)]
#[command(name = "traffic")]
#[command(about = "Traffic analysis CLI - 검지기 데이터 기반 혼잡 분석 및 교통량 예측", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/default.toml, 없으면 내장 기본값)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 데이터셋 기본 통계
    Stats {
        /// 입력 CSV 파일
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// 혼잡 분석 리포트 (시간대별 flow, 등급 분포, 평일/주말, 피크 시간대)
    Analyze {
        /// 입력 CSV 파일
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// 랜덤 포레스트 모델 학습
    Train {
        /// 입력 CSV 파일
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 모델 저장 경로
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 저장된 모델로 교통량 예측
    Predict {
        /// 입력 CSV 파일 (검지기/시간대 평균 계산용)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 모델 파일
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// 시 (0-23)
        #[arg(long)]
        hour: u32,

        /// 요일 (0: 월요일 .. 6: 일요일)
        #[arg(long)]
        weekday: u32,

        /// 검지기 ID
        #[arg(long)]
        detid: i64,

        /// 월 (1-12, 기본: 설정의 default_month)
        #[arg(long)]
        month: Option<u32>,
    },

    /// target 컬럼과의 상관계수
    Correlation {
        /// 입력 CSV 파일
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 대상 컬럼
        #[arg(short, long, default_value = "flow")]
        target: String,
    },
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => AppConfig::load_default()?,
        None => AppConfig::default(),
    };
    Ok(config)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let app = load_config(cli.config.as_deref())?;

    init_logging(&LogConfig::from_settings(&app.logging))?;

    let result = match cli.command {
        Commands::Stats { input, filter } => stats::execute(&StatsConfig { input, filter }, &app),
        Commands::Analyze { input, filter } => {
            analyze::execute(&AnalyzeConfig { input, filter }, &app)
        }
        Commands::Train { input, output } => train::execute(&TrainConfig { input, output }, &app),
        Commands::Predict {
            input,
            model,
            hour,
            weekday,
            detid,
            month,
        } => {
            let mut query = PredictionQuery::new(hour, weekday, detid);
            query.month = month;
            predict::execute(&PredictConfig { input, model, query }, &app)
        }
        Commands::Correlation { input, target } => {
            correlation::execute(&CorrelationConfig { input, target }, &app)
        }
    };

    match &result {
        Ok(()) => info!("명령 완료"),
        Err(e) if is_input_error(e) => warn!("입력 값을 확인하세요: {:#}", e),
        Err(e) => error!("명령 실패: {:#}", e),
    }
    result
}
