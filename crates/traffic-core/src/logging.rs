//! tracing 구독자 초기화.
//!
//! 설정 파일의 `[logging]` 섹션으로 구독자를 구성합니다.
//! `RUST_LOG`가 설정되어 있으면 `level`보다 우선합니다.
//! 로그는 stderr로 나가므로 명령어의 JSON 출력(stdout)과 섞이지 않습니다.

use std::str::FromStr;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;
use crate::error::{TrafficError, TrafficResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 여러 줄 컬러 출력
    #[default]
    Pretty,
    /// 줄 단위 JSON (배치 학습 로그 수집용)
    Json,
    /// 한 줄 요약
    Compact,
}

impl FromStr for LogFormat {
    type Err = TrafficError;

    fn from_str(s: &str) -> TrafficResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(TrafficError::Config(format!("알 수 없는 로그 형식: {}", other))),
        }
    }
}

/// 구독자 구성.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` 지시어 (예: "info", "traffic_analytics=debug")
    pub directives: String,
    pub format: LogFormat,
    /// rayon 작업 스레드 ID 표시
    pub thread_ids: bool,
}

impl LogConfig {
    /// 설정 섹션에서 생성합니다. 알 수 없는 형식은 `Pretty`로 처리합니다.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self {
            directives: settings.level.clone(),
            format: settings.format.parse().unwrap_or_default(),
            thread_ids: settings.thread_ids,
        }
    }

    fn env_filter(&self) -> TrafficResult<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.directives).map_err(|e| {
                TrafficError::Config(format!("잘못된 로그 레벨 '{}': {}", self.directives, e))
            }),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_thread_ids(self.thread_ids);

        match self.format {
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
        }
    }
}

/// 전역 구독자를 설치합니다. 프로세스당 한 번만 성공합니다.
pub fn init_logging(config: &LogConfig) -> TrafficResult<()> {
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter()?)
        .try_init()
        .map_err(|e| TrafficError::Config(format!("로깅 초기화 실패: {}", e)))?;

    tracing::debug!(
        format = ?config.format,
        directives = %config.directives,
        "로깅 초기화 완료"
    );
    Ok(())
}
