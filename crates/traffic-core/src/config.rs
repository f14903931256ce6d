//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 기본값 → TOML 파일 → `TRAFFIC__` 환경 변수 순서로 덮어씁니다.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::TrafficResult;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 데이터 입력 설정
    #[serde(default)]
    pub data: DataConfig,
    /// 모델 학습 설정
    #[serde(default)]
    pub model: ModelConfig,
    /// 분석 리포트 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// 스레드 ID 표시
    pub thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            thread_ids: false,
        }
    }
}

/// 데이터 입력 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// 기본 CSV 경로 (CLI 인자가 없을 때 사용)
    pub csv_path: Option<PathBuf>,
    /// 로드 직후 무작위 추출할 비율 (0, 1]. None이면 전체 사용
    pub sample_fraction: Option<f64>,
    /// 추출 시드
    pub sample_seed: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            sample_fraction: None,
            sample_seed: 42,
        }
    }
}

/// 앙상블 모델 설정.
///
/// 생성 시점에 고정되며, 같은 시드와 입력이면 학습 결과가 완전히 재현됩니다.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// 트리 개수
    pub n_estimators: usize,
    /// 트리 최대 깊이
    pub max_depth: usize,
    /// 노드 분할에 필요한 최소 샘플 수
    pub min_samples_split: usize,
    /// 리프 노드의 최소 샘플 수
    pub min_samples_leaf: usize,
    /// 분할마다 고려할 feature 수 (None = 전체)
    pub max_features: Option<usize>,
    /// 트리마다 부트스트랩 샘플 사용 여부
    pub bootstrap: bool,
    /// 서브샘플링, 분할, 부트스트랩 모두에 쓰이는 시드
    pub seed: u64,
    /// 테스트 세트 비율
    pub test_size: f64,
    /// 학습에 사용할 최대 행 수
    pub max_rows: usize,
    /// 예측 대상 컬럼
    pub target: String,
    /// 모델 저장 경로
    pub model_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_estimators: 50,
            max_depth: 15,
            min_samples_split: 10,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
            test_size: 0.2,
            max_rows: 100_000,
            target: "flow".to_string(),
            model_path: PathBuf::from("models/traffic_model.json"),
        }
    }
}

impl ModelConfig {
    /// 트리 개수 설정.
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// 시드 설정.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// 최대 깊이 설정.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// 분석 리포트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 피크 시간대 상위 N개
    pub peak_hours_top_n: usize,
    /// 예측 질의에 월이 없을 때 사용할 값
    pub default_month: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            peak_hours_top_n: 5,
            default_month: 10,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> TrafficResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("TRAFFIC")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> TrafficResult<Self> {
        Self::load("config/default.toml")
    }

    /// 값 범위를 검증합니다.
    pub fn validate(&self) -> TrafficResult<()> {
        use crate::error::TrafficError;

        let model = &self.model;
        if model.n_estimators == 0 {
            return Err(TrafficError::Config("model.n_estimators must be > 0".into()));
        }
        if !(model.test_size > 0.0 && model.test_size < 1.0) {
            return Err(TrafficError::Config(format!(
                "model.test_size must be in (0, 1), got {}",
                model.test_size
            )));
        }
        if model.max_rows < 2 {
            return Err(TrafficError::Config("model.max_rows must be >= 2".into()));
        }
        if let Some(fraction) = self.data.sample_fraction {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(TrafficError::Config(format!(
                    "data.sample_fraction must be in (0, 1], got {}",
                    fraction
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.n_estimators, 50);
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.min_samples_split, 10);
        assert_eq!(config.seed, 42);
        assert!((config.test_size - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.max_rows, 100_000);
        assert_eq!(config.target, "flow");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let app: AppConfig = toml::from_str(
            r#"
            [model]
            n_estimators = 10
            "#,
        )
        .unwrap();

        assert_eq!(app.model.n_estimators, 10);
        assert_eq!(app.model.max_depth, 15);
        assert_eq!(app.analysis.default_month, 10);
        assert_eq!(app.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut app = AppConfig::default();
        assert!(app.validate().is_ok());

        app.model.test_size = 1.5;
        assert!(app.validate().is_err());

        let mut app = AppConfig::default();
        app.data.sample_fraction = Some(0.0);
        assert!(app.validate().is_err());

        let mut app = AppConfig::default();
        app.model.n_estimators = 0;
        assert!(app.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = AppConfig::load("does/not/exist.toml");
        assert!(result.is_err());
    }
}
