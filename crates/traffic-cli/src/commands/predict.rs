//! 교통량 예측 명령어.
//!
//! ```bash
//! traffic predict --input data/traffic.csv --hour 8 --weekday 0 --detid 230
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;
use traffic_analytics::{
    FeatureEngineer, PredictionOutcome, PredictionQuery, TrafficPredictionService, TrainedModel,
};
use traffic_core::AppConfig;

use super::common::{load_records, print_json};

#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub input: Option<PathBuf>,
    /// 저장된 모델 경로 (없으면 설정의 model_path)
    pub model: Option<PathBuf>,
    pub query: PredictionQuery,
}

pub fn run(config: &PredictConfig, app: &AppConfig) -> Result<PredictionOutcome> {
    let model_path = config
        .model
        .clone()
        .unwrap_or_else(|| app.model.model_path.clone());
    let model = TrainedModel::load(&model_path)
        .with_context(|| format!("모델 로드 실패: {}", model_path.display()))?;

    let records = load_records(config.input.as_deref(), app)?;
    let table = FeatureEngineer::new().engineer_features(&records);

    let outcome = TrafficPredictionService::new(&app.analysis)
        .predict(&model, &table, &config.query)
        .context("예측 실패")?;
    Ok(outcome)
}

pub fn execute(config: &PredictConfig, app: &AppConfig) -> Result<()> {
    print_json(&run(config, app)?)
}
