//! 모델 학습 명령어.
//!
//! ```bash
//! traffic train --input data/traffic.csv --output models/traffic_model.json
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use traffic_analytics::{FeatureEngineer, TrafficModel, TrainingMetrics};
use traffic_core::AppConfig;

use super::common::{load_records, print_json, RankedValues};

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub input: Option<PathBuf>,
    /// 모델 저장 경로 (없으면 설정의 model_path)
    pub output: Option<PathBuf>,
}

/// 학습 결과.
#[derive(Debug, Clone, Serialize)]
pub struct TrainOutput {
    pub metrics: TrainingMetrics,
    /// 중요도 내림차순 `feature → 중요도`
    pub feature_importance: RankedValues,
    pub model_path: PathBuf,
}

pub fn run(config: &TrainConfig, app: &AppConfig) -> Result<TrainOutput> {
    let records = load_records(config.input.as_deref(), app)?;
    let table = FeatureEngineer::new().engineer_features(&records);

    let mut model = TrafficModel::new(app.model.clone());
    let metrics = model.train_on_table(&table).context("모델 학습 실패")?;
    let feature_importance = RankedValues::from(model.get_feature_importance()?);

    let model_path = config
        .output
        .clone()
        .unwrap_or_else(|| app.model.model_path.clone());
    model
        .save_model_to(&model_path)
        .with_context(|| format!("모델 저장 실패: {}", model_path.display()))?;

    info!(path = %model_path.display(), r2 = metrics.r2_score, "학습 명령 완료");
    Ok(TrainOutput {
        metrics,
        feature_importance,
        model_path,
    })
}

pub fn execute(config: &TrainConfig, app: &AppConfig) -> Result<()> {
    print_json(&run(config, app)?)
}
