//! target 상관계수 명령어.

use anyhow::Result;
use std::path::PathBuf;
use traffic_analytics::{FeatureEngineer, TrafficModel};
use traffic_core::AppConfig;

use super::common::{load_records, print_json, RankedValues};

#[derive(Debug, Clone)]
pub struct CorrelationConfig {
    pub input: Option<PathBuf>,
    pub target: String,
}

/// |r| 내림차순 `컬럼 → 상관계수`.
pub fn run(config: &CorrelationConfig, app: &AppConfig) -> Result<RankedValues> {
    let records = load_records(config.input.as_deref(), app)?;
    let table = FeatureEngineer::new().engineer_features(&records);
    let model = TrafficModel::new(app.model.clone());
    Ok(model.calculate_correlation(&table, &config.target)?.into())
}

pub fn execute(config: &CorrelationConfig, app: &AppConfig) -> Result<()> {
    print_json(&run(config, app)?)
}
