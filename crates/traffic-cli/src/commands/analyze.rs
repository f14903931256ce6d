//! 혼잡 분석 명령어.
//!
//! ```bash
//! traffic analyze --input data/traffic.csv --start-date 2016-09-01 --hour-start 6 --hour-end 20
//! ```

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use traffic_analytics::{FeatureEngineer, TrafficReport, TrafficSummary};
use traffic_core::AppConfig;

use super::common::{load_records, print_json, FilterArgs};

#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub input: Option<PathBuf>,
    pub filter: FilterArgs,
}

/// 분석 결과.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    pub summary: TrafficSummary,
    pub report: TrafficReport,
}

/// feature를 만든 뒤 필터를 적용하고 리포트를 계산합니다.
pub fn run(config: &AnalyzeConfig, app: &AppConfig) -> Result<AnalysisOutput> {
    let filter = config.filter.to_filter()?;
    let records = load_records(config.input.as_deref(), app)?;
    let table = FeatureEngineer::new()
        .engineer_features(&records)
        .filter(&filter);

    Ok(AnalysisOutput {
        summary: TrafficSummary::build(&table),
        report: TrafficReport::build(&table, app.analysis.peak_hours_top_n),
    })
}

pub fn execute(config: &AnalyzeConfig, app: &AppConfig) -> Result<()> {
    print_json(&run(config, app)?)
}
