//! 데이터셋 통계 명령어.
//!
//! ```bash
//! traffic stats --input data/traffic.csv --detid 230
//! ```

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;
use traffic_analytics::features::extract_hour;
use traffic_core::AppConfig;
use traffic_data::DatasetStatistics;

use super::common::{load_records, print_json, FilterArgs};

/// stats 명령 설정.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub input: Option<PathBuf>,
    pub filter: FilterArgs,
}

/// 필터를 적용한 레코드 통계를 계산합니다.
pub fn run(config: &StatsConfig, app: &AppConfig) -> Result<DatasetStatistics> {
    let filter = config.filter.to_filter()?;
    let records: Vec<_> = load_records(config.input.as_deref(), app)?
        .into_iter()
        .filter(|r| filter.matches(r.day, r.detid, extract_hour(r.interval)))
        .collect();

    let stats = DatasetStatistics::from_records(&records);
    info!(rows = stats.row_count, detectors = stats.detector_count, "통계 계산 완료");
    Ok(stats)
}

pub fn execute(config: &StatsConfig, app: &AppConfig) -> Result<()> {
    print_json(&run(config, app)?)
}
