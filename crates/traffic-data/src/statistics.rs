//! 데이터셋 기본 통계.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use traffic_core::TrafficRecord;

/// 날짜 범위. 데이터가 없으면 양쪽 모두 `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// 단일 컬럼 요약 (데이터가 없으면 모두 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ValueStats {
    /// 값 목록에서 요약 계산.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            mean: sum / count as f64,
            min,
            max,
        }
    }
}

/// 데이터셋 통계.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    /// 행 수
    pub row_count: usize,
    /// 날짜 범위
    pub date_range: DateRange,
    /// 고유 검지기 수
    pub detector_count: usize,
    /// 교통량 요약
    pub flow_stats: ValueStats,
    /// 속도 요약
    pub speed_stats: ValueStats,
}

impl DatasetStatistics {
    /// 레코드 목록에서 통계 계산.
    pub fn from_records(records: &[TrafficRecord]) -> Self {
        let detectors: HashSet<i64> = records.iter().map(|r| r.detid).collect();

        Self {
            row_count: records.len(),
            date_range: DateRange {
                start: records.iter().map(|r| r.day).min(),
                end: records.iter().map(|r| r.day).max(),
            },
            detector_count: detectors.len(),
            flow_stats: ValueStats::from_values(records.iter().map(|r| r.flow)),
            speed_stats: ValueStats::from_values(records.iter().map(|r| r.speed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: &str, detid: i64, flow: f64, speed: f64) -> TrafficRecord {
        TrafficRecord::new(
            NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
            0,
            detid,
            flow,
            5.0,
            speed,
        )
    }

    #[test]
    fn test_statistics() {
        let records = vec![
            record("2016-09-27", 230, 100.0, 50.0),
            record("2016-09-26", 230, 200.0, 70.0),
            record("2016-09-28", 231, 300.0, 60.0),
        ];
        let stats = DatasetStatistics::from_records(&records);

        assert_eq!(stats.row_count, 3);
        assert_eq!(stats.detector_count, 2);
        assert_eq!(stats.date_range.start.unwrap().to_string(), "2016-09-26");
        assert_eq!(stats.date_range.end.unwrap().to_string(), "2016-09-28");
        assert_eq!(stats.flow_stats.mean, 200.0);
        assert_eq!(stats.flow_stats.min, 100.0);
        assert_eq!(stats.flow_stats.max, 300.0);
        assert_eq!(stats.speed_stats.max, 70.0);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = DatasetStatistics::from_records(&[]);
        assert_eq!(stats.row_count, 0);
        assert_eq!(stats.detector_count, 0);
        assert_eq!(stats.date_range, DateRange::default());
        assert_eq!(stats.flow_stats, ValueStats::default());
    }
}
