//! 혼잡 분석 리포트.
//!
//! 필터링된 feature table에서 시간대별 flow, 등급 분포,
//! 평일/주말 비교, 시간대/요일별 혼잡도, 피크 시간대를 계산합니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use traffic_core::TrafficCategory;

use crate::features::FeatureTable;

/// 요일 이름 (월요일=0).
pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn mean_by_key<K: Ord + Copy>(keys: impl Iterator<Item = K>, values: impl Iterator<Item = f64>) -> BTreeMap<K, f64> {
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for (key, value) in keys.zip(values) {
        let entry = groups.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(k, (sum, count))| (k, sum / count as f64))
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// 시간대별 평균 flow.
pub fn hourly_flow(table: &FeatureTable) -> BTreeMap<u32, f64> {
    mean_by_key(table.hours().iter().copied(), table.flow().iter().copied())
}

/// 등급별 행 수.
pub fn category_distribution(table: &FeatureTable) -> BTreeMap<TrafficCategory, usize> {
    let mut counts = BTreeMap::new();
    for category in table.categories() {
        *counts.entry(*category).or_insert(0) += 1;
    }
    counts
}

/// 시간대별 flow와 등급 분포 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub hourly_flow: BTreeMap<u32, f64>,
    pub traffic_distribution: BTreeMap<TrafficCategory, usize>,
    pub total_records: usize,
}

impl TrafficSummary {
    pub fn build(table: &FeatureTable) -> Self {
        Self {
            hourly_flow: hourly_flow(table),
            traffic_distribution: category_distribution(table),
            total_records: table.len(),
        }
    }
}

/// 그룹 평균 (그룹이 비어있으면 모두 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupAverages {
    pub avg_flow: f64,
    pub avg_speed: f64,
    pub avg_occ: f64,
    pub avg_traffic_index: f64,
}

/// 평일/주말 비교.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekdayWeekend {
    pub weekday: GroupAverages,
    pub weekend: GroupAverages,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCongestion {
    pub day: String,
    pub index: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakHour {
    pub hour: u32,
    pub index: f64,
}

/// 혼잡 분석 리포트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficReport {
    pub weekday_vs_weekend: WeekdayWeekend,
    /// 시간대별 평균 traffic index
    pub hourly_congestion: BTreeMap<u32, f64>,
    /// 요일별 평균 traffic index (월요일부터, 데이터가 있는 요일만)
    pub daily_congestion: Vec<DailyCongestion>,
    /// 평균 traffic index 상위 시간대 (내림차순)
    pub peak_hours: Vec<PeakHour>,
    pub weekday_hourly_flow: BTreeMap<u32, f64>,
    pub weekend_hourly_flow: BTreeMap<u32, f64>,
}

impl TrafficReport {
    /// 리포트를 계산합니다. `top_n`은 피크 시간대 개수입니다.
    pub fn build(table: &FeatureTable, top_n: usize) -> Self {
        let group = |weekday: u8| -> Vec<usize> {
            (0..table.len())
                .filter(|&i| table.weekday_flags()[i] == weekday)
                .collect()
        };
        let weekday_rows = group(1);
        let weekend_rows = group(0);

        let hourly_congestion = mean_by_key(
            table.hours().iter().copied(),
            table.traffic_index().iter().copied(),
        );

        let daily_congestion = mean_by_key(
            table.weekdays().iter().copied(),
            table.traffic_index().iter().copied(),
        )
        .into_iter()
        .filter_map(|(weekday, index)| {
            WEEKDAY_NAMES.get(weekday as usize).map(|name| DailyCongestion {
                day: name.to_string(),
                index,
            })
        })
        .collect();

        let mut peak_hours: Vec<PeakHour> = hourly_congestion
            .iter()
            .map(|(&hour, &index)| PeakHour { hour, index })
            .collect();
        peak_hours.sort_by(|a, b| b.index.total_cmp(&a.index).then(a.hour.cmp(&b.hour)));
        peak_hours.truncate(top_n);

        Self {
            weekday_vs_weekend: WeekdayWeekend {
                weekday: Self::averages(table, &weekday_rows),
                weekend: Self::averages(table, &weekend_rows),
            },
            hourly_congestion,
            daily_congestion,
            peak_hours,
            weekday_hourly_flow: Self::hourly_flow_of(table, &weekday_rows),
            weekend_hourly_flow: Self::hourly_flow_of(table, &weekend_rows),
        }
    }

    fn averages(table: &FeatureTable, rows: &[usize]) -> GroupAverages {
        GroupAverages {
            avg_flow: mean(rows.iter().map(|&i| table.flow()[i])),
            avg_speed: mean(rows.iter().map(|&i| table.speed()[i])),
            avg_occ: mean(rows.iter().map(|&i| table.occ()[i])),
            avg_traffic_index: mean(rows.iter().map(|&i| table.traffic_index()[i])),
        }
    }

    fn hourly_flow_of(table: &FeatureTable, rows: &[usize]) -> BTreeMap<u32, f64> {
        mean_by_key(
            rows.iter().map(|&i| table.hours()[i]),
            rows.iter().map(|&i| table.flow()[i]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureEngineer;
    use chrono::NaiveDate;
    use traffic_core::TrafficRecord;

    fn table() -> FeatureTable {
        let monday = NaiveDate::from_ymd_opt(2016, 9, 26).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2016, 10, 2).unwrap();
        let records = vec![
            TrafficRecord::new(monday, 8 * 3600, 1, 400.0, 40.0, 20.0),
            TrafficRecord::new(monday, 8 * 3600 + 300, 1, 300.0, 30.0, 30.0),
            TrafficRecord::new(monday, 3 * 3600, 1, 20.0, 1.0, 110.0),
            TrafficRecord::new(sunday, 8 * 3600, 1, 100.0, 5.0, 90.0),
        ];
        FeatureEngineer::new().engineer_features(&records)
    }

    #[test]
    fn test_hourly_flow_and_distribution() {
        let table = table();
        let hourly = hourly_flow(&table);
        assert_eq!(hourly.len(), 2);
        assert!((hourly[&8] - (400.0 + 300.0 + 100.0) / 3.0).abs() < 1e-10);
        assert_eq!(hourly[&3], 20.0);

        let dist = category_distribution(&table);
        assert_eq!(dist.values().sum::<usize>(), 4);

        let summary = TrafficSummary::build(&table);
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.hourly_flow, hourly);
    }

    #[test]
    fn test_report_groups() {
        let table = table();
        let report = TrafficReport::build(&table, 5);

        let weekday = report.weekday_vs_weekend.weekday;
        assert!((weekday.avg_flow - 240.0).abs() < 1e-10);
        assert_eq!(report.weekday_vs_weekend.weekend.avg_flow, 100.0);
        assert_eq!(report.weekday_vs_weekend.weekend.avg_speed, 90.0);

        let days: Vec<&str> = report.daily_congestion.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, vec!["Mon", "Sun"]);

        assert_eq!(report.peak_hours.len(), 2);
        assert_eq!(report.peak_hours[0].hour, 8);
        assert!(report.peak_hours[0].index >= report.peak_hours[1].index);

        assert_eq!(report.weekday_hourly_flow[&8], 350.0);
        assert_eq!(report.weekend_hourly_flow.len(), 1);
        assert_eq!(report.weekend_hourly_flow[&8], 100.0);
    }

    #[test]
    fn test_top_n_and_empty_groups() {
        let report = TrafficReport::build(&table(), 1);
        assert_eq!(report.peak_hours.len(), 1);

        let empty = TrafficReport::build(&FeatureTable::default(), 5);
        assert_eq!(empty.weekday_vs_weekend, WeekdayWeekend::default());
        assert!(empty.peak_hours.is_empty());
        assert!(empty.daily_congestion.is_empty());
    }
}
