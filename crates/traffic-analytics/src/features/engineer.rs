//! 레코드 → feature table 변환.

use tracing::{debug, info};
use traffic_core::TrafficRecord;

use super::aggregates::{calculate_detector_aggregates, calculate_hourly_aggregates};
use super::index::{calculate_traffic_index, categorize_traffic, normalize_index};
use super::indicators::{is_peak_traffic, is_rush_hour, is_weekday};
use super::table::FeatureTable;
use super::time::{extract_hour, month_of, weekday_of};

/// 상태가 없는 feature 생성기.
///
/// 다음 순서로 컬럼 단위 변환을 적용합니다:
/// 시간 feature → 0/1 지표 → 검지기 평균 → 시간대 평균 → 지수 → 정규화 → 등급.
/// 지수는 집계값이 아니라 각 행의 flow/occ/speed로 계산합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEngineer;

impl FeatureEngineer {
    pub fn new() -> Self {
        Self
    }

    /// 검증된 레코드에서 feature table을 만듭니다.
    pub fn engineer_features(&self, records: &[TrafficRecord]) -> FeatureTable {
        let day: Vec<_> = records.iter().map(|r| r.day).collect();
        let interval: Vec<u32> = records.iter().map(|r| r.interval).collect();
        let detid: Vec<i64> = records.iter().map(|r| r.detid).collect();
        let flow: Vec<f64> = records.iter().map(|r| r.flow).collect();
        let occ: Vec<f64> = records.iter().map(|r| r.occ).collect();
        let speed: Vec<f64> = records.iter().map(|r| r.speed).collect();

        // 시간 feature
        let hour: Vec<u32> = interval.iter().map(|&i| extract_hour(i)).collect();
        let weekday: Vec<u32> = day.iter().map(|&d| weekday_of(d)).collect();
        let month: Vec<u32> = day.iter().map(|&d| month_of(d)).collect();

        // 0/1 지표
        let rush: Vec<u8> = hour.iter().map(|&h| is_rush_hour(h)).collect();
        let weekday_flag: Vec<u8> = weekday.iter().map(|&w| is_weekday(w)).collect();
        let peak: Vec<u8> = rush
            .iter()
            .zip(&weekday_flag)
            .map(|(&r, &w)| is_peak_traffic(r, w))
            .collect();

        let detector = calculate_detector_aggregates(&detid, &flow, &speed, &occ);
        let hourly_mean_flow = calculate_hourly_aggregates(&hour, &flow);
        debug!("집계 feature 계산 완료");

        let traffic_index: Vec<f64> = flow
            .iter()
            .zip(&occ)
            .zip(&speed)
            .map(|((&f, &o), &s)| normalize_index(calculate_traffic_index(f, o, s)))
            .collect();
        let traffic_category = traffic_index.iter().map(|&i| categorize_traffic(i)).collect();

        let table = FeatureTable {
            day,
            interval,
            detid,
            flow,
            occ,
            speed,
            hour,
            weekday,
            month,
            is_rush_hour: rush,
            is_weekday: weekday_flag,
            is_peak_traffic: peak,
            detector_mean_flow: detector.mean_flow,
            detector_mean_speed: detector.mean_speed,
            detector_mean_occ: detector.mean_occ,
            hourly_mean_flow,
            traffic_index,
            traffic_category,
        };

        info!(rows = table.len(), "feature engineering 완료");
        table
    }
}
