//! 타입이 정해진 컬럼형 feature table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use traffic_core::{TrafficCategory, TrafficFilter};

use crate::ml::{FeatureMatrix, FeatureVector, MlError, MlResult};

/// 모델 학습/추론에 사용하는 feature 컬럼 (위치 기반 입력 순서).
pub const FEATURE_COLUMNS: [&str; 13] = [
    "hour",
    "weekday",
    "month",
    "is_rush_hour",
    "is_weekday",
    "is_peak_traffic",
    "detector_mean_flow",
    "detector_mean_speed",
    "detector_mean_occ",
    "hourly_mean_flow",
    "occ",
    "speed",
    "detid",
];

/// 수치 컬럼 이름. `day`, `traffic_category`는 포함하지 않습니다.
pub const NUMERIC_COLUMNS: [&str; 16] = [
    "interval",
    "detid",
    "flow",
    "occ",
    "speed",
    "hour",
    "weekday",
    "month",
    "is_rush_hour",
    "is_weekday",
    "is_peak_traffic",
    "detector_mean_flow",
    "detector_mean_speed",
    "detector_mean_occ",
    "hourly_mean_flow",
    "traffic_index",
];

/// feature table의 한 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub day: NaiveDate,
    pub interval: u32,
    pub detid: i64,
    pub flow: f64,
    pub occ: f64,
    pub speed: f64,
    pub hour: u32,
    pub weekday: u32,
    pub month: u32,
    pub is_rush_hour: u8,
    pub is_weekday: u8,
    pub is_peak_traffic: u8,
    pub detector_mean_flow: f64,
    pub detector_mean_speed: f64,
    pub detector_mean_occ: f64,
    pub hourly_mean_flow: f64,
    pub traffic_index: f64,
    pub traffic_category: TrafficCategory,
}

impl FeatureRow {
    /// 이름으로 수치 컬럼 값을 조회합니다.
    pub fn value(&self, column: &str) -> Option<f64> {
        let v = match column {
            "interval" => self.interval as f64,
            "detid" => self.detid as f64,
            "flow" => self.flow,
            "occ" => self.occ,
            "speed" => self.speed,
            "hour" => self.hour as f64,
            "weekday" => self.weekday as f64,
            "month" => self.month as f64,
            "is_rush_hour" => self.is_rush_hour as f64,
            "is_weekday" => self.is_weekday as f64,
            "is_peak_traffic" => self.is_peak_traffic as f64,
            "detector_mean_flow" => self.detector_mean_flow,
            "detector_mean_speed" => self.detector_mean_speed,
            "detector_mean_occ" => self.detector_mean_occ,
            "hourly_mean_flow" => self.hourly_mean_flow,
            "traffic_index" => self.traffic_index,
            _ => return None,
        };
        Some(v)
    }

    /// [`FEATURE_COLUMNS`] 이름이 붙은 feature vector로 변환.
    pub fn to_feature_vector(&self) -> FeatureVector {
        FeatureVector::from_pairs(
            FEATURE_COLUMNS
                .iter()
                .map(|name| (*name, self.value(name).unwrap_or(0.0))),
        )
    }
}

/// 컬럼마다 하나의 `Vec`을 가지는 feature table.
///
/// 모든 컬럼의 길이는 같습니다. [`FeatureEngineer`](super::FeatureEngineer)가 만들며
/// 이후 변경되지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub(crate) day: Vec<NaiveDate>,
    pub(crate) interval: Vec<u32>,
    pub(crate) detid: Vec<i64>,
    pub(crate) flow: Vec<f64>,
    pub(crate) occ: Vec<f64>,
    pub(crate) speed: Vec<f64>,
    pub(crate) hour: Vec<u32>,
    pub(crate) weekday: Vec<u32>,
    pub(crate) month: Vec<u32>,
    pub(crate) is_rush_hour: Vec<u8>,
    pub(crate) is_weekday: Vec<u8>,
    pub(crate) is_peak_traffic: Vec<u8>,
    pub(crate) detector_mean_flow: Vec<f64>,
    pub(crate) detector_mean_speed: Vec<f64>,
    pub(crate) detector_mean_occ: Vec<f64>,
    pub(crate) hourly_mean_flow: Vec<f64>,
    pub(crate) traffic_index: Vec<f64>,
    pub(crate) traffic_category: Vec<TrafficCategory>,
}

fn as_f64<T: Copy + Into<f64>>(values: &[T]) -> Vec<f64> {
    values.iter().map(|v| (*v).into()).collect()
}

fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i].clone()).collect()
}

impl FeatureTable {
    /// 행 수.
    pub fn len(&self) -> usize {
        self.day.len()
    }

    /// 행이 없는지 확인.
    pub fn is_empty(&self) -> bool {
        self.day.is_empty()
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.day
    }

    pub fn detids(&self) -> &[i64] {
        &self.detid
    }

    pub fn flow(&self) -> &[f64] {
        &self.flow
    }

    pub fn occ(&self) -> &[f64] {
        &self.occ
    }

    pub fn speed(&self) -> &[f64] {
        &self.speed
    }

    pub fn hours(&self) -> &[u32] {
        &self.hour
    }

    pub fn weekdays(&self) -> &[u32] {
        &self.weekday
    }

    pub fn weekday_flags(&self) -> &[u8] {
        &self.is_weekday
    }

    pub fn traffic_index(&self) -> &[f64] {
        &self.traffic_index
    }

    pub fn categories(&self) -> &[TrafficCategory] {
        &self.traffic_category
    }

    /// i번째 행. 범위를 벗어나면 `None`.
    pub fn row(&self, i: usize) -> Option<FeatureRow> {
        if i >= self.len() {
            return None;
        }
        Some(FeatureRow {
            day: self.day[i],
            interval: self.interval[i],
            detid: self.detid[i],
            flow: self.flow[i],
            occ: self.occ[i],
            speed: self.speed[i],
            hour: self.hour[i],
            weekday: self.weekday[i],
            month: self.month[i],
            is_rush_hour: self.is_rush_hour[i],
            is_weekday: self.is_weekday[i],
            is_peak_traffic: self.is_peak_traffic[i],
            detector_mean_flow: self.detector_mean_flow[i],
            detector_mean_speed: self.detector_mean_speed[i],
            detector_mean_occ: self.detector_mean_occ[i],
            hourly_mean_flow: self.hourly_mean_flow[i],
            traffic_index: self.traffic_index[i],
            traffic_category: self.traffic_category[i],
        })
    }

    /// 모든 행을 순서대로 반환.
    pub fn rows(&self) -> impl Iterator<Item = FeatureRow> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// 수치 컬럼 이름 목록.
    pub fn numeric_column_names(&self) -> &'static [&'static str] {
        &NUMERIC_COLUMNS
    }

    /// 수치 컬럼을 f64로 반환. 알 수 없는 이름이면 `None`.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let values = match name {
            "interval" => as_f64(&self.interval),
            "detid" => self.detid.iter().map(|&d| d as f64).collect(),
            "flow" => self.flow.clone(),
            "occ" => self.occ.clone(),
            "speed" => self.speed.clone(),
            "hour" => as_f64(&self.hour),
            "weekday" => as_f64(&self.weekday),
            "month" => as_f64(&self.month),
            "is_rush_hour" => as_f64(&self.is_rush_hour),
            "is_weekday" => as_f64(&self.is_weekday),
            "is_peak_traffic" => as_f64(&self.is_peak_traffic),
            "detector_mean_flow" => self.detector_mean_flow.clone(),
            "detector_mean_speed" => self.detector_mean_speed.clone(),
            "detector_mean_occ" => self.detector_mean_occ.clone(),
            "hourly_mean_flow" => self.hourly_mean_flow.clone(),
            "traffic_index" => self.traffic_index.clone(),
            _ => return None,
        };
        Some(values)
    }

    /// 지정한 컬럼으로 행 단위 feature matrix를 만듭니다.
    ///
    /// 알 수 없는 컬럼은 모두 모아 `InvalidFeatureInput`으로 보고합니다.
    pub fn to_matrix(&self, names: &[&str]) -> MlResult<FeatureMatrix> {
        if self.is_empty() {
            return Err(MlError::InvalidFeatureInput("feature table이 비어있음".to_string()));
        }

        let unknown: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !NUMERIC_COLUMNS.contains(name))
            .collect();
        if !unknown.is_empty() {
            return Err(MlError::InvalidFeatureInput(format!(
                "알 수 없는 컬럼: {}",
                unknown.join(", ")
            )));
        }

        let columns: Vec<Vec<f64>> = names.iter().filter_map(|name| self.column(name)).collect();
        let rows = (0..self.len())
            .map(|i| columns.iter().map(|col| col[i]).collect())
            .collect();

        FeatureMatrix::new(names.iter().map(|n| n.to_string()).collect(), rows)
    }

    /// 필터를 통과한 행만 남긴 새 테이블.
    ///
    /// 집계 컬럼은 원래 테이블에서 계산된 값을 그대로 유지합니다.
    pub fn filter(&self, filter: &TrafficFilter) -> FeatureTable {
        if filter.is_empty() {
            return self.clone();
        }

        let indices: Vec<usize> = (0..self.len())
            .filter(|&i| filter.matches(self.day[i], self.detid[i], self.hour[i]))
            .collect();
        self.select(&indices)
    }

    fn select(&self, indices: &[usize]) -> FeatureTable {
        FeatureTable {
            day: pick(&self.day, indices),
            interval: pick(&self.interval, indices),
            detid: pick(&self.detid, indices),
            flow: pick(&self.flow, indices),
            occ: pick(&self.occ, indices),
            speed: pick(&self.speed, indices),
            hour: pick(&self.hour, indices),
            weekday: pick(&self.weekday, indices),
            month: pick(&self.month, indices),
            is_rush_hour: pick(&self.is_rush_hour, indices),
            is_weekday: pick(&self.is_weekday, indices),
            is_peak_traffic: pick(&self.is_peak_traffic, indices),
            detector_mean_flow: pick(&self.detector_mean_flow, indices),
            detector_mean_speed: pick(&self.detector_mean_speed, indices),
            detector_mean_occ: pick(&self.detector_mean_occ, indices),
            hourly_mean_flow: pick(&self.hourly_mean_flow, indices),
            traffic_index: pick(&self.traffic_index, indices),
            traffic_category: pick(&self.traffic_category, indices),
        }
    }
}
