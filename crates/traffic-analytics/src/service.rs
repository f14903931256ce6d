//! 질의 기반 교통량 예측 서비스.
//!
//! (시각, 요일, 검지기) 질의로부터 과거 평균을 이용해 feature 행을 만들고,
//! 예측된 flow로 traffic index와 등급을 다시 계산합니다.

use serde::{Deserialize, Serialize};
use tracing::debug;
use traffic_core::{AnalysisConfig, TrafficCategory, TrafficError};

use crate::features::{
    calculate_traffic_index, categorize_traffic, is_peak_traffic, is_rush_hour, is_weekday,
    normalize_index, FeatureTable, FEATURE_COLUMNS,
};
use crate::ml::{FeatureVector, MlError, MlResult, TrainedModel};

/// 예측 질의.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionQuery {
    /// 시 (0-23)
    pub hour: u32,
    /// 요일 (월요일=0 .. 일요일=6)
    pub weekday: u32,
    /// 검지기 ID
    pub detid: i64,
    /// 월 (없으면 설정의 기본값)
    pub month: Option<u32>,
}

impl PredictionQuery {
    pub fn new(hour: u32, weekday: u32, detid: i64) -> Self {
        Self {
            hour,
            weekday,
            detid,
            month: None,
        }
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    fn validate(&self) -> MlResult<()> {
        if self.hour > 23 {
            return Err(TrafficError::InvalidInput(format!("hour는 0-23: {}", self.hour)).into());
        }
        if self.weekday > 6 {
            return Err(TrafficError::InvalidInput(format!("weekday는 0-6: {}", self.weekday)).into());
        }
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(TrafficError::InvalidInput(format!("month는 1-12: {}", month)).into());
            }
        }
        Ok(())
    }
}

/// 예측 결과와 파생 혼잡 지표.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub prediction: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
    pub traffic_index: f64,
    pub category: TrafficCategory,
}

/// 예측 서비스.
#[derive(Debug, Clone)]
pub struct TrafficPredictionService {
    default_month: u32,
}

impl Default for TrafficPredictionService {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

fn mean_where(values: &[f64], mask: impl Fn(usize) -> bool) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .enumerate()
        .filter(|(i, _)| mask(*i))
        .fold((0.0, 0usize), |(s, c), (_, v)| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

impl TrafficPredictionService {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            default_month: config.default_month,
        }
    }

    /// 질의에 대한 feature vector를 만듭니다.
    ///
    /// 검지기 평균은 해당 검지기 행에서 계산하며, 검지기가 없으면 전체 평균을 씁니다.
    /// 시간대 평균 flow는 해당 시각 행에서, 없으면 전체 flow 평균을 씁니다.
    pub fn build_features(&self, table: &FeatureTable, query: &PredictionQuery) -> MlResult<FeatureVector> {
        query.validate()?;
        if table.is_empty() {
            return Err(MlError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let detids = table.detids();
        let hours = table.hours();
        let on_detector = |i: usize| detids[i] == query.detid;
        let known_detector = detids.contains(&query.detid);
        if !known_detector {
            debug!(detid = query.detid, "알 수 없는 검지기, 전체 평균 사용");
        }

        let detector_mean = |values: &[f64]| -> f64 {
            let mean = if known_detector {
                mean_where(values, &on_detector)
            } else {
                mean_where(values, |_| true)
            };
            mean.unwrap_or(0.0)
        };

        let mean_flow = detector_mean(table.flow());
        let mean_speed = detector_mean(table.speed());
        let mean_occ = detector_mean(table.occ());
        let hourly_mean_flow = mean_where(table.flow(), |i| hours[i] == query.hour)
            .or_else(|| mean_where(table.flow(), |_| true))
            .unwrap_or(0.0);

        let rush = is_rush_hour(query.hour);
        let weekday = is_weekday(query.weekday);
        let values = [
            query.hour as f64,
            query.weekday as f64,
            query.month.unwrap_or(self.default_month) as f64,
            rush as f64,
            weekday as f64,
            is_peak_traffic(rush, weekday) as f64,
            mean_flow,
            mean_speed,
            mean_occ,
            hourly_mean_flow,
            mean_occ,
            mean_speed,
            query.detid as f64,
        ];

        Ok(FeatureVector::from_pairs(FEATURE_COLUMNS.iter().copied().zip(values)))
    }

    /// 질의를 예측하고 예측 flow로 혼잡 지수/등급을 계산합니다.
    pub fn predict(
        &self,
        model: &TrainedModel,
        table: &FeatureTable,
        query: &PredictionQuery,
    ) -> MlResult<PredictionOutcome> {
        let features = self.build_features(table, query)?;
        let result = model.predict(&features)?;

        let occ = features.get("occ").unwrap_or(0.0);
        let speed = features.get("speed").unwrap_or(f64::NAN);
        let traffic_index = normalize_index(calculate_traffic_index(result.prediction, occ, speed));

        Ok(PredictionOutcome {
            prediction: result.prediction,
            confidence_low: result.confidence_low,
            confidence_high: result.confidence_high,
            traffic_index,
            category: categorize_traffic(traffic_index),
        })
    }
}
