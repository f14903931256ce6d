//! 교통 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Feature engineering (시간/지표/집계 feature, 혼잡 지수)
//! - 랜덤 포레스트 기반 교통량 예측과 신뢰구간
//! - feature 중요도 및 target 상관계수
//! - 혼잡 분석 리포트
//! - 질의 기반 예측 서비스
//!
//! # Re-exports
//!
//! - [`features`]: FeatureEngineer, FeatureTable, 지수/등급 함수
//! - [`ml`]: TrafficModel, TrainedModel, RandomForestRegressor
//! - [`analysis`]: TrafficReport, TrafficSummary

pub mod analysis;
pub mod correlation;
pub mod features;
pub mod ml;
pub mod service;

pub use analysis::{category_distribution, hourly_flow, TrafficReport, TrafficSummary};
pub use correlation::{pearson, rank_by_abs};
pub use features::{FeatureEngineer, FeatureRow, FeatureTable, FEATURE_COLUMNS};
pub use ml::{
    FeatureMatrix, FeatureVector, MlError, MlResult, PredictionResult, TrafficModel, TrainedModel,
    TrainingMetrics,
};
pub use service::{PredictionOutcome, PredictionQuery, TrafficPredictionService};
