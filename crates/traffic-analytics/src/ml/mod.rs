//! 교통량 예측 엔진.
//!
//! 직접 구현한 랜덤 포레스트로 flow를 예측하고, 트리별 예측의 분산으로
//! 95% 신뢰구간을 계산합니다.
//!
//! # 아키텍처
//!
//! ```text
//! FeatureTable
//!      │ to_matrix(FEATURE_COLUMNS)
//!      ▼
//! ┌─────────────────┐
//! │  TrafficModel   │ ← 샘플링, 학습/테스트 분할, 지표
//! └────────┬────────┘
//!          │ train
//!          ▼
//! ┌─────────────────┐     ┌────────────────────────┐
//! │  TrainedModel   │ ──▶ │ RandomForestRegressor  │ ← rayon 병렬 학습
//! │  (불변 핸들)    │     │  └ DecisionTreeRegressor│
//! └────────┬────────┘     └────────────────────────┘
//!          │
//!          ▼
//! PredictionResult { prediction, confidence_low, confidence_high }
//! ```
//!
//! # 예제
//!
//! ```ignore
//! use traffic_analytics::features::FeatureEngineer;
//! use traffic_analytics::ml::TrafficModel;
//!
//! let table = FeatureEngineer::new().engineer_features(&records);
//! let mut model = TrafficModel::new(config.model.clone());
//! let metrics = model.train_on_table(&table)?;
//! println!("R²: {:.3}", metrics.r2_score);
//!
//! let result = model.predict(&table.row(0).unwrap().to_feature_vector())?;
//! println!("{:.1} ({:.1} ~ {:.1})", result.prediction, result.confidence_low, result.confidence_high);
//! ```

pub mod error;
pub mod forest;
pub mod metrics;
pub mod model;
pub mod split;
pub mod tree;
pub mod types;

pub use error::{MlError, MlResult};
pub use forest::{ForestConfig, RandomForestRegressor};
pub use metrics::{
    mean_absolute_error, r2_score, regression_metrics, root_mean_squared_error, RegressionScores,
};
pub use model::{TrafficModel, TrainedModel};
pub use split::{subsample_indices, test_count, train_test_split};
pub use tree::{DecisionTreeRegressor, TreeConfig, TreeNode};
pub use types::{FeatureMatrix, FeatureVector, PredictionResult, TrainingMetrics, Z_95};
