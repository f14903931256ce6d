//! Feature engineering.
//!
//! 검증된 측정 레코드를 시간/지표/집계/혼잡 지수 컬럼을 가진
//! [`FeatureTable`]로 변환합니다. 모든 변환은 컬럼 단위 순수 함수입니다.
//!
//! ```text
//! TrafficRecord[]
//!      │
//!      ▼
//! 시간 feature (hour, weekday, month)
//!      ▼
//! 0/1 지표 (is_rush_hour, is_weekday, is_peak_traffic)
//!      ▼
//! 검지기/시간대 평균
//!      ▼
//! traffic_index → traffic_category
//! ```

pub mod aggregates;
pub mod engineer;
pub mod index;
pub mod indicators;
pub mod table;
pub mod time;

pub use aggregates::{
    calculate_detector_aggregates, calculate_hourly_aggregates, group_mean, DetectorAggregates,
};
pub use engineer::FeatureEngineer;
pub use index::{calculate_traffic_index, categorize_traffic, normalize_index};
pub use indicators::{is_peak_traffic, is_rush_hour, is_weekday, RUSH_HOURS};
pub use table::{FeatureRow, FeatureTable, FEATURE_COLUMNS, NUMERIC_COLUMNS};
pub use time::{
    extract_hour, extract_month, extract_weekday, interval_to_time, month_of, time_to_interval,
    weekday_of,
};
