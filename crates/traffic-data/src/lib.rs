//! 교통 측정 데이터 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - CSV 로드 및 필수 컬럼 검증
//! - 결측/비유한 값 처리
//! - 시드 기반 샘플링
//! - 데이터셋 기본 통계

pub mod imputation;
pub mod loader;
pub mod statistics;

pub use imputation::handle_missing_values;
pub use loader::{
    load_raw_csv, read_raw_csv, sample_records, validate_columns, RawTrafficRow,
    TrafficDataLoader, REQUIRED_COLUMNS,
};
pub use statistics::{DatasetStatistics, DateRange, ValueStats};
