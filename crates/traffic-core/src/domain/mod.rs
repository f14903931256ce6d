//! 교통 도메인 모델.

mod category;
mod filter;
mod record;

pub use category::TrafficCategory;
pub use filter::TrafficFilter;
pub use record::{parse_day, TrafficRecord, DATE_FORMAT, SECONDS_PER_DAY};
