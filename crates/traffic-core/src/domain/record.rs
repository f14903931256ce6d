//! 검지기 측정 레코드.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{TrafficError, TrafficResult};

/// 날짜 문자열 형식 (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 하루의 초 수. `interval`은 `0..SECONDS_PER_DAY` 범위.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// `YYYY-MM-DD` 문자열을 날짜로 변환합니다.
///
/// 형식이 맞지 않거나 달력에 없는 날짜면 `InvalidDateFormat`을 반환합니다.
pub fn parse_day(value: &str) -> TrafficResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| TrafficError::InvalidDateFormat(format!("'{}': {}", value, e)))
}

/// 검지기 한 개의 한 구간 측정값.
///
/// 결측/비유한 값이 없는 검증된 행입니다. 결측 처리는 수집 단계에서 끝납니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    /// 측정 날짜
    pub day: NaiveDate,
    /// 자정 이후 경과 초 (0-86399)
    pub interval: u32,
    /// 검지기 ID
    pub detid: i64,
    /// 교통량
    pub flow: f64,
    /// 점유율 (0-100)
    pub occ: f64,
    /// 평균 속도
    pub speed: f64,
}

impl TrafficRecord {
    /// 새 레코드 생성.
    pub fn new(day: NaiveDate, interval: u32, detid: i64, flow: f64, occ: f64, speed: f64) -> Self {
        Self {
            day,
            interval,
            detid,
            flow,
            occ,
            speed,
        }
    }

    /// 날짜를 `YYYY-MM-DD` 문자열로 반환.
    pub fn date_string(&self) -> String {
        self.day.format(DATE_FORMAT).to_string()
    }
}
