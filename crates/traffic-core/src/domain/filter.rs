//! 날짜/검지기/시간대 필터.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 대시보드 질의용 행 필터.
///
/// 모든 조건은 선택적이며 경계값을 포함합니다. 조건이 없으면 모든 행이 통과합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficFilter {
    /// 시작 날짜 (포함)
    pub start_date: Option<NaiveDate>,
    /// 종료 날짜 (포함)
    pub end_date: Option<NaiveDate>,
    /// 검지기 ID
    pub detid: Option<i64>,
    /// 시작 시각 (포함, 0-23)
    pub hour_start: Option<u32>,
    /// 종료 시각 (포함, 0-23)
    pub hour_end: Option<u32>,
}

impl TrafficFilter {
    /// 빈 필터 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 날짜 범위 설정.
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// 검지기 설정.
    pub fn with_detid(mut self, detid: i64) -> Self {
        self.detid = Some(detid);
        self
    }

    /// 시간대 범위 설정.
    pub fn with_hours(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        self.hour_start = start;
        self.hour_end = end;
        self
    }

    /// 조건이 하나도 없는지 확인.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 행이 모든 조건을 만족하는지 확인.
    pub fn matches(&self, day: NaiveDate, detid: i64, hour: u32) -> bool {
        self.start_date.map_or(true, |start| day >= start)
            && self.end_date.map_or(true, |end| day <= end)
            && self.detid.map_or(true, |id| detid == id)
            && self.hour_start.map_or(true, |h| hour >= h)
            && self.hour_end.map_or(true, |h| hour <= h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = TrafficFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(day("2016-09-26"), 1, 0));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = TrafficFilter::new()
            .with_dates(Some(day("2016-09-01")), Some(day("2016-09-30")))
            .with_hours(Some(7), Some(9));

        assert!(filter.matches(day("2016-09-01"), 1, 7));
        assert!(filter.matches(day("2016-09-30"), 1, 9));
        assert!(!filter.matches(day("2016-10-01"), 1, 8));
        assert!(!filter.matches(day("2016-09-15"), 1, 10));
        assert!(!filter.matches(day("2016-09-15"), 1, 6));
    }

    #[test]
    fn test_detector_filter() {
        let filter = TrafficFilter::new().with_detid(230);
        assert!(filter.matches(day("2016-09-26"), 230, 12));
        assert!(!filter.matches(day("2016-09-26"), 231, 12));
    }
}
