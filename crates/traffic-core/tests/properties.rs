//! 도메인 타입 속성 테스트.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use traffic_core::{parse_day, TrafficCategory, TrafficFilter};

proptest! {
    #[test]
    fn category_bands_cover_index_range(index in -50.0f64..150.0) {
        let category = TrafficCategory::from_index(index);
        match category {
            TrafficCategory::Low => prop_assert!(index <= 33.0),
            TrafficCategory::Medium => prop_assert!(index > 33.0 && index <= 66.0),
            TrafficCategory::High => prop_assert!(index > 66.0),
        }
    }

    #[test]
    fn parse_day_accepts_formatted_dates(offset in 0i64..60_000) {
        let day = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + Duration::days(offset);
        prop_assert_eq!(parse_day(&day.format("%Y-%m-%d").to_string()).unwrap(), day);
    }

    #[test]
    fn parse_day_rejects_slash_dates(y in 1900i32..2100, m in 1u32..13, d in 1u32..29) {
        let text = format!("{}/{:02}/{:02}", y, m, d);
        prop_assert!(parse_day(&text).is_err());
    }

    #[test]
    fn hour_filter_is_inclusive(start in 0u32..24, end in 0u32..24, hour in 0u32..24) {
        let filter = TrafficFilter::new().with_hours(Some(start), Some(end));
        let day = NaiveDate::from_ymd_opt(2016, 9, 26).unwrap();
        prop_assert_eq!(filter.matches(day, 1, hour), start <= hour && hour <= end);
    }
}
