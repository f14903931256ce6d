//! 0/1 지표 feature.

/// 출퇴근 시간대 (07-09시, 17-19시).
pub const RUSH_HOURS: [u32; 6] = [7, 8, 9, 17, 18, 19];

/// 출퇴근 시간대이면 1.
pub fn is_rush_hour(hour: u32) -> u8 {
    u8::from(RUSH_HOURS.contains(&hour))
}

/// 평일(월-금, 0-4)이면 1.
pub fn is_weekday(weekday: u32) -> u8 {
    u8::from(weekday <= 4)
}

/// 평일 출퇴근 시간대이면 1.
pub fn is_peak_traffic(rush_hour: u8, weekday: u8) -> u8 {
    u8::from(rush_hour == 1 && weekday == 1)
}
