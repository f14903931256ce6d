//! 시간 feature 추출.
//!
//! `interval`은 자정부터 경과한 초(0-86399)이며, 날짜는 `YYYY-MM-DD` 형식입니다.

use chrono::{Datelike, NaiveDate};
use traffic_core::{parse_day, TrafficError, TrafficResult, SECONDS_PER_DAY};

const SECONDS_PER_HOUR: u32 = 3_600;
const SECONDS_PER_MINUTE: u32 = 60;

/// interval에서 시(0-23)를 추출합니다.
pub fn extract_hour(interval: u32) -> u32 {
    interval / SECONDS_PER_HOUR
}

/// 날짜 문자열에서 요일을 추출합니다 (월요일=0 .. 일요일=6).
pub fn extract_weekday(date: &str) -> TrafficResult<u32> {
    parse_day(date).map(weekday_of)
}

/// 날짜 문자열에서 월(1-12)을 추출합니다.
pub fn extract_month(date: &str) -> TrafficResult<u32> {
    parse_day(date).map(month_of)
}

/// 요일 (월요일=0).
pub fn weekday_of(day: NaiveDate) -> u32 {
    day.weekday().num_days_from_monday()
}

/// 월 (1-12).
pub fn month_of(day: NaiveDate) -> u32 {
    day.month()
}

/// interval을 `HH:MM:SS` 문자열로 변환합니다.
pub fn interval_to_time(interval: u32) -> TrafficResult<String> {
    if interval >= SECONDS_PER_DAY {
        return Err(TrafficError::InvalidTime(format!(
            "interval {}은 0-{} 범위를 벗어남",
            interval,
            SECONDS_PER_DAY - 1
        )));
    }

    let hours = interval / SECONDS_PER_HOUR;
    let minutes = (interval % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = interval % SECONDS_PER_MINUTE;
    Ok(format!("{:02}:{:02}:{:02}", hours, minutes, seconds))
}

/// `HH:MM:SS` 문자열을 interval로 변환합니다.
pub fn time_to_interval(time: &str) -> TrafficResult<u32> {
    let invalid = || TrafficError::InvalidTime(time.to_string());

    let parts: Vec<&str> = time.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let mut fields = [0u32; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = part.parse().map_err(|_| invalid())?;
    }

    let [hours, minutes, seconds] = fields;
    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    Ok(hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE + seconds)
}
