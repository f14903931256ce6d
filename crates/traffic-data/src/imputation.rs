//! 결측값 처리.
//!
//! - `flow`/`occ`/`speed`: 비유한 값은 결측으로 보고, 유한값 평균으로 채움 (유한값이 없으면 0)
//! - `day`/`interval`/`detid`: 앞 값으로 채운 뒤, 남은 앞부분은 뒤 값으로 채움

use tracing::warn;
use traffic_core::{parse_day, TrafficError, TrafficRecord, TrafficResult};

use crate::loader::RawTrafficRow;

/// 유한값 평균. 유한값이 없으면 0.
fn finite_mean(values: impl Iterator<Item = Option<f64>>) -> f64 {
    let (sum, count) = values
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        return 0.0;
    }
    let mean = sum / count as f64;
    if mean.is_finite() {
        mean
    } else {
        0.0
    }
}

/// 수치 컬럼을 평균으로 채웁니다. 채운 개수를 함께 반환합니다.
fn fill_with_mean(values: Vec<Option<f64>>) -> (Vec<f64>, usize) {
    let mean = finite_mean(values.iter().copied());
    let mut filled = 0;
    let out = values
        .into_iter()
        .map(|v| match v {
            Some(x) if x.is_finite() => x,
            _ => {
                filled += 1;
                mean
            }
        })
        .collect();
    (out, filled)
}

/// 앞 값 채우기 후 뒤 값 채우기. 값이 하나도 없으면 `None`.
fn fill_forward_backward<T: Clone>(values: Vec<Option<T>>) -> Option<Vec<T>> {
    let first = values.iter().flatten().next()?.clone();

    let mut last = first;
    Some(
        values
            .into_iter()
            .map(|v| {
                if let Some(x) = v {
                    last = x;
                }
                last.clone()
            })
            .collect(),
    )
}

/// 원시 행의 결측값을 채워 검증된 레코드를 만듭니다.
///
/// 식별 컬럼(`day`, `interval`, `detid`) 중 값이 전혀 없는 컬럼이 있으면
/// `Data` 에러, 날짜 형식이 잘못되면 `InvalidDateFormat` 에러를 반환합니다.
pub fn handle_missing_values(rows: &[RawTrafficRow]) -> TrafficResult<Vec<TrafficRecord>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let (flow, flow_filled) = fill_with_mean(rows.iter().map(|r| r.flow).collect());
    let (occ, occ_filled) = fill_with_mean(rows.iter().map(|r| r.occ).collect());
    let (speed, speed_filled) = fill_with_mean(rows.iter().map(|r| r.speed).collect());

    let missing_column = |name: &str| TrafficError::Data(format!("'{}' 컬럼에 값이 하나도 없음", name));

    let days = fill_forward_backward(rows.iter().map(|r| r.day.clone()).collect())
        .ok_or_else(|| missing_column("day"))?;
    let intervals = fill_forward_backward(rows.iter().map(|r| r.interval).collect())
        .ok_or_else(|| missing_column("interval"))?;
    let detids = fill_forward_backward(rows.iter().map(|r| r.detid).collect())
        .ok_or_else(|| missing_column("detid"))?;

    let filled = flow_filled + occ_filled + speed_filled;
    if filled > 0 {
        warn!(
            flow = flow_filled,
            occ = occ_filled,
            speed = speed_filled,
            "결측/비유한 측정값을 컬럼 평균으로 대체"
        );
    }

    days.iter()
        .zip(intervals)
        .zip(detids)
        .zip(flow.into_iter().zip(occ).zip(speed))
        .map(|(((day, interval), detid), ((flow, occ), speed))| {
            Ok(TrafficRecord::new(parse_day(day)?, interval, detid, flow, occ, speed))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: Option<&str>, interval: Option<u32>, flow: Option<f64>) -> RawTrafficRow {
        RawTrafficRow {
            day: day.map(str::to_string),
            interval,
            detid: Some(1),
            flow,
            occ: Some(5.0),
            speed: Some(50.0),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(handle_missing_values(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_numeric_mean_fill() {
        let rows = vec![
            row(Some("2016-09-26"), Some(0), Some(10.0)),
            row(Some("2016-09-26"), Some(300), Some(f64::NAN)),
            row(Some("2016-09-26"), Some(600), Some(30.0)),
            row(Some("2016-09-26"), Some(900), Some(f64::NEG_INFINITY)),
        ];
        let records = handle_missing_values(&rows).unwrap();
        assert_eq!(records[1].flow, 20.0);
        assert_eq!(records[3].flow, 20.0);
    }

    #[test]
    fn test_all_missing_numeric_becomes_zero() {
        let rows = vec![row(Some("2016-09-26"), Some(0), None), row(Some("2016-09-26"), Some(300), None)];
        let records = handle_missing_values(&rows).unwrap();
        assert!(records.iter().all(|r| r.flow == 0.0));
    }

    #[test]
    fn test_forward_then_backward_fill() {
        let rows = vec![
            row(None, None, Some(1.0)),
            row(Some("2016-09-26"), Some(300), Some(1.0)),
            row(None, None, Some(1.0)),
            row(Some("2016-09-27"), Some(900), Some(1.0)),
        ];
        let records = handle_missing_values(&rows).unwrap();
        assert_eq!(records[0].interval, 300);
        assert_eq!(records[0].date_string(), "2016-09-26");
        assert_eq!(records[2].interval, 300);
        assert_eq!(records[2].date_string(), "2016-09-26");
        assert_eq!(records[3].date_string(), "2016-09-27");
    }

    #[test]
    fn test_identifier_column_without_values_fails() {
        let rows = vec![row(None, Some(0), Some(1.0))];
        let err = handle_missing_values(&rows).unwrap_err();
        assert!(matches!(err, TrafficError::Data(_)));
    }

    #[test]
    fn test_bad_date_propagates() {
        let rows = vec![row(Some("26/09/2016"), Some(0), Some(1.0))];
        let err = handle_missing_values(&rows).unwrap_err();
        assert!(matches!(err, TrafficError::InvalidDateFormat(_)));
    }
}
