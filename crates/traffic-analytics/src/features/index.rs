//! 교통 혼잡 지수 (traffic index).
//!
//! ```text
//! flow_norm    = min(flow / 500, 1)
//! occ_norm     = min(occ / 100, 1)
//! speed_factor = max(1 - speed / 120, 0)
//! index        = 100 * (0.4 * flow_norm + 0.3 * occ_norm + 0.3 * speed_factor)
//! ```
//!
//! 비유한 입력은 결합 전에 대체됩니다: flow → 0, occ → 0, speed → 60.

use traffic_core::TrafficCategory;

/// flow 정규화 기준 최대값
pub const MAX_FLOW: f64 = 500.0;
/// occ 정규화 기준 최대값 (%)
pub const MAX_OCC: f64 = 100.0;
/// speed 정규화 기준 최대값
pub const MAX_SPEED: f64 = 120.0;
/// speed가 비유한 값일 때 사용하는 자유 흐름 속도
pub const FREE_FLOW_SPEED: f64 = 60.0;

const FLOW_WEIGHT: f64 = 0.4;
const OCC_WEIGHT: f64 = 0.3;
const SPEED_WEIGHT: f64 = 0.3;

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// flow/occ/speed로 혼잡 지수를 계산합니다.
///
/// 결과는 정규화 전 값이므로 음수 입력에서는 0-100을 벗어날 수 있습니다.
pub fn calculate_traffic_index(flow: f64, occ: f64, speed: f64) -> f64 {
    let flow = finite_or(flow, 0.0);
    let occ = finite_or(occ, 0.0);
    let speed = finite_or(speed, FREE_FLOW_SPEED);

    let flow_norm = (flow / MAX_FLOW).min(1.0);
    let occ_norm = (occ / MAX_OCC).min(1.0);
    let speed_factor = (1.0 - speed / MAX_SPEED).max(0.0);

    100.0 * (FLOW_WEIGHT * flow_norm + OCC_WEIGHT * occ_norm + SPEED_WEIGHT * speed_factor)
}

/// 지수를 [0, 100]으로 제한합니다.
pub fn normalize_index(index: f64) -> f64 {
    index.clamp(0.0, 100.0)
}

/// 지수 구간으로 등급을 매깁니다.
pub fn categorize_traffic(index: f64) -> TrafficCategory {
    TrafficCategory::from_index(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_formula() {
        // 100*(0.4*0.5 + 0.3*0.5 + 0.3*0.5) = 50
        let index = calculate_traffic_index(250.0, 50.0, 60.0);
        assert!((index - 50.0).abs() < 1e-10);

        // 모든 항이 포화
        assert!((calculate_traffic_index(1_000.0, 150.0, 0.0) - 100.0).abs() < 1e-10);

        // 빈 도로
        assert_eq!(calculate_traffic_index(0.0, 0.0, 200.0), 0.0);
    }

    #[test]
    fn test_non_finite_inputs_are_replaced() {
        let index = calculate_traffic_index(f64::NAN, f64::INFINITY, f64::NAN);
        // flow=0, occ=0, speed=60 → 100*0.3*0.5
        assert!((index - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_normalize_and_categorize() {
        assert_eq!(normalize_index(-5.0), 0.0);
        assert_eq!(normalize_index(120.0), 100.0);
        assert_eq!(normalize_index(42.0), 42.0);

        assert_eq!(categorize_traffic(33.0), TrafficCategory::Low);
        assert_eq!(categorize_traffic(50.0), TrafficCategory::Medium);
        assert_eq!(categorize_traffic(66.5), TrafficCategory::High);
    }
}
