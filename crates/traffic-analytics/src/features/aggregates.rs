//! 그룹 평균 feature (검지기별, 시간대별).
//!
//! 평균은 입력 테이블 전체에서 계산한 뒤 각 행에 다시 붙입니다.
//! 행 자신의 flow/speed/occ는 바뀌지 않습니다.

use std::collections::HashMap;
use std::hash::Hash;

/// 검지기별 평균 컬럼.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorAggregates {
    pub mean_flow: Vec<f64>,
    pub mean_speed: Vec<f64>,
    pub mean_occ: Vec<f64>,
}

/// 같은 key를 가진 값들의 평균을 각 행 위치에 돌려줍니다.
pub fn group_mean<K>(keys: &[K], values: &[f64]) -> Vec<f64>
where
    K: Eq + Hash + Copy,
{
    let mut groups: HashMap<K, (f64, usize)> = HashMap::new();
    for (key, value) in keys.iter().zip(values) {
        let entry = groups.entry(*key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    keys.iter()
        .map(|key| {
            groups
                .get(key)
                .map(|(sum, count)| sum / *count as f64)
                .unwrap_or(0.0)
        })
        .collect()
}

/// 검지기별 flow/speed/occ 평균.
pub fn calculate_detector_aggregates(
    detids: &[i64],
    flow: &[f64],
    speed: &[f64],
    occ: &[f64],
) -> DetectorAggregates {
    DetectorAggregates {
        mean_flow: group_mean(detids, flow),
        mean_speed: group_mean(detids, speed),
        mean_occ: group_mean(detids, occ),
    }
}

/// 시간대별 flow 평균.
pub fn calculate_hourly_aggregates(hours: &[u32], flow: &[f64]) -> Vec<f64> {
    group_mean(hours, flow)
}
