//! 상관계수 계산 모듈.
//!
//! target 컬럼과 다른 수치 컬럼 사이의 Pearson 상관계수를 계산하고
//! 절대값 기준으로 정렬합니다.

/// 두 시계열의 Pearson 상관계수.
///
/// 길이가 다르거나, 2개 미만이거나, 분산이 0이거나, 결과가 유한하지 않으면 `None`.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    // 상수 컬럼은 평균의 반올림 오차로 분산이 0이 아니게 나올 수 있음
    if is_constant(x) || is_constant(y) {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (cov, var_x, var_y) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |(c, vx, vy), (a, b)| {
        let dx = a - mean_x;
        let dy = b - mean_y;
        (c + dx * dy, vx + dx * dx, vy + dy * dy)
    });

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then_some(r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// 절대값 내림차순으로 정렬.
pub fn rank_by_abs<I>(scores: I) -> Vec<(String, f64)>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);

        let inverse = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &inverse).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_correlation() {
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
        assert_eq!(pearson(&[1.0, f64::NAN], &[1.0, 2.0]), None);
    }

    #[test]
    fn test_rank_by_abs() {
        let scores: HashMap<String, f64> = [("a", 0.1), ("b", -0.9), ("c", 0.5)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let ranked = rank_by_abs(scores);
        let names: Vec<&str> = ranked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(ranked[0].1, -0.9);
    }
}
