//! 시드 기반 샘플링과 학습/테스트 분할.

use rand::seq::{index, SliceRandom};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use traffic_core::TrafficError;

use super::error::{MlError, MlResult};

// 같은 시드에서 샘플링과 분할이 서로 다른 난수열을 쓰도록 stream을 나눔
const SUBSAMPLE_STREAM: u64 = 1;
const SPLIT_STREAM: u64 = 2;

fn seeded_rng(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// `n`개 중 정확히 `max_rows`개를 비복원 추출한 인덱스 (오름차순).
///
/// `n <= max_rows`이면 전체 인덱스를 반환합니다.
pub fn subsample_indices(n: usize, max_rows: usize, seed: u64) -> Vec<usize> {
    if n <= max_rows {
        return (0..n).collect();
    }
    let mut picked = index::sample(&mut seeded_rng(seed, SUBSAMPLE_STREAM), n, max_rows).into_vec();
    picked.sort_unstable();
    picked
}

/// 테스트 구간 크기: `ceil(n * test_size)`를 `[1, n-1]`로 제한.
pub fn test_count(n: usize, test_size: f64) -> usize {
    ((n as f64 * test_size).ceil() as usize).clamp(1, n.saturating_sub(1).max(1))
}

/// `(train_idx, test_idx)`로 섞어서 나눕니다.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> MlResult<(Vec<usize>, Vec<usize>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MlError::Traffic(TrafficError::InvalidInput(format!(
            "test_size는 (0, 1) 범위여야 함: {}",
            test_size
        ))));
    }
    if n < 2 {
        return Err(MlError::InsufficientData {
            required: 2,
            actual: n,
        });
    }

    let n_test = test_count(n, test_size);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut seeded_rng(seed, SPLIT_STREAM));

    let train = indices.split_off(n_test);
    Ok((train, indices))
}
