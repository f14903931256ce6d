//! 회귀용 CART 결정 트리.
//!
//! - 분할 기준: 제곱오차합(SSE) 감소량 최대화
//! - 임계값: 인접한 서로 다른 두 값의 중간점, `x <= threshold`이면 왼쪽
//! - feature 중요도: feature별 SSE 감소량 합을 1로 정규화

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::error::{MlError, MlResult};

/// 트리 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// 최대 깊이 (루트 = 0)
    pub max_depth: usize,
    /// 분할에 필요한 최소 샘플 수
    pub min_samples_split: usize,
    /// 리프의 최소 샘플 수
    pub min_samples_leaf: usize,
    /// 분할마다 검토할 feature 수 (None = 전체)
    pub max_features: Option<usize>,
    /// feature 부분집합 추출 시드
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            min_samples_split: 10,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

/// 평탄화된 트리 노드. 자식은 `nodes` 내 인덱스로 참조합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
        n_samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        n_samples: usize,
    },
}

/// 회귀 결정 트리.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    config: TreeConfig,
    nodes: Vec<TreeNode>,
    n_features: usize,
    feature_importances: Vec<f64>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    config: &'a TreeConfig,
    n_features: usize,
    rng: ChaCha8Rng,
    nodes: Vec<TreeNode>,
    importances: Vec<f64>,
}

impl<'a> TreeBuilder<'a> {
    fn build(&mut self, indices: &[usize], depth: usize) -> usize {
        let n = indices.len();
        let mean = indices.iter().map(|&i| self.y[i]).sum::<f64>() / n as f64;
        let sse: f64 = indices.iter().map(|&i| (self.y[i] - mean).powi(2)).sum();

        let node_id = self.nodes.len();
        self.nodes.push(TreeNode::Leaf {
            value: mean,
            n_samples: n,
        });

        if depth >= self.config.max_depth
            || n < self.config.min_samples_split.max(2)
            || n < 2 * self.config.min_samples_leaf.max(1)
            || sse <= 1e-12
        {
            return node_id;
        }

        let Some(best) = self.best_split(indices) else {
            return node_id;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| self.x[i][best.feature] <= best.threshold);
        if left_idx.is_empty() || right_idx.is_empty() {
            return node_id;
        }

        self.importances[best.feature] += best.gain;

        let left = self.build(&left_idx, depth + 1);
        let right = self.build(&right_idx, depth + 1);
        self.nodes[node_id] = TreeNode::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
            n_samples: n,
        };
        node_id
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        if let Some(k) = self.config.max_features {
            let k = k.clamp(1, self.n_features);
            if k < self.n_features {
                features.shuffle(&mut self.rng);
                features.truncate(k);
            }
        }
        features
    }

    fn best_split(&mut self, indices: &[usize]) -> Option<SplitCandidate> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let total_sum: f64 = indices.iter().map(|&i| self.y[i]).sum();
        let parent_score = total_sum * total_sum / n as f64;

        let mut best: Option<SplitCandidate> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in self.candidate_features() {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (self.x[i][feature], self.y[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for split in 1..n {
                left_sum += pairs[split - 1].1;

                let (lo, hi) = (pairs[split - 1].0, pairs[split].0);
                if lo >= hi || split < min_leaf || n - split < min_leaf {
                    continue;
                }

                let n_left = split as f64;
                let n_right = (n - split) as f64;
                let right_sum = total_sum - left_sum;
                // SSE 감소량 = sum_l²/n_l + sum_r²/n_r - sum²/n
                let gain = left_sum * left_sum / n_left + right_sum * right_sum / n_right - parent_score;

                if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                    let mid = lo + (hi - lo) / 2.0;
                    let threshold = if mid < hi { mid } else { lo };
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }
}

impl DecisionTreeRegressor {
    /// 설정으로 학습 전 트리 생성.
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            n_features: 0,
            feature_importances: Vec::new(),
        }
    }

    /// 전체 행으로 학습합니다.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> MlResult<()> {
        let indices: Vec<usize> = (0..x.len()).collect();
        self.fit_sample(x, y, &indices)
    }

    /// 주어진 행 인덱스(중복 허용)로 학습합니다.
    pub fn fit_sample(&mut self, x: &[Vec<f64>], y: &[f64], sample: &[usize]) -> MlResult<()> {
        if x.len() != y.len() {
            return Err(MlError::InvalidFeatureInput(format!(
                "행 수 {}와 target 수 {}가 다름",
                x.len(),
                y.len()
            )));
        }
        if sample.is_empty() {
            return Err(MlError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if let Some(&bad) = sample.iter().find(|&&i| i >= x.len()) {
            return Err(MlError::InvalidFeatureInput(format!("행 인덱스 {} 범위 초과", bad)));
        }

        let n_features = x[sample[0]].len();
        if n_features == 0 || x.iter().any(|row| row.len() != n_features) {
            return Err(MlError::InvalidFeatureInput("feature 행 길이가 일정하지 않음".to_string()));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        rng.set_stream(1);

        let mut builder = TreeBuilder {
            x,
            y,
            config: &self.config,
            n_features,
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        builder.build(sample, 0);

        let TreeBuilder {
            nodes,
            mut importances,
            ..
        } = builder;

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }

        self.nodes = nodes;
        self.n_features = n_features;
        self.feature_importances = importances;
        Ok(())
    }

    /// 학습 여부.
    pub fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// 한 행을 예측합니다.
    pub fn predict(&self, row: &[f64]) -> MlResult<f64> {
        if !self.is_fitted() {
            return Err(MlError::NotTrained);
        }
        if row.len() != self.n_features {
            return Err(MlError::InvalidFeatureInput(format!(
                "feature 개수 불일치: 기대 {}, 입력 {}",
                self.n_features,
                row.len()
            )));
        }

        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(TreeNode::Leaf { value, .. }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                }) => {
                    id = if row[*feature] <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(MlError::ModelLoad(format!("잘못된 노드 참조: {}", id)));
                }
            }
        }
    }

    /// 정규화된 feature 중요도 (분할이 없으면 모두 0).
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }

    /// 트리 깊이 (루트만 있으면 0).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], id: usize) -> usize {
            match nodes.get(id) {
                Some(TreeNode::Split { left, right, .. }) => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }

    /// 노드 인덱스가 모두 유효한지 확인 (로드된 모델 검증용).
    pub(crate) fn is_well_formed(&self) -> bool {
        let n = self.nodes.len();
        self.is_fitted()
            && self.feature_importances.len() == self.n_features
            && self.nodes.iter().enumerate().all(|(id, node)| match node {
                TreeNode::Leaf { .. } => true,
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => *feature < self.n_features && *left > id && *right > id && *left < n && *right < n,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        // feature 0이 target을 결정, feature 1은 잡음 없는 상수
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64, 1.0]).collect();
        let y: Vec<f64> = (0..40).map(|i| if i < 20 { 10.0 } else { 50.0 }).collect();
        (x, y)
    }

    #[test]
    fn test_fit_step_function() {
        let (x, y) = step_data();
        let mut tree = DecisionTreeRegressor::new(TreeConfig::default());
        tree.fit(&x, &y).unwrap();

        assert!(tree.is_fitted());
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.predict(&[3.0, 1.0]).unwrap(), 10.0);
        assert_eq!(tree.predict(&[25.0, 1.0]).unwrap(), 50.0);
        // 중간점 19.5 기준
        assert_eq!(tree.predict(&[19.4, 1.0]).unwrap(), 10.0);
        assert_eq!(tree.predict(&[19.6, 1.0]).unwrap(), 50.0);

        assert_eq!(tree.feature_importances(), &[1.0, 0.0]);
    }

    #[test]
    fn test_max_depth_zero_is_mean() {
        let (x, y) = step_data();
        let mut tree = DecisionTreeRegressor::new(TreeConfig {
            max_depth: 0,
            ..TreeConfig::default()
        });
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&[0.0, 1.0]).unwrap(), 30.0);
        assert_eq!(tree.feature_importances(), &[0.0, 0.0]);
    }

    #[test]
    fn test_min_samples_split_stops() {
        let (x, y) = step_data();
        let mut tree = DecisionTreeRegressor::new(TreeConfig {
            min_samples_split: 41,
            ..TreeConfig::default()
        });
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64]).collect();
        let mut y = vec![0.0; 20];
        y[0] = 100.0;

        let mut tree = DecisionTreeRegressor::new(TreeConfig {
            min_samples_leaf: 5,
            min_samples_split: 2,
            ..TreeConfig::default()
        });
        tree.fit(&x, &y).unwrap();
        let mut counts = Vec::new();
        for node in &tree.nodes {
            if let TreeNode::Leaf { n_samples, .. } = node {
                counts.push(*n_samples);
            }
        }
        assert!(counts.iter().all(|&c| c >= 5), "{:?}", counts);
    }

    #[test]
    fn test_unfitted_and_bad_input() {
        let tree = DecisionTreeRegressor::new(TreeConfig::default());
        assert!(matches!(tree.predict(&[1.0]), Err(MlError::NotTrained)));

        let (x, y) = step_data();
        let mut tree = DecisionTreeRegressor::new(TreeConfig::default());
        assert!(tree.fit(&x, &y[..10]).is_err());
        assert!(tree.fit_sample(&x, &y, &[]).is_err());
        tree.fit(&x, &y).unwrap();
        assert!(matches!(tree.predict(&[1.0]), Err(MlError::InvalidFeatureInput(_))));
        assert!(tree.is_well_formed());
    }

    #[test]
    fn test_max_features_is_seeded() {
        let x: Vec<Vec<f64>> = (0..60)
            .map(|i| vec![(i % 7) as f64, (i % 5) as f64, i as f64])
            .collect();
        let y: Vec<f64> = x.iter().map(|r| r[0] * 2.0 + r[1] + r[2] * 0.1).collect();
        let config = TreeConfig {
            max_features: Some(1),
            ..TreeConfig::default()
        };

        let mut a = DecisionTreeRegressor::new(config.clone());
        let mut b = DecisionTreeRegressor::new(config);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a, b);
    }
}
