//! 랜덤 포레스트 회귀.
//!
//! 각 트리는 `seed + i`로 시드된 bootstrap 샘플에서 독립적으로 학습되며,
//! 학습은 rayon으로 병렬 수행됩니다. 트리 순서는 스레드 스케줄과 무관하게 고정됩니다.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use traffic_core::ModelConfig;

use super::error::{MlError, MlResult};
use super::tree::{DecisionTreeRegressor, TreeConfig};

/// 포레스트 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: Option<usize>,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self::from(&ModelConfig::default())
    }
}

impl From<&ModelConfig> for ForestConfig {
    fn from(config: &ModelConfig) -> Self {
        Self {
            n_estimators: config.n_estimators,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features: config.max_features,
            bootstrap: config.bootstrap,
            seed: config.seed,
        }
    }
}

impl ForestConfig {
    fn tree_config(&self, index: usize) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
            seed: self.seed.wrapping_add(index as u64),
        }
    }
}

/// 랜덤 포레스트 회귀 모델.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    config: ForestConfig,
    trees: Vec<DecisionTreeRegressor>,
    n_features: usize,
    feature_importances: Vec<f64>,
}

impl RandomForestRegressor {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            n_features: 0,
            feature_importances: Vec::new(),
        }
    }

    /// 포레스트를 학습합니다.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> MlResult<()> {
        if self.config.n_estimators == 0 {
            return Err(MlError::InvalidFeatureInput(
                "n_estimators는 1 이상이어야 함".to_string(),
            ));
        }
        let n = x.len();
        if n == 0 {
            return Err(MlError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let config = &self.config;
        let trees = (0..config.n_estimators)
            .into_par_iter()
            .map(|i| -> MlResult<DecisionTreeRegressor> {
                let tree_config = config.tree_config(i);
                let sample: Vec<usize> = if config.bootstrap {
                    let mut rng = ChaCha8Rng::seed_from_u64(tree_config.seed);
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };

                let mut tree = DecisionTreeRegressor::new(tree_config);
                tree.fit_sample(x, y, &sample)?;
                debug!(
                    tree = i,
                    nodes = tree.node_count(),
                    depth = tree.depth(),
                    "트리 학습 완료"
                );
                Ok(tree)
            })
            .collect::<MlResult<Vec<_>>>()?;

        let n_features = trees.first().map_or(0, |t| t.n_features());
        let mut importances = vec![0.0; n_features];
        for tree in &trees {
            for (acc, imp) in importances.iter_mut().zip(tree.feature_importances()) {
                *acc += imp / trees.len() as f64;
            }
        }
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }

        self.trees = trees;
        self.n_features = n_features;
        self.feature_importances = importances;
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// 트리별 예측값.
    pub fn predict_per_tree(&self, row: &[f64]) -> MlResult<Vec<f64>> {
        if !self.is_fitted() {
            return Err(MlError::NotTrained);
        }
        self.trees.iter().map(|tree| tree.predict(row)).collect()
    }

    /// 트리 예측의 평균.
    pub fn predict(&self, row: &[f64]) -> MlResult<f64> {
        let per_tree = self.predict_per_tree(row)?;
        Ok(per_tree.iter().sum::<f64>() / per_tree.len() as f64)
    }

    /// 정규화된 feature 중요도 (합 1, 분할이 전혀 없으면 모두 0).
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.is_fitted()
            && self.feature_importances.len() == self.n_features
            && self
                .trees
                .iter()
                .all(|t| t.n_features() == self.n_features && t.is_well_formed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..n)
            .map(|i| vec![i as f64, (i % 3) as f64, 5.0])
            .collect();
        let y: Vec<f64> = x.iter().map(|r| 3.0 * r[0] + r[1]).collect();
        (x, y)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_estimators: 8,
            ..ForestConfig::default()
        }
    }

    #[test]
    fn test_default_matches_model_config() {
        let config = ForestConfig::default();
        assert_eq!(config.n_estimators, 50);
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.min_samples_split, 10);
        assert_eq!(config.seed, 42);
        assert!(config.bootstrap);
    }

    #[test]
    fn test_fit_and_predict() {
        let (x, y) = linear_data(120);
        let mut forest = RandomForestRegressor::new(small_config());
        forest.fit(&x, &y).unwrap();

        assert_eq!(forest.n_estimators(), 8);
        assert_eq!(forest.predict_per_tree(&x[60]).unwrap().len(), 8);

        let prediction = forest.predict(&x[60]).unwrap();
        assert!((prediction - y[60]).abs() < 20.0, "prediction {}", prediction);

        let importances = forest.feature_importances();
        assert_eq!(importances.len(), 3);
        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(importances[0] > importances[1]);
        assert_eq!(importances[2], 0.0);
    }

    #[test]
    fn test_training_is_reproducible() {
        let (x, y) = linear_data(80);
        let mut a = RandomForestRegressor::new(small_config());
        let mut b = RandomForestRegressor::new(small_config());
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a, b);

        let mut c = RandomForestRegressor::new(ForestConfig {
            seed: 7,
            ..small_config()
        });
        c.fit(&x, &y).unwrap();
        assert_ne!(a.predict_per_tree(&x[3]).unwrap(), c.predict_per_tree(&x[3]).unwrap());
    }

    #[test]
    fn test_without_bootstrap_trees_agree() {
        let (x, y) = linear_data(50);
        let mut forest = RandomForestRegressor::new(ForestConfig {
            bootstrap: false,
            ..small_config()
        });
        forest.fit(&x, &y).unwrap();

        let per_tree = forest.predict_per_tree(&x[10]).unwrap();
        assert!(per_tree.iter().all(|p| *p == per_tree[0]));
    }

    #[test]
    fn test_constant_target_has_zero_importance() {
        let x: Vec<Vec<f64>> = (0..30).map(|i| vec![i as f64]).collect();
        let y = vec![4.0; 30];
        let mut forest = RandomForestRegressor::new(small_config());
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.feature_importances(), &[0.0]);
        assert_eq!(forest.predict(&[100.0]).unwrap(), 4.0);
    }

    #[test]
    fn test_unfitted_and_invalid() {
        let forest = RandomForestRegressor::new(small_config());
        assert!(matches!(forest.predict(&[1.0]), Err(MlError::NotTrained)));

        let mut forest = RandomForestRegressor::new(ForestConfig {
            n_estimators: 0,
            ..small_config()
        });
        let (x, y) = linear_data(10);
        assert!(forest.fit(&x, &y).is_err());

        let mut forest = RandomForestRegressor::new(small_config());
        assert!(matches!(
            forest.fit(&[], &[]),
            Err(MlError::InsufficientData { .. })
        ));
    }
}
