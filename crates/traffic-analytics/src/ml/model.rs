//! 교통량 예측 모델.
//!
//! [`TrafficModel`]은 설정과 학습된 상태([`TrainedModel`])를 소유합니다.
//! `train`은 새 [`TrainedModel`]을 완전히 만든 뒤에만 이전 상태를 교체하므로
//! 호출자는 항상 이전 모델 또는 새 모델 전체만 관찰합니다.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{info, warn};
use traffic_core::ModelConfig;

use super::error::{MlError, MlResult};
use super::forest::{ForestConfig, RandomForestRegressor};
use super::metrics::regression_metrics;
use super::split::{subsample_indices, train_test_split};
use super::types::{FeatureMatrix, FeatureVector, PredictionResult, TrainingMetrics};
use crate::correlation::{pearson, rank_by_abs};
use crate::features::{FeatureTable, FEATURE_COLUMNS};

/// 학습이 끝난 불변 모델 핸들.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    forest: RandomForestRegressor,
    feature_names: Vec<String>,
    metrics: TrainingMetrics,
    config: ModelConfig,
}

impl TrainedModel {
    /// 학습 시 사용한 feature 이름 (입력 순서).
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn train_size(&self) -> usize {
        self.metrics.train_size
    }

    pub fn test_size(&self) -> usize {
        self.metrics.test_size
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn n_estimators(&self) -> usize {
        self.forest.n_estimators()
    }

    /// 내부 앙상블.
    pub fn forest(&self) -> &RandomForestRegressor {
        &self.forest
    }

    /// 한 행을 추론하고 트리 분산 기반 95% 구간을 계산합니다.
    pub fn predict(&self, features: &FeatureVector) -> MlResult<PredictionResult> {
        let row = features.align_to(&self.feature_names)?;
        self.predict_row(&row)
    }

    /// 여러 행을 추론합니다. 컬럼은 이름으로 맞춥니다.
    pub fn predict_batch(&self, features: &FeatureMatrix) -> MlResult<Vec<PredictionResult>> {
        let positions = self
            .feature_names
            .iter()
            .map(|name| {
                features
                    .names()
                    .iter()
                    .position(|n| n == name)
                    .ok_or_else(|| MlError::InvalidFeatureInput(format!("누락된 feature: {}", name)))
            })
            .collect::<MlResult<Vec<usize>>>()?;

        features
            .rows()
            .iter()
            .map(|row| {
                let aligned: Vec<f64> = positions.iter().map(|&p| row[p]).collect();
                self.predict_row(&aligned)
            })
            .collect()
    }

    fn predict_row(&self, row: &[f64]) -> MlResult<PredictionResult> {
        let per_tree = self.forest.predict_per_tree(row)?;
        PredictionResult::from_tree_predictions(&per_tree).ok_or(MlError::NotTrained)
    }

    /// feature 중요도를 내림차순으로 반환합니다.
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .feature_names
            .iter()
            .cloned()
            .zip(self.forest.feature_importances().iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// JSON으로 저장합니다. 상위 디렉토리가 없으면 만듭니다.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MlResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| MlError::ModelSave(format!("{}: {}", parent.display(), e)))?;
        }

        let file = File::create(path)
            .map_err(|e| MlError::ModelSave(format!("{}: {}", path.display(), e)))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .map_err(|e| MlError::ModelSave(e.to_string()))?;

        info!(path = %path.display(), "모델 저장 완료");
        Ok(())
    }

    /// JSON에서 로드하고 구조를 검증합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> MlResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| MlError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        let model: TrainedModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| MlError::ModelLoad(e.to_string()))?;

        if !model.forest.is_well_formed() || model.forest.n_features() != model.feature_names.len() {
            return Err(MlError::ModelLoad(format!(
                "{}: 모델 구조가 올바르지 않음",
                path.display()
            )));
        }

        info!(
            path = %path.display(),
            trees = model.n_estimators(),
            features = model.feature_names.len(),
            "모델 로드 완료"
        );
        Ok(model)
    }
}

/// 학습/추론 상태를 소유하는 교통량 예측 모델.
#[derive(Debug, Clone, Default)]
pub struct TrafficModel {
    config: ModelConfig,
    trained: Option<TrainedModel>,
}

impl TrafficModel {
    /// 설정으로 학습 전 모델 생성.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            trained: None,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }

    /// 학습된 모델 핸들.
    pub fn handle(&self) -> Option<&TrainedModel> {
        self.trained.as_ref()
    }

    fn trained(&self) -> MlResult<&TrainedModel> {
        self.trained.as_ref().ok_or(MlError::NotTrained)
    }

    /// 설정의 `test_size`, `max_rows`로 학습합니다.
    pub fn train(&mut self, features: &FeatureMatrix, target: &[f64]) -> MlResult<TrainingMetrics> {
        let (test_size, max_rows) = (self.config.test_size, self.config.max_rows);
        self.train_with(features, target, test_size, max_rows)
    }

    /// feature table에서 [`FEATURE_COLUMNS`]와 설정된 target으로 학습합니다.
    pub fn train_on_table(&mut self, table: &FeatureTable) -> MlResult<TrainingMetrics> {
        let features = table.to_matrix(&FEATURE_COLUMNS)?;
        let target = table.column(&self.config.target).ok_or_else(|| {
            MlError::InvalidFeatureInput(format!("알 수 없는 target 컬럼: {}", self.config.target))
        })?;
        self.train(&features, &target)
    }

    /// 샘플링 → 분할 → 학습 → 평가 후 상태를 교체합니다.
    ///
    /// 행 수가 `max_rows`를 넘으면 정확히 `max_rows`행을 시드 기반으로 비복원 추출합니다.
    pub fn train_with(
        &mut self,
        features: &FeatureMatrix,
        target: &[f64],
        test_size: f64,
        max_rows: usize,
    ) -> MlResult<TrainingMetrics> {
        let total_size = features.n_rows();
        if target.len() != total_size {
            return Err(MlError::InvalidFeatureInput(format!(
                "feature 행 수 {}와 target 수 {}가 다름",
                total_size,
                target.len()
            )));
        }
        if let Some(i) = target.iter().position(|v| !v.is_finite()) {
            return Err(MlError::InvalidFeatureInput(format!(
                "{}번째 target 값이 유한하지 않음",
                i
            )));
        }
        if total_size < 2 || max_rows < 2 {
            return Err(MlError::InsufficientData {
                required: 2,
                actual: total_size.min(max_rows),
            });
        }

        let seed = self.config.seed;
        let sampled = subsample_indices(total_size, max_rows, seed);
        if sampled.len() < total_size {
            info!(total = total_size, sampled = sampled.len(), "학습 데이터 샘플링");
        }

        let (train_pos, test_pos) = train_test_split(sampled.len(), test_size, seed)?;
        let train_idx: Vec<usize> = train_pos.iter().map(|&p| sampled[p]).collect();
        let test_idx: Vec<usize> = test_pos.iter().map(|&p| sampled[p]).collect();

        let x_train = features.select_rows(&train_idx);
        let y_train: Vec<f64> = train_idx.iter().map(|&i| target[i]).collect();

        info!(
            train = train_idx.len(),
            test = test_idx.len(),
            trees = self.config.n_estimators,
            "랜덤 포레스트 학습 시작"
        );

        let mut forest = RandomForestRegressor::new(ForestConfig::from(&self.config));
        forest.fit(x_train.rows(), &y_train)?;

        let x_test = features.select_rows(&test_idx);
        let y_test: Vec<f64> = test_idx.iter().map(|&i| target[i]).collect();
        let y_pred = x_test
            .rows()
            .iter()
            .map(|row| forest.predict(row))
            .collect::<MlResult<Vec<f64>>>()?;
        let scores = regression_metrics(&y_test, &y_pred);

        let metrics = TrainingMetrics {
            r2_score: scores.r2,
            mae: scores.mae,
            rmse: scores.rmse,
            train_size: train_idx.len(),
            test_size: test_idx.len(),
            total_size,
            sampled_size: sampled.len(),
        };

        info!(
            r2 = metrics.r2_score,
            mae = metrics.mae,
            rmse = metrics.rmse,
            "모델 학습 완료"
        );

        self.trained = Some(TrainedModel {
            forest,
            feature_names: features.names().to_vec(),
            metrics,
            config: self.config.clone(),
        });
        Ok(metrics)
    }

    /// 단일 행 추론. 학습 전이면 `NotTrained`.
    pub fn predict(&self, features: &FeatureVector) -> MlResult<PredictionResult> {
        self.trained()?.predict(features)
    }

    /// feature 중요도 (내림차순). 학습 전이면 `NotTrained`.
    pub fn get_feature_importance(&self) -> MlResult<Vec<(String, f64)>> {
        Ok(self.trained()?.feature_importance())
    }

    /// 설정된 경로에 저장.
    pub fn save_model(&self) -> MlResult<()> {
        self.save_model_to(&self.config.model_path)
    }

    pub fn save_model_to<P: AsRef<Path>>(&self, path: P) -> MlResult<()> {
        self.trained()?.save(path)
    }

    /// 설정된 경로에서 로드.
    pub fn load_model(&mut self) -> MlResult<()> {
        let path = self.config.model_path.clone();
        self.load_model_from(path)
    }

    /// 로드에 성공하면 학습 상태와 설정을 모두 교체합니다.
    pub fn load_model_from<P: AsRef<Path>>(&mut self, path: P) -> MlResult<()> {
        let model = TrainedModel::load(path)?;
        if model.config != self.config {
            warn!("저장된 모델 설정이 현재 설정과 다름, 저장된 설정을 사용");
        }
        self.config = model.config.clone();
        self.trained = Some(model);
        Ok(())
    }

    /// target과 각 수치 컬럼의 Pearson 상관계수 (|r| 내림차순).
    ///
    /// 학습 여부와 무관하며, 상관계수가 정의되지 않는 컬럼은 제외합니다.
    pub fn calculate_correlation(
        &self,
        table: &FeatureTable,
        target: &str,
    ) -> MlResult<Vec<(String, f64)>> {
        let target_values = table
            .column(target)
            .ok_or_else(|| MlError::InvalidFeatureInput(format!("알 수 없는 target 컬럼: {}", target)))?;

        let correlations = table
            .numeric_column_names()
            .iter()
            .filter(|name| **name != target)
            .filter_map(|name| {
                let values = table.column(name)?;
                pearson(&values, &target_values).map(|r| (name.to_string(), r))
            })
            .collect::<Vec<_>>();

        Ok(rank_by_abs(correlations))
    }
}
