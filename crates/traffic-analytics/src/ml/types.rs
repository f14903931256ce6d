//! ML 모듈의 공통 타입.

use serde::{Deserialize, Serialize};

use super::error::{MlError, MlResult};

/// 95% 신뢰구간에 사용하는 z 값.
pub const Z_95: f64 = 1.96;

/// 단일 행 추론을 위한 feature vector.
///
/// 이름이 없으면 학습 시 feature 순서와 같은 위치 기반 입력으로,
/// 이름이 있으면 학습 시 순서로 재배열되는 이름 기반 입력으로 취급합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// feature 값들
    values: Vec<f64>,
    /// 선택적 feature 이름
    names: Option<Vec<String>>,
}

impl FeatureVector {
    /// 값으로부터 위치 기반 feature vector 생성.
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            names: None,
        }
    }

    /// 이름이 있는 feature vector 생성.
    pub fn with_names(values: Vec<f64>, names: Vec<String>) -> Self {
        debug_assert_eq!(values.len(), names.len(), "Feature count mismatch");
        Self {
            values,
            names: Some(names),
        }
    }

    /// (이름, 값) 쌍에서 생성.
    pub fn from_pairs<S, I>(pairs: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        let (names, values): (Vec<String>, Vec<f64>) =
            pairs.into_iter().map(|(n, v)| (n.into(), v)).unzip();
        Self::with_names(values, names)
    }

    /// feature 개수 반환.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// feature vector가 비어있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 사용 가능한 경우 feature 이름 반환.
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// 이름으로 값 조회.
    pub fn get(&self, name: &str) -> Option<f64> {
        let names = self.names.as_ref()?;
        let idx = names.iter().position(|n| n == name)?;
        self.values.get(idx).copied()
    }

    /// 학습 시 feature 순서에 맞춘 값 목록을 만듭니다.
    pub fn align_to(&self, feature_names: &[String]) -> MlResult<Vec<f64>> {
        let aligned = match &self.names {
            Some(_) => {
                let mut missing = Vec::new();
                let values: Vec<f64> = feature_names
                    .iter()
                    .map(|name| {
                        self.get(name).unwrap_or_else(|| {
                            missing.push(name.as_str());
                            f64::NAN
                        })
                    })
                    .collect();
                if !missing.is_empty() {
                    return Err(MlError::InvalidFeatureInput(format!(
                        "누락된 feature: {}",
                        missing.join(", ")
                    )));
                }
                values
            }
            None => {
                if self.values.len() != feature_names.len() {
                    return Err(MlError::InvalidFeatureInput(format!(
                        "feature 개수 불일치: 기대 {}, 입력 {}",
                        feature_names.len(),
                        self.values.len()
                    )));
                }
                self.values.clone()
            }
        };

        if let Some(pos) = aligned.iter().position(|v| !v.is_finite()) {
            return Err(MlError::InvalidFeatureInput(format!(
                "'{}' 값이 유한하지 않음",
                feature_names[pos]
            )));
        }
        Ok(aligned)
    }
}

/// 행 단위 학습 입력.
///
/// 생성 시 비어있지 않은 이름, 직사각형 모양, 유한한 값을 검증합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(names: Vec<String>, rows: Vec<Vec<f64>>) -> MlResult<Self> {
        if names.is_empty() {
            return Err(MlError::InvalidFeatureInput("feature 이름이 비어있음".to_string()));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != names.len() {
                return Err(MlError::InvalidFeatureInput(format!(
                    "{}번째 행의 길이 {}가 feature 수 {}와 다름",
                    i,
                    row.len(),
                    names.len()
                )));
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(MlError::InvalidFeatureInput(format!(
                    "{}번째 행의 '{}' 값이 유한하지 않음",
                    i, names[j]
                )));
            }
        }

        Ok(Self { names, rows })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 주어진 행만 골라 새 matrix 생성.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// i번째 행을 이름 있는 feature vector로.
    pub fn feature_vector(&self, i: usize) -> Option<FeatureVector> {
        self.rows
            .get(i)
            .map(|row| FeatureVector::with_names(row.clone(), self.names.clone()))
    }
}

/// 앙상블 추론 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 트리 예측의 평균
    pub prediction: f64,
    /// 95% 신뢰구간 하한
    pub confidence_low: f64,
    /// 95% 신뢰구간 상한
    pub confidence_high: f64,
}

impl PredictionResult {
    /// 트리별 예측값에서 `mean ± 1.96 * std` (모표준편차)를 계산합니다.
    pub fn from_tree_predictions(predictions: &[f64]) -> Option<Self> {
        if predictions.is_empty() {
            return None;
        }

        let n = predictions.len() as f64;
        let mean = predictions.iter().sum::<f64>() / n;
        let variance = predictions.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
        let margin = Z_95 * variance.sqrt();

        Some(Self {
            prediction: mean,
            confidence_low: mean - margin,
            confidence_high: mean + margin,
        })
    }

    /// 신뢰구간 폭.
    pub fn interval_width(&self) -> f64 {
        self.confidence_high - self.confidence_low
    }
}

/// 학습 결과 지표 (테스트 구간 기준).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub r2_score: f64,
    pub mae: f64,
    pub rmse: f64,
    pub train_size: usize,
    pub test_size: usize,
    /// 샘플링 전 전체 행 수
    pub total_size: usize,
    /// 샘플링 후 행 수
    pub sampled_size: usize,
}
