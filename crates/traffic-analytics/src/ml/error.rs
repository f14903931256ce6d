//! ML 모듈 에러 타입.

use thiserror::Error;
use traffic_core::TrafficError;

/// 모델 학습/추론에서 발생할 수 있는 에러.
#[derive(Debug, Error)]
pub enum MlError {
    /// 학습 전에 추론/중요도 조회를 시도함
    #[error("Model not trained yet")]
    NotTrained,

    /// feature 입력이 비어있거나 필요한 컬럼이 없음
    #[error("Invalid feature input: {0}")]
    InvalidFeatureInput(String),

    /// 학습을 위한 데이터 부족
    #[error("Insufficient data: need {required} samples, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// 저장된 모델 로드 에러
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// 모델 저장 에러
    #[error("Model save error: {0}")]
    ModelSave(String),

    /// 도메인 데이터 에러 (날짜 형식 등)
    #[error(transparent)]
    Traffic(#[from] TrafficError),
}

/// ML 작업을 위한 Result 타입.
pub type MlResult<T> = Result<T, MlError>;

impl MlError {
    /// 입력을 바꿔 다시 호출하면 해결될 수 있는 에러인지 확인.
    pub fn is_recoverable(&self) -> bool {
        match self {
            MlError::InvalidFeatureInput(_) | MlError::InsufficientData { .. } => true,
            MlError::Traffic(err) => err.is_input_error(),
            _ => false,
        }
    }

    /// 먼저 학습이 필요한 에러인지 확인.
    pub fn requires_training(&self) -> bool {
        matches!(self, MlError::NotTrained)
    }
}
