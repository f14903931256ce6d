//! 교통 분석 시스템의 에러 타입.
//!
//! 이 모듈은 데이터 수집부터 feature 계산까지 공통으로 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 교통 데이터 에러.
#[derive(Debug, Error)]
pub enum TrafficError {
    /// `YYYY-MM-DD` 형식이 아닌 날짜 문자열
    #[error("잘못된 날짜 형식: {0}")]
    InvalidDateFormat(String),

    /// `HH:MM:SS` 형식이 아니거나 범위를 벗어난 시각 문자열
    #[error("잘못된 시각: {0}")]
    InvalidTime(String),

    /// 필수 컬럼 누락
    #[error("필수 컬럼 누락: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 파일 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 교통 데이터 작업을 위한 Result 타입.
pub type TrafficResult<T> = Result<T, TrafficError>;

impl TrafficError {
    /// 입력 데이터를 고치면 해결되는 에러인지 확인합니다.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TrafficError::InvalidDateFormat(_)
                | TrafficError::InvalidTime(_)
                | TrafficError::MissingColumns(_)
                | TrafficError::InvalidInput(_)
        )
    }
}

impl From<std::io::Error> for TrafficError {
    fn from(err: std::io::Error) -> Self {
        TrafficError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrafficError {
    fn from(err: serde_json::Error) -> Self {
        TrafficError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for TrafficError {
    fn from(err: csv::Error) -> Self {
        TrafficError::Data(format!("CSV 파싱 실패: {}", err))
    }
}

impl From<config::ConfigError> for TrafficError {
    fn from(err: config::ConfigError) -> Self {
        TrafficError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrafficError::InvalidDateFormat("2016/09/26".to_string());
        assert_eq!(err.to_string(), "잘못된 날짜 형식: 2016/09/26");

        let err = TrafficError::MissingColumns(vec!["flow".to_string(), "occ".to_string()]);
        assert_eq!(err.to_string(), "필수 컬럼 누락: flow, occ");
    }

    #[test]
    fn test_error_input_classification() {
        assert!(TrafficError::InvalidDateFormat("x".to_string()).is_input_error());
        assert!(TrafficError::MissingColumns(vec![]).is_input_error());
        assert!(!TrafficError::Io("disk".to_string()).is_input_error());
        assert!(!TrafficError::Config("bad".to_string()).is_input_error());
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: TrafficError = io.into();
        assert!(matches!(err, TrafficError::Io(_)));
    }
}
