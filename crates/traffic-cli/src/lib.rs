//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 데이터셋 통계
//! - 혼잡 분석 리포트
//! - 모델 학습/예측
//! - target 상관계수

pub mod commands;
