//! CLI 명령어 구현 모듈.

pub mod analyze;
pub mod common;
pub mod correlation;
pub mod predict;
pub mod stats;
pub mod train;
