//! 교통 혼잡 등급.

use serde::{Deserialize, Serialize};
use std::fmt;

/// traffic index 구간에 따른 혼잡 등급.
///
/// 각 구간은 상한을 포함합니다: `index ≤ 33` → Low, `33 < index ≤ 66` → Medium, 그 외 High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrafficCategory {
    /// 원활
    Low,
    /// 보통
    Medium,
    /// 혼잡
    High,
}

impl TrafficCategory {
    /// Low 구간 상한 (포함)
    pub const LOW_UPPER: f64 = 33.0;
    /// Medium 구간 상한 (포함)
    pub const MEDIUM_UPPER: f64 = 66.0;

    /// index 값에서 등급을 결정합니다.
    pub fn from_index(index: f64) -> Self {
        if index <= Self::LOW_UPPER {
            TrafficCategory::Low
        } else if index <= Self::MEDIUM_UPPER {
            TrafficCategory::Medium
        } else {
            TrafficCategory::High
        }
    }

    /// 등급 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficCategory::Low => "Low",
            TrafficCategory::Medium => "Medium",
            TrafficCategory::High => "High",
        }
    }
}

impl fmt::Display for TrafficCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrafficCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(TrafficCategory::Low),
            "Medium" => Ok(TrafficCategory::Medium),
            "High" => Ok(TrafficCategory::High),
            _ => Err(format!("Unknown traffic category: {}", s)),
        }
    }
}
