// ==============================================================================
// classifier.rs - Risk Level Classification
// ==============================================================================
// Description: Maps a raw model score to a three-level risk label
// Author: Matt Barham
// Created: 2025-11-14
// Modified: 2025-11-14
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores at or above this value are High risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.01;

/// Categorical risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Classify a raw score.
    ///
    /// Boundaries are exact: `>= 0.01` is High, `> 0` is Moderate, and
    /// everything else (zero, negatives, NaN) is Low.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score > 0.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive_for_high() {
        assert_eq!(RiskLevel::from_score(0.01), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.5), RiskLevel::High);
    }

    #[test]
    fn test_small_positive_is_moderate() {
        assert_eq!(RiskLevel::from_score(0.0001), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(0.009_999_999), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(f64::MIN_POSITIVE), RiskLevel::Moderate);
    }

    #[test]
    fn test_zero_and_negative_are_low() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(-0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(-0.5), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(f64::NAN), RiskLevel::Low);
    }

    #[test]
    fn test_labels() {
        assert_eq!(RiskLevel::High.to_string(), "High");
        assert_eq!(RiskLevel::Moderate.as_str(), "Moderate");
        assert_eq!(RiskLevel::Low.as_str(), "Low");
    }
}
