// ==============================================================================
// models.rs - SNP Risk Data Models
// ==============================================================================
// Description: Data structures for sample records, features, and lookups
// Author: Matt Barham
// Created: 2025-11-12
// Modified: 2026-01-17
// Version: 3.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};

/// Number of model inputs derived from a sample record
pub const FEATURE_COUNT: usize = 5;

/// Documented feature order expected by the risk model
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "chromosome",
    "position",
    "allele_frequency",
    "er_positive",
    "er_negative",
];

/// One row of the association dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Chromosome number (1-22, 23+ for sex chromosomes if encoded numerically)
    pub chromosome: u8,

    /// Base pair position (GRCh37/hg19)
    pub position: u64,

    /// Effect allele frequency
    pub allele_frequency: f64,

    /// ER-positive association indicator
    pub er_positive: f64,

    /// ER-negative association indicator
    pub er_negative: f64,

    /// Observed overall outcome (held out from the model inputs)
    pub observed_outcome: f64,
}

impl SampleRecord {
    /// Build the model input vector in the documented order
    pub fn features(&self) -> FeatureVector {
        FeatureVector([
            self.chromosome as f64,
            self.position as f64,
            self.allele_frequency,
            self.er_positive,
            self.er_negative,
        ])
    }
}

/// Fixed-order numeric model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Result of a best-effort external lookup.
///
/// `NotFound` means the service answered and had nothing for the query;
/// `Failed` covers network errors, timeouts, unexpected statuses and
/// undecodable bodies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum LookupOutcome<T> {
    Found(T),
    NotFound,
    Failed(String),
}

impl<T> LookupOutcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            LookupOutcome::Found(value) => Some(value),
            _ => None,
        }
    }

    /// Collapse `NotFound` and `Failed` into `None`
    pub fn into_option(self) -> Option<T> {
        match self {
            LookupOutcome::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// Placeholder for annotation fields the service omits
pub const UNKNOWN_FIELD: &str = "Unknown";

/// Placeholder for a missing clinical significance
pub const NOT_REPORTED: &str = "Not reported";

/// VEP annotation for a resolved variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAnnotation {
    /// rsID (e.g., "rs12345")
    pub variant_id: String,

    /// HGNC gene symbol of the first transcript consequence
    pub gene: String,

    /// Predicted impact (HIGH, MODERATE, LOW, MODIFIER)
    pub impact: String,

    /// First consequence term (e.g., "intron_variant")
    pub effect: String,

    /// First clinical significance entry
    pub clinical_significance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SampleRecord {
        SampleRecord {
            chromosome: 1,
            position: 100_000,
            allele_frequency: 0.2,
            er_positive: 1.0,
            er_negative: 0.0,
            observed_outcome: 1.05,
        }
    }

    #[test]
    fn test_features_follow_documented_order() {
        let features = record().features();
        assert_eq!(features.as_slice(), &[1.0, 100_000.0, 0.2, 1.0, 0.0]);
    }

    #[test]
    fn test_observed_outcome_is_not_a_feature() {
        let features = record().features();
        assert!(!features.as_slice().contains(&1.05));
    }

    #[test]
    fn test_lookup_outcome_collapses_absence() {
        let found: LookupOutcome<String> = LookupOutcome::Found("rs1".to_string());
        assert!(found.is_found());
        assert_eq!(found.found().map(String::as_str), Some("rs1"));
        assert_eq!(found.into_option(), Some("rs1".to_string()));

        let missing: LookupOutcome<String> = LookupOutcome::NotFound;
        assert_eq!(missing.into_option(), None);

        let failed: LookupOutcome<String> = LookupOutcome::Failed("timeout".to_string());
        assert!(!failed.is_found());
        assert_eq!(failed.into_option(), None);
    }
}
