// ==============================================================================
// recommendation.rs - Clinical Recommendation Rules
// ==============================================================================
// Description: Decision table from (impact, clinical significance) to advice
// Author: Matt Barham
// Created: 2025-11-14
// Modified: 2025-12-02
// Version: 1.1.0
// ==============================================================================

use serde::{Deserialize, Serialize};

use crate::models::VariantAnnotation;

/// Clinical significance terms that escalate to the high-risk branch
const PATHOGENIC_TERMS: [&str; 2] = ["pathogenic", "likely_pathogenic"];

/// Canned recommendation derived from variant annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// High impact or (likely) pathogenic
    HighRisk,
    /// Moderate predicted functional impact
    ModerateRisk,
    /// No strong evidence of pathogenicity
    Routine,
    /// No annotation to base advice on
    Unavailable,
}

impl Recommendation {
    /// Apply the decision table. First match wins:
    ///
    /// 1. impact HIGH, or significance pathogenic / likely_pathogenic
    /// 2. impact MODERATE
    /// 3. anything else
    pub fn recommend(impact: &str, clinical_significance: &str) -> Self {
        let impact = impact.trim();
        let significance = clinical_significance.trim().to_lowercase();

        if impact.eq_ignore_ascii_case("HIGH") || PATHOGENIC_TERMS.contains(&significance.as_str()) {
            Recommendation::HighRisk
        } else if impact.eq_ignore_ascii_case("MODERATE") {
            Recommendation::ModerateRisk
        } else {
            Recommendation::Routine
        }
    }

    /// Missing annotation is its own state, never the routine branch
    pub fn for_annotation(annotation: Option<&VariantAnnotation>) -> Self {
        match annotation {
            Some(a) => Self::recommend(&a.impact, &a.clinical_significance),
            None => Recommendation::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Recommendation::Unavailable)
    }

    pub fn text(&self) -> &'static str {
        match self {
            Recommendation::HighRisk => {
                "This variant is classified as high impact or clinically pathogenic. \
                 Referral to a clinical geneticist is recommended. Consider confirmatory testing, \
                 comprehensive family history assessment, and risk-reducing strategies based on guidelines."
            }
            Recommendation::ModerateRisk => {
                "This variant is predicted to have moderate functional impact. \
                 Periodic surveillance and stratified risk assessment based on personal and \
                 family history are advised."
            }
            Recommendation::Routine => {
                "No strong evidence of clinical pathogenicity is currently associated with this variant. \
                 Routine follow-up is appropriate. Re-evaluate if new evidence emerges or if the \
                 patient has elevated familial risk."
            }
            Recommendation::Unavailable => {
                "No recommendation available due to missing variant details."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(impact: &str, significance: &str) -> VariantAnnotation {
        VariantAnnotation {
            variant_id: "rs80357906".to_string(),
            gene: "BRCA1".to_string(),
            impact: impact.to_string(),
            effect: "frameshift_variant".to_string(),
            clinical_significance: significance.to_string(),
        }
    }

    #[test]
    fn test_high_impact_wins_regardless_of_significance() {
        assert_eq!(Recommendation::recommend("HIGH", "benign"), Recommendation::HighRisk);
        assert_eq!(Recommendation::recommend("HIGH", "Not reported"), Recommendation::HighRisk);
    }

    #[test]
    fn test_pathogenic_significance_wins_regardless_of_impact() {
        assert_eq!(Recommendation::recommend("LOW", "pathogenic"), Recommendation::HighRisk);
        assert_eq!(Recommendation::recommend("MODIFIER", "Likely_Pathogenic"), Recommendation::HighRisk);
        // Pathogenic outranks the MODERATE branch
        assert_eq!(Recommendation::recommend("MODERATE", "PATHOGENIC"), Recommendation::HighRisk);
    }

    #[test]
    fn test_moderate_and_routine() {
        assert_eq!(Recommendation::recommend("MODERATE", "benign"), Recommendation::ModerateRisk);
        assert_eq!(Recommendation::recommend("LOW", "benign"), Recommendation::Routine);
        assert_eq!(Recommendation::recommend("Unknown", "Not reported"), Recommendation::Routine);
    }

    #[test]
    fn test_missing_annotation_is_unavailable() {
        let rec = Recommendation::for_annotation(None);
        assert_eq!(rec, Recommendation::Unavailable);
        assert!(!rec.is_available());
        assert_ne!(rec.text(), Recommendation::Routine.text());
    }

    #[test]
    fn test_for_annotation_uses_rules() {
        let a = annotation("MODERATE", "uncertain_significance");
        assert_eq!(Recommendation::for_annotation(Some(&a)), Recommendation::ModerateRisk);
    }
}
