// ==============================================================================
// annotation.rs - VEP Variant Annotation Fetcher
// ==============================================================================
// Description: Fetches gene, impact, effect and clinical significance by rsID
// Author: Matt Barham
// Created: 2025-11-14
// Modified: 2026-01-17
// Version: 1.1.0
// ==============================================================================

use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::{interpret, JsonTransport};
use crate::config::{join_url, LookupConfig};
use crate::models::{LookupOutcome, VariantAnnotation, NOT_REPORTED, UNKNOWN_FIELD};

#[derive(Debug, Deserialize)]
struct VepRecord {
    #[serde(default)]
    transcript_consequences: Vec<TranscriptConsequence>,
    #[serde(default)]
    clinical_significance: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TranscriptConsequence {
    gene_symbol: Option<String>,
    impact: Option<String>,
    #[serde(default)]
    consequence_terms: Vec<String>,
}

/// Fetches VEP annotation for a variant identifier. Not cached.
pub struct AnnotationFetcher {
    transport: Arc<dyn JsonTransport>,
    base_url: String,
    species: String,
}

impl AnnotationFetcher {
    pub fn new(transport: Arc<dyn JsonTransport>, config: &LookupConfig) -> Self {
        Self {
            transport,
            base_url: config.vep_base_url.clone(),
            species: config.species.clone(),
        }
    }

    pub fn vep_url(&self, variant_id: &str) -> String {
        join_url(&self.base_url, &format!("vep/{}/id/{}", self.species, variant_id))
    }

    pub async fn fetch(&self, variant_id: &str) -> LookupOutcome<VariantAnnotation> {
        let url = self.vep_url(variant_id);
        let outcome = interpret(self.transport.get_json(&url).await, |body| {
            parse_vep(variant_id, body)
        });

        match &outcome {
            LookupOutcome::Found(a) => info!(
                "Annotated {}: gene={} impact={} significance={}",
                variant_id, a.gene, a.impact, a.clinical_significance
            ),
            LookupOutcome::NotFound => info!("No VEP annotation for {}", variant_id),
            LookupOutcome::Failed(reason) => warn!("VEP lookup for {} failed: {}", variant_id, reason),
        }

        outcome
    }
}

/// First record, first transcript consequence, first consequence term and
/// first clinical significance; missing pieces fall back to placeholders.
fn parse_vep(variant_id: &str, body: serde_json::Value) -> LookupOutcome<VariantAnnotation> {
    let records: Vec<VepRecord> = match serde_json::from_value(body) {
        Ok(records) => records,
        Err(e) => return LookupOutcome::Failed(format!("Unexpected VEP response: {}", e)),
    };

    let Some(record) = records.into_iter().next() else {
        return LookupOutcome::NotFound;
    };

    let consequence = record
        .transcript_consequences
        .into_iter()
        .next()
        .unwrap_or_default();

    LookupOutcome::Found(VariantAnnotation {
        variant_id: variant_id.to_string(),
        gene: consequence.gene_symbol.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
        impact: consequence.impact.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
        effect: consequence
            .consequence_terms
            .into_iter()
            .next()
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
        clinical_significance: record
            .clinical_significance
            .into_iter()
            .next()
            .unwrap_or_else(|| NOT_REPORTED.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensembl::mock::{MockReply, MockTransport};
    use serde_json::json;

    const URL: &str = "https://rest.ensembl.org/vep/human/id/rs80357906";

    fn fetcher(transport: Arc<MockTransport>) -> AnnotationFetcher {
        AnnotationFetcher::new(transport, &LookupConfig::default())
    }

    #[tokio::test]
    async fn test_full_annotation() {
        let transport = Arc::new(MockTransport::new().with(
            URL,
            MockReply::Json(json!([{
                "id": "rs80357906",
                "transcript_consequences": [
                    {"gene_symbol": "BRCA1", "impact": "HIGH", "consequence_terms": ["frameshift_variant", "splice_region_variant"]},
                    {"gene_symbol": "NBR2", "impact": "MODIFIER", "consequence_terms": ["upstream_gene_variant"]}
                ],
                "clinical_significance": ["pathogenic", "likely_pathogenic"]
            }])),
        ));

        let annotation = fetcher(transport).fetch("rs80357906").await.into_option().unwrap();
        assert_eq!(
            annotation,
            VariantAnnotation {
                variant_id: "rs80357906".to_string(),
                gene: "BRCA1".to_string(),
                impact: "HIGH".to_string(),
                effect: "frameshift_variant".to_string(),
                clinical_significance: "pathogenic".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let transport = Arc::new(MockTransport::new().with(
            URL,
            MockReply::Json(json!([{"id": "rs80357906", "transcript_consequences": []}])),
        ));

        let annotation = fetcher(transport).fetch("rs80357906").await.into_option().unwrap();
        assert_eq!(annotation.gene, "Unknown");
        assert_eq!(annotation.impact, "Unknown");
        assert_eq!(annotation.effect, "Unknown");
        assert_eq!(annotation.clinical_significance, "Not reported");
    }

    #[tokio::test]
    async fn test_partial_consequence() {
        let transport = Arc::new(MockTransport::new().with(
            URL,
            MockReply::Json(json!([{
                "transcript_consequences": [{"impact": "MODIFIER"}],
                "clinical_significance": []
            }])),
        ));

        let annotation = fetcher(transport).fetch("rs80357906").await.into_option().unwrap();
        assert_eq!(annotation.gene, "Unknown");
        assert_eq!(annotation.impact, "MODIFIER");
        assert_eq!(annotation.effect, "Unknown");
        assert_eq!(annotation.clinical_significance, "Not reported");
    }

    #[tokio::test]
    async fn test_non_success_status_is_absent() {
        let transport = Arc::new(MockTransport::new().with(
            "https://rest.ensembl.org/vep/human/id/rs0000000nonexistent",
            MockReply::Status(400),
        ));
        let outcome = fetcher(transport).fetch("rs0000000nonexistent").await;
        assert_eq!(outcome, LookupOutcome::NotFound);

        let transport = Arc::new(MockTransport::new().with(URL, MockReply::Status(503)));
        let outcome = fetcher(transport).fetch("rs80357906").await;
        assert!(matches!(outcome, LookupOutcome::Failed(_)));
        assert_eq!(outcome.into_option(), None);
    }

    #[tokio::test]
    async fn test_empty_response_is_not_found() {
        let transport = Arc::new(MockTransport::new().with(URL, MockReply::Json(json!([]))));
        assert_eq!(fetcher(transport).fetch("rs80357906").await, LookupOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_fetch_is_not_cached() {
        let transport = Arc::new(MockTransport::new().with(URL, MockReply::Timeout));
        let f = fetcher(transport.clone());

        f.fetch("rs80357906").await;
        f.fetch("rs80357906").await;
        assert_eq!(transport.calls(), 2);
    }
}
