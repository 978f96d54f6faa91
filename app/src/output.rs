// ==============================================================================
// output.rs - Report Output Formats
// ==============================================================================
// Description: Renders sample risk reports as terminal text or JSON
// Author: Matt Barham
// Created: 2025-11-06
// Modified: 2026-01-17
// Version: 3.0.0
// ==============================================================================

use serde_json::{json, Value};
use std::fmt::Write;

use crate::models::LookupOutcome;
use crate::parsers::Dataset;
use crate::processor::SampleReport;

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub const NO_VARIANT_MESSAGE: &str = "No rsID found for this chromosomal position.";
pub const NO_ANNOTATION_MESSAGE: &str = "No detailed variant annotation available.";

/// Informational line for the variant section, `None` when annotation is present
pub fn variant_message(report: &SampleReport) -> Option<String> {
    match (&report.variant_id, &report.annotation) {
        (LookupOutcome::Found(_), Some(LookupOutcome::Found(_))) => None,
        (LookupOutcome::Found(_), Some(LookupOutcome::Failed(reason))) => {
            Some(format!("{} (lookup failed: {})", NO_ANNOTATION_MESSAGE, reason))
        }
        (LookupOutcome::Found(_), _) => Some(NO_ANNOTATION_MESSAGE.to_string()),
        (LookupOutcome::Failed(reason), _) => {
            Some(format!("{} (lookup failed: {})", NO_VARIANT_MESSAGE, reason))
        }
        (LookupOutcome::NotFound, _) => Some(NO_VARIANT_MESSAGE.to_string()),
    }
}

/// Dataset summary shown before selection
pub fn render_summary(dataset: &Dataset, model_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Samples loaded: {}", dataset.len());
    if let Some(last) = dataset.last_index() {
        let _ = writeln!(out, "Available samples: 0 to {}", last);
    }
    let _ = writeln!(out, "Rows dropped (missing values): {}", dataset.dropped_rows());
    let _ = writeln!(out, "Model: {}", model_name);
    out
}

pub fn render_text(report: &SampleReport) -> String {
    let mut out = String::new();
    let r = &report.record;

    let _ = writeln!(out, "Sample {}  (chr{}:{})", report.index, r.chromosome, r.position);
    let _ = writeln!(out);
    let _ = writeln!(out, "== Model Risk Prediction ==");
    let _ = writeln!(out, "Predicted Risk Score: {:.6}", report.score);
    let _ = writeln!(out, "Risk Level:           {}", report.risk_level);
    let _ = writeln!(out);
    let _ = writeln!(out, "== Genomic Variant Details ==");
    if let Some(id) = report.variant_id.found() {
        let _ = writeln!(out, "rsID:                  {}", id);
    }
    if let Some(a) = report.annotation() {
        let _ = writeln!(out, "Gene:                  {}", a.gene);
        let _ = writeln!(out, "Effect:                {}", a.effect);
        let _ = writeln!(out, "Impact:                {}", a.impact);
        let _ = writeln!(out, "Clinical Significance: {}", a.clinical_significance);
    }
    if let Some(message) = variant_message(report) {
        let _ = writeln!(out, "{}", message);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "== Clinical Recommendation ==");
    let _ = writeln!(out, "{}", report.recommendation.text());

    out
}

/// JSON view of a report, including display texts
pub fn render_json(report: &SampleReport) -> Value {
    json!({
        "index": report.index,
        "record": report.record,
        "score": report.score,
        "risk_level": report.risk_level,
        "variant_id": report.variant_id,
        "annotation": report.annotation,
        "variant_message": variant_message(report),
        "recommendation": report.recommendation,
        "recommendation_text": report.recommendation.text(),
        "evaluated_at": report.evaluated_at,
    })
}
