// ==============================================================================
// render.rs - Interactive Page Rendering
// ==============================================================================
// Description: Server-rendered single page with sample selector and results
// Author: Matt Barham
// Created: 2025-11-20
// Modified: 2026-01-17
// Version: 1.1.0
// ==============================================================================

use snp_risk_predictor::output::variant_message;
use snp_risk_predictor::{Recommendation, RiskLevel, SampleReport};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; color: #1f2933; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
.metric { font-size: 1.8rem; font-weight: 700; }
.muted { color: #616e7c; font-size: 0.9rem; }
.notice { padding: 0.75rem 1rem; border-radius: 6px; margin: 0.5rem 0; }
.info { background: #e3f2fd; }
.warning { background: #fff8e1; }
.error { background: #fdecea; }
.success { background: #e8f5e9; }
.risk-high { color: #c62828; }
.risk-moderate { color: #ef6c00; }
.risk-low { color: #2e7d32; }
"#;

/// What to show below the selector
pub enum PageBody<'a> {
    Report(&'a SampleReport),
    Error(String),
}

/// Minimal HTML escaping for text that may come from external services
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn risk_class(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "risk-high",
        RiskLevel::Moderate => "risk-moderate",
        RiskLevel::Low => "risk-low",
    }
}

fn recommendation_class(rec: Recommendation) -> &'static str {
    match rec {
        Recommendation::HighRisk => "error",
        Recommendation::ModerateRisk => "warning",
        Recommendation::Routine => "success",
        Recommendation::Unavailable => "info",
    }
}

fn render_report(report: &SampleReport) -> String {
    let variant_html = {
        let mut html = String::new();
        if let Some(id) = report.variant_id.found() {
            html.push_str(&format!("<p><strong>rsID</strong>: {}</p>", escape_html(id)));
        }
        if let Some(a) = report.annotation() {
            html.push_str(&format!(
                r#"<p><strong>Gene</strong>: {}</p>
<p><strong>Effect</strong>: {} <span class="muted">(e.g., intron variant, missense)</span></p>
<p><strong>Impact</strong>: {} <span class="muted">(predicted functional impact on gene)</span></p>
<p><strong>Clinical Significance</strong>: {}</p>"#,
                escape_html(&a.gene),
                escape_html(&a.effect),
                escape_html(&a.impact),
                escape_html(&a.clinical_significance),
            ));
        }
        if let Some(message) = variant_message(report) {
            let class = if report.variant_id.is_found() { "warning" } else { "info" };
            html.push_str(&format!(
                r#"<div class="notice {}">{}</div>"#,
                class,
                escape_html(&message)
            ));
        }
        html
    };

    format!(
        r#"<div class="columns">
  <section>
    <h2>Model Risk Prediction</h2>
    <p class="muted">Predicted Risk Score</p>
    <p class="metric" id="score">{score:.6}</p>
    <p class="muted">Risk Level</p>
    <p class="metric {risk_class}" id="risk-level">{risk}</p>
    <p class="muted">The predicted score reflects the statistical association of this variant with breast cancer risk.</p>
  </section>
  <section>
    <h2>Genomic Variant Details</h2>
    <p class="muted">chr{chrom}:{pos}</p>
    {variant_html}
  </section>
</div>
<hr>
<h2>Clinical Recommendation</h2>
<div class="notice {rec_class}" id="recommendation">{rec}</div>"#,
        score = report.score,
        risk_class = risk_class(report.risk_level),
        risk = report.risk_level,
        chrom = report.record.chromosome,
        pos = report.record.position,
        variant_html = variant_html,
        rec_class = recommendation_class(report.recommendation),
        rec = escape_html(report.recommendation.text()),
    )
}

/// Full page: header, sample selector, and either a report or an error
pub fn render_page(sample_count: usize, selected: &str, body: PageBody<'_>) -> String {
    let max_index = sample_count.saturating_sub(1);
    let body_html = match body {
        PageBody::Report(report) => render_report(report),
        PageBody::Error(message) => format!(
            r#"<div class="notice error" id="error">{}</div>"#,
            escape_html(&message)
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Breast Cancer SNP Risk Predictor</title>
    <style>{style}</style>
</head>
<body>
<h1>Breast Cancer SNP Risk Prediction Tool</h1>
<p class="muted">This tool analyzes a single genetic variant (SNP) to estimate breast cancer risk based on known associations.
It combines genomic data with predictive modeling to support clinical decision-making.</p>
<p>Available Samples: 0 to {max_index}</p>
<form method="get" action="/">
    <label for="sample">Select a sample index from the dataset:</label>
    <input type="number" id="sample" name="sample" min="0" max="{max_index}" step="1" value="{selected}">
    <button type="submit">Evaluate</button>
</form>
<hr>
{body_html}
</body>
</html>"#,
        style = STYLE,
        max_index = max_index,
        selected = escape_html(selected),
        body_html = body_html,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
    }

    #[test]
    fn test_error_page_keeps_selector() {
        let html = render_page(12, "-3", PageBody::Error("Sample index must be between 0 and 11".to_string()));
        assert!(html.contains(r#"max="11""#));
        assert!(html.contains(r#"value="-3""#));
        assert!(html.contains("Sample index must be between 0 and 11"));
        assert!(html.contains("Available Samples: 0 to 11"));
    }
}
