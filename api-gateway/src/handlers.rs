// ==============================================================================
// handlers.rs - API Request Handlers
// ==============================================================================
// Description: HTTP request handlers for the interactive page and JSON API
// Author: Matt Barham
// Created: 2025-11-06
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use snp_risk_predictor::output::render_json;
use snp_risk_predictor::SelectionError;

use crate::{
    models::*,
    render::{render_page, PageBody},
    state::AppState,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Message shown for any index outside the loaded dataset
fn range_message(len: usize) -> String {
    match len {
        0 => "Dataset contains no samples".to_string(),
        n => format!("Sample index must be between 0 and {}", n - 1),
    }
}

/// Parse the page's sample field. Missing or blank selects the first sample.
fn parse_sample(raw: Option<&str>, len: usize) -> Result<usize, String> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return if len > 0 { Ok(0) } else { Err(range_message(len)) },
        Some(raw) => raw,
    };

    let index: i64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a whole number. {}", raw, range_message(len)))?;

    match usize::try_from(index) {
        Ok(index) if index < len => Ok(index),
        _ => Err(range_message(len)),
    }
}

/// Interactive page: selector plus the evaluation of the chosen sample
pub async fn page(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    let ctx = state.context();
    let len = ctx.dataset().len();
    let selected = query.sample.clone().unwrap_or_else(|| "0".to_string());

    let index = match parse_sample(query.sample.as_deref(), len) {
        Ok(index) => index,
        Err(message) => {
            warn!("Rejected sample selection {:?}: {}", query.sample, message);
            let html = render_page(len, &selected, PageBody::Error(message));
            return (StatusCode::BAD_REQUEST, Html(html)).into_response();
        }
    };

    match ctx.evaluate(index).await {
        Ok(report) => Html(render_page(len, &selected, PageBody::Report(&report))).into_response(),
        Err(e) => {
            let html = render_page(len, &selected, PageBody::Error(e.to_string()));
            (StatusCode::BAD_REQUEST, Html(html)).into_response()
        }
    }
}

/// API information
pub async fn api_info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "Breast Cancer SNP Risk API",
        version: VERSION,
        endpoints: vec![
            "/ - Interactive page (?sample=N)",
            "/health - Health check",
            "/ready - Readiness check",
            "/api/samples - Dataset summary (GET)",
            "/api/samples/{index} - Evaluate one sample (GET)",
        ],
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
        timestamp: Utc::now(),
    })
}

/// Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let ctx = state.context();
    let dataset_ready = !ctx.dataset().is_empty();
    let model_ready = !ctx.model_name().is_empty();
    let ready = dataset_ready && model_ready;

    let response = ReadinessResponse {
        ready,
        dataset: dataset_ready,
        model: model_ready,
        started_at: state.started_at(),
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Dataset summary
pub async fn list_samples(State(state): State<AppState>) -> Json<SummaryResponse> {
    let ctx = state.context();
    Json(SummaryResponse {
        samples: ctx.dataset().len(),
        first_index: 0,
        last_index: ctx.dataset().last_index(),
        dropped_rows: ctx.dataset().dropped_rows(),
        model: ctx.model_name().to_string(),
        cached_variants: ctx.resolver().cache_len(),
    })
}

/// Evaluate one sample
pub async fn evaluate_sample(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Value>, AppError> {
    let ctx = state.context();
    let len = ctx.dataset().len();

    // Parsed here so malformed indices get the JSON error body too
    let index = parse_sample(Some(&raw), len).map_err(AppError::BadRequest)?;

    let report = ctx.evaluate(index).await.map_err(|e| match e {
        SelectionError::OutOfRange { .. } => {
            AppError::BadRequestWithDetails(range_message(len), e.to_string())
        }
    })?;

    info!(
        "Sample {} evaluated: score={:.6} level={}",
        report.index, report.score, report.risk_level
    );

    Ok(Json(render_json(&report)))
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    BadRequestWithDetails(String, String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::BadRequestWithDetails(msg, details) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details(msg, details),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_defaults_to_first() {
        assert_eq!(parse_sample(None, 5), Ok(0));
        assert_eq!(parse_sample(Some("  "), 5), Ok(0));
        assert_eq!(parse_sample(Some(" 4 "), 5), Ok(4));
    }

    #[test]
    fn test_parse_sample_rejects_out_of_range() {
        assert_eq!(parse_sample(Some("5"), 5), Err(range_message(5)));
        assert_eq!(parse_sample(Some("-1"), 5), Err(range_message(5)));
        assert!(parse_sample(Some("2.5"), 5).unwrap_err().contains("not a whole number"));
        assert_eq!(parse_sample(None, 0), Err("Dataset contains no samples".to_string()));
    }
}
