// ==============================================================================
// models.rs - API Data Models
// ==============================================================================
// Description: Request/response models for the SNP risk API
// Author: Matt Barham
// Created: 2025-11-06
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query string of the interactive page
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Raw sample index as typed by the user
    pub sample: Option<String>,
}

/// Dataset summary response
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub samples: usize,
    pub first_index: usize,
    pub last_index: Option<usize>,
    pub dropped_rows: usize,
    pub model: String,
    pub cached_variants: usize,
}

/// API information response
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub dataset: bool,
    pub model: bool,
    pub started_at: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
