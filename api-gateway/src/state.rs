// ==============================================================================
// state.rs - Application State Management
// ==============================================================================
// Description: Read-only evaluation context shared by all request handlers
// Author: Matt Barham
// Created: 2025-11-06
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use snp_risk_predictor::{ColumnMap, LookupConfig, RiskContext};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Dataset, model and lookup clients (immutable after startup)
    context: RiskContext,

    /// Server start time
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Load dataset and model from environment-configured paths.
    ///
    /// Fails if either input is missing or malformed; the server does not
    /// start without them.
    pub fn new() -> Result<Self> {
        let dataset_path = PathBuf::from(
            std::env::var("SNP_DATASET").unwrap_or_else(|_| "mmc4.xlsx".to_string()),
        );
        let model_path = PathBuf::from(
            std::env::var("SNP_MODEL").unwrap_or_else(|_| "model.json".to_string()),
        );

        let config = LookupConfig::from_env().context("Invalid Ensembl configuration")?;
        info!(
            "Ensembl endpoints: overlap={} vep={} (timeout {:?})",
            config.overlap_base_url, config.vep_base_url, config.timeout
        );

        let context = RiskContext::load(&dataset_path, &model_path, &ColumnMap::default(), &config)
            .with_context(|| {
                format!(
                    "Failed to load dataset {:?} / model {:?}",
                    dataset_path, model_path
                )
            })?;

        Ok(Self::from_context(context))
    }

    /// Wrap an already-built context
    pub fn from_context(context: RiskContext) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                context,
                started_at: Utc::now(),
            }),
        }
    }

    /// Get evaluation context
    pub fn context(&self) -> &RiskContext {
        &self.inner.context
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.inner.started_at
    }
}
