// ==============================================================================
// processor.rs - Sample Risk Evaluation Pipeline
// ==============================================================================
// Description: Predicts, classifies, resolves and annotates one sample record
// Author: Matt Barham
// Created: 2025-10-31
// Modified: 2026-01-17
// Version: 3.0.0
// ==============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::classifier::RiskLevel;
use crate::config::LookupConfig;
use crate::ensembl::{AnnotationFetcher, EnsemblClient, JsonTransport, LookupError, VariantResolver};
use crate::models::{LookupOutcome, SampleRecord, VariantAnnotation};
use crate::parsers::{ColumnMap, Dataset, DatasetError, DatasetLoader, SelectionError};
use crate::predictor::{LinearModel, ModelError, RiskModel};
use crate::recommendation::Recommendation;

/// Fatal errors while preparing the evaluation context
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Failed to load dataset: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Failed to load model: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] LookupError),
}

/// Everything derived from one selected sample
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub index: usize,
    pub record: SampleRecord,
    pub score: f64,
    pub risk_level: RiskLevel,
    pub variant_id: LookupOutcome<String>,
    /// `None` when no identifier was resolved, so no annotation was requested
    pub annotation: Option<LookupOutcome<VariantAnnotation>>,
    pub recommendation: Recommendation,
    pub evaluated_at: DateTime<Utc>,
}

impl SampleReport {
    pub fn annotation(&self) -> Option<&VariantAnnotation> {
        self.annotation.as_ref().and_then(LookupOutcome::found)
    }
}

/// Read-only context shared by every evaluation
pub struct RiskContext {
    dataset: Dataset,
    model: Arc<dyn RiskModel>,
    resolver: VariantResolver,
    annotator: AnnotationFetcher,
}

impl RiskContext {
    pub fn new(
        dataset: Dataset,
        model: Arc<dyn RiskModel>,
        resolver: VariantResolver,
        annotator: AnnotationFetcher,
    ) -> Self {
        Self {
            dataset,
            model,
            resolver,
            annotator,
        }
    }

    /// Build resolver and fetcher over a shared transport
    pub fn with_transport(
        dataset: Dataset,
        model: Arc<dyn RiskModel>,
        transport: Arc<dyn JsonTransport>,
        config: &LookupConfig,
    ) -> Self {
        let resolver = VariantResolver::new(transport.clone(), config);
        let annotator = AnnotationFetcher::new(transport, config);
        Self::new(dataset, model, resolver, annotator)
    }

    /// Load dataset and model from disk and connect to Ensembl.
    ///
    /// Any failure here is fatal: the tool cannot start without both inputs.
    pub fn load(
        dataset_path: &Path,
        model_path: &Path,
        columns: &ColumnMap,
        config: &LookupConfig,
    ) -> Result<Self, StartupError> {
        let dataset = DatasetLoader::load(dataset_path, columns)?;
        let model = LinearModel::load(model_path, columns)?;
        let client = EnsemblClient::new(config.timeout)?;

        Ok(Self::with_transport(dataset, Arc::new(model), Arc::new(client), config))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn resolver(&self) -> &VariantResolver {
        &self.resolver
    }

    /// Evaluate the sample at `index`.
    ///
    /// Out-of-range indices are rejected before the model runs. Lookups are
    /// best-effort and never fail the evaluation.
    pub async fn evaluate(&self, index: usize) -> Result<SampleReport, SelectionError> {
        let record = self.dataset.select(index)?.clone();

        // 1. Score
        let score = self.model.predict(&record.features());
        let risk_level = RiskLevel::from_score(score);
        info!("Sample {}: score={:.6} risk={}", index, score, risk_level);

        // 2. Resolve rsID (memoized)
        let variant_id = self.resolver.resolve(record.chromosome, record.position).await;

        // 3. Annotate only when an identifier was found
        let annotation = match variant_id.found() {
            Some(id) => Some(self.annotator.fetch(id).await),
            None => None,
        };

        // 4. Recommend from annotation alone
        let recommendation =
            Recommendation::for_annotation(annotation.as_ref().and_then(LookupOutcome::found));

        Ok(SampleReport {
            index,
            record,
            score,
            risk_level,
            variant_id,
            annotation,
            recommendation,
            evaluated_at: Utc::now(),
        })
    }
}
