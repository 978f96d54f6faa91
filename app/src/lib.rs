// ==============================================================================
// lib.rs - SNP Risk Predictor Library
// ==============================================================================
// Description: Library interface for single-SNP risk evaluation modules
// Author: Matt Barham
// Created: 2025-11-03
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================

pub mod classifier;
pub mod config;
pub mod ensembl;
pub mod models;
pub mod output;
pub mod parsers;
pub mod predictor;
pub mod processor;
pub mod recommendation;
pub mod validator;

pub use classifier::RiskLevel;
pub use config::LookupConfig;
pub use models::{FeatureVector, LookupOutcome, SampleRecord, VariantAnnotation};
pub use parsers::{ColumnMap, Dataset, SelectionError};
pub use predictor::{LinearModel, RiskModel};
pub use processor::{RiskContext, SampleReport, StartupError};
pub use recommendation::Recommendation;
