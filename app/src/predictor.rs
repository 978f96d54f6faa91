// ==============================================================================
// predictor.rs - Risk Model Predictor
// ==============================================================================
// Description: Loads the pretrained linear risk model and scores features
// Author: Matt Barham
// Created: 2025-11-14
// Modified: 2026-01-17
// Version: 1.2.0
// ==============================================================================
// Artifact format (JSON):
//   {
//     "model_name": "bc_snp_linear_v1",
//     "feature_names": ["Chromosome","Positionb","EAFc","ER-positivee","ER-negativef"],
//     "coefficients": [0.0004, 1.2e-11, 0.013, 0.006, -0.002],
//     "intercept": -0.004
//   }
// ==============================================================================

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::models::{FeatureVector, FEATURE_COUNT};
use crate::parsers::ColumnMap;
use crate::validator::{FileValidator, ValidationError};

/// Scoring function applied to a single feature vector
pub trait RiskModel: Send + Sync {
    /// Raw, uncalibrated risk score
    fn predict(&self, features: &FeatureVector) -> f64;

    fn name(&self) -> &str;
}

/// Errors that can occur while loading a model artifact
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid model file: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed model artifact: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Model expects {found} features, dataset provides {expected}")]
    FeatureCount { expected: usize, found: usize },

    #[error("Feature {position} is '{found}', expected '{expected}'")]
    FeatureOrder {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Model parameters must be finite")]
    NonFinite,
}

#[derive(Debug, Deserialize)]
struct LinearModelArtifact {
    #[serde(default)]
    model_name: Option<String>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Ordinary linear regression: `intercept + Σ wᵢ·xᵢ`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    name: String,
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LinearModel {
    pub fn new(name: impl Into<String>, coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Self {
        Self {
            name: name.into(),
            coefficients,
            intercept,
        }
    }

    /// Load and validate a JSON model artifact.
    ///
    /// When `feature_names` is present it must match the dataset's required
    /// columns in feature order.
    pub fn load(path: impl AsRef<Path>, columns: &ColumnMap) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let validated = FileValidator::for_model().validate(path)?;

        let raw = std::fs::read_to_string(path)?;
        let model = Self::from_json(&raw, columns)?;

        info!(
            path = %path.display(),
            model = %model.name,
            sha256 = %validated.hash_sha256,
            "Loaded risk model"
        );

        Ok(model)
    }

    pub fn from_json(raw: &str, columns: &ColumnMap) -> Result<Self, ModelError> {
        let artifact: LinearModelArtifact = serde_json::from_str(raw)?;

        let coefficients: [f64; FEATURE_COUNT] = artifact
            .coefficients
            .as_slice()
            .try_into()
            .map_err(|_| ModelError::FeatureCount {
                expected: FEATURE_COUNT,
                found: artifact.coefficients.len(),
            })?;

        if !artifact.intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        if let Some(names) = &artifact.feature_names {
            let expected = [
                columns.chromosome.as_str(),
                columns.position.as_str(),
                columns.allele_frequency.as_str(),
                columns.er_positive.as_str(),
                columns.er_negative.as_str(),
            ];
            if names.len() != FEATURE_COUNT {
                return Err(ModelError::FeatureCount {
                    expected: FEATURE_COUNT,
                    found: names.len(),
                });
            }
            for (position, (found, expected)) in names.iter().zip(expected).enumerate() {
                if found.as_str() != expected {
                    return Err(ModelError::FeatureOrder {
                        position,
                        expected: expected.to_string(),
                        found: found.clone(),
                    });
                }
            }
        }

        Ok(Self {
            name: artifact.model_name.unwrap_or_else(|| "linear".to_string()),
            coefficients,
            intercept: artifact.intercept,
        })
    }

    pub fn coefficients(&self) -> &[f64; FEATURE_COUNT] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl RiskModel for LinearModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const ARTIFACT: &str = r#"{
        "model_name": "bc_snp_linear_v1",
        "feature_names": ["Chromosome","Positionb","EAFc","ER-positivee","ER-negativef"],
        "coefficients": [0.001, 0.0, 0.05, 0.01, -0.02],
        "intercept": -0.005
    }"#;

    #[test]
    fn test_predict_is_linear_and_unclamped() {
        let model = LinearModel::from_json(ARTIFACT, &ColumnMap::default()).unwrap();
        let features = FeatureVector([1.0, 100_000.0, 0.2, 1.0, 0.0]);

        // 0.001 + 0.01 + 0.01 - 0.005
        let score = model.predict(&features);
        assert!((score - 0.016).abs() < 1e-12);
        assert_eq!(model.name(), "bc_snp_linear_v1");

        let negative = model.predict(&FeatureVector([0.0, 0.0, 0.0, 0.0, 5.0]));
        assert!(negative < 0.0);
    }

    #[test]
    fn test_feature_names_are_optional() {
        let model = LinearModel::from_json(
            r#"{"coefficients":[0,0,0,0,0],"intercept":0.25}"#,
            &ColumnMap::default(),
        )
        .unwrap();
        assert_eq!(model.name(), "linear");
        assert_eq!(model.predict(&FeatureVector([9.0; FEATURE_COUNT])), 0.25);
    }

    #[test]
    fn test_wrong_coefficient_count_is_fatal() {
        let err = LinearModel::from_json(
            r#"{"coefficients":[0.1,0.2],"intercept":0.0}"#,
            &ColumnMap::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::FeatureCount { expected: 5, found: 2 }));
    }

    #[test]
    fn test_feature_order_mismatch_is_fatal() {
        let err = LinearModel::from_json(
            r#"{"feature_names":["Positionb","Chromosome","EAFc","ER-positivee","ER-negativef"],
                "coefficients":[0,0,0,0,0],"intercept":0.0}"#,
            &ColumnMap::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::FeatureOrder { position: 0, .. }));
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let err = LinearModel::from_json("not json", &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, ModelError::Malformed(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(temp_file, "{}", ARTIFACT).unwrap();
        temp_file.flush().unwrap();

        let model = LinearModel::load(temp_file.path(), &ColumnMap::default()).unwrap();
        assert_eq!(model.intercept(), -0.005);
        assert_eq!(model.coefficients()[2], 0.05);
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let err = LinearModel::load("/nonexistent/model.json", &ColumnMap::default()).unwrap_err();
        assert!(matches!(err, ModelError::Validation(ValidationError::NotFound(_))));
    }
}
