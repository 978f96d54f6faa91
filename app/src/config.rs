// ==============================================================================
// config.rs - External Lookup Configuration
// ==============================================================================
// Description: Ensembl endpoints, species and timeout for variant lookups
// Author: Matt Barham
// Created: 2025-11-14
// Modified: 2025-12-02
// Version: 1.1.0
// ==============================================================================

use std::time::Duration;
use thiserror::Error;

/// GRCh37 coordinates are resolved against the GRCh37 mirror
pub const DEFAULT_OVERLAP_URL: &str = "https://grch37.rest.ensembl.org";
pub const DEFAULT_VEP_URL: &str = "https://rest.ensembl.org";
pub const DEFAULT_SPECIES: &str = "human";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Settings shared by the variant resolver and annotation fetcher
#[derive(Debug, Clone, PartialEq)]
pub struct LookupConfig {
    /// Base URL of the coordinate overlap service
    pub overlap_base_url: String,

    /// Base URL of the variant effect predictor
    pub vep_base_url: String,

    /// Ensembl species name used in both paths
    pub species: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            overlap_base_url: DEFAULT_OVERLAP_URL.to_string(),
            vep_base_url: DEFAULT_VEP_URL.to_string(),
            species: DEFAULT_SPECIES.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LookupConfig {
    /// Read `ENSEMBL_OVERLAP_URL`, `ENSEMBL_VEP_URL`, `ENSEMBL_SPECIES` and
    /// `ENSEMBL_TIMEOUT_SECS`, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout = match get("ENSEMBL_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_secs("ENSEMBL_TIMEOUT_SECS", &raw)?),
            None => defaults.timeout,
        };

        Ok(Self {
            overlap_base_url: get("ENSEMBL_OVERLAP_URL").unwrap_or(defaults.overlap_base_url),
            vep_base_url: get("ENSEMBL_VEP_URL").unwrap_or(defaults.vep_base_url),
            species: get("ENSEMBL_SPECIES").unwrap_or(defaults.species),
            timeout,
        })
    }
}

fn parse_secs(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Join a base URL and a path without doubling the slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = LookupConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, LookupConfig::default());
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ENSEMBL_OVERLAP_URL", "http://localhost:9000"),
            ("ENSEMBL_TIMEOUT_SECS", "3"),
        ]
        .into_iter()
        .collect();

        let config = LookupConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.overlap_base_url, "http://localhost:9000");
        assert_eq!(config.vep_base_url, DEFAULT_VEP_URL);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = LookupConfig::from_lookup(|k| {
            (k == "ENSEMBL_TIMEOUT_SECS").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { name: "ENSEMBL_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://rest.ensembl.org/", "/vep/human"), "https://rest.ensembl.org/vep/human");
        assert_eq!(join_url("https://rest.ensembl.org", "vep/human"), "https://rest.ensembl.org/vep/human");
    }
}
