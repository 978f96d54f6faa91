// ==============================================================================
// ensembl/mod.rs - Ensembl REST Client
// ==============================================================================
// Description: JSON transport for Ensembl overlap and VEP endpoints
// Author: Matt Barham
// Created: 2025-11-14
// Modified: 2026-01-17
// Version: 1.2.0
// ==============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::LookupOutcome;

pub mod annotation;
pub mod resolver;

pub use annotation::AnnotationFetcher;
pub use resolver::VariantResolver;

/// Transport-level lookup failure
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Request timed out")]
    Timeout,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Status and decoded body of a GET request.
///
/// `body` is only decoded for success statuses.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReply {
    pub status: u16,
    pub body: Option<Value>,
}

impl JsonReply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: None }
    }
}

/// Single-shot JSON GET, no retries
#[async_trait]
pub trait JsonTransport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<JsonReply, LookupError>;
}

/// reqwest-backed transport with a fixed per-request timeout
#[derive(Debug, Clone)]
pub struct EnsemblClient {
    client: Client,
}

impl EnsemblClient {
    pub fn new(timeout: Duration) -> Result<Self, LookupError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("snp-risk-predictor/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonTransport for EnsemblClient {
    async fn get_json(&self, url: &str) -> Result<JsonReply, LookupError> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(timeout_aware)?;
        let status = response.status();

        if !status.is_success() {
            return Ok(JsonReply::status(status.as_u16()));
        }

        let text = response.text().await.map_err(timeout_aware)?;
        let body = serde_json::from_str(&text)?;

        Ok(JsonReply {
            status: status.as_u16(),
            body: Some(body),
        })
    }
}

fn timeout_aware(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Http(err)
    }
}

/// Map a transport result onto a lookup outcome.
///
/// 400/404 mean the service does not know the query; any other non-success
/// status or transport error is a failed lookup.
pub(crate) fn interpret<T>(
    reply: Result<JsonReply, LookupError>,
    parse: impl FnOnce(Value) -> LookupOutcome<T>,
) -> LookupOutcome<T> {
    match reply {
        Ok(JsonReply {
            status,
            body: Some(body),
        }) if (200..300).contains(&status) => parse(body),
        Ok(JsonReply { status, .. })
            if status == StatusCode::NOT_FOUND.as_u16() || status == StatusCode::BAD_REQUEST.as_u16() =>
        {
            LookupOutcome::NotFound
        }
        Ok(JsonReply { status, .. }) => LookupOutcome::Failed(format!("HTTP {}", status)),
        Err(e) => LookupOutcome::Failed(e.to_string()),
    }
}
