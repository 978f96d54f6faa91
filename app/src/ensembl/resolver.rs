// ==============================================================================
// resolver.rs - Coordinate to rsID Resolver
// ==============================================================================
// Description: Maps chromosome/position to a variant ID via Ensembl overlap
// Author: Matt Barham
// Created: 2025-11-14
// Modified: 2026-01-17
// Version: 1.2.0
// ==============================================================================

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::{interpret, JsonTransport};
use crate::config::{join_url, LookupConfig};
use crate::models::LookupOutcome;

/// Overlap endpoint entry (only the identifier is consumed)
#[derive(Debug, Deserialize)]
struct OverlapFeature {
    id: Option<String>,
}

/// Resolves genomic coordinates to variant identifiers.
///
/// Outcomes are memoized per (chromosome, position) for the lifetime of the
/// resolver. Concurrent callers for the same coordinate share one request.
/// The cache is unbounded: inputs come from a static dataset.
pub struct VariantResolver {
    transport: Arc<dyn JsonTransport>,
    base_url: String,
    species: String,
    cache: Mutex<HashMap<(u8, u64), Arc<OnceCell<LookupOutcome<String>>>>>,
}

impl VariantResolver {
    pub fn new(transport: Arc<dyn JsonTransport>, config: &LookupConfig) -> Self {
        Self {
            transport,
            base_url: config.overlap_base_url.clone(),
            species: config.species.clone(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Single-base overlap query for variation features
    pub fn region_url(&self, chromosome: u8, position: u64) -> String {
        join_url(
            &self.base_url,
            &format!(
                "overlap/region/{}/{}:{}-{}?feature=variation",
                self.species, chromosome, position, position
            ),
        )
    }

    /// Resolve a coordinate to the first overlapping variant's ID
    pub async fn resolve(&self, chromosome: u8, position: u64) -> LookupOutcome<String> {
        // Lock only to fetch the slot; the request runs outside it
        let slot = self.lock_cache().entry((chromosome, position)).or_default().clone();

        if let Some(cached) = slot.get() {
            debug!("Variant cache hit for {}:{}", chromosome, position);
            return cached.clone();
        }

        slot.get_or_init(|| self.lookup(chromosome, position))
            .await
            .clone()
    }

    async fn lookup(&self, chromosome: u8, position: u64) -> LookupOutcome<String> {
        let url = self.region_url(chromosome, position);
        let outcome = interpret(self.transport.get_json(&url).await, first_variant_id);

        match &outcome {
            LookupOutcome::Found(id) => info!("Resolved {}:{} to {}", chromosome, position, id),
            LookupOutcome::NotFound => info!("No variant at {}:{}", chromosome, position),
            LookupOutcome::Failed(reason) => {
                warn!("Variant lookup for {}:{} failed: {}", chromosome, position, reason)
            }
        }

        outcome
    }

    /// Number of memoized coordinates
    pub fn cache_len(&self) -> usize {
        self.lock_cache().values().filter(|slot| slot.initialized()).count()
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<(u8, u64), Arc<OnceCell<LookupOutcome<String>>>>> {
        // Slots are inserted whole, so a poisoned map is still consistent
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn first_variant_id(body: serde_json::Value) -> LookupOutcome<String> {
    let features: Vec<OverlapFeature> = match serde_json::from_value(body) {
        Ok(features) => features,
        Err(e) => return LookupOutcome::Failed(format!("Unexpected overlap response: {}", e)),
    };

    match features.into_iter().next() {
        None => LookupOutcome::NotFound,
        Some(OverlapFeature { id: Some(id) }) if !id.is_empty() => LookupOutcome::Found(id),
        Some(_) => LookupOutcome::Failed("Overlapping variant has no id".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensembl::mock::{MockReply, MockTransport};
    use crate::ensembl::{JsonReply, LookupError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers every request after a delay, counting calls
    #[derive(Default)]
    struct SlowTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl JsonTransport for SlowTransport {
        async fn get_json(&self, _url: &str) -> Result<JsonReply, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(JsonReply::ok(json!([{"id": "rs2981582"}])))
        }
    }

    const URL: &str =
        "https://grch37.rest.ensembl.org/overlap/region/human/1:100000-100000?feature=variation";

    fn resolver(transport: Arc<MockTransport>) -> VariantResolver {
        VariantResolver::new(transport, &LookupConfig::default())
    }

    #[test]
    fn test_region_url() {
        let r = resolver(Arc::new(MockTransport::new()));
        assert_eq!(r.region_url(1, 100_000), URL);
    }

    #[tokio::test]
    async fn test_first_overlapping_variant_wins() {
        let transport = Arc::new(MockTransport::new().with(
            URL,
            MockReply::Json(json!([
                {"id": "rs2981582", "start": 100000, "end": 100000},
                {"id": "rs0000001", "start": 99999, "end": 100001}
            ])),
        ));
        let r = resolver(transport);

        assert_eq!(r.resolve(1, 100_000).await, LookupOutcome::Found("rs2981582".to_string()));
    }

    #[tokio::test]
    async fn test_repeat_lookup_is_served_from_cache() {
        let transport = Arc::new(
            MockTransport::new().with(URL, MockReply::Json(json!([{"id": "rs2981582"}]))),
        );
        let r = resolver(transport.clone());

        let first = r.resolve(1, 100_000).await;
        let second = r.resolve(1, 100_000).await;

        assert_eq!(first, second);
        assert_eq!(transport.calls(), 1);
        assert_eq!(r.cache_len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_coordinates_are_cached_separately() {
        let transport = Arc::new(MockTransport::new());
        let r = resolver(transport.clone());

        r.resolve(1, 100_000).await;
        r.resolve(1, 100_001).await;
        r.resolve(2, 100_000).await;

        assert_eq!(transport.calls(), 3);
        assert_eq!(r.cache_len(), 3);
    }

    #[tokio::test]
    async fn test_server_error_is_absent_not_error() {
        let transport = Arc::new(MockTransport::new().with(URL, MockReply::Status(500)));
        let outcome = resolver(transport).resolve(1, 100_000).await;

        assert!(matches!(outcome, LookupOutcome::Failed(_)));
        assert_eq!(outcome.into_option(), None);
    }

    #[tokio::test]
    async fn test_empty_array_is_not_found() {
        let transport = Arc::new(MockTransport::new().with(URL, MockReply::Json(json!([]))));
        assert_eq!(resolver(transport).resolve(1, 100_000).await, LookupOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_timeout_is_absent_and_cached() {
        let transport = Arc::new(MockTransport::new().with(URL, MockReply::Timeout));
        let r = resolver(transport.clone());

        assert_eq!(r.resolve(1, 100_000).await.into_option(), None);
        assert_eq!(r.resolve(1, 100_000).await.into_option(), None);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_failed() {
        let transport = Arc::new(
            MockTransport::new().with(URL, MockReply::Json(json!({"error": "oops"}))),
        );
        assert!(matches!(
            resolver(transport).resolve(1, 100_000).await,
            LookupOutcome::Failed(_)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_lookups_share_one_request() {
        let transport = Arc::new(SlowTransport::default());
        let r = Arc::new(VariantResolver::new(transport.clone(), &LookupConfig::default()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let r = r.clone();
                tokio::spawn(async move { r.resolve(1, 100_000).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), LookupOutcome::Found("rs2981582".to_string()));
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(r.cache_len(), 1);
    }
}
