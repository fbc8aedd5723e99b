//! Feed pipeline orchestration.
//!
//! [`FeedService`] ties the pipeline together: it derives a cache key from
//! the source and language, serves cached documents while their TTL lasts,
//! and on a miss runs fetch → parse → generate → store. Each invocation is
//! a simple sequential computation; the cache is the only shared state and
//! tolerates a harmless duplicate recomputation when two callers race on a
//! cold key.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use bdaycal_core::{Translate, generate_feed, parse_contacts};
use bdaycal_providers::ContactSource;

use crate::cache::FeedCache;
use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::http;

/// Namespace prefix for feed cache keys.
const CACHE_KEY_NAMESPACE: &str = "bday.feed.";

/// The outcome of a feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedResponse {
    /// The client's cached copy is current; no body.
    NotModified,
    /// The full calendar document.
    Document {
        /// UTF-8 document bytes.
        body: Vec<u8>,
        /// When the document was built.
        generated_at: DateTime<Utc>,
        /// Response headers (content type, disposition, caching).
        headers: Vec<(String, String)>,
    },
}

/// Orchestrates the contact-to-calendar pipeline behind a TTL cache.
pub struct FeedService {
    /// Where the raw contact payload comes from.
    source: Box<dyn ContactSource>,
    /// Translation lookup for all user-visible strings.
    i18n: Box<dyn Translate>,
    /// Pipeline configuration.
    config: FeedConfig,
    /// Cache of built documents, shared across invocations.
    cache: RwLock<FeedCache>,
}

impl FeedService {
    /// Creates a new feed service.
    pub fn new(source: Box<dyn ContactSource>, i18n: Box<dyn Translate>, config: FeedConfig) -> Self {
        Self {
            source,
            i18n,
            config,
            cache: RwLock::new(FeedCache::new()),
        }
    }

    /// Returns the cache key for this service's source and language.
    ///
    /// A namespace prefix plus the hex digest of the source descriptor and
    /// the language tag; deterministic across runs.
    pub fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.descriptor().as_bytes());
        hasher.update(self.config.language.as_bytes());
        format!("{CACHE_KEY_NAMESPACE}{}", hex::encode(hasher.finalize()))
    }

    /// Produces the feed, honoring the cache and the client precondition.
    ///
    /// With `if_modified_since` at or after the document's build time the
    /// response is [`FeedResponse::NotModified`] with no body. Timestamps
    /// are compared at whole-second precision, since HTTP dates carry no
    /// subsecond part.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] when the source fetch fails. A failed
    /// invocation never updates the cache; the next one retries the whole
    /// pipeline.
    pub async fn produce_feed(
        &self,
        if_modified_since: Option<DateTime<Utc>>,
    ) -> FeedResult<FeedResponse> {
        let (document, generated_at) = self.cached_or_build().await?;

        if let Some(since) = if_modified_since
            && since.timestamp() >= generated_at.timestamp()
        {
            debug!("Client copy is current, responding not modified");
            return Ok(FeedResponse::NotModified);
        }

        let headers = http::feed_headers(generated_at, self.config.cache_ttl);
        Ok(FeedResponse::Document {
            body: document.into_bytes(),
            generated_at,
            headers,
        })
    }

    /// Returns the single localized message for a pipeline failure.
    pub fn error_message(&self, error: &FeedError) -> String {
        error.localized_message(self.i18n.as_ref())
    }

    /// Returns the cached document, or builds and stores a fresh one.
    async fn cached_or_build(&self) -> FeedResult<(String, DateTime<Utc>)> {
        let key = self.cache_key();
        let ttl = self.config.cache_ttl;

        if !ttl.is_zero() {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                debug!(key = %key, "Serving feed from cache");
                return Ok((entry.document.clone(), entry.generated_at));
            }
        }

        let (document, generated_at) = self.build_document().await?;

        if !ttl.is_zero() {
            let mut cache = self.cache.write().await;
            cache.put(&key, document.clone(), generated_at, ttl);
        }

        Ok((document, generated_at))
    }

    /// Runs fetch → parse → generate once.
    async fn build_document(&self) -> FeedResult<(String, DateTime<Utc>)> {
        info!(source = self.source.name(), "Refreshing birthday feed");

        let payload = self.source.fetch().await.inspect_err(|e| {
            warn!(source = self.source.name(), error = %e, "Contact fetch failed");
        })?;

        let records = parse_contacts(&payload, self.i18n.as_ref());
        let generated_at = Utc::now();
        let document = generate_feed(
            &records,
            &self.config.reminder,
            self.i18n.as_ref(),
            generated_at,
        );

        info!(
            records = records.len(),
            bytes = document.len(),
            "Built birthday feed document"
        );

        Ok((document, generated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use bdaycal_core::Catalog;
    use bdaycal_providers::{BoxFuture, SourceError, SourceResult};

    const SAMPLE_PAYLOAD: &str =
        "BEGIN:VCARD\r\nFN:John Doe\r\nBDAY:1990-05-15\r\nEND:VCARD\r\n";

    /// In-memory source counting its fetches.
    struct StaticSource {
        payload: String,
        fetches: Arc<AtomicUsize>,
    }

    impl StaticSource {
        fn new(payload: &str) -> (Self, Arc<AtomicUsize>) {
            let fetches = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    payload: payload.to_string(),
                    fetches: Arc::clone(&fetches),
                },
                fetches,
            )
        }
    }

    impl ContactSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        fn descriptor(&self) -> String {
            "static:test".to_string()
        }

        fn fetch(&self) -> BoxFuture<'_, SourceResult<String>> {
            Box::pin(async move {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                Ok(self.payload.clone())
            })
        }
    }

    /// Source failing a fixed number of times before succeeding.
    struct FlakySource {
        failures_left: AtomicUsize,
        payload: String,
    }

    impl ContactSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        fn descriptor(&self) -> String {
            "flaky:test".to_string()
        }

        fn fetch(&self) -> BoxFuture<'_, SourceResult<String>> {
            Box::pin(async move {
                if self
                    .failures_left
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok()
                {
                    Err(SourceError::network("connection refused"))
                } else {
                    Ok(self.payload.clone())
                }
            })
        }
    }

    fn service_with_ttl(payload: &str, ttl: Duration) -> (FeedService, Arc<AtomicUsize>) {
        let (source, fetches) = StaticSource::new(payload);
        let service = FeedService::new(
            Box::new(source),
            Box::new(Catalog::default()),
            FeedConfig::default().with_cache_ttl(ttl),
        );
        (service, fetches)
    }

    fn document_body(response: &FeedResponse) -> String {
        match response {
            FeedResponse::Document { body, .. } => String::from_utf8(body.clone()).unwrap(),
            FeedResponse::NotModified => panic!("expected a full document"),
        }
    }

    #[tokio::test]
    async fn produces_calendar_document() {
        let (service, _) = service_with_ttl(SAMPLE_PAYLOAD, Duration::from_secs(60));
        let response = service.produce_feed(None).await.unwrap();

        let body = document_body(&response);
        assert!(body.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(body.contains("John Doe"));
        assert_eq!(body.matches("BEGIN:VEVENT").count(), 3);
    }

    #[tokio::test]
    async fn document_headers_reflect_ttl() {
        let (service, _) = service_with_ttl(SAMPLE_PAYLOAD, Duration::from_secs(900));
        let response = service.produce_feed(None).await.unwrap();

        let FeedResponse::Document { headers, generated_at, .. } = response else {
            panic!("expected a full document");
        };
        let get = |name: &str| {
            headers
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("Content-Type"), Some("text/calendar; charset=utf-8"));
        assert_eq!(get("Cache-Control"), Some("max-age=900"));
        assert_eq!(
            get("Last-Modified").map(str::to_string),
            Some(http::format_http_date(generated_at))
        );
    }

    #[tokio::test]
    async fn cache_hit_skips_pipeline() {
        let (service, fetches) = service_with_ttl(SAMPLE_PAYLOAD, Duration::from_secs(60));

        let first = service.produce_feed(None).await.unwrap();
        let second = service.produce_feed(None).await.unwrap();

        // One fetch+parse+generate per cache key per TTL window.
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn zero_ttl_always_recomputes() {
        let (service, fetches) = service_with_ttl(SAMPLE_PAYLOAD, Duration::ZERO);

        service.produce_feed(None).await.unwrap();
        let response = service.produce_feed(None).await.unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);

        let FeedResponse::Document { headers, .. } = response else {
            panic!("expected a full document");
        };
        let cache_control = headers
            .iter()
            .find(|(k, _)| k == "Cache-Control")
            .map(|(_, v)| v.as_str());
        assert_eq!(cache_control, Some("no-store, no-cache"));
    }

    #[tokio::test]
    async fn not_modified_when_client_is_current() {
        let (service, _) = service_with_ttl(SAMPLE_PAYLOAD, Duration::from_secs(60));

        let FeedResponse::Document { generated_at, .. } =
            service.produce_feed(None).await.unwrap()
        else {
            panic!("expected a full document");
        };

        // Equal timestamp satisfies the precondition.
        let response = service.produce_feed(Some(generated_at)).await.unwrap();
        assert_eq!(response, FeedResponse::NotModified);

        // A later client timestamp does too.
        let response = service
            .produce_feed(Some(generated_at + chrono::Duration::minutes(5)))
            .await
            .unwrap();
        assert_eq!(response, FeedResponse::NotModified);
    }

    #[tokio::test]
    async fn full_document_when_client_is_stale() {
        let (service, _) = service_with_ttl(SAMPLE_PAYLOAD, Duration::from_secs(60));

        let FeedResponse::Document { generated_at, .. } =
            service.produce_feed(None).await.unwrap()
        else {
            panic!("expected a full document");
        };

        let stale = generated_at - chrono::Duration::hours(1);
        let response = service.produce_feed(Some(stale)).await.unwrap();
        assert!(matches!(response, FeedResponse::Document { .. }));
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_localized_message() {
        let source = FlakySource {
            failures_left: AtomicUsize::new(usize::MAX),
            payload: String::new(),
        };
        let service = FeedService::new(
            Box::new(source),
            Box::new(Catalog::default()),
            FeedConfig::default(),
        );

        let err = service.produce_feed(None).await.unwrap_err();
        let message = service.error_message(&err);
        assert!(message.starts_with("Could not load the contact data"));
        assert!(message.contains("connection refused"));
    }

    #[tokio::test]
    async fn failure_is_not_cached() {
        let source = FlakySource {
            failures_left: AtomicUsize::new(1),
            payload: SAMPLE_PAYLOAD.to_string(),
        };
        let service = FeedService::new(
            Box::new(source),
            Box::new(Catalog::default()),
            FeedConfig::default().with_cache_ttl(Duration::from_secs(60)),
        );

        // First invocation fails and must not poison the cache.
        assert!(service.produce_feed(None).await.is_err());

        // The retry runs the full pipeline and succeeds.
        let response = service.produce_feed(None).await.unwrap();
        assert!(document_body(&response).contains("John Doe"));
    }

    #[tokio::test]
    async fn empty_payload_yields_empty_calendar() {
        let (service, _) = service_with_ttl("", Duration::from_secs(60));
        let response = service.produce_feed(None).await.unwrap();

        let body = document_body(&response);
        assert!(body.contains("BEGIN:VCALENDAR\r\n"));
        assert_eq!(body.matches("BEGIN:VEVENT").count(), 0);
    }

    #[test]
    fn cache_key_is_namespaced_and_deterministic() {
        let (source_a, _) = StaticSource::new(SAMPLE_PAYLOAD);
        let (source_b, _) = StaticSource::new(SAMPLE_PAYLOAD);

        let a = FeedService::new(
            Box::new(source_a),
            Box::new(Catalog::default()),
            FeedConfig::default(),
        );
        let b = FeedService::new(
            Box::new(source_b),
            Box::new(Catalog::default()),
            FeedConfig::default(),
        );

        assert!(a.cache_key().starts_with("bday.feed."));
        // Same descriptor and language hash to the same key.
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn cache_key_differs_per_language() {
        let (source_a, _) = StaticSource::new(SAMPLE_PAYLOAD);
        let (source_b, _) = StaticSource::new(SAMPLE_PAYLOAD);

        let en = FeedService::new(
            Box::new(source_a),
            Box::new(Catalog::for_tag("en")),
            FeedConfig::default().with_language("en"),
        );
        let de = FeedService::new(
            Box::new(source_b),
            Box::new(Catalog::for_tag("de")),
            FeedConfig::default().with_language("de"),
        );

        assert_ne!(en.cache_key(), de.cache_key());
    }
}
