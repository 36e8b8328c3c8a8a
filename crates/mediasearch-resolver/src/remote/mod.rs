//! Remote tier: concurrent per-term lookups against the entity-search API.

mod http_transport;
mod response;

pub use http_transport::HttpTransport;
pub use response::parse_hits;

use std::time::Duration;

use futures::stream::{self, StreamExt};
use mediasearch_core::config::ResolverConfig;
use mediasearch_core::errors::ResolverError;
use mediasearch_core::events;
use mediasearch_core::models::{EntityMatch, LanguagePair, Resolution};
use mediasearch_core::traits::{EntityResolver, EntitySearchRequest, SearchTransport};
use tracing::debug;

use crate::distinct_terms;
use crate::scorer;

/// Fetches entity candidates for each term from the entity-search API.
///
/// Terms are looked up concurrently (at most `max_concurrent` in flight), each
/// under its own timeout. A failed, timed-out, or malformed lookup yields an
/// empty, degraded entry for that term only.
pub struct RemoteResolver<T> {
    transport: T,
    languages: LanguagePair,
    limit: u32,
    timeout: Duration,
    max_concurrent: usize,
}

impl<T: SearchTransport> RemoteResolver<T> {
    pub fn new(transport: T, languages: LanguagePair, config: &ResolverConfig) -> Self {
        Self {
            transport,
            languages,
            limit: config.search_limit,
            timeout: Duration::from_millis(config.request_timeout_ms),
            max_concurrent: config.max_concurrent_requests.max(1),
        }
    }

    async fn lookup(&self, term: &str) -> Result<Vec<EntityMatch>, ResolverError> {
        let request = EntitySearchRequest {
            term: term.to_string(),
            language: self.languages.input.clone(),
            limit: self.limit,
        };

        let body = tokio::time::timeout(self.timeout, self.transport.fetch(&request))
            .await
            .map_err(|_| ResolverError::Timeout {
                term: term.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            })??;

        let hits = parse_hits(term, &body)?;
        Ok(hits
            .iter()
            .enumerate()
            .map(|(position, hit)| scorer::score(hit, position))
            .collect())
    }

    async fn resolve_distinct(&self, unique: Vec<String>) -> Resolution {
        let mut resolution = Resolution::default();
        if unique.is_empty() {
            return resolution;
        }

        let outcomes: Vec<(String, Result<Vec<EntityMatch>, ResolverError>)> = stream::iter(unique)
            .map(|term| async move {
                let outcome = self.lookup(&term).await;
                (term, outcome)
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        for (term, outcome) in outcomes {
            match outcome {
                Ok(matches) => resolution.insert(term, matches),
                Err(e) => {
                    events::entity_fetch_failed(&term, &e.to_string());
                    resolution.insert_degraded(term);
                }
            }
        }

        debug!(
            terms = resolution.matches.len(),
            degraded = resolution.degraded.len(),
            language = %self.languages.input,
            "remote entity lookup complete"
        );
        resolution
    }
}

impl<T: SearchTransport> EntityResolver for RemoteResolver<T> {
    async fn resolve(&self, terms: &[String]) -> Resolution {
        let mut resolution = self.resolve_distinct(distinct_terms(terms)).await;
        resolution.ensure_terms(terms);
        resolution
    }
}
