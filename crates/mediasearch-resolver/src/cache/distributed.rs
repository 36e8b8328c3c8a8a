//! Distributed cache tier: batched get-or-populate over a shared TTL store.

use std::collections::HashMap;
use std::time::Duration;

use mediasearch_core::config::ResolverConfig;
use mediasearch_core::events;
use mediasearch_core::models::{EntityMatch, LanguagePair, Resolution};
use mediasearch_core::traits::{EntityResolver, KeyValueStore};
use tracing::debug;

use crate::distinct_terms;

/// Wraps a downstream resolver with a shared TTL key/value cache.
///
/// One `get_many` round trip per resolve; only misses reach the downstream
/// resolver; fresh results go back in one `set_many`. When the store fails,
/// every term goes downstream.
pub struct DistributedCacheResolver<S, R> {
    store: S,
    inner: R,
    languages: LanguagePair,
    prefix: String,
    ttl: Duration,
}

impl<S: KeyValueStore, R: EntityResolver> DistributedCacheResolver<S, R> {
    pub fn new(store: S, inner: R, languages: LanguagePair, config: &ResolverConfig) -> Self {
        Self {
            store,
            inner,
            languages,
            prefix: config.cache_key_prefix.clone(),
            ttl: Duration::from_secs(config.cache_ttl_secs),
        }
    }

    /// `<prefix>:<blake3(term)>:<input>:<output>`
    pub fn cache_key(&self, term: &str) -> String {
        format!(
            "{}:{}:{}:{}",
            self.prefix,
            blake3::hash(term.as_bytes()).to_hex(),
            self.languages.input,
            self.languages.output
        )
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn write_back(&self, fetched: &Resolution) {
        let entries: Vec<(String, String)> = fetched
            .cacheable()
            .filter_map(|(term, matches)| {
                serde_json::to_string(matches)
                    .ok()
                    .map(|value| (self.cache_key(term), value))
            })
            .collect();
        if entries.is_empty() {
            return;
        }
        if let Err(e) = self.store.set_many(entries, self.ttl).await {
            events::cache_backend_degraded(self.store.name(), "set_many", &e.to_string());
        }
    }

    async fn resolve_distinct(&self, unique: Vec<String>) -> Resolution {
        if unique.is_empty() {
            return Resolution::default();
        }

        let keys: Vec<String> = unique.iter().map(|t| self.cache_key(t)).collect();
        let cached: HashMap<String, String> = match self.store.get_many(&keys).await {
            Ok(found) => found,
            Err(e) => {
                events::cache_backend_degraded(self.store.name(), "get_many", &e.to_string());
                return self.inner.resolve(&unique).await;
            }
        };

        let mut resolution = Resolution::default();
        let mut misses = Vec::new();
        for (term, key) in unique.into_iter().zip(&keys) {
            let hit = cached
                .get(key)
                .and_then(|raw| serde_json::from_str::<Vec<EntityMatch>>(raw).ok());
            match hit {
                Some(matches) => resolution.insert(term, matches),
                None => misses.push(term),
            }
        }

        debug!(
            backend = self.store.name(),
            hits = resolution.matches.len(),
            misses = misses.len(),
            "distributed entity cache lookup"
        );

        if misses.is_empty() {
            return resolution;
        }

        let fetched = self.inner.resolve(&misses).await;
        self.write_back(&fetched).await;
        resolution.merge(fetched);
        resolution
    }
}

impl<S: KeyValueStore, R: EntityResolver> EntityResolver for DistributedCacheResolver<S, R> {
    async fn resolve(&self, terms: &[String]) -> Resolution {
        let mut resolution = self.resolve_distinct(distinct_terms(terms)).await;
        resolution.ensure_terms(terms);
        resolution
    }
}
