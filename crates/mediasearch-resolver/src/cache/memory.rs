//! Process-local memory tier.
//!
//! `EntityMemoryCache` is a bounded moka cache owned by whoever builds the
//! resolver chains; each `MemoryResolver` gets a cheap clone of it.

use std::time::Duration;

use mediasearch_core::models::{EntityMatch, LanguagePair, Resolution};
use mediasearch_core::traits::EntityResolver;
use moka::sync::Cache;
use tracing::debug;

use crate::distinct_terms;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoryKey {
    languages: LanguagePair,
    term: String,
}

/// Bounded, thread-safe term → entities cache shared across requests.
#[derive(Clone)]
pub struct EntityMemoryCache {
    cache: Cache<MemoryKey, Vec<EntityMatch>>,
}

impl EntityMemoryCache {
    /// Create a cache holding at most `max_entries` terms, each for `ttl`.
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    pub fn get(&self, languages: &LanguagePair, term: &str) -> Option<Vec<EntityMatch>> {
        self.cache.get(&MemoryKey {
            languages: languages.clone(),
            term: term.to_string(),
        })
    }

    pub fn insert(&self, languages: &LanguagePair, term: String, matches: Vec<EntityMatch>) {
        self.cache.insert(
            MemoryKey {
                languages: languages.clone(),
                term,
            },
            matches,
        );
    }

    /// Approximate number of entries.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

/// Serves terms from the shared memory cache and forwards the rest downstream.
pub struct MemoryResolver<R> {
    cache: EntityMemoryCache,
    languages: LanguagePair,
    inner: R,
}

impl<R: EntityResolver> MemoryResolver<R> {
    pub fn new(cache: EntityMemoryCache, languages: LanguagePair, inner: R) -> Self {
        Self {
            cache,
            languages,
            inner,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn resolve_distinct(&self, unique: Vec<String>) -> Resolution {
        let mut resolution = Resolution::default();
        let mut misses = Vec::new();
        for term in unique {
            match self.cache.get(&self.languages, &term) {
                Some(matches) => resolution.insert(term, matches),
                None => misses.push(term),
            }
        }

        debug!(
            hits = resolution.matches.len(),
            misses = misses.len(),
            "memory entity cache lookup"
        );

        if misses.is_empty() {
            return resolution;
        }

        let fetched = self.inner.resolve(&misses).await;
        for (term, matches) in fetched.cacheable() {
            self.cache.insert(&self.languages, term.clone(), matches.clone());
        }
        resolution.merge(fetched);
        resolution
    }
}

impl<R: EntityResolver> EntityResolver for MemoryResolver<R> {
    async fn resolve(&self, terms: &[String]) -> Resolution {
        let mut resolution = self.resolve_distinct(distinct_terms(terms)).await;
        resolution.ensure_terms(terms);
        resolution
    }
}
