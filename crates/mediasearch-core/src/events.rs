//! Structured log events for notable resolver and routing outcomes.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a per-term entity lookup that degraded to an empty result.
pub fn entity_fetch_failed(term: &str, reason: &str) {
    tracing::warn!(
        event = "entity_fetch_failed",
        term = %term,
        reason = %reason,
        "entity lookup failed, using empty result"
    );
}

/// Log a distributed cache backend failure and the fallback taken.
pub fn cache_backend_degraded(backend: &str, operation: &str, reason: &str) {
    tracing::warn!(
        event = "cache_backend_degraded",
        backend = %backend,
        operation = %operation,
        reason = %reason,
        "cache backend unavailable"
    );
}

/// Log the outcome of resolving one query's terms.
pub fn entities_resolved(terms: usize, matched: usize, degraded: usize) {
    tracing::debug!(
        event = "entities_resolved",
        terms = terms,
        matched = matched,
        degraded = degraded,
        "query terms resolved"
    );
}

/// Log profiles removed from a query by the shape classifier.
pub fn profiles_vetoed(query: &str, vetoed: &[String]) {
    tracing::info!(
        event = "profiles_vetoed",
        query = %query,
        vetoed = ?vetoed,
        "query shape excludes relevance profiles"
    );
}
