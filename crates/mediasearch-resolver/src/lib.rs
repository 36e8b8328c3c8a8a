//! # mediasearch-resolver
//!
//! Resolves free-text query terms to knowledge-base entities.
//!
//! ## Architecture
//!
//! ```text
//! MemoryResolver            (process-local, moka, bounded)
//! └── DistributedCacheResolver  (shared TTL store, one batched round trip)
//!     └── RemoteResolver        (entity-search API, concurrent per-term GETs)
//!         └── scorer            (highlight coverage + rank → confidence)
//! ```
//!
//! Every tier implements `EntityResolver`, so tiers stack in any order.

pub mod cache;
pub mod chain;
pub mod remote;
pub mod scorer;

pub use cache::{DistributedCacheResolver, EntityMemoryCache, InProcessStore, MemoryResolver};
pub use chain::{ResolverChain, ResolverStack};
pub use remote::{HttpTransport, RemoteResolver};
pub use scorer::SearchHit;

/// Distinct terms in first-seen order, blanks dropped.
///
/// Tiers look up only these, then give every requested term an entry.
pub(crate) fn distinct_terms(terms: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(terms.len());
    terms
        .iter()
        .filter(|t| !t.trim().is_empty() && seen.insert(t.as_str()))
        .cloned()
        .collect()
}
