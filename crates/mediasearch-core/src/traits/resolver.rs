use std::future::Future;
use std::sync::Arc;

use crate::models::Resolution;

/// Resolves free-text terms to candidate knowledge-base entities.
///
/// Implementations are stackable tiers (memory → distributed cache → remote)
/// composed through constructor injection. `resolve` never fails as a whole:
/// every requested term appears in the result, with an empty list when it has
/// no match or its lookup failed.
pub trait EntityResolver: Send + Sync {
    fn resolve(&self, terms: &[String]) -> impl Future<Output = Resolution> + Send;
}

impl<R: EntityResolver> EntityResolver for Arc<R> {
    fn resolve(&self, terms: &[String]) -> impl Future<Output = Resolution> + Send {
        (**self).resolve(terms)
    }
}
