use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use crate::errors::CacheError;

/// A shared TTL key/value store (memcached, redis, ...).
///
/// Both operations are batched so one resolve costs one round trip each way.
pub trait KeyValueStore: Send + Sync {
    /// Fetch all present keys. Missing or expired keys are absent from the map.
    fn get_many(
        &self,
        keys: &[String],
    ) -> impl Future<Output = Result<HashMap<String, String>, CacheError>> + Send;

    /// Write all entries with the same TTL.
    fn set_many(
        &self,
        entries: Vec<(String, String)>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

impl<S: KeyValueStore> KeyValueStore for std::sync::Arc<S> {
    fn get_many(
        &self,
        keys: &[String],
    ) -> impl Future<Output = Result<HashMap<String, String>, CacheError>> + Send {
        (**self).get_many(keys)
    }

    fn set_many(
        &self,
        entries: Vec<(String, String)>,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), CacheError>> + Send {
        (**self).set_many(entries, ttl)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
