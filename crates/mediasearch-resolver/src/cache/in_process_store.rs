//! `KeyValueStore` kept in process memory, honouring per-entry TTLs.
//!
//! Stands in for a shared backend on single-node deployments and in tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use mediasearch_core::errors::CacheError;
use mediasearch_core::traits::KeyValueStore;

#[derive(Debug, Clone, Default)]
pub struct InProcessStore {
    entries: Arc<DashMap<String, (String, Instant)>>,
}

impl InProcessStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until next read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl KeyValueStore for InProcessStore {
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, CacheError> {
        let now = Instant::now();
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            let live = match self.entries.get(key) {
                Some(entry) if entry.1 > now => Some(entry.0.clone()),
                Some(_) => None,
                None => continue,
            };
            match live {
                Some(value) => {
                    found.insert(key.clone(), value);
                }
                None => {
                    self.entries.remove_if(key, |_, (_, expires)| *expires <= now);
                }
            }
        }
        Ok(found)
    }

    async fn set_many(
        &self,
        entries: Vec<(String, String)>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let expires = Instant::now() + ttl;
        for (key, value) in entries {
            self.entries.insert(key, (value, expires));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "in-process"
    }
}
