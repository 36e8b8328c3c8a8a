//! Assembles the memory → distributed → remote resolver stack.

use std::time::Duration;

use mediasearch_core::config::ResolverConfig;
use mediasearch_core::models::LanguagePair;
use mediasearch_core::traits::{KeyValueStore, SearchTransport};
use tracing::info;

use crate::cache::{DistributedCacheResolver, EntityMemoryCache, MemoryResolver};
use crate::remote::RemoteResolver;

/// The full resolver stack for one language pair.
pub type ResolverStack<S, T> = MemoryResolver<DistributedCacheResolver<S, RemoteResolver<T>>>;

/// Long-lived handles shared by every resolver stack in the process.
///
/// Stacks are cheap to build per request; the caches, store connection, and
/// HTTP client live here.
#[derive(Clone)]
pub struct ResolverChain<S, T> {
    config: ResolverConfig,
    memory: EntityMemoryCache,
    store: S,
    transport: T,
}

impl<S, T> ResolverChain<S, T>
where
    S: KeyValueStore + Clone,
    T: SearchTransport + Clone,
{
    pub fn new(config: ResolverConfig, store: S, transport: T) -> Self {
        let memory = EntityMemoryCache::new(
            config.memory_cache_capacity,
            Duration::from_secs(config.cache_ttl_secs),
        );
        info!(
            backend = store.name(),
            memory_capacity = config.memory_cache_capacity,
            ttl_secs = config.cache_ttl_secs,
            "resolver chain initialized"
        );
        Self {
            config,
            memory,
            store,
            transport,
        }
    }

    /// Build the stack for one language pair.
    pub fn stack(&self, languages: LanguagePair) -> ResolverStack<S, T> {
        let remote = RemoteResolver::new(self.transport.clone(), languages.clone(), &self.config);
        let distributed = DistributedCacheResolver::new(
            self.store.clone(),
            remote,
            languages.clone(),
            &self.config,
        );
        MemoryResolver::new(self.memory.clone(), languages, distributed)
    }

    pub fn memory_cache(&self) -> &EntityMemoryCache {
        &self.memory
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}
