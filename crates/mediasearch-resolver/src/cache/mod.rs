//! Cache tiers in front of the remote resolver.
//!
//! Memory (moka, per process) → distributed (shared TTL store) → remote.
//! Both tiers forward only their misses downstream and never store entries
//! for terms whose lookup degraded.

pub mod distributed;
pub mod in_process_store;
pub mod memory;

pub use distributed::DistributedCacheResolver;
pub use in_process_store::InProcessStore;
pub use memory::{EntityMemoryCache, MemoryResolver};
