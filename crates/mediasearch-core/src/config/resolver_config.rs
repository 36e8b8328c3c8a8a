use serde::{Deserialize, Serialize};

use super::defaults;

/// Entity resolver chain configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Entity-search API endpoint (MediaWiki `api.php`).
    pub endpoint: String,
    /// Maximum hits requested per term (`srlimit`).
    pub search_limit: u32,
    /// Per-term request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Upper bound on in-flight remote requests for one batch.
    pub max_concurrent_requests: usize,
    /// TTL of distributed cache records in seconds.
    pub cache_ttl_secs: u64,
    /// Prefix of distributed cache keys.
    pub cache_key_prefix: String,
    /// Entry bound of the process-local memory cache.
    pub memory_cache_capacity: u64,
    /// Entry bound of the per-query term/entity memo.
    pub query_memo_capacity: u64,
    /// User-Agent header sent to the entity-search API.
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_ENTITY_SEARCH_ENDPOINT.to_string(),
            search_limit: defaults::DEFAULT_SEARCH_LIMIT,
            request_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
            max_concurrent_requests: defaults::DEFAULT_MAX_CONCURRENT_REQUESTS,
            cache_ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
            cache_key_prefix: defaults::DEFAULT_CACHE_KEY_PREFIX.to_string(),
            memory_cache_capacity: defaults::DEFAULT_MEMORY_CACHE_CAPACITY,
            query_memo_capacity: defaults::DEFAULT_QUERY_MEMO_CAPACITY,
            user_agent: defaults::DEFAULT_USER_AGENT.to_string(),
        }
    }
}
