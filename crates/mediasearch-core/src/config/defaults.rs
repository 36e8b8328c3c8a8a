// Single source of truth for all default values.

// --- Resolver ---
pub const DEFAULT_ENTITY_SEARCH_ENDPOINT: &str = "https://www.wikidata.org/w/api.php";
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400; // 24 hours
pub const DEFAULT_CACHE_KEY_PREFIX: &str = "wbmi-mediasearch-entities";
pub const DEFAULT_MEMORY_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_QUERY_MEMO_CAPACITY: u64 = 1_000;
pub const DEFAULT_USER_AGENT: &str = concat!("mediasearch/", env!("CARGO_PKG_VERSION"));

// --- Boosts ---
pub const DEFAULT_BOOST: f64 = 1.0;
pub const DEFAULT_DECAY: f64 = 1.0;

// --- Languages ---
pub const DEFAULT_PRIMARY_LANGUAGE: &str = "en";

// --- Namespaces ---
pub const FILE_NAMESPACE: i64 = 6;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
pub const LOG_ENV_VAR: &str = "MEDIASEARCH_LOG";
