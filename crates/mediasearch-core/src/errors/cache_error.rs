/// Distributed cache backend errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("cache value could not be encoded: {reason}")]
    Serialization { reason: String },
}
