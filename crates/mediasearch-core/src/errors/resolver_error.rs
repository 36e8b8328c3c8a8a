/// Per-term entity lookup errors.
///
/// These never escape `EntityResolver::resolve`: the remote tier turns each
/// one into an empty, degraded entry for the term that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    #[error("transport failed for term {term:?}: {reason}")]
    Transport { term: String, reason: String },

    #[error("lookup for term {term:?} timed out after {timeout_ms}ms")]
    Timeout { term: String, timeout_ms: u64 },

    #[error("entity search returned HTTP {status} for term {term:?}")]
    Status { term: String, status: u16 },

    #[error("malformed entity search response for term {term:?}: {reason}")]
    MalformedResponse { term: String, reason: String },
}

impl ResolverError {
    /// The term whose lookup failed.
    pub fn term(&self) -> &str {
        match self {
            Self::Transport { term, .. }
            | Self::Timeout { term, .. }
            | Self::Status { term, .. }
            | Self::MalformedResponse { term, .. } => term,
        }
    }
}
