use std::future::Future;

use crate::errors::ResolverError;

/// One entity-search lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySearchRequest {
    pub term: String,
    /// Sent as `uselang`.
    pub language: String,
    /// Sent as `srlimit`.
    pub limit: u32,
}

impl EntitySearchRequest {
    /// Query-string parameters for the MediaWiki search API.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("format", "json".to_string()),
            ("action", "query".to_string()),
            ("list", "search".to_string()),
            ("srsearch", self.term.clone()),
            ("srnamespace", "0".to_string()),
            ("srlimit", self.limit.to_string()),
            ("srqiprofile", "wikibase".to_string()),
            ("srprop", "snippet|titlesnippet|extensiondata".to_string()),
            ("uselang", self.language.clone()),
        ]
    }
}

/// Performs the HTTP GET against the entity-search endpoint and returns the
/// raw response body.
pub trait SearchTransport: Send + Sync {
    fn fetch(
        &self,
        request: &EntitySearchRequest,
    ) -> impl Future<Output = Result<String, ResolverError>> + Send;
}

impl<T: SearchTransport> SearchTransport for std::sync::Arc<T> {
    fn fetch(
        &self,
        request: &EntitySearchRequest,
    ) -> impl Future<Output = Result<String, ResolverError>> + Send {
        (**self).fetch(request)
    }
}
