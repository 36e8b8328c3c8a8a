//! Entity-search API response shape.

use mediasearch_core::errors::ResolverError;
use serde::Deserialize;

use crate::scorer::SearchHit;

#[derive(Debug, Deserialize)]
struct SearchApiResponse {
    query: Option<QueryBlock>,
}

#[derive(Debug, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    search: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    titlesnippet: String,
    #[serde(default)]
    extensiondata: Option<ExtensionData>,
}

#[derive(Debug, Deserialize)]
struct ExtensionData {
    #[serde(default)]
    wikibase: Option<WikibaseData>,
}

#[derive(Debug, Deserialize)]
struct WikibaseData {
    #[serde(default)]
    extrasnippet: Option<String>,
}

/// Decode a response body into hits, in API rank order.
///
/// A body without a `query` block (e.g. an API error document) is malformed.
pub fn parse_hits(term: &str, body: &str) -> Result<Vec<SearchHit>, ResolverError> {
    let response: SearchApiResponse =
        serde_json::from_str(body).map_err(|e| ResolverError::MalformedResponse {
            term: term.to_string(),
            reason: e.to_string(),
        })?;

    let query = response.query.ok_or_else(|| ResolverError::MalformedResponse {
        term: term.to_string(),
        reason: "missing query block".to_string(),
    })?;

    Ok(query
        .search
        .into_iter()
        .map(|raw| SearchHit {
            entity_id: raw.title,
            description_snippet: raw.snippet,
            title_snippet: raw.titlesnippet,
            alias_snippet: raw
                .extensiondata
                .and_then(|e| e.wikibase)
                .and_then(|w| w.extrasnippet)
                .unwrap_or_default(),
        })
        .collect())
}
