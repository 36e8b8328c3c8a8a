//! Entity match confidence from a raw search hit.
//!
//! The entity-search API exposes no numeric relevance, so confidence is the
//! mean of two bounded signals: how much of the best snippet the highlighted
//! match covers, and the reciprocal of the hit's rank.

use std::sync::LazyLock;

use mediasearch_core::models::EntityMatch;
use regex::Regex;

static HIGHLIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="searchmatch">(.*?)</span>"#).expect("highlight pattern is valid")
});

/// One hit returned by the entity-search API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHit {
    pub entity_id: String,
    pub description_snippet: String,
    pub title_snippet: String,
    pub alias_snippet: String,
}

/// Score a hit at the given 0-indexed rank position.
pub fn score(hit: &SearchHit, position: usize) -> EntityMatch {
    let term_frequency = [
        &hit.description_snippet,
        &hit.title_snippet,
        &hit.alias_snippet,
    ]
    .into_iter()
    .map(|snippet| snippet_coverage(snippet))
    .fold(0.0, f64::max);

    let relative_order = 1.0 / (position as f64 + 1.0);

    EntityMatch::new(hit.entity_id.clone(), (relative_order + term_frequency) / 2.0)
}

/// Share of the snippet's visible text that is highlighted, in [0, 1].
pub fn snippet_coverage(snippet: &str) -> f64 {
    let source = HIGHLIGHT.replace_all(snippet, "$1");
    let source_len = source.chars().count();
    if source_len == 0 {
        return 0.0;
    }
    let omitted_len = HIGHLIGHT.replace_all(snippet, "").chars().count();
    1.0 - omitted_len as f64 / source_len as f64
}
