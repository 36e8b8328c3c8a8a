//! Literal term extraction and per-query entity resolution.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use mediasearch_core::errors::CompileError;
use mediasearch_core::events;
use mediasearch_core::models::{
    LanguagePair, NodeKind, ParsedNode, ParsedQuery, QueryId, Resolution,
};
use mediasearch_core::traits::EntityResolver;
use moka::future::Cache;
use tracing::debug;

/// Memo entries outlive a request only briefly; an idle entry is dropped.
const MEMO_IDLE: Duration = Duration::from_secs(600);

/// The literal term a Words or Phrase node contributes, if any.
///
/// Phrase quotes and surrounding whitespace are trimmed. Shared with the
/// compiler so both walks agree on the map keys.
pub(crate) fn literal_term<'q>(
    query: &'q ParsedQuery,
    node: &ParsedNode,
) -> Result<Option<&'q str>, CompileError> {
    let text = query.text_of(node)?.trim();
    let text = match node.kind {
        NodeKind::Phrase => text.trim_matches('"').trim(),
        _ => text,
    };
    Ok((!text.is_empty()).then_some(text))
}

/// Collects literal terms from a query and memoizes their entity resolution
/// per query instance and language pair.
///
/// Only Words and Phrase nodes contribute terms. Fuzzy, Prefix and Wildcard
/// nodes are not extracted, so they never receive entity boosts.
pub struct TermExtractor {
    memo: Cache<(QueryId, LanguagePair), Arc<Resolution>>,
}

impl TermExtractor {
    /// Create an extractor remembering at most `capacity` (query, languages)
    /// resolutions.
    pub fn new(capacity: u64) -> Self {
        let memo = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(MEMO_IDLE)
            .build();
        Self { memo }
    }

    /// Distinct literal terms, depth first.
    pub fn extract(&self, query: &ParsedQuery) -> Result<BTreeSet<String>, CompileError> {
        let mut terms = BTreeSet::new();
        collect(query, query.root(), &mut terms)?;
        Ok(terms)
    }

    /// Resolve the query's terms through `resolver`, which must be bound to
    /// `languages`, at most once per (query, languages).
    ///
    /// Concurrent callers for the same key share a single resolution.
    pub async fn resolve<R: EntityResolver>(
        &self,
        query: &ParsedQuery,
        languages: &LanguagePair,
        resolver: &R,
    ) -> Result<Arc<Resolution>, CompileError> {
        let id = query.id();
        let key = (id, languages.clone());
        if let Some(resolution) = self.memo.get(&key).await {
            debug!(query_id = %id, language = %languages.input, "entity resolution memo hit");
            return Ok(resolution);
        }

        let terms: Vec<String> = self.extract(query)?.into_iter().collect();
        let resolution = self
            .memo
            .get_with(key, async move {
                let resolution = resolver.resolve(&terms).await;
                let matched = resolution.matches.values().filter(|m| !m.is_empty()).count();
                events::entities_resolved(terms.len(), matched, resolution.degraded.len());
                Arc::new(resolution)
            })
            .await;
        Ok(resolution)
    }

    /// Drop the memoized resolution for a finished query.
    pub async fn forget(&self, query: &ParsedQuery, languages: &LanguagePair) {
        self.memo.invalidate(&(query.id(), languages.clone())).await;
    }
}

fn collect(
    query: &ParsedQuery,
    node: &ParsedNode,
    terms: &mut BTreeSet<String>,
) -> Result<(), CompileError> {
    match &node.kind {
        NodeKind::Words | NodeKind::Phrase => {
            if let Some(term) = literal_term(query, node)? {
                terms.insert(term.to_string());
            }
        }
        NodeKind::Boolean { clauses } => {
            for clause in clauses {
                collect(query, &clause.node, terms)?;
            }
        }
        // Negated subtrees never reach the compiler.
        NodeKind::Negated { .. }
        | NodeKind::PhrasePrefix
        | NodeKind::Fuzzy
        | NodeKind::Prefix
        | NodeKind::Wildcard
        | NodeKind::Empty
        | NodeKind::KeywordFeature
        | NodeKind::NamespaceHeader => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediasearch_core::models::Occur;
    use test_fixtures::StaticResolver;

    fn en() -> LanguagePair {
        LanguagePair::uniform("en")
    }

    fn query(raw: &str, nodes: Vec<ParsedNode>) -> ParsedQuery {
        ParsedQuery::new(raw, ParsedNode::all_of(Occur::Must, nodes))
    }

    #[test]
    fn extracts_words_and_phrases_only() {
        let q = query(
            r#"cat dog* "black cat""#,
            vec![
                ParsedNode::words(0, 3),
                ParsedNode::new(4, 8, NodeKind::Wildcard),
                ParsedNode::phrase(9, 20),
            ],
        );
        let terms = TermExtractor::new(10).extract(&q).unwrap();
        assert_eq!(
            terms.into_iter().collect::<Vec<_>>(),
            vec!["black cat".to_string(), "cat".to_string()]
        );
    }

    #[test]
    fn duplicate_terms_collapse() {
        let q = query(
            "cat cat",
            vec![ParsedNode::words(0, 3), ParsedNode::words(4, 7)],
        );
        assert_eq!(TermExtractor::new(10).extract(&q).unwrap().len(), 1);
    }

    #[test]
    fn nested_booleans_are_walked() {
        let inner = ParsedNode::all_of(
            Occur::Should,
            vec![ParsedNode::words(4, 7), ParsedNode::words(8, 11)],
        );
        let q = query("cat dog owl", vec![ParsedNode::words(0, 3), inner]);
        assert_eq!(TermExtractor::new(10).extract(&q).unwrap().len(), 3);
    }

    #[test]
    fn empty_phrase_is_skipped() {
        let q = ParsedQuery::new(r#""""#, ParsedNode::phrase(0, 2));
        assert!(TermExtractor::new(10).extract(&q).unwrap().is_empty());
    }

    #[test]
    fn bad_offsets_are_reported() {
        let q = ParsedQuery::new("cat", ParsedNode::words(0, 12));
        assert!(matches!(
            TermExtractor::new(10).extract(&q),
            Err(CompileError::InvalidOffsets { .. })
        ));
    }

    #[tokio::test]
    async fn resolution_is_memoized_per_query_instance() {
        let resolver = StaticResolver::new().with("cat", &[("Q146", 1.0)]);
        let extractor = TermExtractor::new(10);

        let first = ParsedQuery::new("cat", ParsedNode::words(0, 3));
        let a = extractor.resolve(&first, &en(), &resolver).await.unwrap();
        let b = extractor.resolve(&first, &en(), &resolver).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(resolver.calls().len(), 1);

        // Same text, different instance.
        let second = ParsedQuery::new("cat", ParsedNode::words(0, 3));
        extractor.resolve(&second, &en(), &resolver).await.unwrap();
        assert_eq!(resolver.calls().len(), 2);
        assert_eq!(a.matches_for("cat")[0].entity_id, "Q146");
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_resolution() {
        let resolver = StaticResolver::new();
        let extractor = TermExtractor::new(10);
        let q = ParsedQuery::new("cat", ParsedNode::words(0, 3));

        let languages = en();
        let (a, b) = tokio::join!(
            extractor.resolve(&q, &languages, &resolver),
            extractor.resolve(&q, &languages, &resolver)
        );
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(resolver.calls().len(), 1);
    }

    #[tokio::test]
    async fn memo_is_scoped_by_language_pair() {
        let resolver = StaticResolver::new();
        let extractor = TermExtractor::new(10);
        let q = ParsedQuery::new("cat", ParsedNode::words(0, 3));

        extractor.resolve(&q, &en(), &resolver).await.unwrap();
        extractor
            .resolve(&q, &LanguagePair::uniform("fr"), &resolver)
            .await
            .unwrap();
        extractor.resolve(&q, &en(), &resolver).await.unwrap();
        assert_eq!(resolver.calls().len(), 2);
    }

    #[tokio::test]
    async fn forget_drops_the_memo() {
        let resolver = StaticResolver::new();
        let extractor = TermExtractor::new(10);
        let q = ParsedQuery::new("cat", ParsedNode::words(0, 3));

        extractor.resolve(&q, &en(), &resolver).await.unwrap();
        extractor.forget(&q, &en()).await;
        extractor.resolve(&q, &en(), &resolver).await.unwrap();
        assert_eq!(resolver.calls().len(), 2);
    }
}
