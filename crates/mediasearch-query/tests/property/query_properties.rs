use std::collections::BTreeMap;

use mediasearch_core::config::{BoostSettings, LanguageConfig};
use mediasearch_core::models::{
    CompiledQuery, NodeKind, Occur, ParsedNode, ParsedQuery, TermEntityMap,
};
use mediasearch_query::{QueryCompiler, QueryShapeClassifier};
use proptest::prelude::*;

/// Build a flat query from `(token, kind)` pairs, offsets computed from the text.
fn flat_query(tokens: &[(&str, NodeKind)]) -> ParsedQuery {
    let mut raw = String::new();
    let mut nodes = Vec::with_capacity(tokens.len());
    for (token, kind) in tokens {
        if !raw.is_empty() {
            raw.push(' ');
        }
        let start = raw.chars().count();
        raw.push_str(token);
        nodes.push(ParsedNode::new(start, raw.chars().count(), kind.clone()));
    }
    ParsedQuery::new(raw, ParsedNode::all_of(Occur::Must, nodes))
}

fn unsupported_kind() -> impl Strategy<Value = NodeKind> {
    prop_oneof![
        Just(NodeKind::PhrasePrefix),
        Just(NodeKind::Fuzzy),
        Just(NodeKind::Prefix),
        Just(NodeKind::Wildcard),
    ]
}

fn candidates() -> Vec<String> {
    vec!["mediasearch_synonyms".into(), "mediasearch_logistic_regression".into()]
}

proptest! {
    #[test]
    fn words_only_queries_keep_all_profiles(count in 1usize..40) {
        let tokens: Vec<(&str, NodeKind)> = (0..count).map(|_| ("cat", NodeKind::Words)).collect();
        let query = flat_query(&tokens);
        prop_assert_eq!(QueryShapeClassifier::new().eligible(&query, &candidates()), candidates());
    }

    #[test]
    fn one_unsupported_node_vetoes_everything(
        count in 1usize..40,
        position in 0usize..40,
        kind in unsupported_kind(),
    ) {
        let mut tokens: Vec<(&str, NodeKind)> = (0..count).map(|_| ("cat", NodeKind::Words)).collect();
        tokens.insert(position.min(count), ("ca*", kind));
        let query = flat_query(&tokens);
        prop_assert!(QueryShapeClassifier::new().eligible(&query, &candidates()).is_empty());
    }

    #[test]
    fn caption_boosts_strictly_decrease(
        caption in 0.1f64..10.0,
        discount in 0.05f64..0.95,
        fallbacks in 1usize..6,
    ) {
        let boosts = BoostSettings {
            caption,
            caption_fallback_discount: discount,
            ..Default::default()
        };
        let languages = LanguageConfig {
            primary: "en".into(),
            fallbacks: (0..fallbacks).map(|i| format!("l{i}")).collect(),
            stemming: BTreeMap::new(),
        };
        let compiler = QueryCompiler::new(boosts, BTreeMap::new(), languages);
        let query = flat_query(&[("cat", NodeKind::Words)]);
        let compiled = compiler.compile(&query, &TermEntityMap::new()).unwrap();

        let caption_boosts: Vec<f64> = compiled
            .leaves()
            .into_iter()
            .filter_map(|leaf| match leaf {
                CompiledQuery::Match { field, boost, .. } if field.starts_with("descriptions.") => Some(*boost),
                _ => None,
            })
            .collect();
        prop_assert_eq!(caption_boosts.len(), fallbacks + 1);
        prop_assert!(caption_boosts.windows(2).all(|w| w[0] > w[1]), "{:?}", caption_boosts);
    }
}
