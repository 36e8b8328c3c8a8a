use mediasearch_resolver::scorer::{score, snippet_coverage, SearchHit};
use proptest::prelude::*;

fn snippet() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zé ]{0,8}",
            "[a-zé]{1,6}".prop_map(|w| format!("<span class=\"searchmatch\">{w}</span>")),
        ],
        0..5,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn coverage_is_within_unit_interval(s in snippet()) {
        let c = snippet_coverage(&s);
        prop_assert!((0.0..=1.0).contains(&c), "coverage {} for {:?}", c, s);
    }

    #[test]
    fn score_is_within_unit_interval(
        description in snippet(),
        title in snippet(),
        alias in snippet(),
        position in 0usize..500,
    ) {
        let hit = SearchHit {
            entity_id: "Q1".into(),
            description_snippet: description,
            title_snippet: title,
            alias_snippet: alias,
        };
        let m = score(&hit, position);
        prop_assert!((0.0..=1.0).contains(&m.score));
    }

    #[test]
    fn earlier_rank_never_scores_lower(title in snippet(), position in 0usize..100) {
        let hit = SearchHit { entity_id: "Q1".into(), title_snippet: title, ..Default::default() };
        prop_assert!(score(&hit, position).score >= score(&hit, position + 1).score);
    }
}
