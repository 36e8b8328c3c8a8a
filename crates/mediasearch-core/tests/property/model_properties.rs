use mediasearch_core::config::BoostSettings;
use mediasearch_core::models::{EntityMatch, ParsedNode, ParsedQuery};
use proptest::prelude::*;

proptest! {
    #[test]
    fn entity_score_always_in_unit_interval(score in proptest::num::f64::ANY) {
        let m = EntityMatch::new("Q1", score);
        prop_assert!((0.0..=1.0).contains(&m.score));
    }

    #[test]
    fn caption_fallback_boosts_never_increase(
        caption in 0.0f64..10.0,
        decay in 0.0f64..=1.0,
        depth in 1usize..8,
    ) {
        let boosts = BoostSettings { caption, caption_fallback_discount: decay, ..Default::default() };
        let mut previous = boosts.caption;
        for i in 0..depth {
            let current = boosts.caption_fallback_boost(i);
            prop_assert!(current <= previous + 1e-12);
            previous = current;
        }
    }

    #[test]
    fn text_of_never_panics(raw in "\\PC{0,20}", start in 0usize..30, len in 0usize..30) {
        let query = ParsedQuery::new(raw.clone(), ParsedNode::words(start, start + len));
        if let Ok(text) = query.text_of(query.root()) {
            prop_assert!(raw.contains(text));
        }
    }
}
