//! Entity matches and the per-query term → entity map.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A candidate knowledge-base entity for a search term.
///
/// Decoding goes through [`EntityMatch::new`], so cached values are clamped too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawEntityMatch")]
pub struct EntityMatch {
    pub entity_id: String,
    /// Match confidence, always within [0, 1].
    pub score: f64,
}

impl EntityMatch {
    /// Create a match, clamping the score into [0, 1]. NaN becomes 0.
    pub fn new(entity_id: impl Into<String>, score: f64) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        Self {
            entity_id: entity_id.into(),
            score,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntityMatch {
    entity_id: String,
    score: f64,
}

impl From<RawEntityMatch> for EntityMatch {
    fn from(raw: RawEntityMatch) -> Self {
        Self::new(raw.entity_id, raw.score)
    }
}

/// Term → ordered entity matches. Terms without matches map to an empty list.
pub type TermEntityMap = BTreeMap<String, Vec<EntityMatch>>;

/// Languages a resolver tier is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Language the query was typed in; sent to the entity-search API.
    pub input: String,
    /// Language results are displayed in.
    pub output: String,
}

impl LanguagePair {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Same language for input and output.
    pub fn uniform(language: impl Into<String>) -> Self {
        let language = language.into();
        Self {
            input: language.clone(),
            output: language,
        }
    }
}

/// Result of resolving a batch of terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Every requested term, with an empty list when nothing matched.
    pub matches: TermEntityMap,
    /// Terms whose lookup failed or timed out. Their (empty) entries must not
    /// be cached.
    pub degraded: BTreeSet<String>,
}

impl Resolution {
    /// An entry for every term, all empty.
    pub fn empty_for<'a>(terms: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            matches: terms.into_iter().map(|t| (t.clone(), Vec::new())).collect(),
            degraded: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, term: String, matches: Vec<EntityMatch>) {
        self.matches.insert(term, matches);
    }

    pub fn insert_degraded(&mut self, term: String) {
        self.matches.insert(term.clone(), Vec::new());
        self.degraded.insert(term);
    }

    /// Fold another resolution into this one. Entries from `other` win.
    pub fn merge(&mut self, other: Resolution) {
        self.matches.extend(other.matches);
        self.degraded.extend(other.degraded);
    }

    /// Give every requested term an entry, empty when it has none yet.
    pub fn ensure_terms<'a>(&mut self, terms: impl IntoIterator<Item = &'a String>) {
        for term in terms {
            self.matches.entry(term.clone()).or_default();
        }
    }

    pub fn matches_for(&self, term: &str) -> &[EntityMatch] {
        self.matches.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_degraded(&self, term: &str) -> bool {
        self.degraded.contains(term)
    }

    /// Entries safe to write to a cache: everything not degraded.
    pub fn cacheable(&self) -> impl Iterator<Item = (&String, &Vec<EntityMatch>)> {
        self.matches
            .iter()
            .filter(|(term, _)| !self.degraded.contains(*term))
    }

    pub fn into_matches(self) -> TermEntityMap {
        self.matches
    }
}
