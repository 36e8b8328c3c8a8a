use serde::{Deserialize, Serialize};

use super::defaults;

/// Named boost table applied by the query compiler.
///
/// Every weight and both decay factors default to 1.0 (neutral).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostSettings {
    pub statement: f64,
    pub caption: f64,
    pub title: f64,
    pub category: f64,
    pub heading: f64,
    pub auxiliary_text: f64,
    pub file_text: f64,
    pub redirect_title: f64,
    pub suggest: f64,
    pub text: f64,
    pub non_file_namespace: f64,
    /// Geometric decay applied per caption fallback language.
    pub caption_fallback_discount: f64,
    /// Geometric decay applied per entity rank within one term's matches.
    pub statement_discount: f64,
}

impl Default for BoostSettings {
    fn default() -> Self {
        Self {
            statement: defaults::DEFAULT_BOOST,
            caption: defaults::DEFAULT_BOOST,
            title: defaults::DEFAULT_BOOST,
            category: defaults::DEFAULT_BOOST,
            heading: defaults::DEFAULT_BOOST,
            auxiliary_text: defaults::DEFAULT_BOOST,
            file_text: defaults::DEFAULT_BOOST,
            redirect_title: defaults::DEFAULT_BOOST,
            suggest: defaults::DEFAULT_BOOST,
            text: defaults::DEFAULT_BOOST,
            non_file_namespace: defaults::DEFAULT_BOOST,
            caption_fallback_discount: defaults::DEFAULT_DECAY,
            statement_discount: defaults::DEFAULT_DECAY,
        }
    }
}

impl BoostSettings {
    /// Caption boost for the i-th fallback language (0-indexed, primary excluded).
    pub fn caption_fallback_boost(&self, fallback_index: usize) -> f64 {
        self.caption * self.caption_fallback_discount.powi(fallback_index as i32 + 1)
    }

    /// Discount factor for the k-th entity matched by a term.
    pub fn statement_rank_discount(&self, rank: usize) -> f64 {
        self.statement_discount.powi(rank as i32)
    }

    /// Weight for documents in the given namespace. The File namespace is neutral.
    pub fn namespace_weight(&self, namespace: i64) -> f64 {
        if namespace == defaults::FILE_NAMESPACE {
            1.0
        } else {
            self.non_file_namespace
        }
    }

    /// Generic fulltext fields paired with their configured boost.
    pub fn fulltext_fields(&self) -> [(&'static str, f64); 8] {
        [
            ("title", self.title),
            ("category", self.category),
            ("heading", self.heading),
            ("auxiliary_text", self.auxiliary_text),
            ("file_text", self.file_text),
            ("redirect.title", self.redirect_title),
            ("suggest", self.suggest),
            ("text", self.text),
        ]
    }

    pub(crate) fn weights(&self) -> [(&'static str, f64); 11] {
        [
            ("statement", self.statement),
            ("caption", self.caption),
            ("title", self.title),
            ("category", self.category),
            ("heading", self.heading),
            ("auxiliary_text", self.auxiliary_text),
            ("file_text", self.file_text),
            ("redirect_title", self.redirect_title),
            ("suggest", self.suggest),
            ("text", self.text),
            ("non_file_namespace", self.non_file_namespace),
        ]
    }
}
