use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Content language, fallback chain, and per-language stemming flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub primary: String,
    /// Ordered fallback languages, most preferred first.
    pub fallbacks: Vec<String>,
    /// Languages whose fields carry a stemmed analyzer. Missing means false.
    pub stemming: BTreeMap<String, bool>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            primary: defaults::DEFAULT_PRIMARY_LANGUAGE.to_string(),
            fallbacks: Vec::new(),
            stemming: BTreeMap::new(),
        }
    }
}

impl LanguageConfig {
    /// Fallback languages with the primary and duplicates removed, order kept.
    pub fn fallback_chain(&self) -> Vec<&str> {
        let mut seen = vec![self.primary.as_str()];
        let mut chain = Vec::with_capacity(self.fallbacks.len());
        for lang in &self.fallbacks {
            if !seen.contains(&lang.as_str()) {
                seen.push(lang);
                chain.push(lang.as_str());
            }
        }
        chain
    }

    pub fn stemming_enabled(&self, language: &str) -> bool {
        self.stemming.get(language).copied().unwrap_or(false)
    }
}
