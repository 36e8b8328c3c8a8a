//! Configuration for the relevance compiler and its resolver chain.
//!
//! Every section is `#[serde(default)]`, so an empty TOML document yields
//! a fully populated default config.

pub mod boost_settings;
pub mod defaults;
pub mod language_config;
pub mod observability_config;
pub mod resolver_config;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use boost_settings::BoostSettings;
pub use language_config::LanguageConfig;
pub use observability_config::ObservabilityConfig;
pub use resolver_config::ResolverConfig;

use crate::errors::ConfigError;

/// Candidate relevance profiles offered to the shape classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub candidates: Vec<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                "mediasearch_synonyms".to_string(),
                "mediasearch_logistic_regression".to_string(),
            ],
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSearchConfig {
    pub resolver: ResolverConfig,
    pub boosts: BoostSettings,
    pub languages: LanguageConfig,
    /// Searchable statement property -> weight.
    pub properties: BTreeMap<String, f64>,
    pub profiles: ProfileConfig,
    pub observability: ObservabilityConfig,
}

impl MediaSearchConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the compiler or resolver chain cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let resolver = &self.resolver;
        if resolver.endpoint.trim().is_empty() {
            return Err(invalid("resolver.endpoint", "must not be empty"));
        }
        if resolver.search_limit == 0 {
            return Err(invalid("resolver.search_limit", "must be positive"));
        }
        if resolver.request_timeout_ms == 0 {
            return Err(invalid("resolver.request_timeout_ms", "must be positive"));
        }
        if resolver.max_concurrent_requests == 0 {
            return Err(invalid("resolver.max_concurrent_requests", "must be positive"));
        }
        if resolver.memory_cache_capacity == 0 || resolver.query_memo_capacity == 0 {
            return Err(invalid("resolver", "cache capacities must be positive"));
        }

        for (name, weight) in self.boosts.weights() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(&format!("boosts.{name}"), "must be a non-negative number"));
            }
        }
        for (name, decay) in [
            ("caption_fallback_discount", self.boosts.caption_fallback_discount),
            ("statement_discount", self.boosts.statement_discount),
        ] {
            if !(0.0..=1.0).contains(&decay) {
                return Err(invalid(&format!("boosts.{name}"), "must be within [0, 1]"));
            }
        }

        for (property, weight) in &self.properties {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(invalid(
                    &format!("properties.{property}"),
                    "must be a non-negative number",
                ));
            }
        }

        if self.languages.primary.trim().is_empty() {
            return Err(invalid("languages.primary", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
