//! MediaSearchEngine: plans one search request.
//!
//! classify profiles → resolve entities (memoized per query and languages) → compile →
//! weight namespaces.

use std::collections::BTreeSet;

use mediasearch_core::config::defaults::FILE_NAMESPACE;
use mediasearch_core::config::MediaSearchConfig;
use mediasearch_core::errors::{ConfigError, MediaSearchResult};
use mediasearch_core::models::{CompiledQuery, LanguagePair, ParsedQuery};
use mediasearch_core::traits::{KeyValueStore, SearchTransport};
use mediasearch_resolver::{HttpTransport, InProcessStore, ResolverChain};
use tracing::{debug, info};

use crate::classifier::QueryShapeClassifier;
use crate::compiler::QueryCompiler;
use crate::extractor::TermExtractor;

/// Per-request parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    pub languages: LanguagePair,
    /// Namespaces searched. Defaults to the File namespace only.
    pub namespaces: Vec<i64>,
}

impl SearchContext {
    pub fn new(languages: LanguagePair) -> Self {
        Self {
            languages,
            namespaces: vec![FILE_NAMESPACE],
        }
    }

    pub fn with_namespaces(mut self, namespaces: Vec<i64>) -> Self {
        self.namespaces = namespaces;
        self
    }
}

/// What the router needs to run a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    /// Relevance profiles allowed to serve this query.
    pub eligible_profiles: Vec<String>,
    /// The entity-boosted query; `None` when no profile is eligible.
    pub compiled: Option<CompiledQuery>,
    /// Terms whose entity lookup failed and were compiled without boosts.
    pub degraded_terms: BTreeSet<String>,
}

impl SearchPlan {
    fn ineligible() -> Self {
        Self {
            eligible_profiles: Vec::new(),
            compiled: None,
            degraded_terms: BTreeSet::new(),
        }
    }

    pub fn is_entity_boosted(&self) -> bool {
        self.compiled.is_some()
    }
}

/// Owns the long-lived resolver chain, query memo, and compiler settings.
pub struct MediaSearchEngine<S, T> {
    chain: ResolverChain<S, T>,
    extractor: TermExtractor,
    compiler: QueryCompiler,
    classifier: QueryShapeClassifier,
    profiles: Vec<String>,
}

impl<S, T> MediaSearchEngine<S, T>
where
    S: KeyValueStore + Clone,
    T: SearchTransport + Clone,
{
    pub fn new(config: &MediaSearchConfig, store: S, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let chain = ResolverChain::new(config.resolver.clone(), store, transport);
        info!(
            profiles = ?config.profiles.candidates,
            properties = config.properties.len(),
            primary_language = %config.languages.primary,
            "media search engine initialized"
        );
        Ok(Self {
            chain,
            extractor: TermExtractor::new(config.resolver.query_memo_capacity),
            compiler: QueryCompiler::from_config(config),
            classifier: QueryShapeClassifier::new(),
            profiles: config.profiles.candidates.clone(),
        })
    }

    /// Plan `query` for the given request context.
    ///
    /// Entity resolution runs only when at least one profile is eligible, so
    /// a vetoed query never reaches the compiler. It is memoized per query
    /// instance and language pair.
    pub async fn plan(
        &self,
        query: &ParsedQuery,
        context: &SearchContext,
    ) -> MediaSearchResult<SearchPlan> {
        let eligible_profiles = self.classifier.eligible(query, &self.profiles);
        if eligible_profiles.is_empty() {
            debug!(query_id = %query.id(), "no eligible profile, skipping entity boosting");
            return Ok(SearchPlan::ineligible());
        }

        let resolver = self.chain.stack(context.languages.clone());
        let resolution = self
            .extractor
            .resolve(query, &context.languages, &resolver)
            .await?;
        let compiled = self.compiler.compile(query, &resolution.matches)?;
        let compiled = self
            .compiler
            .apply_namespace_weights(compiled, &context.namespaces);

        info!(
            query_id = %query.id(),
            profiles = eligible_profiles.len(),
            terms = resolution.matches.len(),
            degraded = resolution.degraded.len(),
            "search plan ready"
        );
        Ok(SearchPlan {
            eligible_profiles,
            compiled: Some(compiled),
            degraded_terms: resolution.degraded.clone(),
        })
    }

    pub fn chain(&self) -> &ResolverChain<S, T> {
        &self.chain
    }

    pub fn extractor(&self) -> &TermExtractor {
        &self.extractor
    }

    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }
}

impl MediaSearchEngine<InProcessStore, HttpTransport> {
    /// Engine talking to the configured entity-search endpoint, with an
    /// in-process distributed tier.
    pub fn with_http(config: &MediaSearchConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(&config.resolver)?;
        Self::new(config, InProcessStore::new(), transport)
    }
}
