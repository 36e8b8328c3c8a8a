//! Compiles a parsed query into a weighted bool / dis_max tree that blends
//! fulltext matching with entity-boosted statement matching.

use std::collections::BTreeMap;

use mediasearch_core::config::{BoostSettings, LanguageConfig, MediaSearchConfig};
use mediasearch_core::errors::CompileError;
use mediasearch_core::models::{
    CompiledClause, CompiledQuery, EntityMatch, MatchOperator, NodeKind, Occur, ParsedNode,
    ParsedQuery, TermEntityMap,
};

use crate::extractor::literal_term;

/// Field holding `<property>=<entity id>` keywords for each statement.
pub const STATEMENT_FIELD: &str = "statement_keywords";
pub const NAMESPACE_FIELD: &str = "namespace";

/// Compiles queries against fixed boosts, properties, and languages.
///
/// Compilation is a pure function of the query, the entity map, and this
/// compiler's settings.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    boosts: BoostSettings,
    /// Searchable statement property -> weight.
    properties: BTreeMap<String, f64>,
    languages: LanguageConfig,
}

#[derive(Clone, Copy)]
enum TextMatch {
    Words,
    Phrase,
}

impl QueryCompiler {
    pub fn new(
        boosts: BoostSettings,
        properties: BTreeMap<String, f64>,
        languages: LanguageConfig,
    ) -> Self {
        Self {
            boosts,
            properties,
            languages,
        }
    }

    pub fn from_config(config: &MediaSearchConfig) -> Self {
        Self::new(
            config.boosts.clone(),
            config.properties.clone(),
            config.languages.clone(),
        )
    }

    pub fn boosts(&self) -> &BoostSettings {
        &self.boosts
    }

    /// Compile `query`, looking up entity matches for its literal terms.
    ///
    /// Returns `MatchNone` when nothing in the query compiles, and
    /// `UnsupportedNode` when the query contains a node kind the entity
    /// boosting path cannot express.
    pub fn compile(
        &self,
        query: &ParsedQuery,
        entities: &TermEntityMap,
    ) -> Result<CompiledQuery, CompileError> {
        Ok(self
            .compile_node(query, query.root(), entities)?
            .unwrap_or(CompiledQuery::MatchNone))
    }

    /// Weight results by namespace when searching beyond the File namespace.
    ///
    /// The query becomes a required clause next to one optional namespace
    /// term per namespace, each boosted by its namespace weight.
    pub fn apply_namespace_weights(
        &self,
        query: CompiledQuery,
        namespaces: &[i64],
    ) -> CompiledQuery {
        let weighted: Vec<CompiledClause> = namespaces
            .iter()
            .filter(|ns| (self.boosts.namespace_weight(**ns) - 1.0).abs() > f64::EPSILON)
            .map(|ns| CompiledClause {
                occur: Occur::Should,
                query: CompiledQuery::Term {
                    field: NAMESPACE_FIELD.to_string(),
                    value: ns.to_string(),
                    boost: self.boosts.namespace_weight(*ns),
                },
            })
            .collect();
        if weighted.is_empty() || query.is_match_none() {
            return query;
        }

        let mut clauses = Vec::with_capacity(weighted.len() + 1);
        clauses.push(CompiledClause {
            occur: Occur::Must,
            query,
        });
        clauses.extend(weighted);
        CompiledQuery::Bool {
            clauses,
            boost: 1.0,
        }
    }

    fn compile_node(
        &self,
        query: &ParsedQuery,
        node: &ParsedNode,
        entities: &TermEntityMap,
    ) -> Result<Option<CompiledQuery>, CompileError> {
        match &node.kind {
            NodeKind::Boolean { clauses } => {
                let mut compiled = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    if let Some(sub) = self.compile_node(query, &clause.node, entities)? {
                        compiled.push(CompiledClause {
                            occur: clause.occur,
                            query: sub,
                        });
                    }
                }
                if compiled.is_empty() {
                    return Ok(None);
                }
                Ok(Some(CompiledQuery::Bool {
                    clauses: compiled,
                    boost: 1.0,
                }))
            }
            NodeKind::Words => self.compile_literal(query, node, entities, TextMatch::Words),
            NodeKind::Phrase => self.compile_literal(query, node, entities, TextMatch::Phrase),
            NodeKind::Negated { .. }
            | NodeKind::PhrasePrefix
            | NodeKind::Fuzzy
            | NodeKind::Prefix
            | NodeKind::Wildcard => Err(CompileError::UnsupportedNode {
                kind: node.kind.name(),
                start: node.start,
                end: node.end,
            }),
            // Handled upstream.
            NodeKind::Empty | NodeKind::KeywordFeature | NodeKind::NamespaceHeader => Ok(None),
        }
    }

    fn compile_literal(
        &self,
        query: &ParsedQuery,
        node: &ParsedNode,
        entities: &TermEntityMap,
        mode: TextMatch,
    ) -> Result<Option<CompiledQuery>, CompileError> {
        let Some(term) = literal_term(query, node)? else {
            return Ok(None);
        };

        let mut clauses: Vec<CompiledClause> = self
            .text_fields()
            .into_iter()
            .filter(|(_, boost)| *boost > 0.0)
            .map(|(field, boost)| CompiledClause {
                occur: Occur::Should,
                query: text_query(field, term, boost, mode),
            })
            .collect();

        let matches = entities.get(term).map(Vec::as_slice).unwrap_or(&[]);
        if let Some(statements) = self.statement_query(matches) {
            clauses.push(CompiledClause {
                occur: Occur::Should,
                query: statements,
            });
        }

        if clauses.is_empty() {
            return Ok(None);
        }
        Ok(Some(CompiledQuery::Bool {
            clauses,
            boost: 1.0,
        }))
    }

    /// Every text field a literal term is matched against, with its boost.
    ///
    /// Captions for the primary language, then each fallback with a decaying
    /// boost, then the generic fulltext fields.
    fn text_fields(&self) -> Vec<(String, f64)> {
        let primary = self.languages.primary.as_str();
        let mut fields = Vec::new();

        let caption = format!("descriptions.{primary}");
        self.push_analyzed(&mut fields, &caption, primary, self.boosts.caption);
        for (i, lang) in self.languages.fallback_chain().into_iter().enumerate() {
            let boost = self.boosts.caption_fallback_boost(i);
            self.push_analyzed(&mut fields, &format!("descriptions.{lang}"), lang, boost);
        }
        for (field, boost) in self.boosts.fulltext_fields() {
            self.push_analyzed(&mut fields, field, primary, boost);
        }
        fields
    }

    /// The stemmed field when `language` is stemmed, and always `.plain`.
    fn push_analyzed(
        &self,
        fields: &mut Vec<(String, f64)>,
        field: &str,
        language: &str,
        boost: f64,
    ) {
        if self.languages.stemming_enabled(language) {
            fields.push((field.to_string(), boost));
        }
        fields.push((format!("{field}.plain"), boost));
    }

    /// Best-of statement clauses over every (matched entity, property) pair.
    fn statement_query(&self, matches: &[EntityMatch]) -> Option<CompiledQuery> {
        let mut queries = Vec::with_capacity(matches.len() * self.properties.len());
        for (rank, entity) in matches.iter().enumerate() {
            let discount = self.boosts.statement_rank_discount(rank);
            for (property, weight) in &self.properties {
                queries.push(CompiledQuery::Term {
                    field: STATEMENT_FIELD.to_string(),
                    value: format!("{property}={}", entity.entity_id),
                    boost: self.boosts.statement * weight * entity.score * discount,
                });
            }
        }
        if queries.is_empty() {
            return None;
        }
        Some(CompiledQuery::DisMax {
            queries,
            tie_breaker: 0.0,
            boost: 1.0,
        })
    }
}

fn text_query(field: String, term: &str, boost: f64, mode: TextMatch) -> CompiledQuery {
    match mode {
        TextMatch::Words => CompiledQuery::Match {
            field,
            query: term.to_string(),
            operator: MatchOperator::And,
            boost,
        },
        TextMatch::Phrase => CompiledQuery::MatchPhrase {
            field,
            query: term.to_string(),
            boost,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiler() -> QueryCompiler {
        let properties = BTreeMap::from([("P180".to_string(), 1.0), ("P1740".to_string(), 0.5)]);
        QueryCompiler::new(BoostSettings::default(), properties, LanguageConfig::default())
    }

    fn entities(term: &str, matches: &[(&str, f64)]) -> TermEntityMap {
        let list = matches
            .iter()
            .map(|(id, score)| EntityMatch::new(*id, *score))
            .collect();
        TermEntityMap::from([(term.to_string(), list)])
    }

    fn statement_terms(query: &CompiledQuery) -> Vec<(String, f64)> {
        query
            .leaves()
            .into_iter()
            .filter_map(|leaf| match leaf {
                CompiledQuery::Term { field, value, boost } if field == STATEMENT_FIELD => {
                    Some((value.clone(), *boost))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_query_matches_nothing() {
        let q = ParsedQuery::new("", ParsedNode::empty());
        let compiled = compiler().compile(&q, &TermEntityMap::new()).unwrap();
        assert!(compiled.is_match_none());
    }

    #[test]
    fn boolean_of_empty_children_is_not_emitted() {
        let root = ParsedNode::all_of(
            Occur::Must,
            vec![
                ParsedNode::empty(),
                ParsedNode::new(0, 0, NodeKind::NamespaceHeader),
                ParsedNode::all_of(Occur::Should, vec![ParsedNode::empty()]),
            ],
        );
        let q = ParsedQuery::new("", root);
        assert_eq!(
            compiler().compile(&q, &TermEntityMap::new()).unwrap(),
            CompiledQuery::MatchNone
        );
    }

    #[test]
    fn unsupported_node_is_rejected() {
        let q = ParsedQuery::new(
            "cat dog*",
            ParsedNode::all_of(
                Occur::Must,
                vec![ParsedNode::words(0, 3), ParsedNode::new(4, 8, NodeKind::Wildcard)],
            ),
        );
        let err = compiler().compile(&q, &TermEntityMap::new()).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnsupportedNode {
                kind: "wildcard",
                start: 4,
                end: 8
            }
        );
    }

    #[test]
    fn negated_node_is_rejected() {
        let q = ParsedQuery::new("-cat", ParsedNode::negated(0, 4, ParsedNode::words(1, 4)));
        assert!(matches!(
            compiler().compile(&q, &TermEntityMap::new()),
            Err(CompileError::UnsupportedNode { kind: "negated", .. })
        ));
    }

    #[test]
    fn unmatched_term_gets_text_clauses_only() {
        let q = ParsedQuery::new("cat", ParsedNode::words(0, 3));
        let compiled = compiler().compile(&q, &TermEntityMap::new()).unwrap();
        assert!(statement_terms(&compiled).is_empty());
        assert!(compiled.leaves().iter().all(|leaf| matches!(
            leaf,
            CompiledQuery::Match { query, operator: MatchOperator::And, .. } if query == "cat"
        )));
    }

    #[test]
    fn matched_term_adds_best_of_statement_clause() {
        let q = ParsedQuery::new("cat", ParsedNode::words(0, 3));
        let map = entities("cat", &[("Q146", 1.0), ("Q5705", 0.4)]);
        let compiled = compiler().compile(&q, &map).unwrap();

        let CompiledQuery::Bool { clauses, .. } = &compiled else {
            panic!("expected bool, got {compiled:?}");
        };
        let dis_max = clauses
            .iter()
            .find(|c| matches!(c.query, CompiledQuery::DisMax { .. }))
            .expect("statement dis_max clause");
        assert_eq!(dis_max.occur, Occur::Should);
        match &dis_max.query {
            CompiledQuery::DisMax { queries, tie_breaker, .. } => {
                assert_eq!(queries.len(), 4);
                assert_eq!(*tie_breaker, 0.0);
            }
            other => panic!("expected dis_max, got {other:?}"),
        }

        let terms = statement_terms(&compiled);
        assert!(terms.contains(&("P180=Q146".to_string(), 1.0)));
        assert!(terms.contains(&("P1740=Q146".to_string(), 0.5)));
        assert!(terms.contains(&("P180=Q5705".to_string(), 0.4)));
        assert!(terms.contains(&("P1740=Q5705".to_string(), 0.2)));
    }

    #[test]
    fn statement_boost_decays_with_entity_rank() {
        let boosts = BoostSettings {
            statement: 2.0,
            statement_discount: 0.5,
            ..Default::default()
        };
        let properties = BTreeMap::from([("P180".to_string(), 1.0)]);
        let compiler = QueryCompiler::new(boosts, properties, LanguageConfig::default());
        let q = ParsedQuery::new("cat", ParsedNode::words(0, 3));
        let map = entities("cat", &[("Q1", 1.0), ("Q2", 1.0), ("Q3", 1.0)]);

        let boosts: Vec<f64> = statement_terms(&compiler.compile(&q, &map).unwrap())
            .into_iter()
            .map(|(_, b)| b)
            .collect();
        assert_eq!(boosts, vec![2.0, 1.0, 0.5]);
    }

    #[test]
    fn caption_boost_decays_across_fallbacks() {
        let boosts = BoostSettings {
            caption: 3.0,
            caption_fallback_discount: 0.9,
            ..Default::default()
        };
        let languages = LanguageConfig {
            primary: "en".into(),
            fallbacks: vec!["de".into(), "fr".into()],
            stemming: BTreeMap::new(),
        };
        let compiler = QueryCompiler::new(boosts, BTreeMap::new(), languages);
        let q = ParsedQuery::new("cat", ParsedNode::words(0, 3));
        let compiled = compiler.compile(&q, &TermEntityMap::new()).unwrap();

        let caption = |lang: &str| {
            compiled
                .leaves()
                .into_iter()
                .find_map(|leaf| match leaf {
                    CompiledQuery::Match { field, boost, .. }
                        if *field == format!("descriptions.{lang}.plain") =>
                    {
                        Some(*boost)
                    }
                    _ => None,
                })
                .unwrap()
        };
        assert!((caption("en") - 3.0).abs() < 1e-9);
        assert!((caption("de") - 2.7).abs() < 1e-9);
        assert!((caption("fr") - 2.43).abs() < 1e-9);
    }

    #[test]
    fn stemmed_languages_get_both_fields() {
        let languages = LanguageConfig {
            primary: "en".into(),
            fallbacks: vec!["de".into()],
            stemming: BTreeMap::from([("en".to_string(), true)]),
        };
        let compiler = QueryCompiler::new(BoostSettings::default(), BTreeMap::new(), languages);
        let fields: Vec<String> = compiler.text_fields().into_iter().map(|(f, _)| f).collect();

        assert!(fields.contains(&"descriptions.en".to_string()));
        assert!(fields.contains(&"descriptions.en.plain".to_string()));
        assert!(!fields.contains(&"descriptions.de".to_string()));
        assert!(fields.contains(&"descriptions.de.plain".to_string()));
        assert!(fields.contains(&"title".to_string()));
        assert!(fields.contains(&"redirect.title.plain".to_string()));
        assert!(fields.contains(&"text.plain".to_string()));
    }

    #[test]
    fn zero_boost_fields_are_omitted() {
        let boosts = BoostSettings {
            suggest: 0.0,
            ..Default::default()
        };
        let compiler = QueryCompiler::new(boosts, BTreeMap::new(), LanguageConfig::default());
        let q = ParsedQuery::new("cat", ParsedNode::words(0, 3));
        let compiled = compiler.compile(&q, &TermEntityMap::new()).unwrap();
        assert!(!compiled.leaves().iter().any(|leaf| matches!(
            leaf,
            CompiledQuery::Match { field, .. } if field == "suggest.plain"
        )));
    }

    #[test]
    fn phrase_compiles_to_phrase_matches() {
        let q = ParsedQuery::new(r#""black cat""#, ParsedNode::phrase(0, 11));
        let map = entities("black cat", &[("Q1192", 0.8)]);
        let compiled = compiler().compile(&q, &map).unwrap();

        assert!(compiled.leaves().iter().any(|leaf| matches!(
            leaf,
            CompiledQuery::MatchPhrase { query, .. } if query == "black cat"
        )));
        assert!(statement_terms(&compiled).contains(&("P180=Q1192".to_string(), 0.8)));
    }

    #[test]
    fn boolean_preserves_occur() {
        let root = ParsedNode::boolean(
            0,
            11,
            vec![
                mediasearch_core::models::BooleanClause {
                    occur: Occur::Must,
                    node: ParsedNode::words(0, 3),
                },
                mediasearch_core::models::BooleanClause {
                    occur: Occur::MustNot,
                    node: ParsedNode::words(4, 7),
                },
                mediasearch_core::models::BooleanClause {
                    occur: Occur::Should,
                    node: ParsedNode::empty(),
                },
            ],
        );
        let q = ParsedQuery::new("cat dog owl", root);
        let compiled = compiler().compile(&q, &TermEntityMap::new()).unwrap();
        let CompiledQuery::Bool { clauses, .. } = compiled else {
            panic!("expected bool");
        };
        let occurs: Vec<Occur> = clauses.iter().map(|c| c.occur).collect();
        assert_eq!(occurs, vec![Occur::Must, Occur::MustNot]);
    }

    #[test]
    fn namespace_weights_wrap_the_query() {
        let boosts = BoostSettings {
            non_file_namespace: 0.2,
            ..Default::default()
        };
        let compiler = QueryCompiler::new(boosts, BTreeMap::new(), LanguageConfig::default());
        let q = ParsedQuery::new("cat", ParsedNode::words(0, 3));
        let compiled = compiler.compile(&q, &TermEntityMap::new()).unwrap();

        let files_only = compiler.apply_namespace_weights(compiled.clone(), &[6]);
        assert_eq!(files_only, compiled);

        let wrapped = compiler.apply_namespace_weights(compiled.clone(), &[6, 0]);
        let CompiledQuery::Bool { clauses, .. } = wrapped else {
            panic!("expected bool");
        };
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].occur, Occur::Must);
        assert_eq!(clauses[0].query, compiled);
        assert_eq!(
            clauses[1].query,
            CompiledQuery::Term {
                field: NAMESPACE_FIELD.into(),
                value: "0".into(),
                boost: 0.2
            }
        );
    }
}
