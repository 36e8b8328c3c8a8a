//! Weighted boolean / dis_max query tree handed to the execution engine.

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::ast::Occur;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOperator {
    And,
    Or,
}

impl MatchOperator {
    fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// One clause of a compiled boolean query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledClause {
    pub occur: Occur,
    pub query: CompiledQuery,
}

/// Compiled query tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompiledQuery {
    /// Matches no documents. The result of compiling an empty query.
    MatchNone,
    Match {
        field: String,
        query: String,
        operator: MatchOperator,
        boost: f64,
    },
    MatchPhrase {
        field: String,
        query: String,
        boost: f64,
    },
    Term {
        field: String,
        value: String,
        boost: f64,
    },
    Bool {
        clauses: Vec<CompiledClause>,
        boost: f64,
    },
    /// Scores as the single best-matching sub-query.
    DisMax {
        queries: Vec<CompiledQuery>,
        tie_breaker: f64,
        boost: f64,
    },
}

impl CompiledQuery {
    pub fn is_match_none(&self) -> bool {
        matches!(self, Self::MatchNone)
    }

    pub fn boost(&self) -> f64 {
        match self {
            Self::MatchNone => 1.0,
            Self::Match { boost, .. }
            | Self::MatchPhrase { boost, .. }
            | Self::Term { boost, .. }
            | Self::Bool { boost, .. }
            | Self::DisMax { boost, .. } => *boost,
        }
    }

    /// Leaf queries in depth-first order.
    pub fn leaves(&self) -> Vec<&CompiledQuery> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a CompiledQuery>) {
        match self {
            Self::Bool { clauses, .. } => {
                for clause in clauses {
                    clause.query.collect_leaves(out);
                }
            }
            Self::DisMax { queries, .. } => {
                for query in queries {
                    query.collect_leaves(out);
                }
            }
            leaf => out.push(leaf),
        }
    }

    /// Render as Elasticsearch query DSL.
    pub fn to_dsl(&self) -> Value {
        match self {
            Self::MatchNone => json!({ "match_none": {} }),
            Self::Match {
                field,
                query,
                operator,
                boost,
            } => json!({
                "match": { field: { "query": query, "operator": operator.as_str(), "boost": boost } }
            }),
            Self::MatchPhrase { field, query, boost } => json!({
                "match_phrase": { field: { "query": query, "boost": boost } }
            }),
            Self::Term { field, value, boost } => json!({
                "term": { field: { "value": value, "boost": boost } }
            }),
            Self::Bool { clauses, boost } => {
                let mut body = Map::new();
                for clause in clauses {
                    let key = match clause.occur {
                        Occur::Must => "must",
                        Occur::Should => "should",
                        Occur::MustNot => "must_not",
                    };
                    if let Value::Array(list) = body
                        .entry(key)
                        .or_insert_with(|| Value::Array(Vec::new()))
                    {
                        list.push(clause.query.to_dsl());
                    }
                }
                body.insert("boost".to_string(), json!(boost));
                json!({ "bool": body })
            }
            Self::DisMax {
                queries,
                tie_breaker,
                boost,
            } => json!({
                "dis_max": {
                    "queries": queries.iter().map(CompiledQuery::to_dsl).collect::<Vec<_>>(),
                    "tie_breaker": tie_breaker,
                    "boost": boost,
                }
            }),
        }
    }
}
