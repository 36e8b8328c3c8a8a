//! Parsed query AST as produced by the upstream query-string parser.
//!
//! Nodes are a closed sum type so every walk over the tree (term extraction,
//! compilation, shape classification) is checked exhaustively by the compiler.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CompileError;

/// Identity of one parsed query instance.
///
/// Assigned at construction and never derived from the query text, so two
/// queries with identical text are still distinct for memoization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryId(Uuid);

impl QueryId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a boolean clause participates in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    Must,
    Should,
    MustNot,
}

/// One clause of a boolean node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanClause {
    pub occur: Occur,
    pub node: ParsedNode,
}

/// Node variants produced by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Words,
    Phrase,
    PhrasePrefix,
    Fuzzy,
    Prefix,
    Wildcard,
    Negated { child: Box<ParsedNode> },
    Boolean { clauses: Vec<BooleanClause> },
    Empty,
    KeywordFeature,
    NamespaceHeader,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Words => "words",
            Self::Phrase => "phrase",
            Self::PhrasePrefix => "phrase_prefix",
            Self::Fuzzy => "fuzzy",
            Self::Prefix => "prefix",
            Self::Wildcard => "wildcard",
            Self::Negated { .. } => "negated",
            Self::Boolean { .. } => "boolean",
            Self::Empty => "empty",
            Self::KeywordFeature => "keyword_feature",
            Self::NamespaceHeader => "namespace_header",
        }
    }
}

/// An AST node spanning `start..end` characters of the raw query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedNode {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl ParsedNode {
    pub fn new(start: usize, end: usize, kind: NodeKind) -> Self {
        Self { start, end, kind }
    }

    pub fn words(start: usize, end: usize) -> Self {
        Self::new(start, end, NodeKind::Words)
    }

    pub fn phrase(start: usize, end: usize) -> Self {
        Self::new(start, end, NodeKind::Phrase)
    }

    pub fn empty() -> Self {
        Self::new(0, 0, NodeKind::Empty)
    }

    pub fn negated(start: usize, end: usize, child: ParsedNode) -> Self {
        Self::new(
            start,
            end,
            NodeKind::Negated {
                child: Box::new(child),
            },
        )
    }

    pub fn boolean(start: usize, end: usize, clauses: Vec<BooleanClause>) -> Self {
        Self::new(start, end, NodeKind::Boolean { clauses })
    }

    /// Boolean node whose span covers all of its clauses.
    pub fn all_of(occur: Occur, nodes: Vec<ParsedNode>) -> Self {
        let start = nodes.iter().map(|n| n.start).min().unwrap_or(0);
        let end = nodes.iter().map(|n| n.end).max().unwrap_or(0);
        let clauses = nodes
            .into_iter()
            .map(|node| BooleanClause { occur, node })
            .collect();
        Self::boolean(start, end, clauses)
    }

    pub fn start_offset(&self) -> usize {
        self.start
    }

    pub fn end_offset(&self) -> usize {
        self.end
    }
}

/// An immutable parsed query: raw text plus root node.
///
/// Not `Clone`: memoized entity resolution is keyed on the instance.
#[derive(Debug)]
pub struct ParsedQuery {
    id: QueryId,
    raw: String,
    root: ParsedNode,
}

impl ParsedQuery {
    pub fn new(raw: impl Into<String>, root: ParsedNode) -> Self {
        Self {
            id: QueryId::new(),
            raw: raw.into(),
            root,
        }
    }

    pub fn id(&self) -> QueryId {
        self.id
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn root(&self) -> &ParsedNode {
        &self.root
    }

    /// The raw text a node spans. Offsets count characters, not bytes.
    pub fn text_of(&self, node: &ParsedNode) -> Result<&str, CompileError> {
        slice_chars(&self.raw, node.start, node.end).ok_or(CompileError::InvalidOffsets {
            start: node.start,
            end: node.end,
            len: self.raw.chars().count(),
        })
    }
}

fn slice_chars(raw: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let mut boundaries = raw
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(raw.len()));
    let byte_start = boundaries.nth(start)?;
    let byte_end = if end == start {
        byte_start
    } else {
        boundaries.nth(end - start - 1)?
    };
    raw.get(byte_start..byte_end)
}
