pub mod ast;
pub mod compiled_query;
pub mod entity;

pub use ast::{BooleanClause, NodeKind, Occur, ParsedNode, ParsedQuery, QueryId};
pub use compiled_query::{CompiledClause, CompiledQuery, MatchOperator};
pub use entity::{EntityMatch, LanguagePair, Resolution, TermEntityMap};
