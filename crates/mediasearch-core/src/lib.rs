//! # mediasearch-core
//!
//! Foundation crate for the media search relevance compiler.
//! Defines the query AST, entity matches, the compiled query tree,
//! config, errors, and the traits that the resolver tiers implement.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod observability;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{BoostSettings, MediaSearchConfig};
pub use errors::{MediaSearchError, MediaSearchResult};
pub use models::{
    CompiledQuery, EntityMatch, LanguagePair, NodeKind, Occur, ParsedNode, ParsedQuery, QueryId,
    Resolution, TermEntityMap,
};
