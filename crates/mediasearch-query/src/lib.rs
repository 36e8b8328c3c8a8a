//! # mediasearch-query
//!
//! The AST walks over a parsed query:
//!
//! - `TermExtractor` collects literal terms and memoizes their entity
//!   resolution per query instance and language pair.
//! - `QueryCompiler` emits the weighted bool / dis_max tree.
//! - `QueryShapeClassifier` decides which relevance profiles may serve it.
//!
//! `MediaSearchEngine` ties them to a resolver chain for one request.

pub mod classifier;
pub mod compiler;
pub mod engine;
pub mod extractor;

pub use classifier::QueryShapeClassifier;
pub use compiler::QueryCompiler;
pub use engine::{MediaSearchEngine, SearchContext, SearchPlan};
pub use extractor::TermExtractor;
