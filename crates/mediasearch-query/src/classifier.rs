//! Decides which relevance profiles may serve a query, from its shape alone.
//!
//! Words and Phrase nodes make the candidate profiles eligible. Any node the
//! entity-boosting path cannot express vetoes every profile for the whole
//! query, wherever it sits in the tree.

use std::collections::BTreeSet;

use mediasearch_core::events;
use mediasearch_core::models::{NodeKind, ParsedNode, ParsedQuery};

/// Profile eligibility collected over one walk.
#[derive(Debug, Default)]
struct Shape {
    supported: BTreeSet<String>,
    unsupported: BTreeSet<String>,
}

/// Query shape classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryShapeClassifier;

impl QueryShapeClassifier {
    pub fn new() -> Self {
        Self
    }

    /// The subset of `candidates` still eligible for `query`, in candidate order.
    pub fn eligible(&self, query: &ParsedQuery, candidates: &[String]) -> Vec<String> {
        let mut shape = Shape::default();
        visit(query.root(), candidates, &mut shape);

        let vetoed: Vec<String> = shape.unsupported.iter().cloned().collect();
        if !vetoed.is_empty() {
            events::profiles_vetoed(query.raw(), &vetoed);
        }

        candidates
            .iter()
            .filter(|p| shape.supported.contains(*p) && !shape.unsupported.contains(*p))
            .cloned()
            .collect()
    }
}

fn visit(node: &ParsedNode, candidates: &[String], shape: &mut Shape) {
    match &node.kind {
        NodeKind::Words | NodeKind::Phrase => {
            shape.supported.extend(candidates.iter().cloned());
        }
        NodeKind::Boolean { clauses } => {
            for clause in clauses {
                visit(&clause.node, candidates, shape);
            }
        }
        NodeKind::PhrasePrefix
        | NodeKind::Fuzzy
        | NodeKind::Prefix
        | NodeKind::Wildcard
        | NodeKind::Negated { .. } => {
            shape.unsupported.extend(candidates.iter().cloned());
        }
        NodeKind::Empty | NodeKind::KeywordFeature | NodeKind::NamespaceHeader => {}
    }
}
