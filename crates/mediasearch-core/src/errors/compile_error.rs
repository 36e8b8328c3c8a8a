/// Query compilation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A node kind the entity-boosting path cannot express reached the
    /// compiler. Callers must drop ineligible profiles first.
    #[error("unsupported {kind} node at {start}..{end}")]
    UnsupportedNode {
        kind: &'static str,
        start: usize,
        end: usize,
    },

    #[error("node offsets {start}..{end} fall outside query of length {len}")]
    InvalidOffsets { start: usize, end: usize, len: usize },
}
