//! Engine error types.
//!
//! Only genuine addressing mistakes are errors. A duplicate `add_track`
//! yields `None` and a cross-group move yields an empty result, because
//! both are legitimate caller states rather than failures.

use thiserror::Error;

use crate::track::Criterion;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A positional operation was given an out-of-range index. Indices are
    /// never silently clamped; clamping would corrupt the index mappings
    /// the UI consumes.
    #[error("index {index} out of bounds (length {len})")]
    InvalidIndex { index: usize, len: usize },

    /// A drop target named a group the addressed view does not contain.
    #[error("no group named {name:?} in the {criterion} view")]
    UnknownGroup { criterion: Criterion, name: String },
}
