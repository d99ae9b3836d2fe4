//! Views over the track set.
//!
//! `FlatView` is the single canonical ordered list of all tracks;
//! `GroupedView` partitions the same tracks into named groups by one
//! metadata criterion. Each view owns its ordering independently.

mod flat;
mod grouped;

pub use flat::FlatView;
pub use grouped::{Group, GroupAddition, GroupedView, MoveOutcome, RemovalEvent};

use crate::track::Criterion;

/// Identifies one of the engine's views.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Flat,
    Grouped(Criterion),
}
