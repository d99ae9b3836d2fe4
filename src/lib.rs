//! segue: an in-memory playlist engine.
//!
//! The engine keeps one flat ordered list of tracks plus one grouped view
//! per metadata criterion (artist, album, genre), all describing the same
//! track set. Every mutation goes through the [`PlaylistCoordinator`],
//! which fans it out to each view and returns a result object describing
//! exactly which rows changed in which view, so a UI never has to rescan.
//!
//! The engine performs no I/O and expects all calls to be serialized onto
//! one thread by the caller. Track loading (directory scanning and tag
//! reading) lives in [`library`] and runs before tracks enter the engine.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod library;
pub mod ordered;
pub mod search;
pub mod snapshot;
pub mod sort;
pub mod track;
pub mod views;

pub use coordinator::{AddResult, PlaylistCoordinator, RemovalResult};
pub use error::EngineError;
pub use ordered::{IndexMapping, MoveDirection, OrderedIndex};
pub use search::{Location, SearchField, SearchHit, SearchQuery};
pub use snapshot::Snapshot;
pub use sort::{SortKey, SortSpec};
pub use track::{Criterion, Gap, Track, TrackRef};
pub use views::{FlatView, Group, GroupAddition, GroupedView, MoveOutcome, RemovalEvent, ViewKind};
