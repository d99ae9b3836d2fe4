//! The flat (ungrouped) view: every track, exactly once, in one order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::EngineError;
use crate::ordered::{IndexMapping, MoveDirection, OrderedIndex};
use crate::sort::SortSpec;
use crate::track::TrackRef;

/// The canonical linear list of all tracks. This view is the source of
/// truth for total track count and total duration.
#[derive(Clone, Debug, Default)]
pub struct FlatView {
    tracks: OrderedIndex<TrackRef>,
}

impl FlatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn track_at(&self, index: usize) -> Option<&TrackRef> {
        self.tracks.get(index)
    }

    pub fn index_of(&self, track: &TrackRef) -> Option<usize> {
        self.tracks.position(track)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackRef> {
        self.tracks.iter()
    }

    /// Sum of the known durations of all tracks. Tracks whose duration has
    /// not been resolved yet contribute nothing.
    pub fn total_duration(&self) -> Duration {
        self.tracks
            .iter()
            .filter_map(|t| t.duration)
            .sum()
    }

    /// Concise display name of the track at `index`.
    pub fn display_name(&self, index: usize) -> Option<&str> {
        self.tracks.get(index).map(|t| t.display.as_str())
    }

    pub(crate) fn push(&mut self, track: TrackRef) -> usize {
        self.tracks.push(track)
    }

    pub(crate) fn remove_tracks(&mut self, tracks: &[TrackRef]) -> Vec<usize> {
        self.tracks.remove_items(tracks)
    }

    /// Move the selected flat indices in `direction`.
    pub fn move_tracks(
        &mut self,
        indices: &[usize],
        direction: MoveDirection,
    ) -> Result<IndexMapping, EngineError> {
        self.tracks.move_direction(indices, direction)
    }

    /// Drag the selected flat indices and drop them at `drop_index`.
    pub fn drag_and_drop(
        &mut self,
        source_indices: &[usize],
        drop_index: usize,
    ) -> Result<IndexMapping, EngineError> {
        self.tracks.drag_and_drop(source_indices, drop_index)
    }

    pub fn sort(&mut self, spec: &SortSpec) {
        self.tracks.sort_by(|a, b| spec.compare_tracks(a, b));
    }

    /// Permute the view to match a previously persisted path order. Paths
    /// the view does not contain are skipped; tracks absent from the saved
    /// order keep their relative order after the saved ones.
    pub(crate) fn re_order(&mut self, saved: &[PathBuf]) {
        let rank = rank_map(saved);
        self.tracks
            .sort_by(|a, b| rank_of(&rank, &a.path).cmp(&rank_of(&rank, &b.path)));
    }
}

pub(crate) fn rank_map(saved: &[PathBuf]) -> std::collections::HashMap<&Path, usize> {
    saved
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_path(), i))
        .collect()
}

pub(crate) fn rank_of(rank: &std::collections::HashMap<&Path, usize>, path: &Path) -> usize {
    rank.get(path).copied().unwrap_or(usize::MAX)
}
