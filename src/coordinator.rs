//! The playlist coordinator: the facade every mutation goes through.
//!
//! The coordinator owns the flat view, one grouped view per criterion, the
//! by-path de-duplication table and the sparse gap annotations. It fans
//! each mutation out to every view and aggregates their per-view results
//! into one object, so callers always learn exactly which rows changed in
//! which view. Every call either completes or leaves the prior state
//! untouched; nothing here blocks or performs I/O.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::EngineError;
use crate::ordered::{IndexMapping, MoveDirection};
use crate::search::{self, Location, SearchField, SearchHit, SearchQuery};
use crate::snapshot::Snapshot;
use crate::sort::SortSpec;
use crate::track::{Criterion, Gap, Track, TrackRef};
use crate::views::{FlatView, GroupAddition, GroupedView, MoveOutcome, RemovalEvent, ViewKind};

/// Aggregate result of adding one track: its flat index plus where it
/// landed in each grouped view.
#[derive(Clone, Debug)]
pub struct AddResult {
    pub track: TrackRef,
    pub flat_index: usize,
    pub grouped: BTreeMap<Criterion, GroupAddition>,
}

/// Aggregate result of a removal: the removed tracks, their pre-removal
/// flat positions (ascending), and each grouped view's removal events.
#[derive(Clone, Debug)]
pub struct RemovalResult {
    pub tracks: Vec<TrackRef>,
    pub flat_positions: Vec<usize>,
    pub grouped: BTreeMap<Criterion, Vec<RemovalEvent>>,
}

pub struct PlaylistCoordinator {
    flat: FlatView,
    grouped: BTreeMap<Criterion, GroupedView>,
    by_path: HashMap<PathBuf, TrackRef>,
    gap_before: HashMap<PathBuf, Gap>,
    gap_after: HashMap<PathBuf, Gap>,
}

impl Default for PlaylistCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaylistCoordinator {
    pub fn new() -> Self {
        Self {
            flat: FlatView::new(),
            grouped: Criterion::ALL
                .iter()
                .map(|&c| (c, GroupedView::new(c)))
                .collect(),
            by_path: HashMap::new(),
            gap_before: HashMap::new(),
            gap_after: HashMap::new(),
        }
    }

    /// Total track count; the flat view is the source of truth.
    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    pub fn total_duration(&self) -> Duration {
        self.flat.total_duration()
    }

    pub fn flat(&self) -> &FlatView {
        &self.flat
    }

    pub fn grouped_view(&self, criterion: Criterion) -> Option<&GroupedView> {
        self.grouped.get(&criterion)
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn track_by_path(&self, path: &Path) -> Option<&TrackRef> {
        self.by_path.get(path)
    }

    /// Add a track to every view. Returns `None` without mutating anything
    /// when a track with the same file path is already present.
    pub fn add_track(&mut self, track: Track) -> Option<AddResult> {
        if self.by_path.contains_key(&track.path) {
            debug!(path = %track.path.display(), "duplicate add ignored");
            return None;
        }

        let track: TrackRef = TrackRef::new(track);
        self.by_path.insert(track.path.clone(), track.clone());
        let flat_index = self.flat.push(track.clone());
        let grouped: BTreeMap<Criterion, GroupAddition> = self
            .grouped
            .iter_mut()
            .map(|(&criterion, view)| (criterion, view.add_track(track.clone())))
            .collect();

        debug!(path = %track.path.display(), flat_index, "track added");
        Some(AddResult {
            track,
            flat_index,
            grouped,
        })
    }

    /// Remove the tracks at the given flat indices from every view.
    ///
    /// Indices are resolved against the pre-mutation flat order before
    /// anything changes; any out-of-range index fails the whole call with
    /// no mutation at all.
    pub fn remove_tracks(&mut self, flat_indices: &[usize]) -> Result<RemovalResult, EngineError> {
        let mut tracks: Vec<TrackRef> = Vec::with_capacity(flat_indices.len());
        for &index in flat_indices {
            let track = self
                .flat
                .track_at(index)
                .ok_or(EngineError::InvalidIndex {
                    index,
                    len: self.flat.len(),
                })?
                .clone();
            if !tracks.contains(&track) {
                tracks.push(track);
            }
        }
        Ok(self.remove_known(tracks, None))
    }

    /// Remove a mixed selection of tracks and whole groups.
    ///
    /// Explicit groups are expanded to their full membership first. The
    /// view owning the groups (`owner`) removes the groups themselves;
    /// every other view sees a tracks-only removal, because a group in one
    /// criterion's taxonomy has no meaning in another's. Tracks the engine
    /// does not contain are skipped.
    pub fn remove_tracks_and_groups(
        &mut self,
        tracks: &[TrackRef],
        groups: &[String],
        owner: Criterion,
    ) -> RemovalResult {
        let mut all: Vec<TrackRef> = Vec::new();
        for track in tracks {
            if self.by_path.contains_key(&track.path) && !all.contains(track) {
                all.push(track.clone());
            }
        }
        if let Some(view) = self.grouped.get(&owner) {
            for name in groups {
                if let Some(group_index) = view.group_index(name) {
                    if let Some(group) = view.group_at(group_index) {
                        for track in group.tracks() {
                            if !all.contains(track) {
                                all.push(track.clone());
                            }
                        }
                    }
                }
            }
        }
        self.remove_known(all, Some((owner, groups)))
    }

    /// Removal core: fans the resolved track set out to every view and
    /// purges the de-dup table and gap maps. `tracks` must all be present.
    fn remove_known(
        &mut self,
        tracks: Vec<TrackRef>,
        owner: Option<(Criterion, &[String])>,
    ) -> RemovalResult {
        let flat_positions = self.flat.remove_tracks(&tracks);
        for track in &tracks {
            self.by_path.remove(&track.path);
            self.gap_before.remove(&track.path);
            self.gap_after.remove(&track.path);
        }

        let mut grouped: BTreeMap<Criterion, Vec<RemovalEvent>> = BTreeMap::new();
        for (&criterion, view) in self.grouped.iter_mut() {
            let explicit: &[String] = match owner {
                Some((owning, groups)) if owning == criterion => groups,
                _ => &[],
            };
            grouped.insert(criterion, view.remove_tracks_and_groups(&tracks, explicit));
        }

        debug!(removed = tracks.len(), "tracks removed from all views");
        RemovalResult {
            tracks,
            flat_positions,
            grouped,
        }
    }

    /// Move the selected flat indices in `direction`.
    pub fn move_flat_tracks(
        &mut self,
        indices: &[usize],
        direction: MoveDirection,
    ) -> Result<IndexMapping, EngineError> {
        self.flat.move_tracks(indices, direction)
    }

    /// Drag-and-drop within the flat view.
    pub fn drop_flat_tracks(
        &mut self,
        source_indices: &[usize],
        drop_index: usize,
    ) -> Result<IndexMapping, EngineError> {
        self.flat.drag_and_drop(source_indices, drop_index)
    }

    /// Move tracks or groups within one grouped view. Group names take
    /// precedence over tracks; see [`GroupedView::move_tracks_and_groups`].
    pub fn move_grouped(
        &mut self,
        criterion: Criterion,
        tracks: &[TrackRef],
        groups: &[String],
        direction: MoveDirection,
    ) -> Result<MoveOutcome, EngineError> {
        match self.grouped.get_mut(&criterion) {
            Some(view) => view.move_tracks_and_groups(tracks, groups, direction),
            None => Ok(MoveOutcome::Empty),
        }
    }

    /// Drag-and-drop tracks or groups within one grouped view.
    pub fn drop_grouped(
        &mut self,
        criterion: Criterion,
        tracks: &[TrackRef],
        groups: &[String],
        drop_parent: Option<&str>,
        drop_index: usize,
    ) -> Result<MoveOutcome, EngineError> {
        match self.grouped.get_mut(&criterion) {
            Some(view) => view.drop_tracks_and_groups(tracks, groups, drop_parent, drop_index),
            None => Ok(MoveOutcome::Empty),
        }
    }

    /// Run `query` and resolve each hit's location against `target`.
    ///
    /// Matching is criterion-specific (title/display against the flat
    /// list, artist/album/genre against the group names of the matching
    /// grouped view); locations are resolved only afterwards, because they
    /// are view-specific. Hits come back sorted ascending by location.
    pub fn search(&self, query: &SearchQuery, target: ViewKind) -> Vec<SearchHit> {
        let needle = query.text.trim();
        if needle.is_empty() || query.fields.is_empty() {
            return Vec::new();
        }

        let mut matched: Vec<TrackRef> = Vec::new();
        for field in &query.fields {
            match field {
                SearchField::Display => {
                    for track in self.flat.iter() {
                        if search::matches(&track.display, needle) && !matched.contains(track) {
                            matched.push(track.clone());
                        }
                    }
                }
                SearchField::Title => {
                    for track in self.flat.iter() {
                        if search::matches(&track.title, needle) && !matched.contains(track) {
                            matched.push(track.clone());
                        }
                    }
                }
                SearchField::Artist | SearchField::Album | SearchField::Genre => {
                    let criterion = match field {
                        SearchField::Artist => Criterion::Artist,
                        SearchField::Album => Criterion::Album,
                        _ => Criterion::Genre,
                    };
                    if let Some(view) = self.grouped.get(&criterion) {
                        for group in view.groups() {
                            if !search::matches(group.name(), needle) {
                                continue;
                            }
                            for track in group.tracks() {
                                if !matched.contains(track) {
                                    matched.push(track.clone());
                                }
                            }
                        }
                    }
                }
            }
        }

        let mut hits: Vec<SearchHit> = matched
            .into_iter()
            .filter_map(|track| {
                let location = match target {
                    ViewKind::Flat => self.flat.index_of(&track).map(Location::Flat),
                    ViewKind::Grouped(criterion) => self
                        .grouped
                        .get(&criterion)
                        .and_then(|view| view.locate(&track))
                        .map(|(group, index)| Location::Grouped { group, index }),
                }?;
                Some(SearchHit { track, location })
            })
            .collect();
        hits.sort_by_key(|hit| hit.location);
        hits
    }

    /// Sort exactly the one view named by `target`; every other view's
    /// order is independent and stays untouched.
    pub fn sort(&mut self, spec: &SortSpec, target: ViewKind) {
        match target {
            ViewKind::Flat => self.flat.sort(spec),
            ViewKind::Grouped(criterion) => {
                if let Some(view) = self.grouped.get_mut(&criterion) {
                    view.sort(spec);
                }
            }
        }
    }

    /// Annotate a pause before the given track. Returns false when the
    /// engine does not contain the path.
    pub fn set_gap_before(&mut self, path: &Path, gap: Gap) -> bool {
        if !self.by_path.contains_key(path) {
            return false;
        }
        self.gap_before.insert(path.to_path_buf(), gap);
        true
    }

    /// Annotate a pause after the given track.
    pub fn set_gap_after(&mut self, path: &Path, gap: Gap) -> bool {
        if !self.by_path.contains_key(path) {
            return false;
        }
        self.gap_after.insert(path.to_path_buf(), gap);
        true
    }

    pub fn gap_before(&self, path: &Path) -> Option<Gap> {
        self.gap_before.get(path).copied()
    }

    pub fn gap_after(&self, path: &Path) -> Option<Gap> {
        self.gap_after.get(path).copied()
    }

    pub fn clear_gap_before(&mut self, path: &Path) -> Option<Gap> {
        self.gap_before.remove(path)
    }

    pub fn clear_gap_after(&mut self, path: &Path) -> Option<Gap> {
        self.gap_after.remove(path)
    }

    /// Capture the ordered file-path list of every view plus the gap
    /// annotations, for an external serializer to persist.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            flat: self.flat.iter().map(|t| t.path.clone()).collect(),
            views: self
                .grouped
                .iter()
                .map(|(&criterion, view)| (criterion, view.path_order()))
                .collect(),
            gaps_before: self
                .gap_before
                .iter()
                .map(|(p, &g)| (p.clone(), g))
                .collect(),
            gaps_after: self
                .gap_after
                .iter()
                .map(|(p, &g)| (p.clone(), g))
                .collect(),
        }
    }

    /// Permute one view to match a previously persisted path order, the
    /// inverse of [`snapshot`](Self::snapshot) after tracks have been
    /// re-added. Group membership never changes; stale saved paths are
    /// skipped.
    pub fn re_order(&mut self, view: ViewKind, saved: &[PathBuf]) {
        match view {
            ViewKind::Flat => self.flat.re_order(saved),
            ViewKind::Grouped(criterion) => {
                if let Some(grouped) = self.grouped.get_mut(&criterion) {
                    grouped.re_order(saved);
                }
            }
        }
    }

    /// Re-apply persisted gap annotations for tracks currently present.
    pub fn restore_gaps(&mut self, snapshot: &Snapshot) {
        for (path, &gap) in &snapshot.gaps_before {
            self.set_gap_before(path, gap);
        }
        for (path, &gap) in &snapshot.gaps_after {
            self.set_gap_after(path, gap);
        }
    }
}

#[cfg(test)]
mod tests;
