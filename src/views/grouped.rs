//! Grouped views: tracks partitioned into named buckets by one criterion.
//!
//! A group exists only while it has members; removing its last track
//! removes the group itself. The by-name lookup stays in bijection with
//! the group sequence and is rebuilt after any structural change.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use crate::error::EngineError;
use crate::ordered::{IndexMapping, MoveDirection, OrderedIndex};
use crate::sort::{SortKey, SortSpec};
use crate::track::{Criterion, TrackRef};

use super::flat::{rank_map, rank_of};

/// A named bucket of tracks sharing one criterion value. Two groups are
/// equal iff their criterion and name match; membership is irrelevant.
#[derive(Clone, Debug)]
pub struct Group {
    criterion: Criterion,
    name: String,
    tracks: OrderedIndex<TrackRef>,
}

impl Group {
    fn new(criterion: Criterion, name: String) -> Self {
        Self {
            criterion,
            name,
            tracks: OrderedIndex::new(),
        }
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn tracks(&self) -> std::slice::Iter<'_, TrackRef> {
        self.tracks.iter()
    }

    fn into_tracks(self) -> Vec<TrackRef> {
        self.tracks.iter().cloned().collect()
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.criterion == other.criterion && self.name == other.name
    }
}

impl Eq for Group {}

/// Where a track landed when added to a grouped view: enough for a UI to
/// insert exactly one row, plus one group header if the group is new.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupAddition {
    pub group_index: usize,
    pub track_index: usize,
    pub group_created: bool,
    pub group_name: String,
}

/// One removal that happened in a grouped view. Indices are relative to
/// the view state before any of the removals in the same batch.
#[derive(Clone, Debug)]
pub enum RemovalEvent {
    /// A whole group went away, taking its member tracks with it.
    GroupRemoved {
        group_index: usize,
        name: String,
        tracks: Vec<TrackRef>,
    },
    /// Individual tracks left a group that survives the batch.
    TracksRemoved {
        group_index: usize,
        group_name: String,
        /// Pre-removal positions within the group, ascending, aligned
        /// with `tracks`.
        positions: Vec<usize>,
        tracks: Vec<TrackRef>,
    },
}

impl RemovalEvent {
    pub fn group_index(&self) -> usize {
        match self {
            RemovalEvent::GroupRemoved { group_index, .. } => *group_index,
            RemovalEvent::TracksRemoved { group_index, .. } => *group_index,
        }
    }
}

/// Result of a move or drop request in a grouped view.
#[derive(Clone, Debug)]
pub enum MoveOutcome {
    /// Nothing moved: empty selection, stale selection, or a track
    /// selection spanning more than one group.
    Empty,
    GroupsMoved(IndexMapping),
    TracksMoved {
        group_index: usize,
        mapping: IndexMapping,
    },
}

impl MoveOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, MoveOutcome::Empty)
    }
}

/// All groups for one criterion, with O(1) by-name resolution.
#[derive(Clone, Debug)]
pub struct GroupedView {
    criterion: Criterion,
    groups: OrderedIndex<Group>,
    by_name: HashMap<String, usize>,
}

impl GroupedView {
    pub fn new(criterion: Criterion) -> Self {
        Self {
            criterion,
            groups: OrderedIndex::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of tracks across all groups.
    pub fn track_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn group_at(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub fn groups(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Address of `track` in this view, as a (group, index-within-group)
    /// pair. A track's group follows from its criterion value, so the
    /// lookup goes through the by-name map.
    pub fn locate(&self, track: &TrackRef) -> Option<(usize, usize)> {
        let name = self.criterion.group_name(track);
        let group_index = self.group_index(&name)?;
        let track_index = self.groups.get(group_index)?.tracks.position(track)?;
        Some((group_index, track_index))
    }

    /// Append `track` to its group, creating the group at the end of the
    /// view when this criterion value appears for the first time.
    pub fn add_track(&mut self, track: TrackRef) -> GroupAddition {
        let name = self.criterion.group_name(&track);
        if let Some(group_index) = self.group_index(&name) {
            if let Some(group) = self.groups.get_mut(group_index) {
                let track_index = group.tracks.push(track);
                return GroupAddition {
                    group_index,
                    track_index,
                    group_created: false,
                    group_name: name,
                };
            }
        }

        let mut group = Group::new(self.criterion, name.clone());
        group.tracks.push(track);
        let group_index = self.groups.push(group);
        self.by_name.insert(name.clone(), group_index);
        GroupAddition {
            group_index,
            track_index: 0,
            group_created: true,
            group_name: name,
        }
    }

    /// Fused removal of explicit groups and individual tracks.
    ///
    /// Any group whose full membership is requested as tracks is promoted
    /// to a group removal, so no zero-track group is ever left behind.
    /// Tracks and group names the view does not contain are skipped. The
    /// returned events carry pre-batch indices and are sorted ascending by
    /// group position.
    pub fn remove_tracks_and_groups(
        &mut self,
        tracks: &[TrackRef],
        explicit_groups: &[String],
    ) -> Vec<RemovalEvent> {
        let mut group_removals: BTreeSet<usize> = explicit_groups
            .iter()
            .filter_map(|name| self.group_index(name))
            .collect();

        // Partition the requested tracks by owning group.
        let mut by_group: BTreeMap<usize, Vec<TrackRef>> = BTreeMap::new();
        for track in tracks {
            if let Some((group_index, _)) = self.locate(track) {
                let entry = by_group.entry(group_index).or_default();
                if !entry.contains(track) {
                    entry.push(track.clone());
                }
            }
        }

        // Promote fully-covered groups to whole-group removals.
        for (&group_index, requested) in &by_group {
            if let Some(group) = self.groups.get(group_index) {
                if requested.len() == group.len() {
                    group_removals.insert(group_index);
                }
            }
        }
        by_group.retain(|group_index, _| !group_removals.contains(group_index));

        let mut affected: Vec<usize> = group_removals
            .iter()
            .copied()
            .chain(by_group.keys().copied())
            .collect();
        affected.sort_unstable();

        // Process descending so earlier removals never shift the indices
        // still to be processed.
        let mut events: Vec<RemovalEvent> = Vec::new();
        for &group_index in affected.iter().rev() {
            if group_removals.contains(&group_index) {
                if let Ok(group) = self.groups.remove_at(group_index) {
                    events.push(RemovalEvent::GroupRemoved {
                        group_index,
                        name: group.name().to_string(),
                        tracks: group.into_tracks(),
                    });
                }
            } else if let (Some(requested), Some(group)) =
                (by_group.get(&group_index), self.groups.get_mut(group_index))
            {
                let removed: Vec<(usize, TrackRef)> = group
                    .tracks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| requested.contains(t))
                    .map(|(i, t)| (i, t.clone()))
                    .collect();
                group.tracks.remove_items(requested);
                events.push(RemovalEvent::TracksRemoved {
                    group_index,
                    group_name: group.name().to_string(),
                    positions: removed.iter().map(|(i, _)| *i).collect(),
                    tracks: removed.into_iter().map(|(_, t)| t).collect(),
                });
            }
        }

        self.reindex();
        events.sort_by_key(RemovalEvent::group_index);
        events
    }

    /// Move groups or tracks in `direction`. Groups take precedence: when
    /// any group names are supplied, only groups move. Tracks move only
    /// when the whole selection lives in a single group; a selection
    /// spanning groups yields `MoveOutcome::Empty`.
    pub fn move_tracks_and_groups(
        &mut self,
        tracks: &[TrackRef],
        group_names: &[String],
        direction: MoveDirection,
    ) -> Result<MoveOutcome, EngineError> {
        if !group_names.is_empty() {
            let indices: Vec<usize> = group_names
                .iter()
                .filter_map(|name| self.group_index(name))
                .collect();
            if indices.is_empty() {
                return Ok(MoveOutcome::Empty);
            }
            let mapping = self.groups.move_direction(&indices, direction)?;
            self.reindex();
            return Ok(MoveOutcome::GroupsMoved(mapping));
        }

        let Some((group_index, track_indices)) = self.single_group_selection(tracks) else {
            return Ok(MoveOutcome::Empty);
        };
        // single_group_selection resolved the group, so it exists.
        let Some(group) = self.groups.get_mut(group_index) else {
            return Ok(MoveOutcome::Empty);
        };
        let mapping = group.tracks.move_direction(&track_indices, direction)?;
        Ok(MoveOutcome::TracksMoved {
            group_index,
            mapping,
        })
    }

    /// Drag-and-drop groups or tracks. Same precedence rule as
    /// [`move_tracks_and_groups`](Self::move_tracks_and_groups): groups
    /// drop within the top-level group order, tracks drop within
    /// `drop_parent`'s own order.
    pub fn drop_tracks_and_groups(
        &mut self,
        tracks: &[TrackRef],
        group_names: &[String],
        drop_parent: Option<&str>,
        drop_index: usize,
    ) -> Result<MoveOutcome, EngineError> {
        if !group_names.is_empty() {
            let indices: Vec<usize> = group_names
                .iter()
                .filter_map(|name| self.group_index(name))
                .collect();
            if indices.is_empty() {
                return Ok(MoveOutcome::Empty);
            }
            let mapping = self.groups.drag_and_drop(&indices, drop_index)?;
            self.reindex();
            return Ok(MoveOutcome::GroupsMoved(mapping));
        }

        let Some(parent_name) = drop_parent else {
            return Ok(MoveOutcome::Empty);
        };
        let Some(parent_index) = self.group_index(parent_name) else {
            return Err(EngineError::UnknownGroup {
                criterion: self.criterion,
                name: parent_name.to_string(),
            });
        };

        let Some((group_index, track_indices)) = self.single_group_selection(tracks) else {
            return Ok(MoveOutcome::Empty);
        };
        if group_index != parent_index {
            // Dropping into another group would change membership.
            return Ok(MoveOutcome::Empty);
        }
        let Some(group) = self.groups.get_mut(group_index) else {
            return Ok(MoveOutcome::Empty);
        };
        let mapping = group.tracks.drag_and_drop(&track_indices, drop_index)?;
        Ok(MoveOutcome::TracksMoved {
            group_index,
            mapping,
        })
    }

    /// Sort this view. `GroupName` reorders the group list; any other key
    /// sorts the tracks within each group independently. Stable either way.
    pub fn sort(&mut self, spec: &SortSpec) {
        if spec.key == SortKey::GroupName {
            self.groups
                .sort_by(|a, b| spec.compare_names(a.name(), b.name()));
            self.reindex();
        } else {
            for group in self.groups.iter_mut() {
                group.tracks.sort_by(|a, b| spec.compare_tracks(a, b));
            }
        }
    }

    /// Flattened path order of this view: groups in order, each group's
    /// tracks in order.
    pub fn path_order(&self) -> Vec<PathBuf> {
        self.groups
            .iter()
            .flat_map(|g| g.tracks.iter().map(|t| t.path.clone()))
            .collect()
    }

    /// Permute groups and within-group orders to a previously persisted
    /// path order without touching membership. Groups order by the first
    /// saved occurrence of any member; unsaved tracks sort after saved
    /// ones, keeping their relative order.
    pub(crate) fn re_order(&mut self, saved: &[PathBuf]) {
        let rank = rank_map(saved);
        let group_rank = |g: &Group| {
            g.tracks
                .iter()
                .map(|t| rank_of(&rank, &t.path))
                .min()
                .unwrap_or(usize::MAX)
        };
        self.groups.sort_by(|a, b| group_rank(a).cmp(&group_rank(b)));
        for group in self.groups.iter_mut() {
            group
                .tracks
                .sort_by(|a, b| rank_of(&rank, &a.path).cmp(&rank_of(&rank, &b.path)));
        }
        self.reindex();
    }

    /// Selection of tracks that all live in one group of this view.
    /// Returns that group plus the ascending track indices, or `None` for
    /// an empty, stale, or cross-group selection.
    fn single_group_selection(&self, tracks: &[TrackRef]) -> Option<(usize, Vec<usize>)> {
        let mut group_index: Option<usize> = None;
        let mut track_indices: Vec<usize> = Vec::new();
        for track in tracks {
            // Tracks the view does not contain are skipped; UI selection
            // state can be stale.
            let Some((gi, ti)) = self.locate(track) else {
                continue;
            };
            match group_index {
                None => group_index = Some(gi),
                Some(existing) if existing != gi => return None,
                Some(_) => {}
            }
            track_indices.push(ti);
        }
        let group_index = group_index?;
        track_indices.sort_unstable();
        track_indices.dedup();
        Some((group_index, track_indices))
    }

    /// Rebuild the name lookup after any structural change to the group
    /// sequence, keeping it in bijection with the groups.
    fn reindex(&mut self) {
        self.by_name = self
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.name().to_string(), i))
            .collect();
    }
}
