//! Generic ordered sequence with stable per-item identity.
//!
//! `OrderedIndex` is the positional backbone of every view: positions are
//! contiguous `0..n` and ephemeral, identity is value equality of the
//! items. Mutations that reshuffle positions report an old-index to
//! new-index mapping so callers can diff their rows instead of rescanning.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::EngineError;

/// Mapping from pre-operation positions to post-operation positions.
pub type IndexMapping = BTreeMap<usize, usize>;

/// Direction for a step or to-extreme move of selected positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Top,
    Bottom,
}

#[derive(Clone, Debug)]
pub struct OrderedIndex<T> {
    items: Vec<T>,
}

impl<T> Default for OrderedIndex<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Clone + PartialEq> OrderedIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Current position of `item`, if present.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|it| it == item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.position(item).is_some()
    }

    /// Append `item`, returning its new trailing index.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Remove the item at `index`; everything after it shifts down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<T, EngineError> {
        if index >= self.items.len() {
            return Err(EngineError::InvalidIndex {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Remove the given items wherever they occur, returning their
    /// pre-removal positions in ascending order. Items not present are
    /// skipped.
    pub fn remove_items(&mut self, items: &[T]) -> Vec<usize> {
        let positions: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, it)| items.contains(it))
            .map(|(i, _)| i)
            .collect();

        for &i in positions.iter().rev() {
            self.items.remove(i);
        }
        positions
    }

    /// Dispatch a directional move over the selected `indices`.
    pub fn move_direction(
        &mut self,
        indices: &[usize],
        direction: MoveDirection,
    ) -> Result<IndexMapping, EngineError> {
        match direction {
            MoveDirection::Up => self.move_up(indices),
            MoveDirection::Down => self.move_down(indices),
            MoveDirection::Top => self.move_to_top(indices),
            MoveDirection::Bottom => self.move_to_bottom(indices),
        }
    }

    /// Move each selected position one step towards index 0. Items already
    /// packed against the top stay put and map to themselves; this is not
    /// an all-or-nothing operation.
    pub fn move_up(&mut self, indices: &[usize]) -> Result<IndexMapping, EngineError> {
        self.check_indices(indices)?;
        let sorted = sorted_unique(indices);

        let mut mapping = IndexMapping::new();
        let mut floor = 0;
        for idx in sorted {
            if idx == floor {
                // Already packed against the top of the list.
                floor += 1;
                mapping.insert(idx, idx);
            } else {
                self.items.swap(idx - 1, idx);
                mapping.insert(idx, idx - 1);
            }
        }
        Ok(mapping)
    }

    /// Move each selected position one step towards the end of the list.
    pub fn move_down(&mut self, indices: &[usize]) -> Result<IndexMapping, EngineError> {
        self.check_indices(indices)?;
        let mut sorted = sorted_unique(indices);
        sorted.reverse();

        let mut mapping = IndexMapping::new();
        let mut ceiling = self.items.len().saturating_sub(1);
        for idx in sorted {
            if idx == ceiling {
                ceiling = ceiling.saturating_sub(1);
                mapping.insert(idx, idx);
            } else {
                self.items.swap(idx, idx + 1);
                mapping.insert(idx, idx + 1);
            }
        }
        Ok(mapping)
    }

    /// Move the selected positions to the front, preserving their relative
    /// order and the relative order of everything else.
    pub fn move_to_top(&mut self, indices: &[usize]) -> Result<IndexMapping, EngineError> {
        self.check_indices(indices)?;
        let sorted = sorted_unique(indices);

        let mut mapping = IndexMapping::new();
        for (rank, &idx) in sorted.iter().enumerate() {
            mapping.insert(idx, rank);
        }
        self.partition_selected(&sorted, true);
        Ok(mapping)
    }

    /// Move the selected positions to the back, preserving relative order.
    pub fn move_to_bottom(&mut self, indices: &[usize]) -> Result<IndexMapping, EngineError> {
        self.check_indices(indices)?;
        let sorted = sorted_unique(indices);

        let first_new = self.items.len() - sorted.len();
        let mut mapping = IndexMapping::new();
        for (rank, &idx) in sorted.iter().enumerate() {
            mapping.insert(idx, first_new + rank);
        }
        self.partition_selected(&sorted, false);
        Ok(mapping)
    }

    /// Remove the source items and reinsert them contiguously at
    /// `drop_index`, interpreted against the list after the sources have
    /// been taken out (and clamped to its shrunken length, so dropping at
    /// the very end stays valid). Returns the old-index to new-index
    /// mapping for every item whose position changed; dragged items are
    /// always included.
    pub fn drag_and_drop(
        &mut self,
        source_indices: &[usize],
        drop_index: usize,
    ) -> Result<IndexMapping, EngineError> {
        self.check_indices(source_indices)?;
        if drop_index > self.items.len() {
            return Err(EngineError::InvalidIndex {
                index: drop_index,
                len: self.items.len(),
            });
        }

        let sources = sorted_unique(source_indices);
        let remaining = self.items.len() - sources.len();
        let drop_at = drop_index.min(remaining);

        // Pull the dragged items out back-to-front, then splice them in.
        let mut dragged: Vec<T> = Vec::with_capacity(sources.len());
        for &i in sources.iter().rev() {
            dragged.push(self.items.remove(i));
        }
        dragged.reverse();
        self.items.splice(drop_at..drop_at, dragged);

        let mut mapping = IndexMapping::new();
        let total = remaining + sources.len();
        for old in 0..total {
            let new = match sources.binary_search(&old) {
                Ok(rank) => drop_at + rank,
                Err(before) => {
                    // Position after removal of earlier sources, then
                    // shifted if it sits at or past the insertion point.
                    let shrunk = old - before;
                    if shrunk >= drop_at {
                        shrunk + sources.len()
                    } else {
                        shrunk
                    }
                }
            };
            if new != old || sources.binary_search(&old).is_ok() {
                mapping.insert(old, new);
            }
        }
        Ok(mapping)
    }

    /// Stable in-place sort. No index mapping is produced; a sort is
    /// reported to callers as "the view was resorted".
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(compare);
    }

    fn check_indices(&self, indices: &[usize]) -> Result<(), EngineError> {
        for &index in indices {
            if index >= self.items.len() {
                return Err(EngineError::InvalidIndex {
                    index,
                    len: self.items.len(),
                });
            }
        }
        Ok(())
    }

    /// Rebuild the list as selected-then-rest (or rest-then-selected),
    /// keeping the relative order within both sides. `sorted` must be
    /// ascending and in range.
    fn partition_selected(&mut self, sorted: &[usize], selected_first: bool) {
        let mut picked: Vec<T> = Vec::with_capacity(sorted.len());
        let mut rest: Vec<T> = Vec::with_capacity(self.items.len() - sorted.len());
        for (i, item) in self.items.drain(..).enumerate() {
            if sorted.binary_search(&i).is_ok() {
                picked.push(item);
            } else {
                rest.push(item);
            }
        }
        if selected_first {
            picked.extend(rest);
            self.items = picked;
        } else {
            rest.extend(picked);
            self.items = rest;
        }
    }
}

fn sorted_unique(indices: &[usize]) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}
