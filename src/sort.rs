//! Sort specifications for views.
//!
//! A sort is routed to exactly one view and reported as "the view was
//! resorted"; no per-item index mapping is produced. All sorts are stable,
//! so a constant comparator leaves the existing order untouched.

use std::cmp::Ordering;

use crate::track::Track;

/// Field a view is sorted by. `GroupName` only has meaning for a grouped
/// view, where it reorders the group list instead of the tracks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Artist,
    Album,
    Genre,
    Duration,
    Path,
    GroupName,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub ascending: bool,
}

impl SortSpec {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            ascending: true,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            ascending: false,
        }
    }

    /// Compare two tracks under this spec. String fields compare
    /// case-insensitively; absent fields sort after present ones.
    pub fn compare_tracks(&self, a: &Track, b: &Track) -> Ordering {
        let ordering = match self.key {
            SortKey::Title => cmp_str(Some(&a.title), Some(&b.title)),
            SortKey::Artist => cmp_str(a.artist.as_deref(), b.artist.as_deref()),
            SortKey::Album => cmp_str(a.album.as_deref(), b.album.as_deref()),
            SortKey::Genre => cmp_str(a.genre.as_deref(), b.genre.as_deref()),
            SortKey::Duration => match (a.duration, b.duration) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Path => a.path.cmp(&b.path),
            // Group names are not a track property.
            SortKey::GroupName => Ordering::Equal,
        };
        self.apply_direction(ordering)
    }

    /// Compare two group names under this spec's direction.
    pub fn compare_names(&self, a: &str, b: &str) -> Ordering {
        self.apply_direction(a.to_lowercase().cmp(&b.to_lowercase()))
    }

    fn apply_direction(&self, ordering: Ordering) -> Ordering {
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

fn cmp_str(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
