//! Search queries and matching.
//!
//! Matching is criterion-specific: name and title fields run against the
//! flat view, while artist/album/genre fields run against the group names
//! of the corresponding grouped view (a matching group contributes every
//! member track). Locations are view-specific, so the coordinator resolves
//! them against the requested target view only after matching.

use serde::Deserialize;

use crate::track::TrackRef;

/// Track field (or group-name field) a query matches against.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchField {
    /// The composed display name shown in the flat view.
    Display,
    Title,
    Artist,
    Album,
    Genre,
}

#[derive(Clone, Debug)]
pub struct SearchQuery {
    pub text: String,
    pub fields: Vec<SearchField>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, fields: Vec<SearchField>) -> Self {
        Self {
            text: text.into(),
            fields,
        }
    }

    /// Query across every field.
    pub fn any_field(text: impl Into<String>) -> Self {
        Self::new(
            text,
            vec![
                SearchField::Display,
                SearchField::Title,
                SearchField::Artist,
                SearchField::Album,
                SearchField::Genre,
            ],
        )
    }
}

/// View-specific address of a track: a flat index, or a
/// (group, index-within-group) pair. Ordering is top-to-bottom within the
/// addressed view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Location {
    Flat(usize),
    Grouped { group: usize, index: usize },
}

/// One search result, annotated with its location in the target view.
#[derive(Clone, Debug)]
pub struct SearchHit {
    pub track: TrackRef,
    pub location: Location,
}

/// Fuzzy/subsequence match: return the character positions in `text` that
/// match `query` in order, or `None` when there is no match. Matching is
/// case-insensitive.
pub fn fuzzy_match_positions(text: &str, query: &str) -> Option<Vec<usize>> {
    if query.is_empty() {
        return Some(Vec::new());
    }

    let mut positions: Vec<usize> = Vec::new();
    let mut text_iter = text.chars().enumerate();

    for qc in query.chars() {
        let qc_low = qc.to_lowercase().next().unwrap_or(qc);
        loop {
            match text_iter.next() {
                Some((ti, tc)) if tc.to_lowercase().next().unwrap_or(tc) == qc_low => {
                    positions.push(ti);
                    break;
                }
                Some(_) => continue,
                None => return None,
            }
        }
    }

    Some(positions)
}

/// Whether `text` fuzzily matches `query`.
pub fn matches(text: &str, query: &str) -> bool {
    fuzzy_match_positions(text, query).is_some()
}
