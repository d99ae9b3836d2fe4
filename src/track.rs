//! Track model types: `Track`, grouping criteria and gap annotations.
//!
//! A track is identified by its absolute file path; two tracks are equal
//! iff their paths are equal. Metadata fields are optional because tags
//! are filled in by the loading collaborator and may simply be missing.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::TrackDisplayField;

/// Bucket name used when a track has no value for the grouping criterion.
pub const UNKNOWN_GROUP: &str = "Unknown";

#[derive(Clone, Debug)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<Duration>,
    pub display: String,
}

impl Track {
    /// Build a track with no metadata beyond its path; the title and
    /// display name fall back to the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let display = title.clone();
        Self {
            path,
            title,
            artist: None,
            album: None,
            genre: None,
            duration: None,
            display,
        }
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// Shared handle to a track. Each track is allocated once; every view
/// holds clones of the handle, so positions move but the track does not.
pub type TrackRef = Arc<Track>;

/// Metadata field a grouped view buckets tracks by.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Criterion {
    Artist,
    Album,
    Genre,
}

impl Criterion {
    pub const ALL: [Criterion; 3] = [Criterion::Artist, Criterion::Album, Criterion::Genre];

    /// The raw metadata value for this criterion, if the track has one.
    pub fn value_of<'a>(&self, track: &'a Track) -> Option<&'a str> {
        let value = match self {
            Criterion::Artist => track.artist.as_deref(),
            Criterion::Album => track.album.as_deref(),
            Criterion::Genre => track.genre.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    /// The group a track belongs to under this criterion, falling back to
    /// the `"Unknown"` sentinel when the field is absent or blank.
    pub fn group_name(&self, track: &Track) -> String {
        self.value_of(track).unwrap_or(UNKNOWN_GROUP).to_string()
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Artist => write!(f, "artist"),
            Criterion::Album => write!(f, "album"),
            Criterion::Genre => write!(f, "genre"),
        }
    }
}

/// A playback pause annotated before or after a specific track. Gaps are
/// persisted alongside the playlist but take no part in ordering logic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub length: Duration,
}

impl Gap {
    pub fn new(length: Duration) -> Self {
        Self { length }
    }
}

/// Build a display string for a track according to the provided `fields`
/// and separator, falling back to `title` when no parts were produced.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    genre: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                // "display" as a field means "artist - title".
                if let Some(a) = artist.map(str::trim).filter(|s| !s.is_empty()) {
                    parts.push(a.to_string());
                }
                if !title.trim().is_empty() {
                    parts.push(title.trim().to_string());
                }
            }
            TrackDisplayField::Title => {
                if !title.trim().is_empty() {
                    parts.push(title.trim().to_string());
                }
            }
            TrackDisplayField::Artist => {
                if let Some(a) = artist.map(str::trim).filter(|s| !s.is_empty()) {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Album => {
                if let Some(a) = album.map(str::trim).filter(|s| !s.is_empty()) {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Genre => {
                if let Some(g) = genre.map(str::trim).filter(|s| !s.is_empty()) {
                    parts.push(g.to_string());
                }
            }
            TrackDisplayField::Filename => {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if !stem.trim().is_empty() {
                        parts.push(stem.to_string());
                    }
                }
            }
            TrackDisplayField::Path => {
                parts.push(path.display().to_string());
            }
        }
    }

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
