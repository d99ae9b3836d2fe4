//! Persistence boundary types.
//!
//! A snapshot captures each view's ordered file-path list plus the gap
//! annotations, ready for an external serializer. Loading is the caller's
//! job: re-add every track, then run one `re_order` pass per view and
//! `restore_gaps`. The engine itself never reads or writes files; the
//! TOML helpers here only encode and decode in memory.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::track::{Criterion, Gap};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Flat view order.
    pub flat: Vec<PathBuf>,
    /// Per-criterion grouped view order, flattened group by group.
    pub views: BTreeMap<Criterion, Vec<PathBuf>>,
    pub gaps_before: BTreeMap<PathBuf, Gap>,
    pub gaps_after: BTreeMap<PathBuf, Gap>,
}

impl Snapshot {
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}
