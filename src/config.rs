//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive scanning,
//! display-name composition and default search behavior, and helpers to
//! load configuration from disk.

mod load;
mod schema;

pub use schema::*;
