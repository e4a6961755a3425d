//! Resolved composition output.
//!
//! A [`Composition`] is the fully resolved, validated result of one
//! generation pass: every project record and every solution record, keyed
//! so that serialization is deterministic.

mod types;

pub use types::*;
