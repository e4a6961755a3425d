//! solgen-lib: Core types and logic for solgen
//!
//! This crate provides the fundamental types used throughout solgen:
//! - `Target`: one cell of the platform × toolchain × optimization matrix
//! - `ProjectDef` / `SolutionDef`: named declarations with configure rules
//! - `Registry`: the table of declarations a composition runs over
//! - `Composition`: validated project and solution records for every cell
//! - `emit`: rendering a composition as JSON descriptions

pub mod compose;
pub mod consts;
pub mod emit;
pub mod eval;
pub mod lua;
pub mod manifest;
pub mod project;
pub mod registry;
pub mod solution;
pub mod target;
pub mod template;
pub mod util;
