//! Lua front-end.
//!
//! Declaration files are Lua scripts evaluated against a `solgen` global.
//! `solgen.project{}` and `solgen.solution{}` populate a [`Registry`] with
//! rules that call back into Lua when the composer runs them.
//!
//! # Submodules
//!
//! - [`globals`] - The `solgen` global table
//! - [`project`] - `solgen.project{}` and the project `conf` userdata
//! - [`runtime`] - Lua VM creation and file loading
//! - [`solution`] - `solgen.solution{}` and the solution `conf` userdata
//! - [`target`] - Target and override conversions
//!
//! [`Registry`]: crate::registry::Registry

pub mod globals;
pub mod project;
pub mod runtime;
pub mod solution;
pub mod target;
