//! The `solgen` global table.
//!
//! This module registers the `solgen` global table which provides:
//! - `solgen.host` - Host platform identifier (e.g., "linux", "win64"), nil if unknown
//! - `solgen.version` - Version of the generator
//! - `solgen.platforms`, `solgen.toolchains`, `solgen.optimizations` - Known axis values
//! - `solgen.project{}` - Declare a project
//! - `solgen.solution{}` - Declare a solution
//!
//! `solgen.dir` is set per loaded file by [`super::runtime::load_file`].

use std::cell::RefCell;
use std::rc::Rc;

use mlua::prelude::*;

use super::project::register_project;
use super::solution::register_solution;
use crate::consts::APP_NAME;
use crate::registry::Registry;
use crate::target::{Optimization, Platform, Toolchain};

/// Register the `solgen` global table in the Lua runtime.
pub fn register_globals(lua: &Lua, registry: Rc<RefCell<Registry>>) -> LuaResult<()> {
  let solgen = lua.create_table()?;

  solgen.set("host", Platform::host().map(|p| p.as_str()))?;
  solgen.set("version", env!("CARGO_PKG_VERSION"))?;

  solgen.set("platforms", Platform::ALL.map(|p| p.as_str()).to_vec())?;
  solgen.set("toolchains", Toolchain::ALL.map(|t| t.as_str()).to_vec())?;
  solgen.set("optimizations", Optimization::ALL.map(|o| o.as_str()).to_vec())?;

  register_project(lua, &solgen, registry.clone())?;
  register_solution(lua, &solgen, registry)?;

  lua.globals().set(APP_NAME, solgen)?;

  Ok(())
}
