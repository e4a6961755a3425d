//! Shared helpers for library integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use mlua::prelude::*;
use solgen_lib::compose::{ComposeError, ComposeSettings, compose};
use solgen_lib::lua::runtime::create_runtime;
use solgen_lib::manifest::Composition;
use solgen_lib::registry::Registry;
use solgen_lib::target::{Optimization, Platform, Target, Toolchain};

pub const ROOT: &str = "/work/engine";

/// A Lua runtime with the `solgen` global and the registry it fills.
pub fn create_test_runtime() -> LuaResult<(Lua, Rc<RefCell<Registry>>)> {
  let registry = Rc::new(RefCell::new(Registry::new()));
  let lua = create_runtime(registry.clone())?;
  Ok((lua, registry))
}

/// Evaluate `script` and compose the result with default settings.
pub fn compose_script(script: &str) -> LuaResult<Result<Composition, ComposeError>> {
  let (lua, registry) = create_test_runtime()?;
  lua.load(script).exec()?;
  let registry = registry.take();
  Ok(compose(&registry, &ComposeSettings::new(ROOT)))
}

pub fn win64(optimization: Optimization) -> Target {
  Target::new(Platform::Win64, Toolchain::Vs2019, optimization)
}
