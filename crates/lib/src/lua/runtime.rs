use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;

use crate::consts::APP_NAME;
use crate::lua::globals;
use crate::registry::Registry;

/// Create a new Lua runtime with the `solgen` global registered.
///
/// Declarations evaluated in the returned runtime register into `registry`.
pub fn create_runtime(registry: Rc<RefCell<Registry>>) -> LuaResult<Lua> {
  let lua = Lua::new();
  globals::register_globals(&lua, registry)?;
  Ok(lua)
}

/// Load and execute a declaration file.
///
/// Sets `solgen.dir` to the directory of the file and makes modules next to
/// it loadable with `require`.
pub fn load_file(lua: &Lua, path: &Path) -> LuaResult<LuaValue> {
  let canonical_path = dunce::canonicalize(path)
    .map_err(|e| LuaError::external(format!("cannot canonicalize '{}': {}", path.display(), e)))?;
  let content = std::fs::read_to_string(&canonical_path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", canonical_path.display(), e)))?;

  let dir = canonical_path
    .parent()
    .unwrap_or(Path::new(""))
    .to_string_lossy()
    .replace('\\', "/");

  let solgen = lua.globals().get::<LuaTable>(APP_NAME)?;
  solgen.set("dir", dir.as_str())?;

  let package = lua.globals().get::<LuaTable>("package")?;
  let package_path: String = package.get("path")?;
  package.set("path", format!("{dir}/?.lua;{dir}/?/init.lua;{package_path}"))?;

  lua
    .load(&content)
    .set_name(format!("@{}", canonical_path.display()))
    .eval::<LuaValue>()
}
