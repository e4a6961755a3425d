//! Lua bindings for `solgen.solution{}`.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use mlua::prelude::*;

use crate::lua::project::project_name;
use crate::lua::target::{parse_target_set, target_to_lua};
use crate::project::RuleError;
use crate::registry::Registry;
use crate::solution::{SolutionConfig, SolutionDef};
use crate::target::Target;

impl LuaUserData for SolutionConfig {
  fn add_fields<F: LuaUserDataFields<Self>>(fields: &mut F) {
    fields.add_field_method_get("solution_path", |_, this| Ok(this.solution_path.clone()));
    fields.add_field_method_set("solution_path", |_, this, path: Option<String>| {
      this.solution_path = path;
      Ok(())
    });
  }

  fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
    methods.add_method_mut("add_project", |_, this, project: LuaValue| {
      this.add_project(project_name(project)?);
      Ok(())
    });

    methods.add_method_mut("set_startup_project", |_, this, project: LuaValue| {
      this.set_startup_project(project_name(project)?);
      Ok(())
    });
  }
}

fn call_solution_rule(lua: &Lua, rule: &LuaFunction, config: &mut SolutionConfig, target: &Target) -> LuaResult<()> {
  let ud = lua.create_userdata(mem::take(config))?;
  let target_table = target_to_lua(lua, target)?;
  let result = rule.call::<()>((&ud, target_table));
  *config = ud.take()?;
  result
}

/// Register the `solgen.solution` function on the solgen table.
pub fn register_solution(lua: &Lua, solgen: &LuaTable, registry: Rc<RefCell<Registry>>) -> LuaResult<()> {
  let solution_fn = lua.create_function(move |lua, decl: LuaTable| {
    let name: String = decl
      .get("name")
      .map_err(|_| LuaError::external("solution declaration requires 'name' field"))?;

    let targets: LuaTable = decl
      .get("targets")
      .map_err(|_| LuaError::external(format!("solution '{name}' requires a 'targets' table")))?;
    let targets = parse_target_set(&targets)?;

    let configure: LuaFunction = decl
      .get("configure")
      .map_err(|_| LuaError::external(format!("solution '{name}' requires a 'configure' function")))?;

    let rule_lua = lua.clone();
    let def = SolutionDef::new(name.clone(), targets, move |config, target| {
      call_solution_rule(&rule_lua, &configure, config, target).map_err(|e| RuleError::new(e.to_string()))
    });

    registry.borrow_mut().register_solution(def).map_err(LuaError::external)?;
    Ok(())
  })?;

  solgen.set("solution", solution_fn)?;
  Ok(())
}
