//! Lua bindings for `solgen.project{}`.
//!
//! This module provides:
//! - `ProjectConfig` as LuaUserData, the `conf` argument of configure rules
//! - `register_project()` to register the `solgen.project` function
//! - Project reference tables and their parsing

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use mlua::prelude::*;

use crate::consts::PROJECT_REF_TYPE;
use crate::lua::target::{parse_overrides, parse_target, parse_target_set, target_to_lua};
use crate::project::{CompilerOption, DEFAULT_SOURCE_ROOT, Dependency, ProjectConfig, ProjectDef, RuleError};
use crate::registry::Registry;
use crate::target::Target;

impl LuaUserData for ProjectConfig {
  fn add_fields<F: LuaUserDataFields<Self>>(fields: &mut F) {
    fields.add_field_method_get("project_path", |_, this| Ok(this.project_path.clone()));
    fields.add_field_method_set("project_path", |_, this, path: Option<String>| {
      this.project_path = path;
      Ok(())
    });

    fields.add_field_method_get("target_path", |_, this| Ok(this.target_path.clone()));
    fields.add_field_method_set("target_path", |_, this, path: Option<String>| {
      this.target_path = path;
      Ok(())
    });

    fields.add_field_method_get("intermediate_path", |_, this| Ok(this.intermediate_path.clone()));
    fields.add_field_method_set("intermediate_path", |_, this, path: Option<String>| {
      this.intermediate_path = path;
      Ok(())
    });

    fields.add_field_method_get("output", |_, this| Ok(this.output.as_str()));
    fields.add_field_method_set("output", |_, this, output: String| {
      this.output = output.parse().map_err(LuaError::external)?;
      Ok(())
    });

    fields.add_field_method_get("language_standard", |_, this| {
      Ok(this.options.language_standard.map(|v| v.as_str()))
    });
    fields.add_field_method_set("language_standard", |_, this, value: Option<String>| {
      this.options.language_standard = value.map(|v| v.parse()).transpose().map_err(LuaError::external)?;
      Ok(())
    });

    fields.add_field_method_get("warning_level", |_, this| Ok(this.options.warning_level.map(|v| v.as_str())));
    fields.add_field_method_set("warning_level", |_, this, value: Option<String>| {
      this.options.warning_level = value.map(|v| v.parse()).transpose().map_err(LuaError::external)?;
      Ok(())
    });

    fields.add_field_method_get("runtime_library", |_, this| {
      Ok(this.options.runtime_library.map(|v| v.as_str()))
    });
    fields.add_field_method_set("runtime_library", |_, this, value: Option<String>| {
      this.options.runtime_library = value.map(|v| v.parse()).transpose().map_err(LuaError::external)?;
      Ok(())
    });

    fields.add_field_method_get("platform_version", |_, this| Ok(this.options.platform_version.clone()));
    fields.add_field_method_set("platform_version", |_, this, value: Option<String>| {
      this.options.platform_version = value;
      Ok(())
    });
  }

  fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
    methods.add_method_mut("add_include_path", |_, this, path: String| {
      this.add_include_path(path);
      Ok(())
    });

    methods.add_method_mut("add_library_path", |_, this, path: String| {
      this.add_library_path(path);
      Ok(())
    });

    methods.add_method_mut("add_library", |_, this, names: LuaVariadic<String>| {
      this.add_libraries(names.iter().cloned());
      Ok(())
    });

    methods.add_method_mut("add_define", |_, this, define: String| {
      this.add_define(define);
      Ok(())
    });

    methods.add_method_mut("add_flag", |_, this, flag: String| {
      this.options.apply(CompilerOption::Flag(flag));
      Ok(())
    });

    methods.add_method_mut(
      "add_private_dependency",
      |_, this, (project, target): (LuaValue, Option<LuaValue>)| {
        let dependency = parse_dependency(project, target, Dependency::private)?;
        this.add_dependency(dependency);
        Ok(())
      },
    );

    methods.add_method_mut(
      "add_public_dependency",
      |_, this, (project, target): (LuaValue, Option<LuaValue>)| {
        let dependency = parse_dependency(project, target, Dependency::public)?;
        this.add_dependency(dependency);
        Ok(())
      },
    );
  }
}

fn parse_dependency(
  project: LuaValue,
  target: Option<LuaValue>,
  make: fn(String) -> Dependency,
) -> LuaResult<Dependency> {
  let dependency = make(project_name(project)?);
  match target {
    Some(target) => Ok(dependency.on_target(parse_target(target)?)),
    None => Ok(dependency),
  }
}

/// Accept a project reference table or a plain project name.
pub fn project_name(value: LuaValue) -> LuaResult<String> {
  match value {
    LuaValue::String(s) => Ok(s.to_str()?.to_string()),
    LuaValue::Table(t) => {
      if let Some(mt) = t.metatable()
        && let Ok(type_name) = mt.get::<String>("__type")
        && type_name == PROJECT_REF_TYPE
      {
        return t.get("name");
      }
      Err(LuaError::external("expected a project reference or project name, got a plain table"))
    }
    other => Err(LuaError::external(format!(
      "expected a project reference or project name, got {}",
      other.type_name()
    ))),
  }
}

/// Build a project reference table: `{ name = ... }` marked with `__type`.
pub fn project_ref_to_lua(lua: &Lua, name: &str) -> LuaResult<LuaTable> {
  let table = lua.create_table()?;
  table.set("name", name)?;

  let mt = lua.create_table()?;
  mt.set("__type", PROJECT_REF_TYPE)?;
  table.set_metatable(Some(mt))?;

  Ok(table)
}

/// Run a Lua configure rule against `config` for one cell.
///
/// The config is moved into userdata for the duration of the call and moved
/// back afterwards, so the rule mutates the caller's value.
fn call_project_rule(lua: &Lua, rule: &LuaFunction, config: &mut ProjectConfig, target: &Target) -> LuaResult<()> {
  let ud = lua.create_userdata(mem::take(config))?;
  let target_table = target_to_lua(lua, target)?;
  let result = rule.call::<()>((&ud, target_table));
  *config = ud.take()?;
  result
}

/// Register the `solgen.project` function on the solgen table.
///
/// The `solgen.project{}` function:
/// 1. Parses name, source_root, targets and overrides from the declaration table
/// 2. Wraps the `configure` function as a rule of the registered project
/// 3. Returns a project reference usable in dependency and solution calls
pub fn register_project(lua: &Lua, solgen: &LuaTable, registry: Rc<RefCell<Registry>>) -> LuaResult<()> {
  let project_fn = lua.create_function(move |lua, decl: LuaTable| {
    let name: String = decl
      .get("name")
      .map_err(|_| LuaError::external("project declaration requires 'name' field"))?;

    let source_root: Option<String> = decl.get("source_root")?;

    let targets: LuaTable = decl
      .get("targets")
      .map_err(|_| LuaError::external(format!("project '{name}' requires a 'targets' table")))?;
    let targets = parse_target_set(&targets)?;

    let overrides = match decl.get::<Option<LuaTable>>("overrides")? {
      Some(table) => parse_overrides(&table)?,
      None => Vec::new(),
    };

    let configure: LuaFunction = decl
      .get("configure")
      .map_err(|_| LuaError::external(format!("project '{name}' requires a 'configure' function")))?;

    let rule_lua = lua.clone();
    let def = ProjectDef::new(
      name.clone(),
      source_root.as_deref().unwrap_or(DEFAULT_SOURCE_ROOT),
      targets,
      move |config, target| {
        call_project_rule(&rule_lua, &configure, config, target).map_err(|e| RuleError::new(e.to_string()))
      },
    )
    .map_err(|e| LuaError::external(format!("project '{name}': invalid source_root: {e}")))?;
    let def = overrides.into_iter().fold(def, ProjectDef::with_override);

    registry.borrow_mut().register_project(def).map_err(LuaError::external)?;

    project_ref_to_lua(lua, &name)
  })?;

  solgen.set("project", project_fn)?;
  Ok(())
}
