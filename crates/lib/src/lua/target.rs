//! Conversions between target types and Lua values.
//!
//! ```lua
//! targets = {
//!   platforms = { "win64" },
//!   toolchains = { "vs2019" },
//!   optimizations = { "Debug", "Release" }, -- optional, defaults to all
//! }
//!
//! overrides = {
//!   { when = { optimization = "Release" }, option = "warning_level=level4" },
//! }
//! ```

use mlua::prelude::*;

use crate::project::{CompilerOption, OptionOverride};
use crate::target::{Optimization, Platform, Target, TargetFilter, TargetSet, Toolchain};

/// Parse a `targets` table into a [`TargetSet`].
pub fn parse_target_set(table: &LuaTable) -> LuaResult<TargetSet> {
  let platforms = parse_axis::<Platform>(table, "platforms")?
    .ok_or_else(|| LuaError::external("targets requires 'platforms'"))?;
  let toolchains = parse_axis::<Toolchain>(table, "toolchains")?
    .ok_or_else(|| LuaError::external("targets requires 'toolchains'"))?;
  let optimizations = match parse_axis::<Optimization>(table, "optimizations")? {
    Some(values) => values,
    None => Optimization::ALL.to_vec(),
  };

  TargetSet::new(platforms, toolchains, optimizations).map_err(LuaError::external)
}

fn parse_axis<T>(table: &LuaTable, field: &str) -> LuaResult<Option<Vec<T>>>
where
  T: std::str::FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  let Some(values) = table.get::<Option<Vec<String>>>(field)? else {
    return Ok(None);
  };
  values
    .iter()
    .map(|v| v.parse::<T>().map_err(LuaError::external))
    .collect::<LuaResult<Vec<T>>>()
    .map(Some)
}

/// Parse a target given either as a key string (`"win64-vs2019-Debug"`) or
/// as a table with `platform`, `toolchain` and `optimization` fields.
pub fn parse_target(value: LuaValue) -> LuaResult<Target> {
  match value {
    LuaValue::String(s) => s.to_str()?.parse().map_err(LuaError::external),
    LuaValue::Table(t) => {
      let platform: String = t.get("platform")?;
      let toolchain: String = t.get("toolchain")?;
      let optimization: String = t.get("optimization")?;
      Ok(Target::new(
        platform.parse().map_err(LuaError::external)?,
        toolchain.parse().map_err(LuaError::external)?,
        optimization.parse().map_err(LuaError::external)?,
      ))
    }
    other => Err(LuaError::external(format!(
      "expected a target key or target table, got {}",
      other.type_name()
    ))),
  }
}

/// The table passed to configure rules as their second argument.
pub fn target_to_lua(lua: &Lua, target: &Target) -> LuaResult<LuaTable> {
  let table = lua.create_table()?;
  table.set("platform", target.platform.as_str())?;
  table.set("toolchain", target.toolchain.as_str())?;
  table.set("optimization", target.optimization.as_str())?;
  table.set("key", target.key())?;
  Ok(table)
}

/// Parse an `overrides` array.
pub fn parse_overrides(table: &LuaTable) -> LuaResult<Vec<OptionOverride>> {
  let mut overrides = Vec::new();
  for entry in table.sequence_values::<LuaTable>() {
    let entry = entry?;
    let when = match entry.get::<Option<LuaTable>>("when")? {
      Some(when) => parse_filter(&when)?,
      None => TargetFilter::any(),
    };
    let option: String = entry
      .get("option")
      .map_err(|_| LuaError::external("override requires an 'option' string"))?;
    let option: CompilerOption = option.parse().map_err(LuaError::external)?;
    overrides.push(OptionOverride::new(when, option));
  }
  Ok(overrides)
}

fn parse_filter(table: &LuaTable) -> LuaResult<TargetFilter> {
  let platform: Option<String> = table.get("platform")?;
  let toolchain: Option<String> = table.get("toolchain")?;
  let optimization: Option<String> = table.get("optimization")?;

  Ok(TargetFilter {
    platform: platform.map(|p| p.parse()).transpose().map_err(LuaError::external)?,
    toolchain: toolchain.map(|t| t.parse()).transpose().map_err(LuaError::external)?,
    optimization: optimization.map(|o| o.parse()).transpose().map_err(LuaError::external)?,
  })
}
