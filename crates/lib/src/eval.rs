//! Declaration file evaluation.
//!
//! This module provides [`evaluate_config`], which takes a path to a Lua
//! declaration file and returns the resulting [`Composition`].

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::prelude::*;
use tracing::{debug, info};

use crate::compose::{ComposeError, ComposeSettings, compose};
use crate::consts::ROOT_ENV_VAR;
use crate::lua::runtime;
use crate::manifest::Composition;
use crate::registry::Registry;

/// Errors that can occur during evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  /// Lua evaluation error.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  /// The declarations evaluated but do not compose.
  #[error(transparent)]
  Compose(#[from] ComposeError),

  #[error("declaration file not found: {}", .0.display())]
  NotFound(PathBuf),

  #[error("cannot resolve root {}: {source}", .path.display())]
  Root {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Options of an evaluation besides the declaration file itself.
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
  /// Explicit `[root]`; takes precedence over the environment.
  pub root: Option<PathBuf>,
  /// Solutions to compose; empty means all.
  pub solutions: Vec<String>,
}

/// Evaluate a declaration file and compose everything it declares.
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use solgen_lib::eval::{EvalOptions, evaluate_config};
///
/// let composition = evaluate_config(Path::new("solgen.lua"), &EvalOptions::default())?;
/// println!("Solutions: {}", composition.solutions.len());
/// ```
pub fn evaluate_config(path: &Path, options: &EvalOptions) -> Result<Composition, EvalError> {
  let root = resolve_root(path, options.root.as_deref())?;
  let registry = load_registry(path)?;

  let mut settings = ComposeSettings::new(root);
  settings.solutions = options.solutions.clone();

  Ok(compose(&registry, &settings)?)
}

/// Evaluate a declaration file into a [`Registry`] without composing it.
pub fn load_registry(path: &Path) -> Result<Registry, EvalError> {
  if !path.is_file() {
    return Err(EvalError::NotFound(path.to_path_buf()));
  }

  info!(path = %path.display(), "evaluating declarations");

  let shared = Rc::new(RefCell::new(Registry::new()));
  let loaded = runtime::create_runtime(shared.clone()).and_then(|lua| runtime::load_file(&lua, path).map(|_| ()));

  // Lua rules keep the runtime alive from inside the registry, so the
  // registry must not stay reachable from the runtime's globals. The
  // emptied table left behind is sealed so rules cannot register into it.
  let registry = shared.take();
  shared.borrow_mut().seal();
  loaded?;

  debug!(
    projects = registry.project_count(),
    solutions = registry.solution_count(),
    "declarations loaded"
  );
  Ok(registry)
}

/// Determine the `[root]` value for a declaration file.
///
/// Precedence: `explicit`, then `SOLGEN_ROOT`, then the file's directory.
/// The result is absolute and uses `/` separators.
pub fn resolve_root(config_path: &Path, explicit: Option<&Path>) -> Result<String, EvalError> {
  let root = match explicit {
    Some(root) => root.to_path_buf(),
    None => match std::env::var_os(ROOT_ENV_VAR) {
      Some(value) if !value.is_empty() => PathBuf::from(value),
      _ => match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
      },
    },
  };

  let resolved = dunce::canonicalize(&root)
    .or_else(|_| std::path::absolute(&root))
    .map_err(|source| EvalError::Root {
      path: root.clone(),
      source,
    })?;

  let root = resolved.to_string_lossy().replace('\\', "/");
  debug!(root = %root, "resolved root");
  Ok(root)
}
