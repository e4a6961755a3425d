use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::options::CompilerOptions;
use crate::target::Target;

/// Kind of artifact a project produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
  /// Static library
  Library,
  /// Shared / dynamic library
  DynamicLibrary,
  #[default]
  Executable,
}

impl OutputKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Library => "lib",
      Self::DynamicLibrary => "dll",
      Self::Executable => "exe",
    }
  }

  /// Whether dependents link against this project's output.
  pub fn is_linkable(&self) -> bool {
    !matches!(self, Self::Executable)
  }
}

impl fmt::Display for OutputKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid output kind '{0}', expected one of: lib, dll, exe")]
pub struct OutputKindError(pub String);

impl FromStr for OutputKind {
  type Err = OutputKindError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "lib" | "library" | "static" => Ok(Self::Library),
      "dll" | "dynamic" | "shared" => Ok(Self::DynamicLibrary),
      "exe" | "executable" => Ok(Self::Executable),
      _ => Err(OutputKindError(s.to_string())),
    }
  }
}

/// Whether a dependency is re-exported to the dependent's own dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
  Private,
  Public,
}

impl fmt::Display for Visibility {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Private => write!(f, "private"),
      Self::Public => write!(f, "public"),
    }
  }
}

/// A dependency declared from inside a configure rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
  pub project: String,
  /// Cell of the dependency to link against; `None` means the dependent's own cell.
  pub target: Option<Target>,
  pub visibility: Visibility,
}

impl Dependency {
  pub fn private(project: impl Into<String>) -> Self {
    Self {
      project: project.into(),
      target: None,
      visibility: Visibility::Private,
    }
  }

  pub fn public(project: impl Into<String>) -> Self {
    Self {
      project: project.into(),
      target: None,
      visibility: Visibility::Public,
    }
  }

  pub fn on_target(mut self, target: Target) -> Self {
    self.target = Some(target);
    self
  }
}

/// The mutable configuration a configure rule fills in for one cell.
///
/// Paths are template strings; they are parsed and resolved by the
/// composer once the rule returns. Unset paths fall back to the composer's
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
  pub project_path: Option<String>,
  pub target_path: Option<String>,
  pub intermediate_path: Option<String>,
  pub include_paths: Vec<String>,
  pub library_paths: Vec<String>,
  pub libraries: BTreeSet<String>,
  pub defines: BTreeSet<String>,
  pub output: OutputKind,
  pub options: CompilerOptions,
  pub dependencies: Vec<Dependency>,
}

impl ProjectConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_project_path(&mut self, path: impl Into<String>) -> &mut Self {
    self.project_path = Some(path.into());
    self
  }

  pub fn set_target_path(&mut self, path: impl Into<String>) -> &mut Self {
    self.target_path = Some(path.into());
    self
  }

  pub fn set_intermediate_path(&mut self, path: impl Into<String>) -> &mut Self {
    self.intermediate_path = Some(path.into());
    self
  }

  pub fn set_output(&mut self, output: OutputKind) -> &mut Self {
    self.output = output;
    self
  }

  pub fn add_include_path(&mut self, path: impl Into<String>) -> &mut Self {
    self.include_paths.push(path.into());
    self
  }

  pub fn add_library_path(&mut self, path: impl Into<String>) -> &mut Self {
    self.library_paths.push(path.into());
    self
  }

  pub fn add_libraries<I, S>(&mut self, names: I) -> &mut Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.libraries.extend(names.into_iter().map(Into::into));
    self
  }

  pub fn add_define(&mut self, define: impl Into<String>) -> &mut Self {
    self.defines.insert(define.into());
    self
  }

  pub fn add_dependency(&mut self, dependency: Dependency) -> &mut Self {
    self.dependencies.push(dependency);
    self
  }

  pub fn add_private_dependency(&mut self, project: impl Into<String>) -> &mut Self {
    self.add_dependency(Dependency::private(project))
  }

  pub fn add_public_dependency(&mut self, project: impl Into<String>) -> &mut Self {
    self.add_dependency(Dependency::public(project))
  }
}

/// Error returned by a configure rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RuleError(pub String);

impl RuleError {
  pub fn new(message: impl Into<String>) -> Self {
    Self(message.into())
  }
}
