//! Settings and error types for composition.

use thiserror::Error;

use crate::project::OptionOverride;
use crate::target::Target;
use crate::template::TemplateError;

/// Project path used when a configure rule leaves it unset.
pub const DEFAULT_PROJECT_PATH: &str = "[root]";

/// Output path used when a configure rule leaves it unset.
pub const DEFAULT_TARGET_PATH: &str = "[root]/output/[target.platform]/[target.optimization]";

/// Intermediate path used when a configure rule leaves it unset.
pub const DEFAULT_INTERMEDIATE_PATH: &str = "[root]/obj/[target.platform]/[target.optimization]";

/// Solution path used when a solution rule leaves it unset.
pub const DEFAULT_SOLUTION_PATH: &str = "[root]";

/// Inputs of a composition pass besides the registry itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeSettings {
  /// Value of the `[root]` template variable.
  pub root: String,
  /// Overrides applied to every project after its configure rule.
  pub overrides: Vec<OptionOverride>,
  /// Solutions to compose; empty means all registered solutions.
  pub solutions: Vec<String>,
}

impl ComposeSettings {
  /// Settings with the default Debug runtime policy.
  pub fn new(root: impl Into<String>) -> Self {
    Self {
      root: root.into(),
      overrides: vec![OptionOverride::debug_runtime()],
      solutions: Vec::new(),
    }
  }

  pub fn with_override(mut self, option_override: OptionOverride) -> Self {
    self.overrides.push(option_override);
    self
  }

  /// Drop all composer-level overrides, including the Debug runtime policy.
  pub fn without_overrides(mut self) -> Self {
    self.overrides.clear();
    self
  }

  pub fn only_solution(mut self, name: impl Into<String>) -> Self {
    self.solutions.push(name.into());
    self
  }
}

/// Structural problems in the declared projects and solutions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
  #[error("solution '{solution}' has no startup project for {target}")]
  NoStartupProject { solution: String, target: Target },

  #[error("solution '{solution}' has multiple startup projects for {target}: {}", .projects.join(", "))]
  MultipleStartupProjects {
    solution: String,
    target: Target,
    projects: Vec<String>,
  },

  #[error("startup project '{project}' is not part of solution '{solution}' for {target}")]
  StartupNotInSolution {
    solution: String,
    target: Target,
    project: String,
  },

  #[error("dependency cycle for {target}: {}", .projects.join(" -> "))]
  DependencyCycle { target: Target, projects: Vec<String> },

  #[error("unknown project '{project}' referenced by {referenced_by}")]
  UnknownProject { project: String, referenced_by: String },

  #[error("unknown solution '{0}'")]
  UnknownSolution(String),

  #[error("project '{0}' is already registered")]
  DuplicateProject(String),

  #[error("solution '{0}' is already registered")]
  DuplicateSolution(String),

  #[error("cannot register '{0}': declarations are closed once the file has loaded")]
  RegistrySealed(String),

  #[error("project '{project}' does not support target {target} (requested by {requested_by})")]
  UnsupportedTarget {
    project: String,
    target: Target,
    requested_by: String,
  },

  #[error("no solutions registered")]
  NoSolutions,
}

/// Errors that abort a composition pass.
#[derive(Debug, Error)]
pub enum ComposeError {
  #[error(transparent)]
  Configuration(#[from] ConfigurationError),

  #[error("{owner}: invalid {field}: {source}")]
  Template {
    owner: String,
    field: &'static str,
    source: TemplateError,
  },

  #[error("configure rule of {owner} failed for {target}: {message}")]
  Rule {
    owner: String,
    target: Target,
    message: String,
  },
}

impl ComposeError {
  /// The configuration error, if this is one.
  pub fn as_configuration(&self) -> Option<&ConfigurationError> {
    match self {
      Self::Configuration(e) => Some(e),
      _ => None,
    }
  }

  /// The template error, if this is one.
  pub fn as_template(&self) -> Option<&TemplateError> {
    match self {
      Self::Template { source, .. } => Some(source),
      _ => None,
    }
  }
}
