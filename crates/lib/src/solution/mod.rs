//! Solution declarations.
//!
//! A solution groups projects for each of its target cells and marks one
//! of them as the startup project. Like projects, a solution is a name, a
//! target set and a configure rule run once per cell.

use std::fmt;

use crate::project::RuleError;
use crate::target::{Target, TargetSet};

/// Configure rule of a solution.
pub type SolutionConfigureFn = Box<dyn Fn(&mut SolutionConfig, &Target) -> Result<(), RuleError>>;

/// What a solution rule fills in for one cell.
///
/// Startup marks are recorded as given; whether exactly one project ends
/// up marked is checked by the composer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionConfig {
  pub solution_path: Option<String>,
  pub projects: Vec<String>,
  pub startup_projects: Vec<String>,
}

impl SolutionConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_solution_path(&mut self, path: impl Into<String>) -> &mut Self {
    self.solution_path = Some(path.into());
    self
  }

  /// Add a project to the solution. Adding the same project twice is a no-op.
  pub fn add_project(&mut self, name: impl Into<String>) -> &mut Self {
    let name = name.into();
    if !self.projects.contains(&name) {
      self.projects.push(name);
    }
    self
  }

  /// Mark a project as the startup project.
  pub fn set_startup_project(&mut self, name: impl Into<String>) -> &mut Self {
    let name = name.into();
    if !self.startup_projects.contains(&name) {
      self.startup_projects.push(name);
    }
    self
  }
}

/// A registered solution.
pub struct SolutionDef {
  pub name: String,
  pub targets: TargetSet,
  configure: SolutionConfigureFn,
}

impl SolutionDef {
  pub fn new<F>(name: impl Into<String>, targets: TargetSet, configure: F) -> Self
  where
    F: Fn(&mut SolutionConfig, &Target) -> Result<(), RuleError> + 'static,
  {
    Self {
      name: name.into(),
      targets,
      configure: Box::new(configure),
    }
  }

  pub fn configure(&self, target: &Target) -> Result<SolutionConfig, RuleError> {
    let mut config = SolutionConfig::new();
    (self.configure)(&mut config, target)?;
    Ok(config)
  }
}

impl fmt::Debug for SolutionDef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SolutionDef")
      .field("name", &self.name)
      .field("targets", &self.targets)
      .finish_non_exhaustive()
  }
}
