//! The registration table.
//!
//! Maps project and solution identities to their declarations. Both the
//! Lua front-end and Rust callers fill the same table; the composer only
//! ever reads it. A sealed registry rejects further registrations.

use std::collections::BTreeMap;

use tracing::debug;

use crate::compose::ConfigurationError;
use crate::project::ProjectDef;
use crate::solution::SolutionDef;

#[derive(Debug, Default)]
pub struct Registry {
  projects: BTreeMap<String, ProjectDef>,
  solutions: BTreeMap<String, SolutionDef>,
  sealed: bool,
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stop accepting registrations.
  pub fn seal(&mut self) {
    self.sealed = true;
  }

  /// Register a project under its name.
  ///
  /// # Errors
  ///
  /// Returns `RegistrySealed` once the registry is sealed and
  /// `DuplicateProject` if the name is already registered.
  pub fn register_project(&mut self, def: ProjectDef) -> Result<(), ConfigurationError> {
    if self.sealed {
      return Err(ConfigurationError::RegistrySealed(def.name));
    }
    if self.projects.contains_key(&def.name) {
      return Err(ConfigurationError::DuplicateProject(def.name));
    }
    debug!(project = %def.name, targets = def.targets.len(), "registered project");
    self.projects.insert(def.name.clone(), def);
    Ok(())
  }

  /// Register a solution under its name.
  ///
  /// # Errors
  ///
  /// Returns `RegistrySealed` once the registry is sealed and
  /// `DuplicateSolution` if the name is already registered.
  pub fn register_solution(&mut self, def: SolutionDef) -> Result<(), ConfigurationError> {
    if self.sealed {
      return Err(ConfigurationError::RegistrySealed(def.name));
    }
    if self.solutions.contains_key(&def.name) {
      return Err(ConfigurationError::DuplicateSolution(def.name));
    }
    debug!(solution = %def.name, targets = def.targets.len(), "registered solution");
    self.solutions.insert(def.name.clone(), def);
    Ok(())
  }

  pub fn project(&self, name: &str) -> Option<&ProjectDef> {
    self.projects.get(name)
  }

  pub fn solution(&self, name: &str) -> Option<&SolutionDef> {
    self.solutions.get(name)
  }

  /// Projects in name order.
  pub fn projects(&self) -> impl Iterator<Item = &ProjectDef> {
    self.projects.values()
  }

  /// Solutions in name order.
  pub fn solutions(&self) -> impl Iterator<Item = &SolutionDef> {
    self.solutions.values()
  }

  pub fn project_count(&self) -> usize {
    self.projects.len()
  }

  pub fn solution_count(&self) -> usize {
    self.solutions.len()
  }
}
