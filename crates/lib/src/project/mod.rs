//! Project declarations.
//!
//! A project is registered once with a name, a source-root template, the
//! target cells it supports and a configure rule. The composer calls the
//! rule once per requested cell with a fresh [`ProjectConfig`]; the rule
//! must depend only on the target it is given.
//!
//! # Submodules
//!
//! - [`options`] - compiler option set and per-axis option overrides

pub mod options;
mod types;

use std::fmt;

pub use options::{
  CompilerOption, CompilerOptions, LanguageStandard, OptionOverride, OptionParseError, RuntimeLibrary, WarningLevel,
};
pub use types::*;

use crate::target::{Target, TargetSet};
use crate::template::{Template, TemplateError};

/// Configure rule of a project.
pub type ConfigureFn = Box<dyn Fn(&mut ProjectConfig, &Target) -> Result<(), RuleError>>;

/// Default source root when a declaration does not name one.
pub const DEFAULT_SOURCE_ROOT: &str = "[root]";

/// A registered project.
pub struct ProjectDef {
  pub name: String,
  pub source_root: Template,
  pub targets: TargetSet,
  /// Overrides applied after the configure rule, on top of the composer's own.
  pub overrides: Vec<OptionOverride>,
  configure: ConfigureFn,
}

impl ProjectDef {
  /// Declare a project.
  ///
  /// # Errors
  ///
  /// The source root is parsed eagerly, so an unknown template variable is
  /// reported here rather than during composition.
  pub fn new<F>(name: impl Into<String>, source_root: &str, targets: TargetSet, configure: F) -> Result<Self, TemplateError>
  where
    F: Fn(&mut ProjectConfig, &Target) -> Result<(), RuleError> + 'static,
  {
    Ok(Self {
      name: name.into(),
      source_root: Template::parse(source_root)?,
      targets,
      overrides: Vec::new(),
      configure: Box::new(configure),
    })
  }

  pub fn with_override(mut self, option_override: OptionOverride) -> Self {
    self.overrides.push(option_override);
    self
  }

  /// Run the configure rule for one cell on a fresh configuration.
  pub fn configure(&self, target: &Target) -> Result<ProjectConfig, RuleError> {
    let mut config = ProjectConfig::new();
    (self.configure)(&mut config, target)?;
    Ok(config)
  }
}

impl fmt::Debug for ProjectDef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProjectDef")
      .field("name", &self.name)
      .field("source_root", &self.source_root.source())
      .field("targets", &self.targets)
      .field("overrides", &self.overrides)
      .finish_non_exhaustive()
  }
}
