//! Path templates with a closed vocabulary of axis-derived variables.
//!
//! Every path in a configuration record is written as a template and
//! resolved once per target cell during composition.
//!
//! # Syntax
//!
//! - `[variable]` - substituted with the variable's value
//! - `[[` - a literal `[`
//! - a lone `]` passes through unchanged
//!
//! # Vocabulary
//!
//! | Variable              | Value                                    |
//! |-----------------------|------------------------------------------|
//! | `root`                | the generation root (config file dir)    |
//! | `project.name`        | name of the project being configured     |
//! | `solution.name`       | name of the solution being configured    |
//! | `target.platform`     | e.g. `win64`                             |
//! | `target.toolchain`    | e.g. `vs2019`                            |
//! | `target.optimization` | `Debug`, `Release` or `Retail`           |
//!
//! Names are matched case-insensitively, so `[target.Optimization]` works.
//! Unknown names are rejected when the template is parsed, not when it is
//! resolved.
//!
//! # Example
//!
//! ```
//! use solgen_lib::template::{Template, TemplateContext};
//! use solgen_lib::target::{Optimization, Platform, Target, Toolchain};
//!
//! let template = Template::parse("[root]/gui/binaries/[target.optimization]").unwrap();
//! let target = Target::new(Platform::Win64, Toolchain::Vs2019, Optimization::Release);
//! let ctx = TemplateContext::new("/work").with_target(target);
//! assert_eq!(template.resolve(&ctx).unwrap(), "/work/gui/binaries/Release");
//! ```

use std::fmt;

use thiserror::Error;

use crate::target::Target;

/// A variable of the template vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
  Root,
  ProjectName,
  SolutionName,
  TargetPlatform,
  TargetToolchain,
  TargetOptimization,
}

impl Variable {
  pub const ALL: [Variable; 6] = [
    Self::Root,
    Self::ProjectName,
    Self::SolutionName,
    Self::TargetPlatform,
    Self::TargetToolchain,
    Self::TargetOptimization,
  ];

  pub fn name(&self) -> &'static str {
    match self {
      Self::Root => "root",
      Self::ProjectName => "project.name",
      Self::SolutionName => "solution.name",
      Self::TargetPlatform => "target.platform",
      Self::TargetToolchain => "target.toolchain",
      Self::TargetOptimization => "target.optimization",
    }
  }

  /// Look up a variable by name, ignoring ASCII case.
  pub fn lookup(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|v| v.name().eq_ignore_ascii_case(name))
  }
}

impl fmt::Display for Variable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}]", self.name())
  }
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Literal(String),
  Variable(Variable),
}

/// Errors that can occur during template parsing or resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
  #[error("unclosed '[' at position {0}")]
  Unclosed(usize),

  #[error("empty variable at position {0}")]
  Empty(usize),

  #[error("unknown template variable: [{0}]")]
  UnknownVariable(String),

  #[error("template variable [{0}] is not available in this context")]
  Unavailable(&'static str),
}

/// Supplies values for template variables.
pub trait Resolver {
  fn resolve_variable(&self, variable: Variable) -> Result<&str, TemplateError>;
}

/// The standard resolver used during composition.
///
/// Which variables are available depends on what is being resolved: a
/// solution path has no `project.name`, a source root has no target.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
  root: &'a str,
  project: Option<&'a str>,
  solution: Option<&'a str>,
  target: Option<Target>,
}

impl<'a> TemplateContext<'a> {
  pub fn new(root: &'a str) -> Self {
    Self {
      root,
      project: None,
      solution: None,
      target: None,
    }
  }

  pub fn with_project(mut self, name: &'a str) -> Self {
    self.project = Some(name);
    self
  }

  pub fn with_solution(mut self, name: &'a str) -> Self {
    self.solution = Some(name);
    self
  }

  pub fn with_target(mut self, target: Target) -> Self {
    self.target = Some(target);
    self
  }
}

impl Resolver for TemplateContext<'_> {
  fn resolve_variable(&self, variable: Variable) -> Result<&str, TemplateError> {
    let unavailable = || TemplateError::Unavailable(variable.name());
    match variable {
      Variable::Root => Ok(self.root),
      Variable::ProjectName => self.project.ok_or_else(unavailable),
      Variable::SolutionName => self.solution.ok_or_else(unavailable),
      Variable::TargetPlatform => self.target.map(|t| t.platform.as_str()).ok_or_else(unavailable),
      Variable::TargetToolchain => self.target.map(|t| t.toolchain.as_str()).ok_or_else(unavailable),
      Variable::TargetOptimization => self.target.map(|t| t.optimization.as_str()).ok_or_else(unavailable),
    }
  }
}

/// A parsed, validated template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  source: String,
  segments: Vec<Segment>,
}

impl Template {
  /// Parse and validate a template string.
  ///
  /// # Errors
  ///
  /// Returns an error for an unclosed `[`, an empty `[]`, or a variable
  /// outside the vocabulary.
  pub fn parse(input: &str) -> Result<Self, TemplateError> {
    Ok(Self {
      source: input.to_string(),
      segments: parse(input)?,
    })
  }

  /// The original template text.
  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  /// Variables referenced by this template, in order of appearance.
  pub fn variables(&self) -> impl Iterator<Item = Variable> + '_ {
    self.segments.iter().filter_map(|s| match s {
      Segment::Variable(v) => Some(*v),
      Segment::Literal(_) => None,
    })
  }

  pub fn resolve(&self, resolver: &impl Resolver) -> Result<String, TemplateError> {
    substitute_segments(&self.segments, resolver)
  }
}

impl fmt::Display for Template {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.source)
  }
}

/// Parse a template string into segments.
pub fn parse(input: &str) -> Result<Vec<Segment>, TemplateError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '[' {
      literal.push(ch);
      continue;
    }

    // "[[" is an escaped bracket
    if let Some((_, '[')) = chars.peek() {
      chars.next();
      literal.push('[');
      continue;
    }

    let mut name = String::new();
    let mut found_close = false;
    for (_, c) in chars.by_ref() {
      if c == ']' {
        found_close = true;
        break;
      }
      name.push(c);
    }

    if !found_close {
      return Err(TemplateError::Unclosed(pos));
    }
    if name.is_empty() {
      return Err(TemplateError::Empty(pos));
    }

    let variable = Variable::lookup(&name).ok_or(TemplateError::UnknownVariable(name))?;

    if !literal.is_empty() {
      segments.push(Segment::Literal(std::mem::take(&mut literal)));
    }
    segments.push(Segment::Variable(variable));
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Parse and substitute in one step.
pub fn substitute(input: &str, resolver: &impl Resolver) -> Result<String, TemplateError> {
  let segments = parse(input)?;
  substitute_segments(&segments, resolver)
}

/// Substitute variables in pre-parsed segments.
pub fn substitute_segments(segments: &[Segment], resolver: &impl Resolver) -> Result<String, TemplateError> {
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Variable(v) => result.push_str(resolver.resolve_variable(*v)?),
    }
  }

  Ok(result)
}
