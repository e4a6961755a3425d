//! Target axes and the build matrix.
//!
//! A [`Target`] is one cell of the build matrix: a (platform, toolchain,
//! optimization) tuple. Projects and solutions declare the cells they
//! support as a [`TargetSet`], whose cross product is iterated in a fixed
//! order so that composition is deterministic.

mod optimization;
mod platform;
mod toolchain;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use optimization::Optimization;
pub use platform::Platform;
pub use toolchain::Toolchain;

/// Errors raised while parsing target axis values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
  #[error("unknown platform: {0}")]
  UnknownPlatform(String),

  #[error("unknown toolchain: {0}")]
  UnknownToolchain(String),

  #[error("unknown optimization level: {0}")]
  UnknownOptimization(String),

  #[error("malformed target key '{0}': expected <platform>-<toolchain>-<optimization>")]
  MalformedKey(String),

  #[error("target set has an empty '{0}' axis")]
  EmptyAxis(&'static str),
}

/// One cell of the build matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Target {
  pub platform: Platform,
  pub toolchain: Toolchain,
  pub optimization: Optimization,
}

impl Target {
  pub fn new(platform: Platform, toolchain: Toolchain, optimization: Optimization) -> Self {
    Self {
      platform,
      toolchain,
      optimization,
    }
  }

  /// Stable identifier of this cell, e.g. `win64-vs2019-Debug`.
  pub fn key(&self) -> String {
    format!("{}-{}-{}", self.platform, self.toolchain, self.optimization)
  }

  /// Same platform and toolchain, different optimization level.
  pub fn with_optimization(self, optimization: Optimization) -> Self {
    Self { optimization, ..self }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.key())
  }
}

impl FromStr for Target {
  type Err = TargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut parts = s.split('-');
    let (Some(platform), Some(toolchain), Some(optimization), None) =
      (parts.next(), parts.next(), parts.next(), parts.next())
    else {
      return Err(TargetError::MalformedKey(s.to_string()));
    };

    Ok(Self {
      platform: platform.parse()?,
      toolchain: toolchain.parse()?,
      optimization: optimization.parse()?,
    })
  }
}

/// The set of cells a project or solution supports.
///
/// Stored per axis; the matrix is the cross product of the three axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSet {
  pub platforms: BTreeSet<Platform>,
  pub toolchains: BTreeSet<Toolchain>,
  pub optimizations: BTreeSet<Optimization>,
}

impl TargetSet {
  /// Build a target set, rejecting empty axes (an empty axis would make the
  /// whole matrix empty).
  pub fn new(
    platforms: impl IntoIterator<Item = Platform>,
    toolchains: impl IntoIterator<Item = Toolchain>,
    optimizations: impl IntoIterator<Item = Optimization>,
  ) -> Result<Self, TargetError> {
    let set = Self {
      platforms: platforms.into_iter().collect(),
      toolchains: toolchains.into_iter().collect(),
      optimizations: optimizations.into_iter().collect(),
    };

    if set.platforms.is_empty() {
      return Err(TargetError::EmptyAxis("platforms"));
    }
    if set.toolchains.is_empty() {
      return Err(TargetError::EmptyAxis("toolchains"));
    }
    if set.optimizations.is_empty() {
      return Err(TargetError::EmptyAxis("optimizations"));
    }

    Ok(set)
  }

  /// A single platform/toolchain with the given optimization levels.
  pub fn single(
    platform: Platform,
    toolchain: Toolchain,
    optimizations: impl IntoIterator<Item = Optimization>,
  ) -> Result<Self, TargetError> {
    Self::new([platform], [toolchain], optimizations)
  }

  pub fn contains(&self, target: &Target) -> bool {
    self.platforms.contains(&target.platform)
      && self.toolchains.contains(&target.toolchain)
      && self.optimizations.contains(&target.optimization)
  }

  /// Iterate the matrix: platforms, then toolchains, then optimizations.
  pub fn iter(&self) -> impl Iterator<Item = Target> + '_ {
    self.platforms.iter().flat_map(move |&platform| {
      self.toolchains.iter().flat_map(move |&toolchain| {
        self
          .optimizations
          .iter()
          .map(move |&optimization| Target::new(platform, toolchain, optimization))
      })
    })
  }

  pub fn len(&self) -> usize {
    self.platforms.len() * self.toolchains.len() * self.optimizations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Predicate over target cells. `None` on an axis matches any value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFilter {
  pub platform: Option<Platform>,
  pub toolchain: Option<Toolchain>,
  pub optimization: Option<Optimization>,
}

impl TargetFilter {
  /// Matches every cell.
  pub fn any() -> Self {
    Self::default()
  }

  pub fn optimization(optimization: Optimization) -> Self {
    Self {
      optimization: Some(optimization),
      ..Self::default()
    }
  }

  pub fn matches(&self, target: &Target) -> bool {
    self.platform.is_none_or(|p| p == target.platform)
      && self.toolchain.is_none_or(|t| t == target.toolchain)
      && self.optimization.is_none_or(|o| o == target.optimization)
  }
}
