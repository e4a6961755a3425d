use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TargetError;

/// Optimization level of a build variant.
///
/// The display form (`Debug`, `Release`, `Retail`) is what ends up in
/// resolved paths through `[target.optimization]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Optimization {
  Debug,
  Release,
  Retail,
}

impl Optimization {
  pub const ALL: [Optimization; 3] = [Self::Debug, Self::Release, Self::Retail];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::Release => "Release",
      Self::Retail => "Retail",
    }
  }

  pub fn is_debug(&self) -> bool {
    matches!(self, Self::Debug)
  }
}

impl fmt::Display for Optimization {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Optimization {
  type Err = TargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|o| o.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| TargetError::UnknownOptimization(s.to_string()))
  }
}
