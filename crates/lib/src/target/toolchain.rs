use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TargetError;

/// Toolchain (IDE / build tool generation) a project is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
  Vs2017,
  Vs2019,
  Vs2022,
  Make,
}

impl Toolchain {
  pub const ALL: [Toolchain; 4] = [Self::Vs2017, Self::Vs2019, Self::Vs2022, Self::Make];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Vs2017 => "vs2017",
      Self::Vs2019 => "vs2019",
      Self::Vs2022 => "vs2022",
      Self::Make => "make",
    }
  }
}

impl fmt::Display for Toolchain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Toolchain {
  type Err = TargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|t| t.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| TargetError::UnknownToolchain(s.to_string()))
  }
}
