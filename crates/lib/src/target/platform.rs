use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TargetError;

/// Platforms a project can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  Win32,
  Win64,
  Linux,
  MacOs,
}

impl Platform {
  pub const ALL: [Platform; 4] = [Self::Win32, Self::Win64, Self::Linux, Self::MacOs];

  /// Detect the platform of the machine running the generator
  ///
  /// Returns `None` if the host OS or architecture has no matching platform
  pub fn host() -> Option<Self> {
    match (std::env::consts::OS, std::env::consts::ARCH) {
      ("windows", "x86_64") | ("windows", "aarch64") => Some(Self::Win64),
      ("windows", "x86") => Some(Self::Win32),
      ("linux", _) => Some(Self::Linux),
      ("macos", _) => Some(Self::MacOs),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this platform
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Win32 => "win32",
      Self::Win64 => "win64",
      Self::Linux => "linux",
      Self::MacOs => "macos",
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Platform {
  type Err = TargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|p| p.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| TargetError::UnknownPlatform(s.to_string()))
  }
}
