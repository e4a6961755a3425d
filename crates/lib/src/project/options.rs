//! Compiler option set carried by every configuration record.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::target::{Optimization, Target, TargetFilter};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}', expected one of: {expected}")]
pub struct OptionParseError {
  pub kind: &'static str,
  pub value: String,
  pub expected: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LanguageStandard {
  #[serde(rename = "c++11")]
  Cpp11,
  #[serde(rename = "c++14")]
  Cpp14,
  #[serde(rename = "c++17")]
  Cpp17,
  #[serde(rename = "c++20")]
  Cpp20,
  #[serde(rename = "latest")]
  Latest,
}

impl LanguageStandard {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Cpp11 => "c++11",
      Self::Cpp14 => "c++14",
      Self::Cpp17 => "c++17",
      Self::Cpp20 => "c++20",
      Self::Latest => "latest",
    }
  }
}

impl FromStr for LanguageStandard {
  type Err = OptionParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "c++11" | "cpp11" => Ok(Self::Cpp11),
      "c++14" | "cpp14" => Ok(Self::Cpp14),
      "c++17" | "cpp17" => Ok(Self::Cpp17),
      "c++20" | "cpp20" => Ok(Self::Cpp20),
      "latest" => Ok(Self::Latest),
      _ => Err(OptionParseError {
        kind: "language standard",
        value: s.to_string(),
        expected: "c++11, c++14, c++17, c++20, latest",
      }),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
  Off,
  Level1,
  Level2,
  Level3,
  Level4,
  All,
}

impl WarningLevel {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Off => "off",
      Self::Level1 => "level1",
      Self::Level2 => "level2",
      Self::Level3 => "level3",
      Self::Level4 => "level4",
      Self::All => "all",
    }
  }
}

impl FromStr for WarningLevel {
  type Err = OptionParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "off" | "0" => Ok(Self::Off),
      "level1" | "1" => Ok(Self::Level1),
      "level2" | "2" => Ok(Self::Level2),
      "level3" | "3" => Ok(Self::Level3),
      "level4" | "4" => Ok(Self::Level4),
      "all" => Ok(Self::All),
      _ => Err(OptionParseError {
        kind: "warning level",
        value: s.to_string(),
        expected: "off, level1..level4, all",
      }),
    }
  }
}

/// C runtime library linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuntimeLibrary {
  /// Static, release (`/MT`)
  #[serde(rename = "mt")]
  MultiThreaded,
  /// Static, debug (`/MTd`)
  #[serde(rename = "mtd")]
  MultiThreadedDebug,
  /// Dynamic, release (`/MD`)
  #[serde(rename = "md")]
  MultiThreadedDll,
  /// Dynamic, debug (`/MDd`)
  #[serde(rename = "mdd")]
  MultiThreadedDebugDll,
}

impl RuntimeLibrary {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::MultiThreaded => "mt",
      Self::MultiThreadedDebug => "mtd",
      Self::MultiThreadedDll => "md",
      Self::MultiThreadedDebugDll => "mdd",
    }
  }
}

impl FromStr for RuntimeLibrary {
  type Err = OptionParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "mt" | "multithreaded" => Ok(Self::MultiThreaded),
      "mtd" | "multithreadeddebug" => Ok(Self::MultiThreadedDebug),
      "md" | "multithreadeddll" => Ok(Self::MultiThreadedDll),
      "mdd" | "multithreadeddebugdll" => Ok(Self::MultiThreadedDebugDll),
      _ => Err(OptionParseError {
        kind: "runtime library",
        value: s.to_string(),
        expected: "mt, mtd, md, mdd",
      }),
    }
  }
}

/// A single compiler option, as inserted by an [`OptionOverride`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilerOption {
  LanguageStandard(LanguageStandard),
  WarningLevel(WarningLevel),
  RuntimeLibrary(RuntimeLibrary),
  PlatformVersion(String),
  Flag(String),
}

impl fmt::Display for CompilerOption {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::LanguageStandard(v) => write!(f, "language_standard={}", v.as_str()),
      Self::WarningLevel(v) => write!(f, "warning_level={}", v.as_str()),
      Self::RuntimeLibrary(v) => write!(f, "runtime_library={}", v.as_str()),
      Self::PlatformVersion(v) => write!(f, "platform_version={}", v),
      Self::Flag(v) => write!(f, "flag={}", v),
    }
  }
}

impl FromStr for CompilerOption {
  type Err = OptionParseError;

  /// Parse the `key=value` form used by [`fmt::Display`].
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || OptionParseError {
      kind: "compiler option",
      value: s.to_string(),
      expected: "language_standard=, warning_level=, runtime_library=, platform_version=, flag=",
    };

    let (key, value) = s.split_once('=').ok_or_else(invalid)?;
    match key {
      "language_standard" => Ok(Self::LanguageStandard(value.parse()?)),
      "warning_level" => Ok(Self::WarningLevel(value.parse()?)),
      "runtime_library" => Ok(Self::RuntimeLibrary(value.parse()?)),
      "platform_version" => Ok(Self::PlatformVersion(value.to_string())),
      "flag" => Ok(Self::Flag(value.to_string())),
      _ => Err(invalid()),
    }
  }
}

/// The compiler option set of a configuration record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOptions {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub language_standard: Option<LanguageStandard>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub warning_level: Option<WarningLevel>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub runtime_library: Option<RuntimeLibrary>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub platform_version: Option<String>,
  #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
  pub flags: BTreeSet<String>,
}

impl CompilerOptions {
  /// Insert a single option. Scalar options replace the current value,
  /// flags accumulate.
  pub fn apply(&mut self, option: CompilerOption) {
    match option {
      CompilerOption::LanguageStandard(v) => self.language_standard = Some(v),
      CompilerOption::WarningLevel(v) => self.warning_level = Some(v),
      CompilerOption::RuntimeLibrary(v) => self.runtime_library = Some(v),
      CompilerOption::PlatformVersion(v) => self.platform_version = Some(v),
      CompilerOption::Flag(v) => {
        self.flags.insert(v);
      }
    }
  }
}

/// A predicate-gated option insertion, applied after the configure rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionOverride {
  pub when: TargetFilter,
  pub option: CompilerOption,
}

impl OptionOverride {
  pub fn new(when: TargetFilter, option: CompilerOption) -> Self {
    Self { when, option }
  }

  /// Debug cells link the multi-threaded debug runtime.
  pub fn debug_runtime() -> Self {
    Self::new(
      TargetFilter::optimization(Optimization::Debug),
      CompilerOption::RuntimeLibrary(RuntimeLibrary::MultiThreadedDebug),
    )
  }

  /// Apply to `options` if `target` matches. Returns whether it applied.
  pub fn apply_to(&self, target: &Target, options: &mut CompilerOptions) -> bool {
    if !self.when.matches(target) {
      return false;
    }
    options.apply(self.option.clone());
    true
  }
}
