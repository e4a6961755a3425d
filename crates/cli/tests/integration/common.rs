//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the declaration file;
/// that directory is also the `[root]` of the generated descriptions.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  /// Create from a fixture file.
  ///
  /// Copies the fixture content to a temporary `solgen.lua` file.
  pub fn from_fixture(name: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("solgen.lua");
    let content = fixture_content(name);
    std::fs::write(&config_path, content).unwrap();
    Self { temp, config_path }
  }

  /// Canonical root path, as it appears inside generated descriptions.
  pub fn root_path(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  /// Path relative to the root.
  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.root_path().join(relative_path)
  }

  /// Every file under the root except the declaration file itself.
  pub fn generated_files(&self) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_files(self.temp.path(), &mut files);
    files.retain(|p| p != &self.config_path);
    files.sort();
    files
  }

  /// Get a pre-configured Command for the solgen binary.
  ///
  /// Clears `SOLGEN_ROOT` so the root defaults to the fixture's directory.
  pub fn solgen_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("solgen");
    cmd.env_remove("SOLGEN_ROOT");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
  for entry in std::fs::read_dir(dir).unwrap() {
    let path = entry.unwrap().path();
    if path.is_dir() {
      collect_files(&path, out);
    } else {
      out.push(path);
    }
  }
}
