//! Artifact sinks.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::types::{Artifact, EmitError};

/// Destination for rendered artifacts.
pub trait Sink {
  fn write(&mut self, artifact: &Artifact) -> Result<(), EmitError>;
}

/// Writes artifacts to disk.
///
/// Each file is written to a `.tmp` sibling first and renamed into place,
/// so a reader never observes a half-written file.
#[derive(Debug, Default)]
pub struct FileSink;

impl FileSink {
  pub fn new() -> Self {
    Self
  }
}

impl Sink for FileSink {
  fn write(&mut self, artifact: &Artifact) -> Result<(), EmitError> {
    let path = &artifact.path;
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).map_err(|source| EmitError::CreateDir {
        path: parent.to_path_buf(),
        source,
      })?;
    }

    let temp_path = temp_sibling(path);
    let write_err = |source| EmitError::Write {
      path: path.clone(),
      source,
    };
    fs::write(&temp_path, &artifact.contents).map_err(write_err)?;
    fs::rename(&temp_path, path).map_err(write_err)?;

    debug!(path = %path.display(), bytes = artifact.contents.len(), "wrote artifact");
    Ok(())
  }
}

fn temp_sibling(path: &Path) -> std::path::PathBuf {
  let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  name.push(".tmp");
  path.with_file_name(name)
}

/// Collects artifacts in memory. Used by `--dry-run`, `plan` and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
  pub artifacts: Vec<Artifact>,
}

impl MemorySink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, path: &Path) -> Option<&Artifact> {
    self.artifacts.iter().find(|a| a.path == path)
  }
}

impl Sink for MemorySink {
  fn write(&mut self, artifact: &Artifact) -> Result<(), EmitError> {
    self.artifacts.push(artifact.clone());
    Ok(())
  }
}
