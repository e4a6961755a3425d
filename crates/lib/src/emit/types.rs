//! Types for rendering and writing artifacts.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  pub path: PathBuf,
  pub contents: String,
}

/// Where artifacts are placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Layout {
  /// Next to each record's resolved project or solution path.
  #[default]
  RecordPaths,
  /// Everything flat in one directory.
  Flat(PathBuf),
}

/// Errors raised while rendering or writing artifacts.
#[derive(Debug, Error)]
pub enum EmitError {
  #[error("failed to serialize {name}: {source}")]
  Serialize {
    name: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to create directory {}: {source}", .path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}
