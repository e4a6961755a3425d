//! Emission of a composition as JSON descriptions.
//!
//! Rendering and writing are separate: [`render`] turns a [`Composition`]
//! into in-memory [`Artifact`]s, and only once every artifact has rendered
//! does [`emit`] hand them to a [`Sink`]. A serialization failure therefore
//! never leaves a partial set of files behind.
//!
//! # Files
//!
//! ```text
//! <solution path>/<solution>.solution.json   # all cells sharing that path
//! <project path>/<project>.project.json      # all cells sharing that path
//! ```
//!
//! With [`Layout::Flat`] every file lands in one directory and a project's
//! cells are merged into a single file regardless of their project paths.

mod sink;
mod types;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

pub use sink::{FileSink, MemorySink, Sink};
pub use types::*;

use crate::consts::{PROJECT_FILE_SUFFIX, SOLUTION_FILE_SUFFIX};
use crate::manifest::{Composition, ProjectManifest, SolutionManifest};

/// Render every artifact of `composition`, sorted by path.
pub fn render(composition: &Composition, layout: &Layout) -> Result<Vec<Artifact>, EmitError> {
  let mut files: BTreeMap<PathBuf, String> = BTreeMap::new();

  for solution in composition.solutions.values() {
    let mut by_path: BTreeMap<PathBuf, SolutionManifest> = BTreeMap::new();
    for (key, record) in &solution.configurations {
      let file = artifact_path(layout, &record.solution_path, &solution.name, SOLUTION_FILE_SUFFIX);
      by_path
        .entry(file)
        .or_insert_with(|| SolutionManifest {
          name: solution.name.clone(),
          ..SolutionManifest::default()
        })
        .configurations
        .insert(key.clone(), record.clone());
    }
    for (path, manifest) in by_path {
      files.insert(path, to_json(&manifest.name, &manifest)?);
    }
  }

  for project in composition.projects.values() {
    let mut by_path: BTreeMap<PathBuf, ProjectManifest> = BTreeMap::new();
    for (key, record) in &project.configurations {
      let file = artifact_path(layout, &record.project_path, &project.name, PROJECT_FILE_SUFFIX);
      by_path
        .entry(file)
        .or_insert_with(|| ProjectManifest {
          name: project.name.clone(),
          ..ProjectManifest::default()
        })
        .configurations
        .insert(key.clone(), record.clone());
    }
    for (path, manifest) in by_path {
      files.insert(path, to_json(&manifest.name, &manifest)?);
    }
  }

  Ok(
    files
      .into_iter()
      .map(|(path, contents)| Artifact { path, contents })
      .collect(),
  )
}

/// Render `composition` and write every artifact to `sink`.
///
/// Returns the paths written, in order.
pub fn emit(composition: &Composition, layout: &Layout, sink: &mut impl Sink) -> Result<Vec<PathBuf>, EmitError> {
  let artifacts = render(composition, layout)?;

  for artifact in &artifacts {
    sink.write(artifact)?;
  }

  info!(files = artifacts.len(), "emitted artifacts");
  Ok(artifacts.into_iter().map(|a| a.path).collect())
}

fn artifact_path(layout: &Layout, record_dir: &str, name: &str, suffix: &str) -> PathBuf {
  let file_name = format!("{name}{suffix}");
  match layout {
    Layout::RecordPaths => Path::new(record_dir).join(file_name),
    Layout::Flat(dir) => dir.join(file_name),
  }
}

fn to_json<T: Serialize>(name: &str, value: &T) -> Result<String, EmitError> {
  let mut json = serde_json::to_string_pretty(value).map_err(|source| EmitError::Serialize {
    name: name.to_string(),
    source,
  })?;
  json.push('\n');
  Ok(json)
}
