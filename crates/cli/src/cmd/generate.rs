//! Implementation of the `solgen generate` command.
//!
//! Evaluates a declaration file, composes every selected solution and writes
//! the resulting descriptions. Nothing is written unless composition and
//! rendering both succeed.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use solgen_lib::emit::{FileSink, Layout, MemorySink, emit};
use solgen_lib::util::hash::Hashable;

use super::compose_file;
use crate::output::{OutputFormat, format_duration, print_file, print_json, print_stat, print_success};

#[derive(Debug, Serialize)]
struct GenerateResult {
  hash: String,
  solutions: Vec<String>,
  projects: usize,
  files: Vec<PathBuf>,
  dry_run: bool,
}

pub fn cmd_generate(
  file: &Path,
  root: Option<PathBuf>,
  out: Option<PathBuf>,
  solutions: Vec<String>,
  dry_run: bool,
  output: OutputFormat,
) -> Result<()> {
  let start = Instant::now();

  let composition = compose_file(file, root, solutions)?;
  let hash = composition.compute_hash().context("Failed to compute composition hash")?;

  let layout = match out {
    Some(dir) => Layout::Flat(dir),
    None => Layout::RecordPaths,
  };

  let files = if dry_run {
    emit(&composition, &layout, &mut MemorySink::new()).context("Failed to render descriptions")?
  } else {
    emit(&composition, &layout, &mut FileSink::new()).context("Failed to write descriptions")?
  };

  info!(hash = %hash, files = files.len(), dry_run, "generate complete");

  if output.is_json() {
    return print_json(&GenerateResult {
      hash: hash.0,
      solutions: composition.solutions.keys().cloned().collect(),
      projects: composition.projects.len(),
      files,
      dry_run,
    });
  }

  for path in &files {
    print_file(path, !dry_run);
  }

  if dry_run {
    print_success(&format!("Dry run: {} file(s) would be written", files.len()));
  } else {
    print_success(&format!("Generated {} file(s)", files.len()));
  }
  print_stat("Solutions", &composition.solutions.len().to_string());
  print_stat("Projects", &composition.projects.len().to_string());
  print_stat("Hash", &hash.0);
  print_stat("Elapsed", &format_duration(start.elapsed()));

  Ok(())
}
