//! Implementation of the `solgen plan` command.
//!
//! Composes a declaration file and prints what `generate` would produce,
//! without writing anything.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use solgen_lib::emit::{Layout, render};
use solgen_lib::manifest::{Composition, DependencyEdge, SolutionRecord};
use solgen_lib::target::Target;
use solgen_lib::util::hash::Hashable;

use super::compose_file;
use crate::output::{OutputFormat, print_json, print_solution_heading, print_stat, short_hash, symbols};

#[derive(Debug, Serialize)]
struct PlanSummary {
  hash: String,
  root: String,
  solutions: Vec<SolutionSummary>,
  files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SolutionSummary {
  name: String,
  configurations: Vec<CellSummary>,
}

#[derive(Debug, Serialize)]
struct CellSummary {
  target: String,
  solution_path: String,
  startup_project: String,
  build_order: Vec<String>,
  edges: Vec<String>,
}

impl CellSummary {
  fn from_record(record: &SolutionRecord) -> Self {
    Self {
      target: record.target.key(),
      solution_path: record.solution_path.clone(),
      startup_project: record.startup_project.clone(),
      build_order: record.build_order.clone(),
      edges: record
        .dependencies
        .iter()
        .map(|e| format_edge(record, e))
        .collect(),
    }
  }
}

/// `from → to (visibility)`, with the target key of any end outside the
/// record's cell.
fn format_edge(record: &SolutionRecord, edge: &DependencyEdge) -> String {
  let end = |name: &str, target: &Target| {
    if *target == record.target {
      name.to_string()
    } else {
      format!("{name}@{}", target.key())
    }
  };
  format!(
    "{} {} {} ({})",
    end(&edge.from, &edge.from_target),
    symbols::EDGE,
    end(&edge.to, &edge.to_target),
    edge.visibility
  )
}

fn summarize(composition: &Composition, hash: String) -> Result<PlanSummary> {
  let files = render(composition, &Layout::RecordPaths)
    .context("Failed to render descriptions")?
    .into_iter()
    .map(|a| a.path)
    .collect();

  let solutions = composition
    .solutions
    .values()
    .map(|solution| SolutionSummary {
      name: solution.name.clone(),
      configurations: solution.configurations.values().map(CellSummary::from_record).collect(),
    })
    .collect();

  Ok(PlanSummary {
    hash,
    root: composition.root.clone(),
    solutions,
    files,
  })
}

pub fn cmd_plan(file: &Path, root: Option<PathBuf>, solutions: Vec<String>, output: OutputFormat) -> Result<()> {
  let composition = compose_file(file, root, solutions)?;
  let hash = composition.compute_hash().context("Failed to compute composition hash")?;
  let summary = summarize(&composition, hash.0)?;

  if output.is_json() {
    return print_json(&summary);
  }

  println!("Plan: {}", short_hash(&summary.hash));
  print_stat("Root", &summary.root);

  for solution in &summary.solutions {
    println!();
    print_solution_heading(&solution.name);
    for cell in &solution.configurations {
      println!("  {}", cell.target);
      print_stat("  Startup", &cell.startup_project);
      print_stat("  Path", &cell.solution_path);
      print_stat("  Build order", &cell.build_order.join(", "));
      for edge in &cell.edges {
        println!("      {}", edge);
      }
    }
  }

  println!();
  println!("Files: {}", summary.files.len());
  for path in &summary.files {
    println!("  {}", path.display());
  }

  Ok(())
}
