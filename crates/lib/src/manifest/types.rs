//! Resolved record types.
//!
//! All maps are [`BTreeMap`]s and all sets [`BTreeSet`]s so that two
//! compositions of the same input serialize to identical bytes, which is
//! what the composition hash relies on.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::project::{CompilerOptions, OutputKind, Visibility};
use crate::target::Target;
use crate::util::hash::Hashable;

/// A dependency after target resolution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolvedDependency {
  pub project: String,
  pub target: Target,
  pub visibility: Visibility,
}

/// The configuration record of one project for one target cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
  pub project: String,
  pub target: Target,
  pub source_root: String,
  pub project_path: String,
  pub target_path: String,
  pub intermediate_path: String,
  pub include_paths: Vec<String>,
  pub library_paths: Vec<String>,
  pub libraries: BTreeSet<String>,
  pub defines: BTreeSet<String>,
  pub output: OutputKind,
  pub options: CompilerOptions,
  /// Direct dependencies, in declaration order.
  pub dependencies: Vec<ResolvedDependency>,
  /// Direct dependencies plus everything they re-export through public edges.
  pub visible_dependencies: BTreeSet<String>,
}

impl ProjectRecord {
  pub fn depends_on(&self, project: &str) -> bool {
    self.dependencies.iter().any(|d| d.project == project)
  }
}

/// A dependency edge inside a solution.
///
/// Both ends carry their target cell: a dependency bound to another cell
/// (e.g. a Debug project linking a Release library) keeps that binding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
  pub from: String,
  pub from_target: Target,
  pub to: String,
  pub to_target: Target,
  pub visibility: Visibility,
}

/// The solution record for one target cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRecord {
  pub solution: String,
  pub target: Target,
  pub solution_path: String,
  pub projects: BTreeSet<String>,
  pub startup_project: String,
  pub dependencies: BTreeSet<DependencyEdge>,
  /// Project names ordered so that dependencies come before their
  /// dependents. A project bound in several cells is listed once.
  pub build_order: Vec<String>,
}

impl SolutionRecord {
  /// The edge between `from` and `to` when both are in this record's cell.
  pub fn edge(&self, from: &str, to: &str) -> Option<&DependencyEdge> {
    self.edge_to(from, to, &self.target)
  }

  /// The edge from `from` in this record's cell to `to` bound in `to_target`.
  pub fn edge_to(&self, from: &str, to: &str, to_target: &Target) -> Option<&DependencyEdge> {
    self
      .dependencies
      .iter()
      .find(|e| e.from == from && e.from_target == self.target && e.to == to && e.to_target == *to_target)
  }
}

/// All records of one project, keyed by target key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
  pub name: String,
  pub configurations: BTreeMap<String, ProjectRecord>,
}

/// All records of one solution, keyed by target key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionManifest {
  pub name: String,
  pub configurations: BTreeMap<String, SolutionRecord>,
}

/// The result of a composition pass.
///
/// # Example
///
/// ```json
/// {
///   "root": "/work/engine",
///   "solutions": {
///     "Engine-Workspace": { "name": "Engine-Workspace", "configurations": { "win64-vs2019-Debug": { ... } } }
///   },
///   "projects": {
///     "EngineGUI": { "name": "EngineGUI", "configurations": { ... } },
///     "RenderTest": { "name": "RenderTest", "configurations": { ... } }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
  pub root: String,
  pub solutions: BTreeMap<String, SolutionManifest>,
  pub projects: BTreeMap<String, ProjectManifest>,
}

impl Composition {
  pub fn project_record(&self, project: &str, target: &Target) -> Option<&ProjectRecord> {
    self.projects.get(project)?.configurations.get(&target.key())
  }

  pub fn solution_record(&self, solution: &str, target: &Target) -> Option<&SolutionRecord> {
    self.solutions.get(solution)?.configurations.get(&target.key())
  }

  /// Total number of project records across all projects.
  pub fn record_count(&self) -> usize {
    self.projects.values().map(|p| p.configurations.len()).sum()
  }
}

impl Hashable for Composition {}
