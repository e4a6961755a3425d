//! The composition pass.
//!
//! [`compose`] walks every selected solution over its target matrix:
//!
//! 1. Run the solution rule for the cell and validate its startup mark
//! 2. Configure each referenced project for the cell, following declared
//!    dependencies (pulling them into the solution if needed)
//! 3. Apply option overrides and resolve every path template
//! 4. Build the cell's dependency graph and reject cycles
//! 5. Record visible dependencies and the solution record
//!
//! Project records are memoized by (project, target), so a project shared
//! by several solutions is configured once per cell. Nothing is emitted
//! here; a composition either completes or fails as a whole.
//!
//! # Submodules
//!
//! - [`graph`] - per-cell dependency graph and cycle detection

pub mod graph;
mod types;

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use tracing::{debug, info, warn};

pub use graph::{DependencyGraph, NodeKey};
pub use types::*;

use crate::manifest::{
  Composition, DependencyEdge, ProjectManifest, ProjectRecord, ResolvedDependency, SolutionManifest, SolutionRecord,
};
use crate::project::ProjectDef;
use crate::registry::Registry;
use crate::solution::{SolutionConfig, SolutionDef};
use crate::target::Target;
use crate::template::{Template, TemplateContext};

/// Compose all selected solutions of `registry`.
///
/// # Errors
///
/// - [`ConfigurationError`] for structural problems (startup marks, cycles,
///   unknown or unsupported projects)
/// - [`ComposeError::Template`] for paths that fail to parse or resolve
/// - [`ComposeError::Rule`] when a configure rule itself fails
pub fn compose(registry: &Registry, settings: &ComposeSettings) -> Result<Composition, ComposeError> {
  let solutions = select_solutions(registry, settings)?;

  info!(
    solutions = solutions.len(),
    projects = registry.project_count(),
    root = %settings.root,
    "composing"
  );

  let mut records: BTreeMap<NodeKey, ProjectRecord> = BTreeMap::new();
  let mut composition = Composition {
    root: settings.root.clone(),
    ..Composition::default()
  };

  for solution in solutions {
    let mut manifest = SolutionManifest {
      name: solution.name.clone(),
      ..SolutionManifest::default()
    };

    for target in solution.targets.iter() {
      let record = compose_solution_cell(registry, settings, solution, target, &mut records)?;
      manifest.configurations.insert(target.key(), record);
    }

    composition.solutions.insert(solution.name.clone(), manifest);
  }

  for ((name, target), record) in records {
    composition
      .projects
      .entry(name.clone())
      .or_insert_with(|| ProjectManifest {
        name: name.clone(),
        ..ProjectManifest::default()
      })
      .configurations
      .insert(target.key(), record);
  }

  for project in registry.projects() {
    if !composition.projects.contains_key(&project.name) {
      warn!(project = %project.name, "project is not referenced by any solution, skipping");
    }
  }

  info!(
    solutions = composition.solutions.len(),
    records = composition.record_count(),
    "composition complete"
  );

  Ok(composition)
}

fn select_solutions<'r>(
  registry: &'r Registry,
  settings: &ComposeSettings,
) -> Result<Vec<&'r SolutionDef>, ConfigurationError> {
  if registry.solution_count() == 0 {
    return Err(ConfigurationError::NoSolutions);
  }

  if settings.solutions.is_empty() {
    return Ok(registry.solutions().collect());
  }

  settings
    .solutions
    .iter()
    .map(|name| {
      registry
        .solution(name)
        .ok_or_else(|| ConfigurationError::UnknownSolution(name.clone()))
    })
    .collect()
}

/// Check that exactly one project is marked startup and that it belongs to
/// the solution. Returns the startup project's name.
pub fn validate_startup(solution: &str, target: Target, config: &SolutionConfig) -> Result<String, ConfigurationError> {
  match config.startup_projects.as_slice() {
    [] => Err(ConfigurationError::NoStartupProject {
      solution: solution.to_string(),
      target,
    }),
    [startup] if config.projects.contains(startup) => Ok(startup.clone()),
    [startup] => Err(ConfigurationError::StartupNotInSolution {
      solution: solution.to_string(),
      target,
      project: startup.clone(),
    }),
    many => Err(ConfigurationError::MultipleStartupProjects {
      solution: solution.to_string(),
      target,
      projects: many.to_vec(),
    }),
  }
}

fn compose_solution_cell(
  registry: &Registry,
  settings: &ComposeSettings,
  solution: &SolutionDef,
  target: Target,
  records: &mut BTreeMap<NodeKey, ProjectRecord>,
) -> Result<SolutionRecord, ComposeError> {
  let owner = format!("solution '{}'", solution.name);
  debug!(solution = %solution.name, target = %target, "configuring solution");

  let config = solution.configure(&target).map_err(|e| ComposeError::Rule {
    owner: owner.clone(),
    target,
    message: e.0,
  })?;

  let startup_project = validate_startup(&solution.name, target, &config)?;

  let ctx = TemplateContext::new(&settings.root)
    .with_solution(&solution.name)
    .with_target(target);
  let solution_path = resolve_path(
    &owner,
    "solution_path",
    config.solution_path.as_deref().unwrap_or(DEFAULT_SOLUTION_PATH),
    &ctx,
  )?;

  // Configure the solution's projects and everything they depend on.
  let mut graph = DependencyGraph::new();
  let mut queue: VecDeque<(NodeKey, String)> = config
    .projects
    .iter()
    .map(|name| ((name.clone(), target), owner.clone()))
    .collect();

  while let Some((key, requested_by)) = queue.pop_front() {
    if graph.contains(&key) {
      continue;
    }

    let (name, cell) = &key;
    let def = registry
      .project(name)
      .ok_or_else(|| ConfigurationError::UnknownProject {
        project: name.clone(),
        referenced_by: requested_by.clone(),
      })?;

    if !def.targets.contains(cell) {
      return Err(
        ConfigurationError::UnsupportedTarget {
          project: name.clone(),
          target: *cell,
          requested_by,
        }
        .into(),
      );
    }

    if !config.projects.contains(name) {
      debug!(solution = %solution.name, project = %name, target = %cell, "adding dependency to solution");
    }

    graph.add_node(key.clone());

    if !records.contains_key(&key) {
      let record = configure_project(def, *cell, settings)?;
      records.insert(key.clone(), record);
    }

    let dependent = format!("project '{}' ({})", name, cell);
    for dep in &records[&key].dependencies {
      queue.push_back(((dep.project.clone(), dep.target), dependent.clone()));
    }
  }

  let keys: Vec<NodeKey> = graph.keys().cloned().collect();
  for key in &keys {
    for dep in &records[key].dependencies {
      let dep_key = (dep.project.clone(), dep.target);
      if records.get(&dep_key).is_some_and(|r| !r.output.is_linkable()) {
        warn!(
          project = %key.0,
          dependency = %dep.project,
          target = %dep.target,
          "dependency is an executable and is not linkable"
        );
      }
      graph.add_edge(key, &dep_key, dep.visibility);
    }
  }

  graph
    .verify_acyclic()
    .map_err(|projects| ConfigurationError::DependencyCycle { target, projects })?;

  for key in &keys {
    let visible = graph.visible_dependencies(key);
    if let Some(record) = records.get_mut(key) {
      record.visible_dependencies = visible;
    }
  }

  let mut seen = HashSet::new();
  let build_order: Vec<String> = graph
    .build_order()
    .unwrap_or_default()
    .into_iter()
    .map(|(name, _)| name)
    .filter(|name| seen.insert(name.clone()))
    .collect();
  let projects: BTreeSet<String> = keys.iter().map(|(name, _)| name.clone()).collect();
  let dependencies: BTreeSet<DependencyEdge> = graph
    .edges()
    .map(|(from, to, visibility)| DependencyEdge {
      from: from.0.clone(),
      from_target: from.1,
      to: to.0.clone(),
      to_target: to.1,
      visibility,
    })
    .collect();

  debug!(
    solution = %solution.name,
    target = %target,
    projects = projects.len(),
    edges = dependencies.len(),
    startup = %startup_project,
    "solution cell composed"
  );

  Ok(SolutionRecord {
    solution: solution.name.clone(),
    target,
    solution_path,
    projects,
    startup_project,
    dependencies,
    build_order,
  })
}

/// Run a project's configure rule for one cell and resolve the result into
/// a record. Visible dependencies are filled in later, once the cell's
/// graph is known to be acyclic.
pub fn configure_project(def: &ProjectDef, target: Target, settings: &ComposeSettings) -> Result<ProjectRecord, ComposeError> {
  let owner = format!("project '{}' ({})", def.name, target);
  debug!(project = %def.name, target = %target, "configuring project");

  let mut config = def.configure(&target).map_err(|e| ComposeError::Rule {
    owner: format!("project '{}'", def.name),
    target,
    message: e.0,
  })?;

  for option_override in settings.overrides.iter().chain(&def.overrides) {
    if option_override.apply_to(&target, &mut config.options) {
      debug!(project = %def.name, target = %target, option = %option_override.option, "applied option override");
    }
  }

  let ctx = TemplateContext::new(&settings.root)
    .with_project(&def.name)
    .with_target(target);

  let source_root = def.source_root.resolve(&ctx).map_err(|source| ComposeError::Template {
    owner: owner.clone(),
    field: "source_root",
    source,
  })?;

  let project_path = resolve_path(
    &owner,
    "project_path",
    config.project_path.as_deref().unwrap_or(DEFAULT_PROJECT_PATH),
    &ctx,
  )?;
  let target_path = resolve_path(
    &owner,
    "target_path",
    config.target_path.as_deref().unwrap_or(DEFAULT_TARGET_PATH),
    &ctx,
  )?;
  let intermediate_path = resolve_path(
    &owner,
    "intermediate_path",
    config.intermediate_path.as_deref().unwrap_or(DEFAULT_INTERMEDIATE_PATH),
    &ctx,
  )?;

  let include_paths = resolve_path_list(&owner, "include_paths", &config.include_paths, &ctx)?;
  let library_paths = resolve_path_list(&owner, "library_paths", &config.library_paths, &ctx)?;

  let mut seen = HashSet::new();
  let mut dependencies = Vec::new();
  for dep in config.dependencies {
    let resolved = ResolvedDependency {
      target: dep.target.unwrap_or(target),
      project: dep.project,
      visibility: dep.visibility,
    };
    if seen.insert((resolved.project.clone(), resolved.target)) {
      dependencies.push(resolved);
    } else {
      warn!(project = %def.name, dependency = %resolved.project, target = %target, "duplicate dependency ignored");
    }
  }

  Ok(ProjectRecord {
    project: def.name.clone(),
    target,
    source_root,
    project_path,
    target_path,
    intermediate_path,
    include_paths,
    library_paths,
    libraries: config.libraries,
    defines: config.defines,
    output: config.output,
    options: config.options,
    dependencies,
    visible_dependencies: BTreeSet::new(),
  })
}

fn resolve_path(owner: &str, field: &'static str, template: &str, ctx: &TemplateContext<'_>) -> Result<String, ComposeError> {
  Template::parse(template)
    .and_then(|t| t.resolve(ctx))
    .map_err(|source| ComposeError::Template {
      owner: owner.to_string(),
      field,
      source,
    })
}

/// Resolve a list of path templates, dropping repeats after the first.
fn resolve_path_list(
  owner: &str,
  field: &'static str,
  templates: &[String],
  ctx: &TemplateContext<'_>,
) -> Result<Vec<String>, ComposeError> {
  let mut seen = HashSet::new();
  let mut resolved = Vec::with_capacity(templates.len());
  for template in templates {
    let path = resolve_path(owner, field, template, ctx)?;
    if seen.insert(path.clone()) {
      resolved.push(path);
    }
  }
  Ok(resolved)
}
