//! Per-target project dependency graph.
//!
//! Nodes are (project, target) pairs; an edge points from the dependent to
//! the dependency and carries the edge's visibility. One graph is built
//! for every solution cell and checked for cycles before any record
//! derived from it is used.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use petgraph::Direction;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::project::Visibility;
use crate::target::Target;

/// Identity of a node: a project configured for one target cell.
pub type NodeKey = (String, Target);

#[derive(Debug, Default)]
pub struct DependencyGraph {
  graph: DiGraph<NodeKey, Visibility>,
  nodes: BTreeMap<NodeKey, NodeIndex>,
}

impl DependencyGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a node. Adding an existing node returns its index.
  pub fn add_node(&mut self, key: NodeKey) -> NodeIndex {
    if let Some(&idx) = self.nodes.get(&key) {
      return idx;
    }
    let idx = self.graph.add_node(key.clone());
    self.nodes.insert(key, idx);
    idx
  }

  pub fn contains(&self, key: &NodeKey) -> bool {
    self.nodes.contains_key(key)
  }

  /// Add a `dependent -> dependency` edge, creating missing nodes.
  pub fn add_edge(&mut self, dependent: &NodeKey, dependency: &NodeKey, visibility: Visibility) {
    let from = self.add_node(dependent.clone());
    let to = self.add_node(dependency.clone());
    self.graph.add_edge(from, to, visibility);
  }

  /// Node keys in key order.
  pub fn keys(&self) -> impl Iterator<Item = &NodeKey> {
    self.nodes.keys()
  }

  /// All edges as `(dependent, dependency, visibility)`.
  pub fn edges(&self) -> impl Iterator<Item = (&NodeKey, &NodeKey, Visibility)> {
    self
      .graph
      .edge_references()
      .map(|e| (&self.graph[e.source()], &self.graph[e.target()], *e.weight()))
  }

  /// Verify the graph is acyclic.
  ///
  /// On failure returns the project names of one cycle, sorted.
  pub fn verify_acyclic(&self) -> Result<(), Vec<String>> {
    let Err(cycle) = toposort(&self.graph, None) else {
      return Ok(());
    };

    let offending = cycle.node_id();
    let members = tarjan_scc(&self.graph)
      .into_iter()
      .find(|scc| scc.contains(&offending))
      .unwrap_or_else(|| vec![offending]);

    let mut names: Vec<String> = members.iter().map(|&idx| self.graph[idx].0.clone()).collect();
    names.sort();
    names.dedup();
    Err(names)
  }

  /// Nodes ordered so that every dependency precedes its dependents.
  ///
  /// Returns `None` if the graph has a cycle.
  pub fn build_order(&self) -> Option<Vec<NodeKey>> {
    let sorted = toposort(&self.graph, None).ok()?;
    Some(sorted.into_iter().rev().map(|idx| self.graph[idx].clone()).collect())
  }

  /// Names of the projects visible to `key`: its direct dependencies plus
  /// whatever those re-export through public edges, transitively.
  ///
  /// Must only be called on an acyclic graph.
  pub fn visible_dependencies(&self, key: &NodeKey) -> BTreeSet<String> {
    let mut visible = BTreeSet::new();
    let Some(&idx) = self.nodes.get(key) else {
      return visible;
    };

    let mut visited = HashSet::new();
    for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
      visible.insert(self.graph[edge.target()].0.clone());
      self.collect_exported(edge.target(), &mut visited, &mut visible);
    }
    visible
  }

  fn collect_exported(&self, idx: NodeIndex, visited: &mut HashSet<NodeIndex>, out: &mut BTreeSet<String>) {
    if !visited.insert(idx) {
      return;
    }
    for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
      if *edge.weight() == Visibility::Public {
        out.insert(self.graph[edge.target()].0.clone());
        self.collect_exported(edge.target(), visited, out);
      }
    }
  }
}
