//! Dependency graph construction and publish ordering
//!
//! Builds a directed graph of workspace dependencies to determine the
//! correct publish order (dependencies must be published before dependents).

use crate::cargo::metadata::MemberInfo;
use crate::core::error::{RelayError, RelayResult, ValidationError};
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Dependency graph for workspace crates
///
/// Edges point from dependent → dependency.
pub struct CrateGraph {
  graph: DiGraph<String, ()>,
}

impl CrateGraph {
  /// Build from workspace members; only edges between members are kept
  pub fn from_members(members: &[MemberInfo]) -> Self {
    let names: Vec<String> = members.iter().map(|m| m.name.clone()).collect();
    let edges: Vec<(String, String)> = members
      .iter()
      .flat_map(|m| m.publish_deps.iter().map(move |dep| (m.name.clone(), dep.clone())))
      .collect();
    Self::from_edges(&names, &edges)
  }

  /// Build from node names and `(dependent, dependency)` pairs
  ///
  /// Node order is remembered and used to break ties in [`Self::publish_order`].
  pub fn from_edges(names: &[String], edges: &[(String, String)]) -> Self {
    let mut graph = DiGraph::new();
    let mut node_map = HashMap::new();

    for name in names {
      if !node_map.contains_key(name) {
        let idx = graph.add_node(name.clone());
        node_map.insert(name.clone(), idx);
      }
    }

    for (dependent, dependency) in edges {
      if dependent == dependency {
        continue;
      }
      if let (Some(&from), Some(&to)) = (node_map.get(dependent), node_map.get(dependency)) {
        graph.update_edge(from, to, ());
      }
    }

    Self { graph }
  }

  /// Publish order: dependencies first, ties broken by insertion order
  pub fn publish_order(&self) -> RelayResult<Vec<String>> {
    toposort(&self.graph, None).map_err(|cycle| {
      RelayError::Validation(ValidationError::DependencyCycle {
        crate_name: self.graph[cycle.node_id()].clone(),
      })
    })?;

    // Kahn's algorithm over "unpublished dependency" counts
    let mut remaining: Vec<usize> = self
      .graph
      .node_indices()
      .map(|idx| self.graph.neighbors_directed(idx, Direction::Outgoing).count())
      .collect();

    let mut ready: BinaryHeap<Reverse<usize>> = remaining
      .iter()
      .enumerate()
      .filter(|(_, count)| **count == 0)
      .map(|(idx, _)| Reverse(idx))
      .collect();

    let mut order = Vec::with_capacity(self.graph.node_count());
    while let Some(Reverse(idx)) = ready.pop() {
      let node = NodeIndex::new(idx);
      order.push(self.graph[node].clone());

      for dependent in self.graph.neighbors_directed(node, Direction::Incoming) {
        let slot = &mut remaining[dependent.index()];
        *slot -= 1;
        if *slot == 0 {
          ready.push(Reverse(dependent.index()));
        }
      }
    }

    Ok(order)
  }
}
