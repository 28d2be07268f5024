//! Revision graph building and ordering
//!
//! Revisions point at their predecessor through `down_revision`. The graph
//! stores one edge per pointer (predecessor -> successor) and validates that
//! the history forms a single linear chain from one base to one head.

use crate::error::{CoreError, CoreResult};
use crate::revision_id::RevisionId;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// A validated, linear revision history
#[derive(Debug)]
pub struct RevisionGraph {
    /// The underlying graph, edges point from down_revision to revision
    graph: DiGraph<RevisionId, ()>,

    /// Map from revision id to node index
    node_map: HashMap<RevisionId, NodeIndex>,

    /// Revisions from base to head
    order: Vec<RevisionId>,
}

impl RevisionGraph {
    /// Build the graph from `(revision, down_revision)` pairs.
    pub fn build(revisions: &[(RevisionId, Option<RevisionId>)]) -> CoreResult<Self> {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for (id, _) in revisions {
            if node_map.contains_key(id) {
                return Err(CoreError::DuplicateRevision { id: id.to_string() });
            }
            let idx = graph.add_node(id.clone());
            node_map.insert(id.clone(), idx);
        }

        for (id, down) in revisions {
            let Some(down) = down else { continue };
            let from = *node_map
                .get(down)
                .ok_or_else(|| CoreError::UnknownRevision {
                    id: down.to_string(),
                })?;
            graph.add_edge(from, node_map[id], ());
        }

        let mut dag = Self {
            graph,
            node_map,
            order: Vec::new(),
        };
        dag.validate()?;
        dag.order = dag.walk_from_base();
        log::debug!("Resolved revision history of {} revisions", dag.order.len());
        Ok(dag)
    }

    /// Validate the graph: no cycles, exactly one base and one head
    fn validate(&self) -> CoreResult<()> {
        if self.graph.node_count() == 0 {
            return Ok(());
        }

        if let Err(cycle) = toposort(&self.graph, None) {
            return Err(CoreError::CircularHistory {
                cycle: self.find_cycle_path(cycle.node_id()),
            });
        }

        let bases = self.endpoints(Direction::Incoming);
        if bases.len() != 1 {
            return Err(CoreError::InvalidBase {
                bases: if bases.is_empty() {
                    "none".to_string()
                } else {
                    bases.join(", ")
                },
            });
        }

        let heads = self.endpoints(Direction::Outgoing);
        if heads.len() != 1 {
            return Err(CoreError::MultipleHeads {
                heads: heads.join(", "),
            });
        }

        Ok(())
    }

    /// Revisions with no edge in `direction`, sorted for stable error messages
    fn endpoints(&self, direction: Direction) -> Vec<String> {
        let mut ids: Vec<String> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph.edges_directed(idx, direction).next().is_none())
            .map(|idx| self.graph[idx].to_string())
            .collect();
        ids.sort();
        ids
    }

    /// Find a cycle path starting from a node for error reporting
    fn find_cycle_path(&self, start: NodeIndex) -> String {
        let mut path: Vec<String> = vec![self.graph[start].to_string()];
        let mut current = start;
        let mut visited = HashSet::new();
        visited.insert(current);

        while let Some(edge) = self.graph.edges(current).next() {
            let target = edge.target();
            path.push(self.graph[target].to_string());

            if target == start || visited.contains(&target) {
                break;
            }

            visited.insert(target);
            current = target;
        }

        path.join(" -> ")
    }

    /// Follow successor edges from the single base. Only valid after `validate`.
    fn walk_from_base(&self) -> Vec<RevisionId> {
        let Some(mut current) = self
            .graph
            .node_indices()
            .find(|&idx| self.graph.edges_directed(idx, Direction::Incoming).next().is_none())
        else {
            return Vec::new();
        };

        let mut order = vec![self.graph[current].clone()];
        while let Some(edge) = self.graph.edges(current).next() {
            current = edge.target();
            order.push(self.graph[current].clone());
        }
        order
    }

    /// Revisions in apply order (base first)
    pub fn ordered(&self) -> &[RevisionId] {
        &self.order
    }

    /// The first revision of the history
    pub fn base(&self) -> Option<&RevisionId> {
        self.order.first()
    }

    /// The latest revision of the history
    pub fn head(&self) -> Option<&RevisionId> {
        self.order.last()
    }

    /// Number of revisions
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the history has no revisions
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check whether a revision id is part of the history
    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Zero-based position of a revision in apply order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|r| r == id)
    }

    /// The predecessor of a revision, `None` for the base or unknown ids
    pub fn down_revision(&self, id: &str) -> Option<&RevisionId> {
        let idx = *self.node_map.get(id)?;
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .next()
            .map(|e| &self.graph[e.source()])
    }

    /// Resolve a full revision id or a unique prefix of one
    pub fn resolve(&self, partial: &str) -> CoreResult<RevisionId> {
        if let Some((id, _)) = self.node_map.get_key_value(partial) {
            return Ok(id.clone());
        }

        let matches: Vec<&RevisionId> = self
            .order
            .iter()
            .filter(|id| !partial.is_empty() && id.starts_with(partial))
            .collect();

        match matches.as_slice() {
            [] => Err(CoreError::UnknownRevision {
                id: partial.to_string(),
            }),
            [only] => Ok((*only).clone()),
            many => Err(CoreError::AmbiguousRevision {
                prefix: partial.to_string(),
                candidates: many
                    .iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
