//! Dependency graph with depth-first topological sorting.
//!
//! Nodes live in an arena indexed by [`NodeId`]. Names are deduplicated
//! through a lookup table, so `create_node` is idempotent within one graph.
//! A graph is built for a single ordering pass and consumed by
//! [`DependencyGraph::resolve_dependencies`].

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Index of a node inside its [`DependencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A cycle was closed by the edge `node -> edge`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circular reference detected: {node} -> {edge}")]
pub struct CircularReference {
    pub node: String,
    pub edge: String,
}

/// A node in resolution order, with the number of distinct nodes it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNode {
    pub name: String,
    pub dependencies: usize,
}

#[derive(Debug)]
struct Node {
    name: String,
    edges: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Resolved,
}

/// Directed graph over named nodes. An edge `a -> b` means `a` depends on `b`.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    index: FxHashMap<String, NodeId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node named `name`, creating it when absent.
    pub fn create_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_owned(),
            edges: Vec::new(),
        });
        self.index.insert(name.to_owned(), id);
        id
    }

    /// Declare that `from` depends on `to`. Duplicate edges are ignored.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        let edges = &mut self.nodes[from.0].edges;
        if !edges.contains(&to) {
            edges.push(to);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Post-order DFS. Every node appears after all nodes it depends on.
    ///
    /// Fails on the first edge that reaches a node still on the DFS path.
    pub fn resolve_dependencies(self) -> Result<Vec<ResolvedNode>, CircularReference> {
        let mut state = vec![Visit::Unvisited; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());

        for id in 0..self.nodes.len() {
            if state[id] == Visit::Unvisited {
                self.visit(NodeId(id), &mut state, &mut order)?;
            }
        }

        let mut slots: Vec<Option<Node>> = self.nodes.into_iter().map(Some).collect();
        Ok(order
            .into_iter()
            .filter_map(|id| slots[id.0].take())
            .map(|node| ResolvedNode {
                name: node.name,
                dependencies: node.edges.len(),
            })
            .collect())
    }

    fn visit(
        &self,
        id: NodeId,
        state: &mut [Visit],
        order: &mut Vec<NodeId>,
    ) -> Result<(), CircularReference> {
        state[id.0] = Visit::InProgress;
        for &edge in &self.nodes[id.0].edges {
            match state[edge.0] {
                Visit::Resolved => {}
                Visit::InProgress => {
                    return Err(CircularReference {
                        node: self.nodes[id.0].name.clone(),
                        edge: self.nodes[edge.0].name.clone(),
                    });
                }
                Visit::Unvisited => self.visit(edge, state, order)?,
            }
        }
        state[id.0] = Visit::Resolved;
        order.push(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(order: &[ResolvedNode], name: &str) -> usize {
        order.iter().position(|n| n.name == name).unwrap()
    }

    #[test]
    fn test_create_node_is_idempotent() {
        let mut graph = DependencyGraph::new();
        let a = graph.create_node("a.js");
        let b = graph.create_node("b.js");
        assert_eq!(graph.create_node("a.js"), a);
        assert_ne!(a, b);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut graph = DependencyGraph::new();
        let a = graph.create_node("a");
        let b = graph.create_node("b");
        graph.add_edge(a, b);
        graph.add_edge(a, b);

        let order = graph.resolve_dependencies().unwrap();
        let a = order.iter().find(|n| n.name == "a").unwrap();
        assert_eq!(a.dependencies, 1);
    }

    #[test]
    fn test_every_edge_target_precedes_its_source() {
        // diamond plus an independent chain
        let names = ["app", "view", "model", "base", "util", "log"];
        let edges = [
            ("app", "view"),
            ("app", "model"),
            ("view", "base"),
            ("model", "base"),
            ("util", "log"),
        ];

        let mut graph = DependencyGraph::new();
        let ids: FxHashMap<_, _> = names.iter().map(|n| (*n, graph.create_node(n))).collect();
        for (from, to) in edges {
            graph.add_edge(ids[from], ids[to]);
        }

        let order = graph.resolve_dependencies().unwrap();
        assert_eq!(order.len(), names.len());
        for (from, to) in edges {
            assert!(
                position(&order, to) < position(&order, from),
                "{to} must come before {from}"
            );
        }
    }

    #[test]
    fn test_cycle_is_reported_with_closing_edge() {
        let mut graph = DependencyGraph::new();
        let a = graph.create_node("a");
        let b = graph.create_node("b");
        let c = graph.create_node("c");
        graph.add_edge(a, b);
        graph.add_edge(b, c);
        graph.add_edge(c, a);

        let err = graph.resolve_dependencies().unwrap_err();
        assert_eq!(
            err,
            CircularReference {
                node: "c".into(),
                edge: "a".into(),
            }
        );
        assert_eq!(err.to_string(), "circular reference detected: c -> a");
    }

    #[test]
    fn test_self_edge_is_a_cycle() {
        let mut graph = DependencyGraph::new();
        let a = graph.create_node("a");
        graph.add_edge(a, a);
        assert!(graph.resolve_dependencies().is_err());
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert!(graph.resolve_dependencies().unwrap().is_empty());
    }
}
