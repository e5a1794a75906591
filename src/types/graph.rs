//! Undirected graph value type for tracing graph algorithms.

use serde::{Deserialize, Serialize};

/// An undirected graph with insertion-ordered nodes and edges.
///
/// Cloning yields an independent copy, so a `Graph` can be captured
/// directly by a [`Tracer`](crate::Tracer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph<N> {
    nodes: Vec<N>,
    edges: Vec<(N, N)>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<N: Clone + PartialEq> Graph<N> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Adding an existing node is a no-op.
    pub fn add_node(&mut self, node: N) {
        if !self.contains_node(&node) {
            self.nodes.push(node);
        }
    }

    /// Add several nodes.
    pub fn add_nodes_from<I: IntoIterator<Item = N>>(&mut self, nodes: I) {
        for node in nodes {
            self.add_node(node);
        }
    }

    /// Add an edge, adding missing endpoints.
    ///
    /// Edges are undirected: adding `(v, u)` when `(u, v)` exists is a no-op.
    pub fn add_edge(&mut self, u: N, v: N) {
        self.add_node(u.clone());
        self.add_node(v.clone());
        if !self.has_edge(&u, &v) {
            self.edges.push((u, v));
        }
    }

    /// Remove an edge in either orientation. Returns whether it existed.
    pub fn remove_edge(&mut self, u: &N, v: &N) -> bool {
        let before = self.edges.len();
        self.edges.retain(|(a, b)| !(a == u && b == v || a == v && b == u));
        self.edges.len() != before
    }

    /// Remove a node and its incident edges. Returns whether it existed.
    pub fn remove_node(&mut self, node: &N) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n != node);
        self.edges.retain(|(a, b)| a != node && b != node);
        self.nodes.len() != before
    }

    /// Whether the node exists.
    pub fn contains_node(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// Whether `u` and `v` are adjacent.
    pub fn has_edge(&self, u: &N, v: &N) -> bool {
        self.edges
            .iter()
            .any(|(a, b)| a == u && b == v || a == v && b == u)
    }

    /// Position of a node in insertion order.
    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.nodes.iter().position(|n| n == node)
    }

    /// Neighbors of a node, in edge insertion order.
    pub fn neighbors<'a>(&'a self, node: &'a N) -> impl Iterator<Item = &'a N> + 'a {
        self.edges.iter().filter_map(move |(a, b)| {
            if a == node {
                Some(b)
            } else if b == node {
                Some(a)
            } else {
                None
            }
        })
    }
}

impl<N> Graph<N> {
    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Edges in insertion order, as added.
    pub fn edges(&self) -> &[(N, N)] {
        &self.edges
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
