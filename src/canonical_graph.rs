//! Canonical labeled graph built from any supported tree shape.
//!
//! The builder resolves node-shape polymorphism once, at this boundary.
//! Layout, drawing and highlighting downstream only see [`CanonicalGraph`].
//!
//! ## Id Assignment
//!
//! - The root always gets id 0
//! - When a node is visited, each of its non-null children gets the next
//!   free id (in child order) and an edge from the parent, before any child
//!   is descended into
//! - Children are then descended into in order (left before right)
//!
//! For a root `1` with `left = 2`, `right = 3` and `left.right = 4`, this
//! yields ids `{1: 0, 2: 1, 3: 2, 4: 3}` and edges `(0,1), (0,2), (1,3)`.
//!
//! Ids are only meaningful within one build. Two builds of successive
//! snapshots of the same evolving tree may assign different ids to the
//! "same" node; stable identity must be carried separately in metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Graph, Shape, TreeShape, TreeSnapshot};

/// A node of the canonical graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalNode {
    /// Per-build id.
    pub id: usize,
    /// Display label.
    pub label: String,
}

/// Structurally uniform labeled directed graph.
///
/// Node ids are dense: `nodes[i].id == i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalGraph {
    /// Nodes ordered by id.
    pub nodes: Vec<CanonicalNode>,
    /// Directed `(parent_id, child_id)` edges in discovery order.
    pub edges: Vec<(usize, usize)>,
}

impl CanonicalGraph {
    /// The empty graph.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a tree root.
    ///
    /// A root matching none of the supported shapes yields the empty graph.
    /// Below the root, a node of unrecognized shape is kept as a leaf.
    pub fn from_tree<N: TreeShape>(root: &N) -> Self {
        let root_shape = root.shape();
        if !root_shape.is_recognized() {
            tracing::debug!("tree root matches no supported shape");
            return Self::empty();
        }

        let mut graph = Self::empty();
        graph.push_node(root.label());

        // (node, id, pre-computed shape for the root)
        let mut stack: Vec<(&N, usize, Option<Shape<'_, N>>)> = vec![(root, 0, Some(root_shape))];
        while let Some((node, id, shape)) = stack.pop() {
            let shape = shape.unwrap_or_else(|| node.shape());
            let mut discovered = Vec::new();
            for child in shape.into_children().into_iter().flatten() {
                let child_id = graph.push_node(child.label());
                graph.edges.push((id, child_id));
                discovered.push((child, child_id, None));
            }
            // Reverse so the first child is descended into first.
            stack.extend(discovered.into_iter().rev());
        }

        tracing::trace!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built canonical tree graph"
        );
        graph
    }

    /// Build from a tree snapshot; an empty tree yields the empty graph.
    pub fn from_snapshot<S: TreeSnapshot>(snapshot: &S) -> Self {
        snapshot.root().map(Self::from_tree).unwrap_or_default()
    }

    /// Build from an undirected [`Graph`]: ids follow node insertion order,
    /// edges keep their stored orientation.
    pub fn from_graph<N: fmt::Display + PartialEq + Clone>(graph: &Graph<N>) -> Self {
        let mut canonical = Self::empty();
        for node in graph.nodes() {
            canonical.push_node(node.to_string());
        }
        canonical.edges = graph
            .edges()
            .iter()
            .filter_map(|(u, v)| Some((graph.index_of(u)?, graph.index_of(v)?)))
            .collect();
        canonical
    }

    fn push_node(&mut self, label: String) -> usize {
        let id = self.nodes.len();
        self.nodes.push(CanonicalNode { id, label });
        id
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

    /// Label of a node.
    pub fn label(&self, id: usize) -> Option<&str> {
        self.nodes.get(id).map(|n| n.label.as_str())
    }

    /// Ids of the direct children of a node, in edge order.
    pub fn children(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .filter(move |(parent, _)| *parent == id)
            .map(|(_, child)| *child)
    }

    /// Undirected adjacency lists indexed by node id.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for &(u, v) in &self.edges {
            if u < adjacency.len() && v < adjacency.len() {
                adjacency[u].push(v);
                adjacency[v].push(u);
            }
        }
        adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BinaryNode, OrderedNode};
    use serde_json::json;

    fn labels(g: &CanonicalGraph) -> Vec<&str> {
        g.nodes.iter().map(|n| n.label.as_str()).collect()
    }

    #[test]
    fn test_binary_tree_ids() {
        let root = BinaryNode::new(1)
            .with_left(BinaryNode::new(2).with_right(BinaryNode::new(4)))
            .with_right(BinaryNode::new(3));

        let g = CanonicalGraph::from_tree(&root);

        assert_eq!(labels(&g), vec!["1", "2", "3", "4"]);
        assert_eq!(g.edges, vec![(0, 1), (0, 2), (1, 3)]);
    }

    #[test]
    fn test_single_node() {
        let g = CanonicalGraph::from_tree(&BinaryNode::new("root"));
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.label(0), Some("root"));
    }

    #[test]
    fn test_ordered_children_keep_order() {
        let root = OrderedNode::new("a")
            .with_child(OrderedNode::new("b").with_child(OrderedNode::new("d")))
            .with_child(OrderedNode::new("c"));

        let g = CanonicalGraph::from_tree(&root);

        assert_eq!(labels(&g), vec!["a", "b", "c", "d"]);
        assert_eq!(g.edges, vec![(0, 1), (0, 2), (1, 3)]);
        assert_eq!(g.children(0).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_mapping_tree_skips_null_children() {
        let tree = json!({
            "value": 10,
            "children": [
                {"value": 5, "children": [null, {"value": 2}]},
                null,
                {"value": 15}
            ]
        });

        let g = CanonicalGraph::from_tree(&tree);

        assert_eq!(labels(&g), vec!["10", "5", "15", "2"]);
        assert_eq!(g.edges, vec![(0, 1), (0, 2), (1, 3)]);
    }

    #[test]
    fn test_unrecognized_root_is_empty() {
        assert!(CanonicalGraph::from_tree(&json!({"name": "x"})).is_empty());
        assert!(CanonicalGraph::from_tree(&json!(42)).is_empty());
        assert!(CanonicalGraph::from_snapshot(&serde_json::Value::Null).is_empty());
        assert!(CanonicalGraph::from_snapshot(&None::<BinaryNode<i32>>).is_empty());
    }

    #[test]
    fn test_from_graph() {
        let mut graph = Graph::new();
        graph.add_edge(3, 1);
        graph.add_edge(1, 2);

        let g = CanonicalGraph::from_graph(&graph);

        assert_eq!(labels(&g), vec!["3", "1", "2"]);
        assert_eq!(g.edges, vec![(0, 1), (1, 2)]);
        assert_eq!(g.adjacency()[1], vec![0, 2]);
    }

    #[test]
    fn test_deep_tree_does_not_recurse() {
        let mut node = BinaryNode::new(0);
        for i in 1..5_000 {
            node = BinaryNode { val: i, left: Some(Box::new(node)), right: None };
        }
        let g = CanonicalGraph::from_tree(&node);
        assert_eq!(g.node_count(), 5_000);
    }
}
