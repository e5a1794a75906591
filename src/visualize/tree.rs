//! Tree renderer, drawn from the canonical graph of each snapshot.

use std::collections::BTreeSet;
use std::fmt;

use super::{base_scene, graph_scene, value_label, Frame, Visualizer};
use crate::canonical_graph::CanonicalGraph;
use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{Layout, LayoutKind};
use crate::scene::Scene;
use crate::store::Tracer;
use crate::types::{StepMetadata, TreeSnapshot};

/// Highlight selector for trees: node labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeHighlight {
    /// Labels to highlight, compared with each node's label text.
    pub labels: BTreeSet<String>,
}

impl TreeHighlight {
    /// Empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight nodes by label.
    pub fn labels<I, L>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: fmt::Display,
    {
        self.labels.extend(labels.into_iter().map(|l| l.to_string()));
        self
    }
}

/// Renders tree snapshots of any supported node shape.
#[derive(Debug)]
pub struct TreeVisualizer<'a, S> {
    tracer: &'a Tracer<S>,
    config: RenderConfig,
    layout: LayoutKind,
    layout_config: LayoutConfig,
}

impl<'a, S: TreeSnapshot> TreeVisualizer<'a, S> {
    /// Create a renderer with hierarchical layout.
    pub fn new(tracer: &'a Tracer<S>) -> Self {
        Self::with_config(tracer, RenderConfig::default())
    }

    /// Create a renderer.
    pub fn with_config(tracer: &'a Tracer<S>, config: RenderConfig) -> Self {
        Self {
            tracer,
            config,
            layout: LayoutKind::Hierarchical,
            layout_config: LayoutConfig::default(),
        }
    }

    /// Use another layout algorithm.
    pub fn with_layout(mut self, layout: LayoutKind) -> Self {
        self.layout = layout;
        self
    }

    /// Override layout parameters.
    pub fn with_layout_config(mut self, layout_config: LayoutConfig) -> Self {
        self.layout_config = layout_config;
        self
    }
}

impl<S: TreeSnapshot> Visualizer for TreeVisualizer<'_, S> {
    type Snapshot = S;
    type Highlight = TreeHighlight;

    fn tracer(&self) -> &Tracer<S> {
        self.tracer
    }

    fn render_config(&self) -> &RenderConfig {
        &self.config
    }

    fn highlight_from_metadata(&self, metadata: &StepMetadata) -> TreeHighlight {
        TreeHighlight {
            labels: metadata.highlight("nodes").iter().map(value_label).collect(),
        }
    }

    fn canonical_graph(&self, snapshot: &S) -> Option<CanonicalGraph> {
        Some(CanonicalGraph::from_snapshot(snapshot))
    }

    fn compute_layout(&self, graph: &CanonicalGraph) -> Layout {
        Layout::compute(self.layout, graph, &self.layout_config)
    }

    fn render(&self, frame: &Frame<'_, S>, highlight: &TreeHighlight, title: Option<&str>) -> Scene {
        let palette = &self.config.palette;
        let mut scene = base_scene(frame, title, &self.config);
        let Some(graph) = frame.graph.as_ref().filter(|g| !g.is_empty()) else {
            scene.placeholder = Some("Empty Tree".to_string());
            return scene;
        };

        let node_fill = |id: usize| match graph.label(id) {
            Some(label) if highlight.labels.contains(label) => palette.node_highlight.clone(),
            _ => palette.node.clone(),
        };
        let edge_color = |_: usize, _: usize| palette.edge.clone();
        scene.graph = Some(graph_scene(graph, frame.layout.as_deref(), true, node_fill, edge_color));
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Annotations, BinaryNode, OrderedNode};
    use crate::AnimationConfig;
    use serde_json::{json, Value};

    fn tree_operations() -> Tracer<BinaryNode<i32>> {
        let mut tracer = Tracer::new();
        let mut root = BinaryNode::new(1);
        tracer.capture_described(&root, "Root created");
        root = root.with_left(BinaryNode::new(2)).with_right(BinaryNode::new(3));
        tracer.capture_described(&root, "Added children");
        if let Some(left) = root.left.as_mut() {
            left.right = Some(Box::new(BinaryNode::new(4)));
        }
        tracer.capture(&root, Annotations::new().description("Added grandchild").highlight("nodes", [4]));
        tracer
    }

    #[test]
    fn test_binary_tree_scene() {
        let tracer = tree_operations();
        let vis = TreeVisualizer::new(&tracer);
        let scene = vis
            .display_snapshot(-1, &TreeHighlight::new().labels([4]), None)
            .unwrap()
            .unwrap();
        let graph = scene.graph.unwrap();
        let palette = &vis.render_config().palette;

        assert!(graph.directed);
        let labels: Vec<_> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2", "3", "4"]);
        let edges: Vec<_> = graph.edges.iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 3)]);
        assert_eq!(graph.nodes[3].fill, palette.node_highlight);
        assert_eq!(graph.nodes[0].fill, palette.node);
        // Hierarchical layout puts the root above its children.
        assert!(graph.nodes[0].position.y > graph.nodes[1].position.y);
    }

    #[test]
    fn test_animation_highlights_from_metadata() {
        let tracer = tree_operations();
        let vis = TreeVisualizer::new(&tracer);
        let frames: Vec<_> = vis.create_animation(AnimationConfig::default()).unwrap().frames().collect();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].graph.as_ref().unwrap().nodes.len(), 1);
        let last = frames[2].graph.as_ref().unwrap();
        assert_eq!(last.nodes[3].fill, vis.render_config().palette.node_highlight);
    }

    #[test]
    fn test_ordered_and_mapping_trees() {
        let mut ordered = Tracer::new();
        ordered.capture_described(
            &OrderedNode::new("a").with_child(OrderedNode::new("b")).with_child(OrderedNode::new("c")),
            "ordered",
        );
        let scene = TreeVisualizer::new(&ordered)
            .display_snapshot(0, &TreeHighlight::new(), None)
            .unwrap()
            .unwrap();
        assert_eq!(scene.graph.unwrap().edges.len(), 2);

        let mut mapped: Tracer<Value> = Tracer::new();
        mapped.capture_described(&json!({"value": "r", "children": [{"value": "x"}, null]}), "mapping");
        let scene = TreeVisualizer::new(&mapped)
            .display_snapshot(0, &TreeHighlight::new().labels(["x"]), None)
            .unwrap()
            .unwrap();
        let graph = scene.graph.unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[1].label, "x");
    }

    #[test]
    fn test_empty_and_unrecognized_trees() {
        let mut tracer: Tracer<Value> = Tracer::new();
        tracer.capture_described(&Value::Null, "empty");
        tracer.capture_described(&json!([1, 2, 3]), "not a tree");
        let vis = TreeVisualizer::new(&tracer);

        for step in 0..2 {
            let scene = vis.display_snapshot(step, &TreeHighlight::new(), None).unwrap().unwrap();
            assert_eq!(scene.placeholder.as_deref(), Some("Empty Tree"));
        }
    }
}
