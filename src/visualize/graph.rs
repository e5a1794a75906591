//! Undirected graph renderer.
//!
//! Edge highlights match in either orientation: highlighting `(1, 2)` also
//! colors a stored edge `(2, 1)`.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::{base_scene, graph_scene, to_values, Frame, Visualizer};
use crate::canonical_graph::CanonicalGraph;
use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{Layout, LayoutKind};
use crate::scene::Scene;
use crate::store::Tracer;
use crate::types::{Graph, StepMetadata};

/// Highlight selector for graphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphHighlight {
    /// Nodes to highlight, matched by equality.
    pub nodes: Vec<Value>,
    /// Edges to highlight, matched without regard to orientation.
    pub edges: Vec<(Value, Value)>,
}

impl GraphHighlight {
    /// Empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight nodes.
    pub fn nodes<I, V>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Serialize,
    {
        self.nodes.extend(to_values(nodes));
        self
    }

    /// Highlight edges.
    pub fn edges<I, V>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (V, V)>,
        V: Serialize,
    {
        for (u, v) in edges {
            if let (Ok(u), Ok(v)) = (serde_json::to_value(u), serde_json::to_value(v)) {
                self.edges.push((u, v));
            }
        }
        self
    }

    fn matches_edge(&self, u: &Value, v: &Value) -> bool {
        self.edges
            .iter()
            .any(|(a, b)| (a == u && b == v) || (a == v && b == u))
    }
}

/// Renders [`Graph`] snapshots.
#[derive(Debug)]
pub struct GraphVisualizer<'a, N> {
    tracer: &'a Tracer<Graph<N>>,
    config: RenderConfig,
    layout: LayoutKind,
    layout_config: LayoutConfig,
}

impl<'a, N> GraphVisualizer<'a, N>
where
    N: Serialize + fmt::Display + PartialEq + Clone,
{
    /// Create a renderer with force-directed layout.
    pub fn new(tracer: &'a Tracer<Graph<N>>) -> Self {
        Self::with_config(tracer, RenderConfig::default())
    }

    /// Create a renderer.
    pub fn with_config(tracer: &'a Tracer<Graph<N>>, config: RenderConfig) -> Self {
        Self {
            tracer,
            config,
            layout: LayoutKind::ForceDirected,
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

    /// Layout algorithm in use.
    pub fn layout(&self) -> LayoutKind {
        self.layout
    }
}

impl<N> Visualizer for GraphVisualizer<'_, N>
where
    N: Serialize + fmt::Display + PartialEq + Clone,
{
    type Snapshot = Graph<N>;
    type Highlight = GraphHighlight;

    fn tracer(&self) -> &Tracer<Graph<N>> {
        self.tracer
    }

    fn render_config(&self) -> &RenderConfig {
        &self.config
    }

    fn highlight_from_metadata(&self, metadata: &StepMetadata) -> GraphHighlight {
        let edges = metadata.highlight("edges").iter().filter_map(|v| match v.as_array()?.as_slice() {
            [u, v] => Some((u.clone(), v.clone())),
            _ => None,
        });
        GraphHighlight {
            nodes: metadata.highlight("nodes").to_vec(),
            edges: edges.collect(),
        }
    }

    fn canonical_graph(&self, snapshot: &Graph<N>) -> Option<CanonicalGraph> {
        Some(CanonicalGraph::from_graph(snapshot))
    }

    fn compute_layout(&self, graph: &CanonicalGraph) -> Layout {
        Layout::compute(self.layout, graph, &self.layout_config)
    }

    fn render(&self, frame: &Frame<'_, Graph<N>>, highlight: &GraphHighlight, title: Option<&str>) -> Scene {
        let palette = &self.config.palette;
        let mut scene = base_scene(frame, title, &self.config);
        let Some(graph) = frame.graph.as_ref().filter(|g| !g.is_empty()) else {
            scene.placeholder = Some("Empty Graph".to_string());
            return scene;
        };

        // Canonical ids follow node insertion order.
        let values: Vec<Value> = frame
            .snapshot
            .nodes()
            .iter()
            .map(|n| serde_json::to_value(n).unwrap_or(Value::Null))
            .collect();
        let node_fill = |id: usize| match values.get(id) {
            Some(v) if highlight.nodes.contains(v) => palette.node_highlight.clone(),
            _ => palette.node.clone(),
        };
        let edge_color = |u: usize, v: usize| match (values.get(u), values.get(v)) {
            (Some(a), Some(b)) if highlight.matches_edge(a, b) => palette.edge_highlight.clone(),
            _ => palette.edge.clone(),
        };
        scene.graph = Some(graph_scene(graph, frame.layout.as_deref(), false, node_fill, edge_color));
        scene
    }
}
