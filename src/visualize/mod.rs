//! Structure-specific renderers.
//!
//! Every renderer implements [`Visualizer`] against a [`Tracer`]:
//!
//! | Variant | Snapshot | Highlight selector |
//! |---------|----------|--------------------|
//! | [`ListVisualizer`] | [`Sequence`](crate::Sequence) | indices, values, `(start, end)` ranges |
//! | [`StackVisualizer`] | [`Sequence`](crate::Sequence) | top (structural) |
//! | [`QueueVisualizer`] | [`Sequence`](crate::Sequence) | front and rear (structural) |
//! | [`DictionaryVisualizer`] | [`Mapping`](crate::Mapping) | keys, values |
//! | [`GraphVisualizer`] | [`Graph`](crate::Graph) | node ids, undirected edges |
//! | [`TreeVisualizer`] | [`TreeSnapshot`](crate::TreeSnapshot) | labels |
//!
//! Animation frames take their highlight selector from the step's
//! `highlight_*` metadata.

pub mod list;
pub mod stack;
pub mod queue;
pub mod dict;
pub mod graph;
pub mod tree;

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

use crate::canonical_graph::CanonicalGraph;
use crate::config::{AnimationConfig, LayoutConfig, RenderConfig};
use crate::layout::{Layout, LayoutKind};
use crate::replay::Animation;
use crate::scene::{code_panel, resolve_title, GraphScene, Scene, SceneEdge, SceneNode};
use crate::store::{SnapshotRef, TraceError, Tracer};
use crate::types::StepMetadata;

pub use list::{ListHighlight, ListVisualizer};
pub use stack::{StackHighlight, StackVisualizer};
pub use queue::{QueueHighlight, QueueVisualizer};
pub use dict::{DictionaryHighlight, DictionaryVisualizer};
pub use graph::{GraphHighlight, GraphVisualizer};
pub use tree::{TreeHighlight, TreeVisualizer};

/// Everything a renderer needs to draw one step.
#[derive(Debug, Clone)]
pub struct Frame<'a, S> {
    /// Step index.
    pub step: usize,
    /// Stored snapshot.
    pub snapshot: &'a S,
    /// Step metadata.
    pub metadata: &'a StepMetadata,
    /// Canonical graph, for graph and tree variants.
    pub graph: Option<CanonicalGraph>,
    /// Node positions, for graph and tree variants.
    pub layout: Option<Cow<'a, Layout>>,
}

impl<'a, S> Frame<'a, S> {
    pub(crate) fn new(
        entry: SnapshotRef<'a, S>,
        graph: Option<CanonicalGraph>,
        layout: Option<Cow<'a, Layout>>,
    ) -> Self {
        Self {
            step: entry.step(),
            snapshot: entry.state,
            metadata: entry.metadata,
            graph,
            layout,
        }
    }
}

/// The contract every structure-specific renderer implements.
pub trait Visualizer {
    /// Type of the traced structure.
    type Snapshot;
    /// Per-step highlight selector.
    type Highlight: Default;

    /// The trace being rendered.
    fn tracer(&self) -> &Tracer<Self::Snapshot>;

    /// Renderer options.
    fn render_config(&self) -> &RenderConfig;

    /// Highlight selector encoded in a step's `highlight_*` metadata.
    fn highlight_from_metadata(&self, metadata: &StepMetadata) -> Self::Highlight;

    /// Canonical graph of a snapshot; `None` for cell-based variants.
    fn canonical_graph(&self, _snapshot: &Self::Snapshot) -> Option<CanonicalGraph> {
        None
    }

    /// Node positions for a canonical graph.
    fn compute_layout(&self, graph: &CanonicalGraph) -> Layout {
        Layout::compute(LayoutKind::default(), graph, &LayoutConfig::default())
    }

    /// Draw one frame.
    fn render(&self, frame: &Frame<'_, Self::Snapshot>, highlight: &Self::Highlight, title: Option<&str>) -> Scene;

    /// Render a single step; `-1` selects the latest.
    ///
    /// Returns `Ok(None)` when the trace is empty. The layout is computed
    /// afresh on every call.
    fn display_snapshot(
        &self,
        step: isize,
        highlight: &Self::Highlight,
        title: Option<&str>,
    ) -> Result<Option<Scene>, TraceError> {
        let Some(entry) = self.tracer().get_snapshot(step)? else {
            tracing::info!(trace_id = %self.tracer().id(), "no data available");
            return Ok(None);
        };
        let graph = self.canonical_graph(entry.state);
        let layout = graph.as_ref().map(|g| Cow::Owned(self.compute_layout(g)));
        let frame = Frame::new(entry, graph, layout);
        Ok(Some(self.render(&frame, highlight, title)))
    }

    /// Animation over every stored step; `None` when the trace is empty.
    fn create_animation(&self, config: AnimationConfig) -> Option<Animation<'_, Self>>
    where
        Self: Sized,
    {
        Animation::new(self, config)
    }
}

/// Scene with the resolved title and, if enabled, the code panel.
pub(crate) fn base_scene<S>(frame: &Frame<'_, S>, title: Option<&str>, config: &RenderConfig) -> Scene {
    let mut scene = Scene::new(frame.step, resolve_title(title, frame.metadata));
    if config.show_code {
        scene.code = code_panel(frame.metadata);
    }
    scene
}

/// Position and color every node and edge of a canonical graph.
pub(crate) fn graph_scene(
    graph: &CanonicalGraph,
    layout: Option<&Layout>,
    directed: bool,
    node_fill: impl Fn(usize) -> String,
    edge_color: impl Fn(usize, usize) -> String,
) -> GraphScene {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| SceneNode {
            id: node.id,
            label: node.label.clone(),
            position: layout.and_then(|l| l.position(node.id)).unwrap_or_default(),
            fill: node_fill(node.id),
        })
        .collect();
    let edges = graph
        .edges
        .iter()
        .map(|&(source, target)| SceneEdge {
            source,
            target,
            color: edge_color(source, target),
        })
        .collect();
    GraphScene {
        nodes,
        edges,
        directed,
    }
}

/// Whether `item` equals one of `set` once both are JSON values.
pub(crate) fn contains_value<T: Serialize + ?Sized>(set: &[Value], item: &T) -> bool {
    if set.is_empty() {
        return false;
    }
    match serde_json::to_value(item) {
        Ok(value) => set.contains(&value),
        Err(_) => false,
    }
}

/// Convert values to JSON, skipping those that cannot be represented.
pub(crate) fn to_values<I, V>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = V>,
    V: Serialize,
{
    values
        .into_iter()
        .filter_map(|v| serde_json::to_value(v).ok())
        .collect()
}

/// String form of a JSON value; strings render bare.
pub(crate) fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contains_value() {
        let set = vec![json!(3), json!("a")];
        assert!(contains_value(&set, &3));
        assert!(contains_value(&set, "a"));
        assert!(!contains_value(&set, &4));
        assert!(!contains_value(&[], &3));
    }

    #[test]
    fn test_value_label() {
        assert_eq!(value_label(&json!("x")), "x");
        assert_eq!(value_label(&json!(4)), "4");
    }
}
