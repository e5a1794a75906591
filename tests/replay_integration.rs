//! Integration tests for the replay pipeline.
//!
//! Trace a structure, then drive it through a renderer, an animation and a
//! drawing surface.

use std::collections::{BTreeMap, VecDeque};

use algofresco::{
    AnimationConfig, Annotations, BinaryNode, Cell, CodePanel, DictionaryHighlight, DictionaryVisualizer,
    Graph, GraphHighlight, GraphScene, GraphVisualizer, ListHighlight, ListVisualizer, Outline,
    Point, QueueVisualizer, RenderConfig, Scene, StackVisualizer, Surface, Tracer, TracerConfig,
    TreeVisualizer, Visualizer,
};
use serde_json::json;

// ─────────────────────────────────────────────────────────────────────────────
// Test Surface
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct TextSurface {
    lines: Vec<String>,
}

impl Surface for TextSurface {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn set_title(&mut self, title: &str) {
        self.lines.push(format!("# {title}"));
    }

    fn draw_cell(&mut self, cell: &Cell) {
        self.lines.push(format!("[{}]", cell.text));
    }

    fn draw_outline(&mut self, outline: &Outline) {
        self.lines.push(format!("outline {:.2}", outline.rect.width));
    }

    fn draw_graph(&mut self, graph: &GraphScene) {
        self.lines.push(format!("graph {}/{}", graph.nodes.len(), graph.edges.len()));
    }

    fn draw_text(&mut self, text: &str, _at: Point) {
        self.lines.push(text.to_string());
    }

    fn draw_code(&mut self, code: &CodePanel) {
        self.lines.push(format!("code {}", code.excerpt.as_deref().unwrap_or("")));
    }
}

fn draw(scene: &Scene) -> Vec<String> {
    let mut surface = TextSurface::default();
    scene.draw_on(&mut surface);
    surface.lines
}

// ─────────────────────────────────────────────────────────────────────────────
// Empty Traces
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_trace_has_no_display_and_no_animation() {
    let list: Tracer<Vec<i32>> = Tracer::new();
    let vis = ListVisualizer::new(&list);
    assert!(vis.display_snapshot(-1, &ListHighlight::new(), None).unwrap().is_none());
    assert!(vis.display_snapshot(5, &ListHighlight::new(), None).unwrap().is_none());
    assert!(vis.create_animation(AnimationConfig::default()).is_none());

    let graph: Tracer<Graph<i32>> = Tracer::new();
    assert!(GraphVisualizer::new(&graph).create_animation(AnimationConfig::default()).is_none());

    let tree: Tracer<BinaryNode<i32>> = Tracer::new();
    assert!(TreeVisualizer::new(&tree).create_animation(AnimationConfig::default()).is_none());
}

#[test]
fn test_out_of_range_step_is_an_error() {
    let mut tracer = Tracer::new();
    tracer.capture_described(&vec![1], "one");
    let vis = StackVisualizer::new(&tracer);

    assert!(vis.display_snapshot(1, &Default::default(), None).is_err());
    assert!(vis.display_snapshot(-3, &Default::default(), None).is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Animation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_animation_frames_follow_capture_order() {
    let mut tracer = Tracer::new();
    let mut queue = VecDeque::new();
    for i in 0..5 {
        queue.push_back(i);
        tracer.capture_described(&queue, format!("Enqueued {i}"));
    }
    let vis = QueueVisualizer::new(&tracer);
    let animation = vis
        .create_animation(AnimationConfig::default().with_interval_ms(1500).looping())
        .unwrap();

    assert_eq!(animation.len(), 5);
    assert_eq!(animation.interval().as_millis(), 1500);
    assert!(animation.repeat());

    let titles: Vec<_> = animation.frames().map(|s| s.title).collect();
    assert_eq!(titles[0], "Step 0: Enqueued 0");
    assert_eq!(titles[4], "Step 4: Enqueued 4");
    assert_eq!(animation.frames().len(), 5);
}

#[test]
fn test_layout_cached_once_per_step() {
    let mut tracer = Tracer::new();
    let mut g = Graph::new();
    for i in 0..4 {
        g.add_edge(i, i + 1);
        tracer.capture_described(&g, format!("edge {i}"));
    }
    let vis = GraphVisualizer::new(&tracer);
    let animation = vis.create_animation(AnimationConfig::default()).unwrap();
    assert_eq!(animation.cached_layouts(), 0);

    let first = animation.render_frame(2).unwrap();
    assert_eq!(animation.cached_layouts(), 1);
    let again = animation.render_frame(2).unwrap();
    assert_eq!(first, again);

    let all: Vec<_> = animation.frames().collect();
    assert_eq!(animation.cached_layouts(), 4);
    assert_eq!(all[2], first);
}

#[test]
fn test_animation_reads_highlights_from_metadata() {
    let mut tracer = Tracer::new();
    let mut g = Graph::new();
    g.add_edge(2, 1);
    tracer
        .capture_with(&g, json!({"description": "Connected 1-2", "highlight_edges": [[1, 2]]}))
        .unwrap();
    let vis = GraphVisualizer::new(&tracer);
    let palette = vis.render_config().palette.clone();

    let frame = vis.create_animation(AnimationConfig::default()).unwrap().render_frame(0).unwrap();
    let graph = frame.graph.unwrap();
    assert_eq!(graph.edges[0].color, palette.edge_highlight);

    let plain = vis.display_snapshot(0, &GraphHighlight::new(), None).unwrap().unwrap();
    assert_eq!(plain.graph.unwrap().edges[0].color, palette.edge);
}

// ─────────────────────────────────────────────────────────────────────────────
// Surfaces
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_scene_drawn_on_surface() {
    let mut tracer = Tracer::with_config(TracerConfig::default().with_code_lines());
    let mut map = BTreeMap::new();
    tracer.capture_described(&map, "Initial state");
    map.insert("age", 30);
    tracer.capture(&map, Annotations::new().description("age -> 30").code("map.insert(\"age\", 30)"));

    let vis = DictionaryVisualizer::with_config(&tracer, RenderConfig::default().with_code());

    let empty = vis.display_snapshot(0, &DictionaryHighlight::new(), None).unwrap().unwrap();
    assert_eq!(draw(&empty)[1], "Empty Dictionary");

    let scene = vis
        .display_snapshot(1, &DictionaryHighlight::new().keys(["age"]), None)
        .unwrap()
        .unwrap();
    assert_eq!(
        draw(&scene),
        vec!["# Step 1: age -> 30", "[age]", "[30]", "code map.insert(\"age\", 30)"]
    );
    assert!(scene.code.unwrap().location.unwrap().contains("replay_integration.rs"));
}

#[test]
fn test_tree_scene_drawn_on_surface() {
    let mut tracer = Tracer::new();
    tracer.capture_described(&BinaryNode::new(1).with_left(BinaryNode::new(2)), "two nodes");
    let scene = TreeVisualizer::new(&tracer)
        .display_snapshot(-1, &Default::default(), Some("Tree"))
        .unwrap()
        .unwrap();

    assert_eq!(draw(&scene), vec!["# Tree", "graph 2/1"]);
}

#[test]
fn test_list_range_outline_drawn() {
    let mut tracer = Tracer::new();
    tracer.capture_described(&vec![4, 2, 7, 1], "array");
    let scene = ListVisualizer::new(&tracer)
        .display_snapshot(0, &ListHighlight::new().range(1, 2), None)
        .unwrap()
        .unwrap();

    assert_eq!(draw(&scene).last().map(String::as_str), Some("outline 0.50"));
}
