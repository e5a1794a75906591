//! Demo driver
//!
//! Traces a few small algorithms and prints every animation frame as one
//! JSON scene per line, ready to be piped into a rendering backend.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `ALGOFRESCO_ANIMATION`: JSON animation config, e.g. `{"interval_ms": 1500}`
//! - `ALGOFRESCO_SHOW_CODE`: attach code panels to scenes when set to `1`
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin algofresco_demo -- tree
//! ```
//!
//! The argument picks one demo (`list`, `stack`, `queue`, `dict`, `graph`,
//! `tree`); without it all demos run.

use std::collections::VecDeque;
use std::error::Error;
use std::io::Write;

use indexmap::IndexMap;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use algofresco::{
    AnimationConfig, Annotations, BinaryNode, DictionaryVisualizer, Graph, GraphVisualizer,
    JsonConfig, LayoutConfig, LayoutKind, ListVisualizer, QueueVisualizer, RenderConfig,
    StackVisualizer, Tracer, TracerConfig, TreeVisualizer, Visualizer,
};

const DEMOS: [&str; 6] = ["list", "stack", "queue", "dict", "graph", "tree"];

/// Initialize the tracing subscriber with JSON or pretty format.
/// Logs go to stderr so stdout carries only scenes.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "algofresco=info,algofresco_demo=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    }
}

struct Settings {
    animation: AnimationConfig,
    render: RenderConfig,
}

impl Settings {
    fn from_env() -> Result<Self, Box<dyn Error>> {
        let animation = match std::env::var("ALGOFRESCO_ANIMATION") {
            Ok(json) => AnimationConfig::from_json(&json)?,
            Err(_) => AnimationConfig::default(),
        };
        let render = if std::env::var("ALGOFRESCO_SHOW_CODE").as_deref() == Ok("1") {
            RenderConfig::default().with_code()
        } else {
            RenderConfig::default()
        };
        Ok(Self { animation, render })
    }
}

/// Write every frame of `visualizer`'s animation as a JSON line.
fn emit<V: Visualizer>(demo: &str, visualizer: &V, settings: &Settings) -> Result<usize, Box<dyn Error>> {
    let Some(animation) = visualizer.create_animation(settings.animation.clone()) else {
        warn!(demo, "nothing to replay");
        return Ok(0);
    };
    let mut out = std::io::stdout().lock();
    let mut count = 0;
    for scene in animation.frames() {
        let line = json!({ "demo": demo, "fingerprint": scene.fingerprint()?, "scene": scene });
        writeln!(out, "{line}")?;
        count += 1;
    }
    info!(
        demo,
        frames = count,
        interval_ms = animation.interval().as_millis() as u64,
        "replayed"
    );
    Ok(count)
}

fn new_tracer<T>() -> Tracer<T> {
    Tracer::with_config(TracerConfig::default().with_code_lines())
}

fn list_demo(settings: &Settings) -> Result<usize, Box<dyn Error>> {
    let mut tracer: Tracer<Vec<i32>> = new_tracer();
    tracer.auto_trace("bubble_sort", |t| {
        let mut items = vec![5, 3, 8, 1, 9, 2];
        t.capture_described(&items, "Initial state");
        for pass in 0..items.len() {
            for i in 0..items.len() - 1 - pass {
                if items[i] > items[i + 1] {
                    items.swap(i, i + 1);
                    t.capture(
                        &items,
                        Annotations::new()
                            .description(format!("Swapped positions {i} and {}", i + 1))
                            .highlight("indices", [i, i + 1])
                            .highlight("range", [(i, i + 1)]),
                    );
                }
            }
        }
    });
    emit("list", &ListVisualizer::with_config(&tracer, settings.render.clone()), settings)
}

fn stack_demo(settings: &Settings) -> Result<usize, Box<dyn Error>> {
    let mut tracer: Tracer<Vec<i32>> = new_tracer();
    let mut stack = Vec::new();
    tracer.capture_described(&stack, "Initial state");
    stack.push(10);
    tracer.capture_described(&stack, "Pushed 10");
    stack.push(20);
    tracer.capture_described(&stack, "Pushed 20");
    stack.pop();
    tracer.capture_described(&stack, "Popped 20");
    emit("stack", &StackVisualizer::with_config(&tracer, settings.render.clone()), settings)
}

fn queue_demo(settings: &Settings) -> Result<usize, Box<dyn Error>> {
    let mut tracer: Tracer<VecDeque<i32>> = new_tracer();
    let mut queue = VecDeque::new();
    tracer.auto_trace("queue_operations", |t| {
        t.capture_described(&queue, "Initial state");
        queue.push_back(10);
        t.capture_described(&queue, "Enqueued 10");
        queue.push_back(20);
        t.capture_described(&queue, "Enqueued 20");
        queue.pop_front();
        t.capture_described(&queue, "Dequeued 10");
    });
    emit("queue", &QueueVisualizer::with_config(&tracer, settings.render.clone()), settings)
}

fn dict_demo(settings: &Settings) -> Result<usize, Box<dyn Error>> {
    let mut tracer: Tracer<IndexMap<&str, String>> = new_tracer();
    let mut dict = IndexMap::new();
    tracer.capture_described(&dict, "Initial state");
    dict.insert("age", "30".to_string());
    tracer.capture(&dict, Annotations::new().description("age -> 30").highlight("keys", ["age"]));
    dict.insert("name", "Alice".to_string());
    tracer.capture(
        &dict,
        Annotations::new().description("name -> Alice").highlight("values", ["Alice"]),
    );
    emit("dict", &DictionaryVisualizer::with_config(&tracer, settings.render.clone()), settings)
}

fn graph_demo(settings: &Settings) -> Result<usize, Box<dyn Error>> {
    let mut tracer: Tracer<Graph<i32>> = new_tracer();
    let mut g = Graph::new();
    tracer.auto_trace("graph_operations", |t| {
        t.capture_described(&g, "Initial state");
        g.add_node(1);
        t.capture_described(&g, "Added node 1");
        g.add_nodes_from([2, 3]);
        t.capture_described(&g, "Added nodes 2-3");
        g.add_edge(1, 2);
        t.capture(&g, Annotations::new().description("Connected 1-2").highlight("edges", [(1, 2)]));
        g.add_edge(2, 3);
        t.capture(&g, Annotations::new().description("Connected 2-3").highlight("nodes", [2, 3]));
    });
    let visualizer = GraphVisualizer::with_config(&tracer, settings.render.clone())
        .with_layout(LayoutKind::resolve("kamada_kawai"))
        .with_layout_config(LayoutConfig::default().with_seed(7));
    emit("graph", &visualizer, settings)
}

fn tree_demo(settings: &Settings) -> Result<usize, Box<dyn Error>> {
    let mut tracer: Tracer<BinaryNode<i32>> = new_tracer();
    tracer.auto_trace("tree_operations", |t| {
        let mut root = BinaryNode::new(1);
        t.capture_described(&root, "Root created");
        root = root.with_left(BinaryNode::new(2)).with_right(BinaryNode::new(3));
        t.capture_described(&root, "Added children");
        if let Some(left) = root.left.as_mut() {
            left.right = Some(Box::new(BinaryNode::new(4)));
        }
        t.capture(&root, Annotations::new().description("Added grandchild").highlight("nodes", [4]));
    });
    let visualizer = TreeVisualizer::with_config(&tracer, settings.render.clone())
        .with_layout(LayoutKind::resolve("dot"));
    emit("tree", &visualizer, settings)
}

fn run(demo: &str, settings: &Settings) -> Result<usize, Box<dyn Error>> {
    match demo {
        "list" => list_demo(settings),
        "stack" => stack_demo(settings),
        "queue" => queue_demo(settings),
        "dict" => dict_demo(settings),
        "graph" => graph_demo(settings),
        "tree" => tree_demo(settings),
        other => Err(format!("unknown demo '{other}', expected one of {}", DEMOS.join(", ")).into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let settings = Settings::from_env()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        interval_ms = settings.animation.interval_ms,
        show_code = settings.render.show_code,
        "starting algofresco demo"
    );

    let selected: Vec<String> = match std::env::args().nth(1) {
        Some(demo) => vec![demo],
        None => DEMOS.iter().map(|d| d.to_string()).collect(),
    };

    let mut total = 0;
    for demo in &selected {
        total += run(demo, &settings)?;
    }
    info!(demos = selected.len(), frames = total, "done");
    Ok(())
}
