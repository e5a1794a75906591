//! # algofresco
//!
//! Step-by-step replay of data structures as an algorithm mutates them.
//!
//! The hard part is not the drawing. It is:
//!
//! > Keeping an immutable, step-indexed history of a structure that the
//! > producer keeps mutating, and normalizing several tree shapes into one
//! > graph form that renderers can lay out.
//!
//! ## Core Contract
//!
//! 1. `capture(state, annotations)` stores an independent copy and returns its step index
//! 2. `get_snapshot(step)` returns exactly what was captured at that step (`-1` = latest)
//! 3. Tree snapshots of any supported shape become one [`CanonicalGraph`]
//! 4. A renderer turns a step into a backend-neutral [`Scene`]; an [`Animation`]
//!    maps frame indices to scenes lazily, caching layouts per step
//!
//! ## Architecture
//!
//! ```text
//! producer → Tracer::capture → [Snapshot, StepMetadata]*
//!                                     ↓
//!          Visualizer ← CanonicalGraph ← tree snapshot
//!              ↓
//!          Scene → Surface (external backend)
//!              ↑
//!          Animation (frame index → Scene, cached Layout)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same snapshot → identical canonical graph (ids assigned parent-first, root = 0)
//! - A stored snapshot never changes after capture
//! - Replaying an animation yields identical frames, even with force-directed layouts

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod store;
pub mod canonical;
pub mod canonical_graph;
pub mod config;
pub mod layout;
pub mod scene;
pub mod visualize;
pub mod replay;

// Re-exports
pub use types::{
    Annotations, BinaryNode, CodeContext, Graph, Mapping, MetadataError, OrderedNode, Sequence,
    Shape, StepMetadata, TreeShape, TreeSnapshot, HIGHLIGHT_PREFIX,
};
pub use store::{ObservedScope, ScopeError, ScopeId, SnapshotRef, TraceError, TraceId, Tracer, LATEST};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use canonical_graph::{CanonicalGraph, CanonicalNode};
pub use config::{
    AnimationConfig, JsonConfig, LayoutConfig, Palette, RenderConfig, TracerConfig,
    DEFAULT_FRAME_INTERVAL_MS,
};
pub use layout::{Layout, LayoutKind, Point};
pub use scene::{Cell, CodePanel, GraphScene, Outline, Rect, Scene, SceneEdge, SceneNode, Surface};
pub use visualize::{
    DictionaryHighlight, DictionaryVisualizer, Frame, GraphHighlight, GraphVisualizer,
    ListHighlight, ListVisualizer, QueueHighlight, QueueVisualizer, StackHighlight,
    StackVisualizer, TreeHighlight, TreeVisualizer, Visualizer,
};
pub use replay::{Animation, Frames};

/// Schema version of serialized scenes and step metadata.
pub const SCENE_SCHEMA_VERSION: &str = "1.0.0";
