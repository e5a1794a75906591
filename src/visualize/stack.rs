//! Stack (LIFO) renderer. The last element is the top.

use super::{base_scene, Frame, Visualizer};
use crate::config::RenderConfig;
use crate::scene::{Cell, Rect, Scene};
use crate::store::Tracer;
use crate::types::{Sequence, StepMetadata};

/// Highlight selector for stacks: the top, selected by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackHighlight {
    /// Mark the top element.
    pub top: bool,
}

impl Default for StackHighlight {
    fn default() -> Self {
        Self { top: true }
    }
}

/// Renders stack snapshots as a vertical column, bottom first.
#[derive(Debug)]
pub struct StackVisualizer<'a, S> {
    tracer: &'a Tracer<S>,
    config: RenderConfig,
}

impl<'a, S: Sequence> StackVisualizer<'a, S> {
    /// Create a renderer with default options.
    pub fn new(tracer: &'a Tracer<S>) -> Self {
        Self::with_config(tracer, RenderConfig::default())
    }

    /// Create a renderer.
    pub fn with_config(tracer: &'a Tracer<S>, config: RenderConfig) -> Self {
        Self { tracer, config }
    }
}

impl<S: Sequence> Visualizer for StackVisualizer<'_, S> {
    type Snapshot = S;
    type Highlight = StackHighlight;

    fn tracer(&self) -> &Tracer<S> {
        self.tracer
    }

    fn render_config(&self) -> &RenderConfig {
        &self.config
    }

    fn highlight_from_metadata(&self, _metadata: &StepMetadata) -> StackHighlight {
        StackHighlight::default()
    }

    fn render(&self, frame: &Frame<'_, S>, highlight: &StackHighlight, title: Option<&str>) -> Scene {
        let palette = &self.config.palette;
        let mut scene = base_scene(frame, title, &self.config);
        let items = frame.snapshot.items();
        let n = items.len();
        if n == 0 {
            scene.placeholder = Some("Empty Stack".to_string());
            return scene;
        }

        let height = 0.8 / n as f64;
        for (i, item) in items.iter().enumerate() {
            let mut cell = Cell::new(
                Rect::new(0.1, i as f64 * height, 0.8, height),
                item.to_string(),
                palette.stack_cell.clone(),
            );
            if highlight.top && i == n - 1 {
                cell.fill = palette.boundary.clone();
                cell.marker = Some("Top".to_string());
            }
            scene.cells.push(cell);
        }
        scene
    }
}
