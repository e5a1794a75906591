//! Queue (FIFO) renderer. Element 0 is the front.

use super::{base_scene, Frame, Visualizer};
use crate::config::RenderConfig;
use crate::scene::{Cell, Rect, Scene};
use crate::store::Tracer;
use crate::types::{Sequence, StepMetadata};

/// Highlight selector for queues: front and rear, selected by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueHighlight {
    /// Mark the front and rear elements.
    pub front_rear: bool,
}

impl Default for QueueHighlight {
    fn default() -> Self {
        Self { front_rear: true }
    }
}

/// Renders queue snapshots as a horizontal row, front first.
#[derive(Debug)]
pub struct QueueVisualizer<'a, S> {
    tracer: &'a Tracer<S>,
    config: RenderConfig,
}

impl<'a, S: Sequence> QueueVisualizer<'a, S> {
    /// Create a renderer with default options.
    pub fn new(tracer: &'a Tracer<S>) -> Self {
        Self::with_config(tracer, RenderConfig::default())
    }

    /// Create a renderer.
    pub fn with_config(tracer: &'a Tracer<S>, config: RenderConfig) -> Self {
        Self { tracer, config }
    }
}

impl<S: Sequence> Visualizer for QueueVisualizer<'_, S> {
    type Snapshot = S;
    type Highlight = QueueHighlight;

    fn tracer(&self) -> &Tracer<S> {
        self.tracer
    }

    fn render_config(&self) -> &RenderConfig {
        &self.config
    }

    fn highlight_from_metadata(&self, _metadata: &StepMetadata) -> QueueHighlight {
        QueueHighlight::default()
    }

    fn render(&self, frame: &Frame<'_, S>, highlight: &QueueHighlight, title: Option<&str>) -> Scene {
        let palette = &self.config.palette;
        let mut scene = base_scene(frame, title, &self.config);
        let items = frame.snapshot.items();
        let n = items.len();
        if n == 0 {
            scene.placeholder = Some("Empty Queue".to_string());
            return scene;
        }

        let width = 0.8 / n as f64;
        for (i, item) in items.iter().enumerate() {
            let mut cell = Cell::new(
                Rect::new(i as f64 * width, 0.1, width, 0.8),
                item.to_string(),
                palette.queue_cell.clone(),
            );
            if highlight.front_rear {
                cell.marker = match (i == 0, i == n - 1) {
                    (true, true) => Some("Front/Rear".to_string()),
                    (true, false) => Some("Front".to_string()),
                    (false, true) => Some("Rear".to_string()),
                    (false, false) => None,
                };
                if cell.marker.is_some() {
                    cell.fill = palette.boundary.clone();
                }
            }
            scene.cells.push(cell);
        }
        scene
    }
}
