//! Dictionary renderer: a square grid of key-over-value cells.

use serde::Serialize;
use serde_json::Value;

use super::{base_scene, contains_value, to_values, Frame, Visualizer};
use crate::config::RenderConfig;
use crate::scene::{Cell, Rect, Scene};
use crate::store::Tracer;
use crate::types::{Mapping, StepMetadata};

/// Highlight selector for dictionaries. Both sets match by equality.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictionaryHighlight {
    /// Keys to highlight.
    pub keys: Vec<Value>,
    /// Values to highlight.
    pub values: Vec<Value>,
}

impl DictionaryHighlight {
    /// Empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight keys.
    pub fn keys<I, V>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Serialize,
    {
        self.keys.extend(to_values(keys));
        self
    }

    /// Highlight values.
    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Serialize,
    {
        self.values.extend(to_values(values));
        self
    }
}

/// Renders mapping snapshots.
#[derive(Debug)]
pub struct DictionaryVisualizer<'a, S> {
    tracer: &'a Tracer<S>,
    config: RenderConfig,
}

impl<'a, S: Mapping> DictionaryVisualizer<'a, S> {
    /// Create a renderer with default options.
    pub fn new(tracer: &'a Tracer<S>) -> Self {
        Self::with_config(tracer, RenderConfig::default())
    }

    /// Create a renderer.
    pub fn with_config(tracer: &'a Tracer<S>, config: RenderConfig) -> Self {
        Self { tracer, config }
    }
}

impl<S: Mapping> Visualizer for DictionaryVisualizer<'_, S> {
    type Snapshot = S;
    type Highlight = DictionaryHighlight;

    fn tracer(&self) -> &Tracer<S> {
        self.tracer
    }

    fn render_config(&self) -> &RenderConfig {
        &self.config
    }

    fn highlight_from_metadata(&self, metadata: &StepMetadata) -> DictionaryHighlight {
        DictionaryHighlight {
            keys: metadata.highlight("keys").to_vec(),
            values: metadata.highlight("values").to_vec(),
        }
    }

    fn render(&self, frame: &Frame<'_, S>, highlight: &DictionaryHighlight, title: Option<&str>) -> Scene {
        let palette = &self.config.palette;
        let mut scene = base_scene(frame, title, &self.config);
        let entries = frame.snapshot.entries();
        if entries.is_empty() {
            scene.placeholder = Some("Empty Dictionary".to_string());
            return scene;
        }

        let grid = (entries.len() as f64).sqrt().ceil() as usize;
        let size = 1.0 / grid as f64;
        for (i, (key, value)) in entries.into_iter().enumerate() {
            let x = (i % grid) as f64 * size;
            let y = 1.0 - ((i / grid) + 1) as f64 * size;

            let key_fill = if contains_value(&highlight.keys, key) {
                &palette.index_highlight
            } else {
                &palette.cell
            };
            let value_fill = if contains_value(&highlight.values, value) {
                &palette.value_highlight
            } else {
                &palette.cell
            };
            scene.cells.push(Cell::new(
                Rect::new(x, y + size / 2.0, size, size / 2.0),
                key.to_string(),
                key_fill.clone(),
            ));
            scene.cells.push(Cell::new(
                Rect::new(x, y, size, size / 2.0),
                value.to_string(),
                value_fill.clone(),
            ));
        }
        scene
    }
}
