//! List and array renderer.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use super::{base_scene, contains_value, to_values, Frame, Visualizer};
use crate::config::RenderConfig;
use crate::scene::{Cell, Outline, Rect, Scene};
use crate::store::Tracer;
use crate::types::{Sequence, StepMetadata};

const CELL_HEIGHT: f64 = 0.5;

/// Highlight selector for lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListHighlight {
    /// Indices to highlight.
    pub indices: BTreeSet<usize>,
    /// Values to highlight, matched by equality.
    pub values: Vec<Value>,
    /// Inclusive `(start, end)` ranges to outline. A range with an
    /// endpoint outside the list is ignored.
    pub ranges: Vec<(i64, i64)>,
}

impl ListHighlight {
    /// Empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight indices.
    pub fn indices<I: IntoIterator<Item = usize>>(mut self, indices: I) -> Self {
        self.indices.extend(indices);
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

    /// Outline an inclusive range.
    pub fn range(mut self, start: i64, end: i64) -> Self {
        self.ranges.push((start, end));
        self
    }
}

/// Renders list snapshots as a row of cells.
#[derive(Debug)]
pub struct ListVisualizer<'a, S> {
    tracer: &'a Tracer<S>,
    config: RenderConfig,
}

impl<'a, S: Sequence> ListVisualizer<'a, S> {
    /// Create a renderer with default options.
    pub fn new(tracer: &'a Tracer<S>) -> Self {
        Self::with_config(tracer, RenderConfig::default())
    }

    /// Create a renderer.
    pub fn with_config(tracer: &'a Tracer<S>, config: RenderConfig) -> Self {
        Self { tracer, config }
    }
}

impl<S: Sequence> Visualizer for ListVisualizer<'_, S> {
    type Snapshot = S;
    type Highlight = ListHighlight;

    fn tracer(&self) -> &Tracer<S> {
        self.tracer
    }

    fn render_config(&self) -> &RenderConfig {
        &self.config
    }

    fn highlight_from_metadata(&self, metadata: &StepMetadata) -> ListHighlight {
        let indices = metadata
            .highlight("indices")
            .iter()
            .filter_map(|v| v.as_u64())
            .filter_map(|i| usize::try_from(i).ok());
        let ranges = metadata.highlight("range").iter().filter_map(|v| {
            let pair = v.as_array()?;
            match pair.as_slice() {
                [start, end] => Some((start.as_i64()?, end.as_i64()?)),
                _ => None,
            }
        });
        ListHighlight {
            indices: indices.collect(),
            values: metadata.highlight("values").to_vec(),
            ranges: ranges.collect(),
        }
    }

    fn render(&self, frame: &Frame<'_, S>, highlight: &ListHighlight, title: Option<&str>) -> Scene {
        let palette = &self.config.palette;
        let mut scene = base_scene(frame, title, &self.config);
        let items = frame.snapshot.items();
        let len = items.len();
        if len == 0 {
            scene.placeholder = Some("Empty List".to_string());
            return scene;
        }

        let width = 1.0 / len as f64;
        for (i, item) in items.iter().enumerate() {
            // Value highlight wins over index highlight.
            let fill = if contains_value(&highlight.values, *item) {
                &palette.value_highlight
            } else if highlight.indices.contains(&i) {
                &palette.index_highlight
            } else {
                &palette.cell
            };
            let mut cell = Cell::new(
                Rect::new(i as f64 * width, 0.0, width, CELL_HEIGHT),
                item.to_string(),
                fill.clone(),
            );
            if self.config.show_indices {
                cell.caption = Some(i.to_string());
            }
            scene.cells.push(cell);
        }

        for &(start, end) in &highlight.ranges {
            let in_bounds = |i: i64| i >= 0 && (i as usize) < len;
            if !in_bounds(start) || !in_bounds(end) || start > end {
                tracing::debug!(start, end, len, "ignoring out-of-bounds highlight range");
                continue;
            }
            scene.outlines.push(Outline {
                rect: Rect::new(
                    start as f64 * width,
                    0.0,
                    (end - start + 1) as f64 * width,
                    CELL_HEIGHT,
                ),
                color: palette.edge_highlight.clone(),
            });
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Annotations;
    use crate::AnimationConfig;

    fn sample() -> Tracer<Vec<i32>> {
        let mut tracer = Tracer::new();
        tracer.capture_described(&vec![5, 3, 8, 1, 9], "unsorted");
        tracer
    }

    #[test]
    fn test_cells_and_indices() {
        let tracer = sample();
        let scene = ListVisualizer::new(&tracer)
            .display_snapshot(-1, &ListHighlight::new(), None)
            .unwrap()
            .unwrap();

        assert_eq!(scene.title, "Step 0: unsorted");
        assert_eq!(scene.cells.len(), 5);
        assert_eq!(scene.cells[2].text, "8");
        assert_eq!(scene.cells[2].caption.as_deref(), Some("2"));
        assert!((scene.cells[1].rect.x - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_index_and_value_highlights() {
        let tracer = sample();
        let vis = ListVisualizer::new(&tracer);
        let highlight = ListHighlight::new().indices([0, 1]).values([1]);
        let scene = vis.display_snapshot(0, &highlight, None).unwrap().unwrap();
        let palette = &vis.render_config().palette;

        assert_eq!(scene.cells[0].fill, palette.index_highlight);
        assert_eq!(scene.cells[3].fill, palette.value_highlight);
        assert_eq!(scene.cells[4].fill, palette.cell);
    }

    #[test]
    fn test_out_of_bounds_range_is_ignored() {
        let tracer = sample();
        let vis = ListVisualizer::new(&tracer);
        let base = ListHighlight::new().indices([1]).range(0, 1);

        let with_bad = vis
            .display_snapshot(0, &base.clone().range(2, 10), None)
            .unwrap()
            .unwrap();
        let without = vis.display_snapshot(0, &base, None).unwrap().unwrap();

        assert_eq!(with_bad, without);
        assert_eq!(with_bad.outlines.len(), 1);
        assert_eq!(with_bad.cells[1].fill, vis.render_config().palette.index_highlight);
    }

    #[test]
    fn test_empty_list_placeholder() {
        let mut tracer: Tracer<Vec<i32>> = Tracer::new();
        tracer.capture(&vec![], Annotations::new());
        let scene = ListVisualizer::new(&tracer)
            .display_snapshot(0, &ListHighlight::new(), None)
            .unwrap()
            .unwrap();

        assert_eq!(scene.placeholder.as_deref(), Some("Empty List"));
        assert!(scene.cells.is_empty());
    }

    #[test]
    fn test_animation_reads_metadata_highlights() {
        let mut tracer = Tracer::new();
        tracer.capture(
            &vec![1, 2, 3],
            Annotations::new().highlight("indices", [2]).highlight("range", [(0, 1), (1, 7)]),
        );
        let vis = ListVisualizer::new(&tracer);
        let animation = vis.create_animation(AnimationConfig::default()).unwrap();
        let scene = animation.render_frame(0).unwrap();

        assert_eq!(scene.cells[2].fill, vis.render_config().palette.index_highlight);
        assert_eq!(scene.outlines.len(), 1);
    }
}
