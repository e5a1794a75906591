//! Replay driver: turns the stored history into a lazy frame sequence.
//!
//! An [`Animation`] maps a frame index in `[0, len)` to a rendered
//! [`Scene`]. Frames are produced on demand, never materialized in bulk.
//!
//! ## Layout Caching
//!
//! Graph and tree layouts are computed at most once per step and reused on
//! every later render of that step. A force-directed layout recomputed per
//! frame would jitter; with the cache, replaying the same animation yields
//! identical frames.
//!
//! The animation borrows the visualizer, and through it the tracer, so the
//! history cannot grow while an animation is alive.

use std::borrow::Cow;
use std::cell::OnceCell;
use std::iter::FusedIterator;
use std::time::Duration;

use crate::config::AnimationConfig;
use crate::layout::Layout;
use crate::scene::Scene;
use crate::store::TraceError;
use crate::visualize::{Frame, Visualizer};

/// A finite, replayable sequence of frames, one per stored step.
pub struct Animation<'v, V: Visualizer> {
    visualizer: &'v V,
    config: AnimationConfig,
    layouts: Vec<OnceCell<Layout>>,
}

impl<'v, V: Visualizer> Animation<'v, V> {
    /// Create an animation over every stored step; `None` if there are none.
    pub fn new(visualizer: &'v V, config: AnimationConfig) -> Option<Self> {
        let tracer = visualizer.tracer();
        if tracer.is_empty() {
            tracing::info!(trace_id = %tracer.id(), "no snapshots available");
            return None;
        }
        tracing::debug!(
            trace_id = %tracer.id(),
            frames = tracer.len(),
            interval_ms = config.interval_ms,
            "created animation"
        );
        Some(Self {
            visualizer,
            config,
            layouts: (0..tracer.len()).map(|_| OnceCell::new()).collect(),
        })
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Always false: empty traces produce no animation.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Fixed delay between frames.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.config.interval_ms)
    }

    /// Whether playback loops.
    pub fn repeat(&self) -> bool {
        self.config.repeat
    }

    /// Playback configuration.
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Number of steps whose layout has been computed so far.
    pub fn cached_layouts(&self) -> usize {
        self.layouts.iter().filter(|c| c.get().is_some()).count()
    }

    /// Frame data for an index, computing and caching its layout if needed.
    pub fn frame(&self, index: usize) -> Result<Frame<'_, V::Snapshot>, TraceError> {
        let entry = self.visualizer.tracer().snapshot_at(index)?;
        let graph = self.visualizer.canonical_graph(entry.state);
        let layout = match (&graph, self.layouts.get(index)) {
            (Some(g), Some(cell)) => Some(Cow::Borrowed(
                cell.get_or_init(|| self.visualizer.compute_layout(g)),
            )),
            _ => None,
        };
        Ok(Frame::new(entry, graph, layout))
    }

    /// Render the frame at `index`, highlighting from step metadata.
    pub fn render_frame(&self, index: usize) -> Result<Scene, TraceError> {
        let frame = self.frame(index)?;
        let highlight = self.visualizer.highlight_from_metadata(frame.metadata);
        Ok(self.visualizer.render(&frame, &highlight, None))
    }

    /// One pass over all frames in capture order.
    ///
    /// Each call starts a fresh pass; a consumed pass cannot be restarted.
    pub fn frames(&self) -> Frames<'_, 'v, V> {
        Frames {
            animation: self,
            next: 0,
        }
    }
}

/// Lazy iterator over the rendered frames of an [`Animation`].
pub struct Frames<'a, 'v, V: Visualizer> {
    animation: &'a Animation<'v, V>,
    next: usize,
}

impl<V: Visualizer> Iterator for Frames<'_, '_, V> {
    type Item = Scene;

    fn next(&mut self) -> Option<Scene> {
        if self.next >= self.animation.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        match self.animation.render_frame(index) {
            Ok(scene) => Some(scene),
            Err(e) => {
                tracing::error!(index, error = %e, "failed to render frame");
                self.next = self.animation.len();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.animation.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<V: Visualizer> ExactSizeIterator for Frames<'_, '_, V> {}

impl<V: Visualizer> FusedIterator for Frames<'_, '_, V> {}
