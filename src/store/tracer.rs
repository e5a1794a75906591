//! Append-only, step-indexed history of snapshots.

use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};
use tracing::Span;
use uuid::Uuid;

use super::scope::{ObservedScope, ScopeError, ScopeId, ScopeLog};
use crate::canonical::canonical_hash_hex;
use crate::config::TracerConfig;
use crate::types::{Annotations, CodeContext, MetadataError, StepMetadata};

/// Step selector meaning "the most recent step".
pub const LATEST: isize = -1;

/// Error type for trace store operations.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// Step outside `[0, len)` and not [`LATEST`].
    #[error("Invalid step {step}: trace has {len} steps")]
    InvalidStep {
        /// Requested step.
        step: isize,
        /// Number of stored steps.
        len: usize,
    },
    /// Observation scope misuse.
    #[error(transparent)]
    Scope(#[from] ScopeError),
    /// Malformed caller metadata.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    /// Snapshot could not be serialized for fingerprinting.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Unique identifier of a tracer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stored step: the snapshot and its metadata.
#[derive(Debug, PartialEq)]
pub struct SnapshotRef<'a, T> {
    /// Stored state.
    pub state: &'a T,
    /// Step metadata.
    pub metadata: &'a StepMetadata,
}

impl<T> Clone for SnapshotRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SnapshotRef<'_, T> {}

impl<T> SnapshotRef<'_, T> {
    /// Step index.
    pub fn step(&self) -> usize {
        self.metadata.step
    }
}

/// Records the evolution of one data structure.
///
/// `capture` stores an independent copy of the state (via `Clone`) and
/// assigns it the next step number. Stored steps are never edited or
/// removed, and live as long as the tracer.
///
/// The copy is only as deep as `T::clone`: types sharing state through
/// `Rc`/`Arc` with interior mutability are not isolated from later
/// mutation.
///
/// Not synchronized; callers sharing a tracer across threads must
/// serialize access themselves.
#[derive(Debug)]
pub struct Tracer<T> {
    id: TraceId,
    config: TracerConfig,
    snapshots: Vec<T>,
    metadata: Vec<StepMetadata>,
    scopes: ScopeLog,
    span: Span,
}

impl<T> Tracer<T> {
    /// Create an empty tracer with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TracerConfig::default())
    }

    /// Create an empty tracer.
    pub fn with_config(config: TracerConfig) -> Self {
        let id = TraceId::new();
        let span = tracing::debug_span!("trace", trace_id = %id);
        Self {
            id,
            config,
            snapshots: Vec::new(),
            metadata: Vec::new(),
            scopes: ScopeLog::default(),
            span,
        }
    }

    /// Tracer id.
    pub fn id(&self) -> TraceId {
        self.id
    }

    /// Tracer configuration.
    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    /// Number of stored steps.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// All snapshots in capture order.
    pub fn snapshots(&self) -> &[T] {
        &self.snapshots
    }

    /// All metadata in capture order, parallel to [`Tracer::snapshots`].
    pub fn metadata(&self) -> &[StepMetadata] {
        &self.metadata
    }

    /// Fetch a step; [`LATEST`] (`-1`) selects the most recent one.
    ///
    /// Returns `Ok(None)` ("no data") when nothing has been captured.
    /// Any other step outside `[0, len)` fails with
    /// [`TraceError::InvalidStep`]; steps are never clamped or wrapped.
    pub fn get_snapshot(&self, step: isize) -> Result<Option<SnapshotRef<'_, T>>, TraceError> {
        if self.is_empty() {
            return Ok(None);
        }
        let index = if step == LATEST {
            self.len() - 1
        } else {
            usize::try_from(step).map_err(|_| self.invalid(step))?
        };
        self.snapshot_at(index).map(Some).map_err(|_| self.invalid(step))
    }

    /// Fetch a step by index.
    pub fn snapshot_at(&self, index: usize) -> Result<SnapshotRef<'_, T>, TraceError> {
        match (self.snapshots.get(index), self.metadata.get(index)) {
            (Some(state), Some(metadata)) => Ok(SnapshotRef { state, metadata }),
            _ => Err(self.invalid(isize::try_from(index).unwrap_or(isize::MAX))),
        }
    }

    /// Most recent step, if any.
    pub fn latest(&self) -> Option<SnapshotRef<'_, T>> {
        self.len().checked_sub(1).and_then(|i| self.snapshot_at(i).ok())
    }

    /// All steps in capture order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = SnapshotRef<'_, T>> + '_ {
        self.snapshots
            .iter()
            .zip(&self.metadata)
            .map(|(state, metadata)| SnapshotRef { state, metadata })
    }

    fn invalid(&self, step: isize) -> TraceError {
        TraceError::InvalidStep {
            step,
            len: self.len(),
        }
    }

    /// Mark the start of a traced unit of work.
    ///
    /// Scopes nest and must be ended innermost first. They only annotate
    /// the history; captures inside them are recorded exactly as made.
    pub fn begin_observation(&mut self, name: impl Into<String>) -> ScopeId {
        let parent = self.scopes.current_span().unwrap_or(&self.span).clone();
        let first_step = self.len();
        self.scopes.begin(name.into(), first_step, &parent)
    }

    /// Mark the end of a traced unit of work.
    pub fn end_observation(&mut self, id: ScopeId) -> Result<&ObservedScope, TraceError> {
        let end = self.len();
        Ok(self.scopes.end(id, end)?)
    }

    /// Run `work` inside an observation scope named `name`.
    ///
    /// Scopes left open by `work` are closed along with this one.
    pub fn auto_trace<R>(&mut self, name: &str, work: impl FnOnce(&mut Self) -> R) -> R {
        let id = self.begin_observation(name);
        let span = self.scopes.span(id).cloned().unwrap_or_else(Span::none);
        let out = span.in_scope(|| work(self));
        let end = self.len();
        if self.scopes.end_through(id, end).is_none() {
            tracing::warn!(scope = %id, "observation closed by its own unit of work");
        }
        out
    }

    /// Closed observation scopes, in closing order.
    pub fn observed_scopes(&self) -> &[ObservedScope] {
        self.scopes.closed()
    }

    /// Number of currently open observation scopes.
    pub fn open_observations(&self) -> usize {
        self.scopes.open_count()
    }
}

impl<T> Default for Tracer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Tracer<T> {
    /// Store an independent copy of `state` as the next step.
    ///
    /// Returns the assigned step number.
    #[track_caller]
    pub fn capture(&mut self, state: &T, annotations: Annotations) -> usize {
        let location = Location::caller();
        self.push(state.clone(), annotations, location)
    }

    /// [`Tracer::capture`] with only a description.
    #[track_caller]
    pub fn capture_described(&mut self, state: &T, description: impl Into<String>) -> usize {
        let location = Location::caller();
        self.push(state.clone(), Annotations::new().description(description), location)
    }

    /// [`Tracer::capture`] with metadata given as a JSON mapping.
    #[track_caller]
    pub fn capture_with(&mut self, state: &T, metadata: serde_json::Value) -> Result<usize, TraceError> {
        let location = Location::caller();
        let annotations = Annotations::from_value(metadata)?;
        Ok(self.push(state.clone(), annotations, location))
    }

    fn push(&mut self, state: T, mut annotations: Annotations, location: &Location<'_>) -> usize {
        if self.config.track_code_lines {
            let code = annotations.code.get_or_insert_with(CodeContext::default);
            if code.file.is_none() {
                code.file = Some(location.file().to_string());
                code.line = Some(location.line());
            }
        }

        let step = self.snapshots.len();
        self.snapshots.push(state);
        self.metadata.push(StepMetadata::new(step, annotations));

        let span = self.scopes.current_span().unwrap_or(&self.span);
        span.in_scope(|| tracing::debug!(step, "captured snapshot"));
        step
    }
}

impl<T: Serialize> Tracer<T> {
    /// Content fingerprint of a stored snapshot.
    pub fn fingerprint(&self, step: usize) -> Result<String, TraceError> {
        let entry = self.snapshot_at(step)?;
        Ok(canonical_hash_hex(entry.state)?)
    }
}
