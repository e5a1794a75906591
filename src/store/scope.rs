//! Observation scopes ("auto-trace").
//!
//! An observation scope marks a unit of work as traced. It never captures
//! anything on its own: the steps it covers are exactly the explicit
//! `capture` calls made between its start and end.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::Span;

/// Identifier of an observation scope, unique within one tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopeId(u64);

impl ScopeId {
    /// Raw id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// A closed observation scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedScope {
    /// Scope id.
    pub id: ScopeId,
    /// Name of the observed unit of work.
    pub name: String,
    /// First step that could have been captured inside the scope.
    pub first_step: usize,
    /// One past the last step captured inside the scope.
    pub end_step: usize,
    /// Nesting depth (0 for outermost).
    pub depth: usize,
}

impl ObservedScope {
    /// Steps captured inside the scope.
    pub fn steps(&self) -> Range<usize> {
        self.first_step..self.end_step
    }

    /// Number of steps captured inside the scope.
    pub fn step_count(&self) -> usize {
        self.end_step - self.first_step
    }
}

#[derive(Debug)]
struct OpenScope {
    id: ScopeId,
    name: String,
    first_step: usize,
    span: Span,
}

/// Open and closed scopes of one tracer.
#[derive(Debug, Default)]
pub(crate) struct ScopeLog {
    next_id: u64,
    open: Vec<OpenScope>,
    closed: Vec<ObservedScope>,
}

impl ScopeLog {
    pub(crate) fn begin(&mut self, name: String, first_step: usize, parent: &Span) -> ScopeId {
        let id = ScopeId(self.next_id);
        self.next_id += 1;
        let span = tracing::info_span!(
            parent: parent,
            "observe",
            scope = %id,
            unit = %name,
            first_step
        );
        span.in_scope(|| tracing::debug!("observation started"));
        self.open.push(OpenScope {
            id,
            name,
            first_step,
            span,
        });
        id
    }

    /// Close the innermost scope, which must be `id`.
    pub(crate) fn end(&mut self, id: ScopeId, end_step: usize) -> Result<&ObservedScope, ScopeError> {
        match self.open.last() {
            None => return Err(ScopeError::NotOpen(id)),
            Some(innermost) if innermost.id != id => {
                return Err(if self.open.iter().any(|s| s.id == id) {
                    ScopeError::Order {
                        expected: innermost.id,
                        found: id,
                    }
                } else {
                    ScopeError::NotOpen(id)
                })
            }
            Some(_) => {}
        }
        let depth = self.open.len() - 1;
        let scope = self.open.pop().ok_or(ScopeError::NotOpen(id))?;
        Ok(self.close(scope, depth, end_step))
    }

    /// Close `id` and every scope opened inside it.
    pub(crate) fn end_through(&mut self, id: ScopeId, end_step: usize) -> Option<&ObservedScope> {
        let position = self.open.iter().position(|s| s.id == id)?;
        while self.open.len() > position + 1 {
            let depth = self.open.len() - 1;
            if let Some(inner) = self.open.pop() {
                tracing::warn!(scope = %inner.id, unit = %inner.name, "closing observation left open by its unit of work");
                self.close(inner, depth, end_step);
            }
        }
        let scope = self.open.pop()?;
        Some(self.close(scope, position, end_step))
    }

    fn close(&mut self, scope: OpenScope, depth: usize, end_step: usize) -> &ObservedScope {
        let observed = ObservedScope {
            id: scope.id,
            name: scope.name,
            first_step: scope.first_step,
            end_step,
            depth,
        };
        scope.span.in_scope(|| {
            tracing::debug!(steps = observed.step_count(), "observation ended");
        });
        self.closed.push(observed);
        &self.closed[self.closed.len() - 1]
    }

    /// Span of an open scope.
    pub(crate) fn span(&self, id: ScopeId) -> Option<&Span> {
        self.open.iter().find(|s| s.id == id).map(|s| &s.span)
    }

    /// Span of the innermost open scope.
    pub(crate) fn current_span(&self) -> Option<&Span> {
        self.open.last().map(|s| &s.span)
    }

    pub(crate) fn open_count(&self) -> usize {
        self.open.len()
    }

    pub(crate) fn closed(&self) -> &[ObservedScope] {
        &self.closed
    }
}

/// Misuse of the begin/end observation API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// The scope is not open.
    #[error("Observation scope not open: {0}")]
    NotOpen(ScopeId),
    /// An inner scope must be closed first.
    #[error("Observation scopes must close innermost first: expected {expected}, got {found}")]
    Order {
        /// Innermost open scope.
        expected: ScopeId,
        /// Scope the caller tried to close.
        found: ScopeId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_scopes_close_innermost_first() {
        let mut log = ScopeLog::default();
        let root = Span::none();
        let outer = log.begin("outer".into(), 0, &root);
        let inner = log.begin("inner".into(), 1, &root);

        assert_eq!(
            log.end(outer, 2).unwrap_err(),
            ScopeError::Order { expected: inner, found: outer }
        );
        assert_eq!(log.end(inner, 2).unwrap().depth, 1);
        assert_eq!(log.end(outer, 3).unwrap().steps(), 0..3);
        assert_eq!(log.end(outer, 3).unwrap_err(), ScopeError::NotOpen(outer));
    }

    #[test]
    fn test_end_through_closes_inner_scopes() {
        let mut log = ScopeLog::default();
        let root = Span::none();
        let outer = log.begin("outer".into(), 0, &root);
        log.begin("leaked".into(), 1, &root);

        let closed = log.end_through(outer, 4).unwrap();
        assert_eq!(closed.name, "outer");
        assert_eq!(log.open_count(), 0);
        assert_eq!(log.closed().len(), 2);
    }
}
