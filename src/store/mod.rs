//! Trace storage: the step-indexed snapshot history and its observation
//! scopes.

pub mod scope;
pub mod tracer;

pub use scope::{ObservedScope, ScopeError, ScopeId};
pub use tracer::{SnapshotRef, TraceError, TraceId, Tracer, LATEST};
