//! Engine-level error types.

use thiserror::Error;

/// Errors produced by the task graph.
///
/// Building never fails on content: unresolved references are reported
/// through [`Unresolved`](crate::models::Unresolved) instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// No node carries this qualified name.
    #[error("task '{0}' not found")]
    NotFound(String),

    /// The configuration document is not a mapping at its root.
    #[error("configuration root must be a mapping, found {0}")]
    RootNotMapping(&'static str),
}
