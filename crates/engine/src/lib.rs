//! `engine` crate — builds a resolved dependency graph from a nested task
//! configuration.
//!
//! Every leaf's formula is scanned for identifiers, and each identifier is
//! resolved against the surrounding scopes into an explicit edge.

pub mod models;
pub mod error;
pub mod tokenizer;
pub mod resolver;
pub mod graph;

mod builder;
mod relations;

pub use models::{NodeId, RefKind, TaskKind, TaskNode, Unresolved};
pub use error::GraphError;
pub use tokenizer::{scan_formula, FormulaRefs};
pub use graph::{GraphConfig, NodeDisplay, TaskGraph, DEFAULT_ENTRY_KEY};
