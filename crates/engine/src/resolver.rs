//! Scope resolver — maps a formula identifier to a node.
//!
//! Lookup order, first hit wins:
//! 1. the requesting node's siblings;
//! 2. walking up from the immediate parent, each ancestor itself and then
//!    that ancestor's siblings.
//!
//! Matching is by trailing name segment, so `A` matches `root.A`. When
//! several nodes share a trailing segment the first one in scan order wins.

use crate::models::{NodeId, TaskNode};

/// True when `candidate` is the whole of `name` or its last dotted segment(s).
pub fn suffix_match(name: &str, candidate: &str) -> bool {
    match name.strip_suffix(candidate) {
        Some("") => true,
        Some(head) => head.ends_with('.'),
        None => false,
    }
}

/// Resolve `candidate` as seen from the node `from`.
pub(crate) fn resolve(nodes: &[TaskNode], from: NodeId, candidate: &str) -> Option<NodeId> {
    let matches = |id: NodeId| suffix_match(&nodes[id.0].name, candidate);
    let node = &nodes[from.0];

    if let Some(&sibling) = node.siblings.iter().find(|&&id| matches(id)) {
        return Some(sibling);
    }

    let mut cursor = node.parent;
    while let Some(parent) = cursor {
        if matches(parent) {
            return Some(parent);
        }
        if let Some(&uncle) = nodes[parent.0].siblings.iter().find(|&&id| matches(id)) {
            return Some(uncle);
        }
        cursor = nodes[parent.0].parent;
    }

    None
}
