//! Core domain models for the task graph.
//!
//! Nodes are stored in an arena owned by [`TaskGraph`](crate::TaskGraph) and
//! refer to one another through [`NodeId`] indices.  Only the parent/children
//! links express ownership; everything else is a derived, non-owning view.

use serde::Serialize;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Index of a node inside the graph that created it.
///
/// Ids are only meaningful for the graph they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

// ---------------------------------------------------------------------------
// TaskKind
// ---------------------------------------------------------------------------

/// Whether a node groups other nodes or carries a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Owns child nodes, never has a formula.
    Composite,
    /// Has a formula, never has children.
    Leaf,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Composite => "composite",
            TaskKind::Leaf => "leaf",
        }
    }
}

// ---------------------------------------------------------------------------
// TaskNode
// ---------------------------------------------------------------------------

/// A single vertex of the task tree.
#[derive(Debug, Clone)]
pub struct TaskNode {
    /// Dot-joined scope path; the lookup key.
    pub name: String,
    /// The unqualified mapping key this node was declared under.
    pub key: String,
    pub kind: TaskKind,
    /// Raw expression text. `Some` only for leaves.
    pub formula: Option<String>,
    pub parent: Option<NodeId>,
    /// Owned nodes, in input order.
    pub children: Vec<NodeId>,
    /// Other nodes under the same parent (or other top-level nodes).
    pub siblings: Vec<NodeId>,
    /// Parent chain, nearest first.
    pub ancestors: Vec<NodeId>,
    pub dependencies: Vec<NodeId>,
    /// Nodes referenced through `name.member(` syntax.
    pub object_dependencies: Vec<NodeId>,
}

impl TaskNode {
    pub(crate) fn new(
        name: String,
        key: String,
        kind: TaskKind,
        formula: Option<String>,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            name,
            key,
            kind,
            formula,
            parent,
            children: Vec::new(),
            siblings: Vec::new(),
            ancestors: Vec::new(),
            dependencies: Vec::new(),
            object_dependencies: Vec::new(),
        }
    }

    pub(crate) fn add_dependency(&mut self, id: NodeId) {
        if !self.dependencies.contains(&id) {
            self.dependencies.push(id);
        }
    }

    pub(crate) fn add_object_dependency(&mut self, id: NodeId) {
        if !self.object_dependencies.contains(&id) {
            self.object_dependencies.push(id);
        }
    }
}

// ---------------------------------------------------------------------------
// Unresolved references
// ---------------------------------------------------------------------------

/// How an identifier was referenced inside a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Plain,
    Object,
}

impl RefKind {
    pub fn label(self) -> &'static str {
        match self {
            RefKind::Plain => "dependency",
            RefKind::Object => "object dependency",
        }
    }
}

/// An identifier that no node in scope matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    /// Qualified name of the node whose formula holds the reference.
    pub task: String,
    pub identifier: String,
    pub kind: RefKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> TaskNode {
        TaskNode::new(name.into(), name.into(), TaskKind::Leaf, Some("1".into()), None)
    }

    #[test]
    fn dependencies_are_deduplicated() {
        let mut node = leaf("a");
        node.add_dependency(NodeId(3));
        node.add_dependency(NodeId(1));
        node.add_dependency(NodeId(3));
        assert_eq!(node.dependencies, vec![NodeId(3), NodeId(1)]);

        node.add_object_dependency(NodeId(2));
        node.add_object_dependency(NodeId(2));
        assert_eq!(node.object_dependencies, vec![NodeId(2)]);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&TaskKind::Composite).unwrap();
        assert_eq!(json, "\"composite\"");
    }
}
