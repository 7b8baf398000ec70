//! Task graph — the public facade over the build pipeline.
//!
//! Every build runs the same three passes:
//! 1. Builds the ownership tree from the nested mapping.
//! 2. Derives siblings and ancestors once the whole tree exists.
//! 3. Scans every leaf formula and resolves each candidate name to a node.
//!    Names nothing in scope matches are logged and recorded, never fatal.
//!
//! The resulting graph is immutable; a changed configuration means a new build.

use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::builder::{build_tree, Tree};
use crate::models::{NodeId, RefKind, TaskNode, Unresolved};
use crate::relations::derive_relationships;
use crate::resolver::resolve;
use crate::tokenizer::scan_formula;
use crate::GraphError;

/// Key that marks the entry-point leaf unless configured otherwise.
pub const DEFAULT_ENTRY_KEY: &str = "main";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Build options.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Unqualified key that registers a leaf as the entry point.
    pub entry_key: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            entry_key: DEFAULT_ENTRY_KEY.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskGraph
// ---------------------------------------------------------------------------

/// A fully resolved task graph.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tree: Tree,
    unresolved: Vec<Unresolved>,
}

impl TaskGraph {
    /// Build a graph with the default configuration.
    pub fn build(data: &Map<String, Value>) -> Self {
        Self::build_with(data, &GraphConfig::default())
    }

    /// Build a graph from `data`.
    #[instrument(skip_all, fields(entry_key = %config.entry_key))]
    pub fn build_with(data: &Map<String, Value>, config: &GraphConfig) -> Self {
        let mut tree = build_tree(data, &config.entry_key);
        derive_relationships(&mut tree);

        let mut graph = Self {
            tree,
            unresolved: Vec::new(),
        };
        graph.resolve_dependencies();

        info!(
            "task graph built: {} nodes, {} dependency edges, {} unresolved",
            graph.len(),
            graph.edge_count(),
            graph.unresolved.len()
        );
        graph
    }

    /// Build from an arbitrary document, which must be a mapping at its root.
    ///
    /// # Errors
    /// [`GraphError::RootNotMapping`] for any other kind of value.
    pub fn from_value(value: &Value) -> Result<Self, GraphError> {
        Self::from_value_with(value, &GraphConfig::default())
    }

    pub fn from_value_with(value: &Value, config: &GraphConfig) -> Result<Self, GraphError> {
        match value {
            Value::Object(map) => Ok(Self::build_with(map, config)),
            Value::Null => Err(GraphError::RootNotMapping("null")),
            Value::Bool(_) => Err(GraphError::RootNotMapping("a boolean")),
            Value::Number(_) => Err(GraphError::RootNotMapping("a number")),
            Value::String(_) => Err(GraphError::RootNotMapping("a string")),
            Value::Array(_) => Err(GraphError::RootNotMapping("a sequence")),
        }
    }

    fn resolve_dependencies(&mut self) {
        for index in 0..self.tree.nodes.len() {
            let id = NodeId(index);
            let node = &self.tree.nodes[index];
            let Some(formula) = node.formula.as_deref().filter(|f| !f.is_empty()) else {
                continue;
            };

            let refs = scan_formula(formula);
            let plain: Vec<_> = refs
                .plain
                .into_iter()
                .map(|name| (resolve(&self.tree.nodes, id, &name), name))
                .collect();
            let object: Vec<_> = refs
                .object
                .into_iter()
                .map(|name| (resolve(&self.tree.nodes, id, &name), name))
                .collect();

            for (kind, resolved) in [(RefKind::Plain, plain), (RefKind::Object, object)] {
                for (target, identifier) in resolved {
                    self.link(id, kind, target, identifier);
                }
            }
        }
    }

    fn link(&mut self, id: NodeId, kind: RefKind, target: Option<NodeId>, identifier: String) {
        let task = &self.tree.nodes[id.0].name;
        match target {
            Some(target) => {
                debug!(
                    task = %task,
                    identifier = %identifier,
                    target = %self.tree.nodes[target.0].name,
                    "resolved {}",
                    kind.label()
                );
                let node = &mut self.tree.nodes[id.0];
                match kind {
                    RefKind::Plain => node.add_dependency(target),
                    RefKind::Object => node.add_object_dependency(target),
                }
            }
            None => {
                warn!(
                    "{} '{}' for task '{}' not found in the task structure",
                    kind.label(),
                    identifier,
                    task
                );
                self.unresolved.push(Unresolved {
                    task: task.clone(),
                    identifier,
                    kind,
                });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Look up a node by its fully qualified name.
    ///
    /// # Errors
    /// [`GraphError::NotFound`] if no node has that name.
    pub fn get(&self, name: &str) -> Result<&TaskNode, GraphError> {
        self.id(name)
            .map(|id| self.node(id))
            .ok_or_else(|| GraphError::NotFound(name.to_owned()))
    }

    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.tree.index.get(name).copied()
    }

    /// # Panics
    /// If `id` was not produced by this graph.
    pub fn node(&self, id: NodeId) -> &TaskNode {
        &self.tree.nodes[id.0]
    }

    /// The last leaf registered under the entry key, if any.
    pub fn entry_point(&self) -> Option<&TaskNode> {
        self.tree.entry_point.map(|id| self.node(id))
    }

    pub fn entry_point_id(&self) -> Option<NodeId> {
        self.tree.entry_point
    }

    /// All nodes in registration order (parents before their children).
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TaskNode)> {
        self.tree
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Top-level nodes in input order.
    pub fn roots(&self) -> impl Iterator<Item = &TaskNode> {
        self.tree.roots.iter().map(|&id| self.node(id))
    }

    pub fn len(&self) -> usize {
        self.tree.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.nodes.is_empty()
    }

    /// Every reference that did not resolve, in processing order.
    pub fn unresolved(&self) -> &[Unresolved] {
        &self.unresolved
    }

    /// Total number of plain and object dependency edges.
    pub fn edge_count(&self) -> usize {
        self.tree
            .nodes
            .iter()
            .map(|n| n.dependencies.len() + n.object_dependencies.len())
            .sum()
    }

    /// Qualified names for a list of ids.
    pub fn names(&self, ids: &[NodeId]) -> Vec<&str> {
        ids.iter().map(|&id| self.node(id).name.as_str()).collect()
    }

    /// Human-readable view of a single node.
    pub fn describe(&self, id: NodeId) -> NodeDisplay<'_> {
        NodeDisplay { graph: self, id }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Renders one node with related nodes shown by qualified name.
pub struct NodeDisplay<'a> {
    graph: &'a TaskGraph,
    id: NodeId,
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.graph;
        let node = g.node(self.id);
        // Ancestors are listed root first, the way scopes read.
        let parents: Vec<&str> = g.names(&node.ancestors).into_iter().rev().collect();

        write!(
            f,
            "Task(name='{}', type='{}', formula={}, parents={:?}, siblings={:?}, children={:?}, \
             dependencies={:?}, object_dependencies={:?})",
            node.name,
            node.kind.as_str(),
            match &node.formula {
                Some(formula) => format!("'{formula}'"),
                None => "None".to_owned(),
            },
            parents,
            g.names(&node.siblings),
            g.names(&node.children),
            g.names(&node.dependencies),
            g.names(&node.object_dependencies),
        )
    }
}

impl fmt::Display for TaskGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, (id, _)) in self.nodes().enumerate() {
            if position > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", self.describe(id))?;
        }
        Ok(())
    }
}
