//! Tree builder — turns a nested mapping into arena-allocated task nodes.
//!
//! Rules:
//! 1. A mapping value yields a composite node and is recursed into with the
//!    new node as parent and its qualified name as scope.
//! 2. Any other value yields a leaf whose formula is the value's text.
//! 3. Qualified names are `scope.key`, or just `key` at the top level.
//! 4. Names stay unique. A dotted key can repeat an earlier qualified name
//!    (`"a.b"` next to `{"a": {"b": ..}}`); the later declaration wins and the
//!    earlier node is dropped together with its subtree.
//!
//! Nothing here fails: every structurally valid mapping is accepted.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::{NodeId, TaskKind, TaskNode};

/// Nodes plus the bookkeeping collected while walking the input.
#[derive(Debug, Default, Clone)]
pub(crate) struct Tree {
    pub nodes: Vec<TaskNode>,
    /// Top-level nodes in input order.
    pub roots: Vec<NodeId>,
    pub index: HashMap<String, NodeId>,
    pub entry_point: Option<NodeId>,
    /// Nodes displaced by a later declaration of the same name.
    shadowed: Vec<bool>,
}

/// Build the ownership tree for `data`. Relationships and dependencies are
/// left empty; later passes fill them in once every node exists.
pub(crate) fn build_tree(data: &Map<String, Value>, entry_key: &str) -> Tree {
    let mut tree = Tree::default();
    tree.parse(data, None, None, entry_key);
    tree.compact();
    tree
}

impl Tree {
    fn parse(
        &mut self,
        data: &Map<String, Value>,
        parent: Option<NodeId>,
        scope: Option<&str>,
        entry_key: &str,
    ) {
        for (key, value) in data {
            let name = match scope {
                Some(scope) => format!("{scope}.{key}"),
                None => key.clone(),
            };

            match value {
                Value::Object(children) => {
                    let id = self.register(TaskNode::new(
                        name.clone(),
                        key.clone(),
                        TaskKind::Composite,
                        None,
                        parent,
                    ));
                    self.parse(children, Some(id), Some(&name), entry_key);
                }
                other => {
                    let id = self.register(TaskNode::new(
                        name,
                        key.clone(),
                        TaskKind::Leaf,
                        Some(formula_text(other)),
                        parent,
                    ));
                    if key == entry_key {
                        self.entry_point = Some(id);
                    }
                }
            }
        }
    }

    /// Push `node` into the arena, link it to its parent and index its name.
    fn register(&mut self, node: TaskNode) -> NodeId {
        let id = NodeId(self.nodes.len());

        match node.parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }

        if let Some(previous) = self.index.insert(node.name.clone(), id) {
            warn!(
                name = %node.name,
                previous = previous.0,
                "duplicate task name, the earlier declaration is dropped"
            );
            self.detach(previous);
        }

        self.nodes.push(node);
        self.shadowed.push(false);
        id
    }

    /// Unlink `id` from its owner and mark its whole subtree as shadowed.
    ///
    /// `id` is never an ancestor of the node being registered: an ancestor's
    /// name is a strict prefix of its descendants' names.
    fn detach(&mut self, id: NodeId) {
        match self.nodes[id.0].parent {
            Some(parent) => self.nodes[parent.0].children.retain(|&c| c != id),
            None => self.roots.retain(|&r| r != id),
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.shadowed[current.0] = true;
            stack.extend(self.nodes[current.0].children.iter().copied());
        }
    }

    /// Drop shadowed nodes from the arena and renumber the survivors.
    fn compact(&mut self) {
        if !self.shadowed.contains(&true) {
            return;
        }

        let mut remap: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        let mut kept = Vec::with_capacity(self.nodes.len());
        for (index, node) in std::mem::take(&mut self.nodes).into_iter().enumerate() {
            if !self.shadowed[index] {
                remap[index] = Some(NodeId(kept.len()));
                kept.push(node);
            }
        }

        let map = |id: NodeId| remap[id.0];
        for node in &mut kept {
            node.parent = node.parent.and_then(map);
            node.children = node.children.iter().filter_map(|&c| map(c)).collect();
        }
        self.roots = self.roots.iter().filter_map(|&r| map(r)).collect();
        // A shadowed entry point had no later leaf under the entry key.
        self.entry_point = self.entry_point.and_then(map);
        self.index = kept
            .iter()
            .enumerate()
            .map(|(index, node)| (node.name.clone(), NodeId(index)))
            .collect();
        self.shadowed = vec![false; kept.len()];
        self.nodes = kept;
    }
}

/// Strings are taken verbatim; anything else is rendered as compact JSON.
fn formula_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
