//! Relationship derivation — siblings and ancestors.
//!
//! Runs once over a fully built tree. Both views are recomputed from the
//! ownership links every time, never patched incrementally.

use crate::builder::Tree;
use crate::models::NodeId;

/// Fill `siblings` and `ancestors` for every node in `tree`.
pub(crate) fn derive_relationships(tree: &mut Tree) {
    for index in 0..tree.nodes.len() {
        let id = NodeId(index);

        let scope = match tree.nodes[index].parent {
            Some(parent) => &tree.nodes[parent.0].children,
            None => &tree.roots,
        };
        let siblings: Vec<NodeId> = scope.iter().copied().filter(|&other| other != id).collect();

        let mut ancestors = Vec::new();
        let mut cursor = tree.nodes[index].parent;
        while let Some(parent) = cursor {
            ancestors.push(parent);
            cursor = tree.nodes[parent.0].parent;
        }

        let node = &mut tree.nodes[index];
        node.siblings = siblings;
        node.ancestors = ancestors;
    }
}
