//! Flat, parent-link-free transport form of the state tree.
//!
//! Raw back-references are not directly serializable, so the tree travels
//! as a node list with explicit parent ids. Restoring validates the links:
//! dangling ids, forward references (which also excludes cycles) and
//! multiple roots are rejected.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::tree::{NodeId, PositionState, StateTree};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatNode {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    pub mainline: bool,
    pub state: PositionState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatStateTree {
    pub nodes: Vec<FlatNode>,
}

/// Emits nodes in arena order; children can be rebuilt from the list order
/// alone, so no child lists travel.
pub fn flatten(tree: &StateTree) -> FlatStateTree {
    FlatStateTree {
        nodes: tree
            .nodes()
            .iter()
            .map(|node| FlatNode {
                id: node.id.0,
                parent: node.parent.map(|parent| parent.0),
                mainline: node.mainline,
                state: node.state.clone(),
            })
            .collect(),
    }
}

/// Rebuilds the arena from a flat node list, reconstructing parent and
/// child links. Children are attached in list order, which preserves the
/// mainline-first ordering `flatten` emits.
pub fn restore(flat: FlatStateTree) -> Result<StateTree, TransportError> {
    if flat.nodes.is_empty() {
        return Err(TransportError::Empty);
    }

    let mut list_index: HashMap<u32, usize> = HashMap::with_capacity(flat.nodes.len());
    for (index, node) in flat.nodes.iter().enumerate() {
        if list_index.insert(node.id, index).is_some() {
            return Err(TransportError::DuplicateId(node.id));
        }
    }

    let root = &flat.nodes[0];
    if root.parent.is_some() {
        return Err(TransportError::MissingRoot);
    }
    if root.state.played_move.is_some() {
        return Err(TransportError::RootWithMove);
    }

    let mut tree = StateTree::new(root.state.clone());
    tree.node_mut(NodeId(0)).mainline = root.mainline;

    for (index, node) in flat.nodes.iter().enumerate().skip(1) {
        let parent_id = match node.parent {
            Some(parent_id) => parent_id,
            None => return Err(TransportError::MultipleRoots(node.id)),
        };

        let parent_index = *list_index.get(&parent_id).ok_or(
            TransportError::DanglingParent {
                node: node.id,
                parent: parent_id,
            },
        )?;

        if parent_index >= index {
            return Err(TransportError::ForwardParent {
                node: node.id,
                parent: parent_id,
            });
        }

        tree.add_child(
            NodeId(parent_index as u32),
            node.mainline,
            node.state.clone(),
        );
    }

    Ok(tree)
}
