//! The state tree arena.
//!
//! Nodes live in a flat `Vec`; parent and child links are indices, keeping
//! ownership acyclic and the whole structure trivially serializable.

use chess_core::{Classification, EngineLine, PieceColour};
use serde::{Deserialize, Serialize};

/// Index of a node within its tree's arena. Unique within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The move that produced a position, in both notations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedMove {
    pub san: String,
    pub uci: String,
}

/// Everything a node knows about its position. `played_move` is absent
/// only at the tree root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionState {
    pub fen: String,
    #[serde(
        default,
        rename = "move",
        skip_serializing_if = "Option::is_none"
    )]
    pub played_move: Option<PlayedMove>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_colour: Option<PieceColour>,
    #[serde(default)]
    pub engine_lines: Vec<EngineLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening: Option<String>,
}

impl PositionState {
    /// A bare root state: position only, no move, no engine lines.
    pub fn root(fen: impl Into<String>) -> Self {
        Self {
            fen: fen.into(),
            played_move: None,
            move_colour: None,
            engine_lines: Vec::new(),
            classification: None,
            accuracy: None,
            opening: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateTreeNode {
    pub id: NodeId,
    /// Non-owning back-reference; `None` only at the root.
    pub parent: Option<NodeId>,
    /// Mainline continuation first, then variations in source order.
    pub children: Vec<NodeId>,
    /// True only on the principal line declared by the source PGN.
    pub mainline: bool,
    pub state: PositionState,
}

#[derive(Debug, Clone)]
pub struct StateTree {
    nodes: Vec<StateTreeNode>,
}

impl StateTree {
    pub fn new(root_state: PositionState) -> Self {
        Self {
            nodes: vec![StateTreeNode {
                id: NodeId(0),
                parent: None,
                children: Vec::new(),
                mainline: true,
                state: root_state,
            }],
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> &StateTreeNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &StateTreeNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut StateTreeNode {
        &mut self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&StateTreeNode> {
        self.nodes.get(id.index())
    }

    /// Appends a new child under `parent` and returns its id.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        mainline: bool,
        state: PositionState,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(StateTreeNode {
            id,
            parent: Some(parent),
            children: Vec::new(),
            mainline,
            state,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[StateTreeNode] {
        &self.nodes
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_child_links_both_ways() {
        let mut tree = StateTree::new(PositionState::root("fen0"));
        let root = tree.root_id();

        let a = tree.add_child(root, true, PositionState::root("fen1"));
        let b = tree.add_child(root, false, PositionState::root("fen2"));

        assert_eq!(tree.root().children, vec![a, b]);
        assert_eq!(tree.node(a).parent, Some(root));
        assert_eq!(tree.node(b).parent, Some(root));
        assert!(tree.node(a).mainline);
        assert!(!tree.node(b).mainline);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_root_has_no_move() {
        let tree = StateTree::new(PositionState::root("fen0"));
        assert!(tree.root().state.played_move.is_none());
        assert!(tree.root().parent.is_none());
    }
}
