//! Chain, sibling and move-number queries shared by the builder, the
//! renderer and the classification engine.

use chess_core::notation::parse_fen;
use chess_core::PieceColour;

use crate::tree::{NodeId, StateTree};

/// The ordered sequence of nodes from the tree root down to `id`
/// inclusive, by walking parent references and reversing.
pub fn node_chain(tree: &StateTree, id: NodeId) -> Vec<NodeId> {
    let mut chain = vec![id];
    let mut current = id;

    while let Some(parent) = tree.node(current).parent {
        chain.push(parent);
        current = parent;
    }

    chain.reverse();
    chain
}

/// The ordered sequence of nodes from `id` down to the end of its line,
/// following first children (the local mainline continuation).
pub fn mainline_chain(tree: &StateTree, id: NodeId) -> Vec<NodeId> {
    let mut chain = vec![id];
    let mut current = id;

    while let Some(&first_child) = tree.node(current).children.first() {
        chain.push(first_child);
        current = first_child;
    }

    chain
}

/// The other children of `id`'s parent, the alternative variations at
/// that ply. Empty at the root.
pub fn node_siblings(tree: &StateTree, id: NodeId) -> Vec<NodeId> {
    match tree.node(id).parent {
        Some(parent) => tree
            .node(parent)
            .children
            .iter()
            .copied()
            .filter(|&sibling| sibling != id)
            .collect(),
        None => Vec::new(),
    }
}

/// Move number of the move leading into `id`: the integer part is the
/// full-move number, the fraction distinguishes White (`.0`) from Black
/// (`.5`) as the mover. Derived from the root FEN's move count/turn and
/// the node's depth; only meaningful for move-bearing nodes.
pub fn node_move_number(tree: &StateTree, id: NodeId) -> f64 {
    let depth = node_chain(tree, id).len() as u32 - 1;

    let root = parse_fen(&tree.root().state.fen);
    let start_half = 2 * root.full_move_count
        + match root.turn_colour {
            PieceColour::White => 0,
            PieceColour::Black => 1,
        };

    let half = start_half + depth - 1;
    (half / 2) as f64 + if half % 2 == 0 { 0.0 } else { 0.5 }
}
