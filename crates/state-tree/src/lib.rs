//! Arena-backed position tree: PGN in, navigable tree out, PGN back.

pub mod build;
pub mod error;
pub mod navigate;
pub mod render;
pub mod serialize;
pub mod tree;

pub use build::{build_state_tree, final_position};
pub use error::{InvalidGameError, TransportError};
pub use navigate::{mainline_chain, node_chain, node_move_number, node_siblings};
pub use render::render_state_tree;
pub use serialize::{flatten, restore, FlatNode, FlatStateTree};
pub use tree::{NodeId, PlayedMove, PositionState, StateTree, StateTreeNode};
