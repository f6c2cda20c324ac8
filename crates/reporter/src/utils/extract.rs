//! Extraction of the analysis context around a node: the position before
//! the move with its engine lines, and the position reached.

use shakmaty::uci::UciMove;
use shakmaty::{Chess, Position};

use chess_core::board::position_from_fen;
use chess_core::evaluation::{
    line_group_sibling, subjective_evaluation, top_engine_line, Evaluation, EngineLine,
};
use chess_core::PieceColour;
use state_tree::{NodeId, StateTree};

use super::MoveDetail;

/// The mover's view of the position before the move: best line, optional
/// second-best line, and the evaluations to compare against.
#[derive(Debug, Clone)]
pub struct ExtractedPrevious {
    pub fen: String,
    pub position: Chess,
    pub top_line: EngineLine,
    pub second_line: Option<EngineLine>,
    /// Second-best evaluation from the mover's perspective.
    pub second_subjective: Option<Evaluation>,
    pub evaluation: Evaluation,
}

/// The position reached by the move under classification.
#[derive(Debug, Clone)]
pub struct ExtractedCurrent {
    pub fen: String,
    pub position: Chess,
    pub evaluation: Evaluation,
    /// Evaluation of the reached position from the mover's perspective.
    pub subjective: Evaluation,
    pub played: MoveDetail,
    pub played_uci: String,
}

/// Context of the parent position. `None` when the parent carries no
/// usable top line.
pub fn extract_previous(tree: &StateTree, id: NodeId) -> Option<ExtractedPrevious> {
    let node = tree.node(id);
    let parent = tree.node(node.parent?);

    let position = position_from_fen(&parent.state.fen)?;
    let mover = PieceColour::from(position.turn());

    let top_line = top_engine_line(&parent.state.engine_lines)?.clone();

    // The top line must start with a move that is actually playable here.
    let top_uci: UciMove = top_line.pv.first()?.parse().ok()?;
    top_uci.to_move(&position).ok()?;

    let second_line =
        line_group_sibling(&parent.state.engine_lines, &top_line, 2).cloned();

    let second_subjective = second_line.as_ref().and_then(|line| {
        let uci: UciMove = line.pv.first()?.parse().ok()?;
        uci.to_move(&position).ok()?;
        Some(subjective_evaluation(line.evaluation, mover))
    });

    Some(ExtractedPrevious {
        fen: parent.state.fen.clone(),
        position,
        evaluation: top_line.evaluation,
        top_line,
        second_line,
        second_subjective,
    })
}

/// Context of the node itself. `None` when the node carries no usable top
/// line or its move cannot be resolved against the parent position.
pub fn extract_current(tree: &StateTree, id: NodeId) -> Option<ExtractedCurrent> {
    let node = tree.node(id);
    let parent = tree.node(node.parent?);

    let parent_position = position_from_fen(&parent.state.fen)?;
    let position = position_from_fen(&node.state.fen)?;

    let played_move = node.state.played_move.as_ref()?;
    let uci: UciMove = played_move.uci.parse().ok()?;
    let mv = uci.to_move(&parent_position).ok()?;
    let played = MoveDetail::from_move(&parent_position, &mv)?;

    let top_line = top_engine_line(&node.state.engine_lines)?;
    let evaluation = top_line.evaluation;
    let subjective = subjective_evaluation(evaluation, played.colour);

    Some(ExtractedCurrent {
        fen: node.state.fen.clone(),
        position,
        evaluation,
        subjective,
        played,
        played_uci: played_move.uci.clone(),
    })
}
