//! Brilliant moves: sound sacrifices, material left hanging on purpose
//! with the evaluation intact.

use tracing::debug;

use crate::utils::extract::{ExtractedCurrent, ExtractedPrevious};
use crate::utils::piece_safety::unsafe_pieces;
use crate::utils::piece_trapped::is_piece_trapped;
use shakmaty::Position;

use super::is_critical_candidate;

pub fn consider_brilliant_classification(
    previous: &ExtractedPrevious,
    current: &ExtractedCurrent,
) -> bool {
    if !is_critical_candidate(previous, current) {
        return false;
    }

    // Sacrifice soundness cannot be judged without multipv 2 data.
    if previous.second_subjective.is_none() {
        debug!("skipping brilliant consideration: no second engine line");
        return false;
    }

    // Promotions cannot be brilliant.
    if current.played.promotion.is_some() {
        return false;
    }

    let mover = current.played.colour;

    let previous_unsafe = unsafe_pieces(&previous.fen, mover, None);
    let current_unsafe = unsafe_pieces(&current.fen, mover, Some(&current.played));

    // Moving a piece to safety disallows a brilliant, unless the move
    // gives check.
    if !current.position.is_check() && current_unsafe.len() < previous_unsafe.len() {
        return false;
    }

    let previous_trapped: Vec<_> = previous_unsafe
        .iter()
        .filter(|piece| is_piece_trapped(&previous.fen, **piece))
        .collect();

    let current_trapped: Vec<_> = current_unsafe
        .iter()
        .filter(|piece| is_piece_trapped(&current.fen, **piece))
        .collect();

    // Material that is merely trapped is not sacrificed: losing it was
    // already unavoidable.
    let moved_piece_trapped = previous_trapped
        .iter()
        .any(|piece| piece.square == current.played.from);

    if current_trapped.len() == current_unsafe.len()
        || moved_piece_trapped
        || current_trapped.len() < previous_trapped.len()
    {
        return false;
    }

    !current_unsafe.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::extract::{extract_current, extract_previous};
    use chess_core::evaluation::{EngineLine, Evaluation};
    use chess_core::Game;
    use state_tree::{build_state_tree, mainline_chain};

    fn line(index: u32, pv: &[&str], evaluation: Evaluation) -> EngineLine {
        EngineLine {
            index,
            depth: 18,
            pv: pv.iter().map(|uci| uci.to_string()).collect(),
            evaluation,
        }
    }

    fn consider(
        pgn: &str,
        parent_lines: Vec<EngineLine>,
        current_lines: Vec<EngineLine>,
    ) -> bool {
        let game = Game::from_pgn(pgn);
        let mut tree = build_state_tree(&game).unwrap();
        let chain = mainline_chain(&tree, tree.root_id());
        let last = *chain.last().unwrap();
        let parent = tree.node(last).parent.unwrap();

        tree.node_mut(parent).state.engine_lines = parent_lines;
        tree.node_mut(last).state.engine_lines = current_lines;

        consider_brilliant_classification(
            &extract_previous(&tree, last).unwrap(),
            &extract_current(&tree, last).unwrap(),
        )
    }

    #[test]
    fn test_legal_greek_gift_shape_is_brilliant_candidate() {
        // The Italian bishop lands on f7: a piece offered where only the
        // king can take it back. Geometry-wise this is a sacrifice.
        assert!(consider(
            "1. e4 e5 2. Bc4 Nc6 3. Bxf7+ *",
            vec![
                line(1, &["c4f7"], Evaluation::centipawn(30)),
                line(2, &["g1f3"], Evaluation::centipawn(25)),
            ],
            vec![line(1, &["e8f7"], Evaluation::centipawn(20))],
        ));
    }

    #[test]
    fn test_quiet_developing_move_is_not_brilliant() {
        assert!(!consider(
            "1. e4 e5 2. Nf3 *",
            vec![
                line(1, &["g1f3"], Evaluation::centipawn(25)),
                line(2, &["b1c3"], Evaluation::centipawn(18)),
            ],
            vec![line(1, &["b8c6"], Evaluation::centipawn(20))],
        ));
    }

    #[test]
    fn test_no_second_line_blocks_brilliant() {
        assert!(!consider(
            "1. e4 e5 2. Bc4 Nc6 3. Bxf7+ *",
            vec![line(1, &["c4f7"], Evaluation::centipawn(30))],
            vec![line(1, &["e8f7"], Evaluation::centipawn(20))],
        ));
    }

    #[test]
    fn test_promotion_cannot_be_brilliant() {
        // Underpromotion to a knight passes the queen-promotion candidate
        // gate but is still excluded here.
        assert!(!consider(
            "1. e4 f5 2. exf5 g6 3. fxg6 Nf6 4. g7 Ne4 5. gxh8=N *",
            vec![
                line(1, &["g7h8n"], Evaluation::centipawn(200)),
                line(2, &["g7g8q"], Evaluation::centipawn(150)),
            ],
            vec![line(1, &["e4c5"], Evaluation::centipawn(180))],
        ));
    }
}
