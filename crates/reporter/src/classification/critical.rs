//! Critical moves: the only good continuation in a position with real
//! alternatives.

use chess_core::evaluation::EvaluationKind;

use crate::expected_points::expected_points_loss;
use crate::utils::extract::{ExtractedCurrent, ExtractedPrevious};
use crate::utils::piece_safety::is_piece_safe;
use crate::utils::BoardPiece;

use super::is_critical_candidate;

/// 10% expected-points loss: midway between an inaccuracy and a mistake.
const SECOND_MOVE_LOSS_FLOOR: f64 = 0.1;

pub fn consider_critical_classification(
    previous: &ExtractedPrevious,
    current: &ExtractedCurrent,
) -> bool {
    if !is_critical_candidate(previous, current) {
        return false;
    }

    // It is not critical to find moves where you have mate.
    if current.subjective.kind == EvaluationKind::Mate && current.subjective.value > 0 {
        return false;
    }

    // A critical move cannot be a capture of free material.
    if let Some(captured) = current.played.capture {
        let captured_piece = BoardPiece {
            role: captured,
            colour: current.played.colour.flip(),
            square: current.played.capture_square(),
        };

        if !is_piece_safe(&previous.fen, captured_piece, None) {
            return false;
        }
    }

    let Some(second_line) = &previous.second_line else {
        return false;
    };

    let second_top_move_loss = expected_points_loss(
        previous.evaluation,
        second_line.evaluation,
        current.played.colour,
    );

    second_top_move_loss >= SECOND_MOVE_LOSS_FLOOR
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

        consider_critical_classification(
            &extract_previous(&tree, last).unwrap(),
            &extract_current(&tree, last).unwrap(),
        )
    }

    #[test]
    fn test_only_move_holding_the_balance_is_critical() {
        // The second-best line collapses for White: finding the top move
        // mattered.
        assert!(consider(
            "1. e4 e5 2. Nf3 *",
            vec![
                line(1, &["g1f3"], Evaluation::centipawn(25)),
                line(2, &["f2f3"], Evaluation::centipawn(-320)),
            ],
            vec![line(1, &["b8c6"], Evaluation::centipawn(20))],
        ));
    }

    #[test]
    fn test_interchangeable_moves_are_not_critical() {
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
    fn test_free_capture_is_not_critical() {
        // 3. Qxe5+ scoops an undefended pawn; even when the alternative
        // was much worse, taking free material is not critical.
        assert!(!consider(
            "1. e4 e5 2. Qh5 g6 3. Qxe5+ *",
            vec![
                line(1, &["h5e5"], Evaluation::centipawn(350)),
                line(2, &["d2d4"], Evaluation::centipawn(-200)),
            ],
            vec![line(1, &["g8f6"], Evaluation::centipawn(340))],
        ));
    }

    #[test]
    fn test_missing_second_line_is_not_critical() {
        assert!(!consider(
            "1. e4 e5 2. Nf3 *",
            vec![line(1, &["g1f3"], Evaluation::centipawn(25))],
            vec![line(1, &["b8c6"], Evaluation::centipawn(20))],
        ));
    }
}
