//! Per-move and per-side accuracy, and the rating estimate derived from it.

use serde::{Deserialize, Serialize};

use chess_core::evaluation::Evaluation;
use chess_core::PieceColour;
use state_tree::{mainline_chain, StateTree};

use crate::expected_points::expected_points_loss;

/// Aggregate accuracy per side, a plain mean over that side's measured
/// moves. A side with no measured moves scores 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accuracies {
    pub white: f64,
    pub black: f64,
}

/// Accuracy percentage for one move, from the expected-points loss it
/// incurred.
pub fn move_accuracy(
    previous_evaluation: Evaluation,
    current_evaluation: Evaluation,
    move_colour: PieceColour,
) -> f64 {
    let point_loss = expected_points_loss(previous_evaluation, current_evaluation, move_colour);
    (103.16 * (-4.0 * point_loss).exp() - 3.17).clamp(0.0, 100.0)
}

/// Mean accuracy per side over the mainline nodes that carry one.
pub fn game_accuracy(tree: &StateTree) -> Accuracies {
    let mut totals = [(0.0, 0u32), (0.0, 0u32)];

    for id in mainline_chain(tree, tree.root_id()) {
        let state = &tree.node(id).state;
        if let (Some(accuracy), Some(colour)) = (state.accuracy, state.move_colour) {
            let slot = &mut totals[match colour {
                PieceColour::White => 0,
                PieceColour::Black => 1,
            }];
            slot.0 += accuracy;
            slot.1 += 1;
        }
    }

    let mean = |(total, count): (f64, u32)| {
        if count == 0 {
            100.0
        } else {
            total / f64::from(count)
        }
    };

    Accuracies {
        white: mean(totals[0]),
        black: mean(totals[1]),
    }
}

/// Playing-strength estimate for an accuracy percentage. Monotone quartic
/// clamped to a sane rating band and rounded to the nearest 50.
pub fn estimated_rating(accuracy: f64) -> u32 {
    let raw = 3200.0 * (accuracy / 100.0).powi(4);
    let clamped = raw.clamp(400.0, 3200.0);
    ((clamped / 50.0).round() * 50.0) as u32
}
