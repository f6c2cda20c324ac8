//! Expected-points model: converts evaluations into win probability.

use chess_core::evaluation::{Evaluation, EvaluationKind};
use chess_core::PieceColour;

/// Logistic gradient for centipawn values.
const CENTIPAWN_GRADIENT: f64 = 0.0035;

/// Expected game points (0..1, white-positive) for an evaluation. Mate
/// scores saturate: a positive mate is a certain win. A mate value of zero
/// means mate has been delivered; it counts as a win exactly when the given
/// mover is White, since the value itself no longer carries a sign.
pub fn expected_points(evaluation: Evaluation, move_colour: PieceColour) -> f64 {
    match evaluation.kind {
        EvaluationKind::Mate => {
            if evaluation.value == 0 {
                return if move_colour == PieceColour::White { 1.0 } else { 0.0 };
            }
            if evaluation.value > 0 {
                1.0
            } else {
                0.0
            }
        }
        EvaluationKind::Centipawn => {
            1.0 / (1.0 + (-CENTIPAWN_GRADIENT * f64::from(evaluation.value)).exp())
        }
    }
}

/// Expected points thrown away by the move that took `previous` to
/// `current`, from the mover's perspective. Never negative: gaining points
/// relative to the engine's expectation is free.
pub fn expected_points_loss(
    previous: Evaluation,
    current: Evaluation,
    move_colour: PieceColour,
) -> f64 {
    let sign = match move_colour {
        PieceColour::White => 1.0,
        PieceColour::Black => -1.0,
    };

    let loss = (expected_points(previous, move_colour.flip())
        - expected_points(current, move_colour))
        * sign;

    loss.max(0.0)
}
