//! Classification from evaluation deltas alone.

use chess_core::evaluation::EvaluationKind;
use chess_core::{Classification, PieceColour};

use crate::expected_points::expected_points_loss;
use crate::utils::extract::{ExtractedCurrent, ExtractedPrevious};

/// Classify by comparing the best pre-move evaluation against the
/// evaluation of the position actually reached, handling the four
/// centipawn/mate transitions separately.
pub fn point_loss_classify(
    previous: &ExtractedPrevious,
    current: &ExtractedCurrent,
) -> Classification {
    let mover_sign = match current.played.colour {
        PieceColour::White => 1,
        PieceColour::Black => -1,
    };

    let previous_subjective_value = previous.evaluation.value * mover_sign;
    let subjective_value = current.subjective.value;

    // Mate to mate evaluations.
    if previous.evaluation.kind == EvaluationKind::Mate
        && current.evaluation.kind == EvaluationKind::Mate
    {
        // Winning mate to losing mate.
        if previous_subjective_value > 0 && subjective_value < 0 {
            return if subjective_value < -3 {
                Classification::Mistake
            } else {
                Classification::Blunder
            };
        }

        // For the losing side, keeping the mate distance is best; only the
        // winning side expects the count to tick down.
        let mate_loss = (current.evaluation.value - previous.evaluation.value) * mover_sign;

        return if mate_loss < 0 || (mate_loss == 0 && subjective_value < 0) {
            Classification::Best
        } else if mate_loss < 2 {
            Classification::Excellent
        } else if mate_loss < 7 {
            Classification::Okay
        } else {
            Classification::Inaccuracy
        };
    }

    // Mate to centipawn evaluations: a mate was let slip.
    if previous.evaluation.kind == EvaluationKind::Mate
        && current.evaluation.kind == EvaluationKind::Centipawn
    {
        return if subjective_value >= 800 {
            Classification::Excellent
        } else if subjective_value >= 400 {
            Classification::Okay
        } else if subjective_value >= 200 {
            Classification::Inaccuracy
        } else if subjective_value >= 0 {
            Classification::Mistake
        } else {
            Classification::Blunder
        };
    }

    // Centipawn to mate evaluations.
    if previous.evaluation.kind == EvaluationKind::Centipawn
        && current.evaluation.kind == EvaluationKind::Mate
    {
        return if subjective_value > 0 {
            Classification::Best
        } else if subjective_value >= -2 {
            Classification::Blunder
        } else if subjective_value >= -5 {
            Classification::Mistake
        } else {
            Classification::Inaccuracy
        };
    }

    // Centipawn to centipawn evaluations.
    let point_loss = expected_points_loss(
        previous.evaluation,
        current.evaluation,
        current.played.colour,
    );

    if point_loss < 0.01 {
        Classification::Best
    } else if point_loss < 0.045 {
        Classification::Excellent
    } else if point_loss < 0.08 {
        Classification::Okay
    } else if point_loss < 0.12 {
        Classification::Inaccuracy
    } else if point_loss < 0.22 {
        Classification::Mistake
    } else {
        Classification::Blunder
    }
}
