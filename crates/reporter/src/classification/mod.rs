//! The individual classification rules feeding the tier decision.

pub mod brilliant;
pub mod critical;
pub mod point_loss;

use chess_core::evaluation::EvaluationKind;
use shakmaty::{Position, Role};

use crate::utils::extract::{ExtractedCurrent, ExtractedPrevious};

/// Whether a move can be critical to maintaining an advantage. Moves that
/// are easy to find or forced cannot be; this also serves as the
/// preliminary gate for brilliant moves.
pub fn is_critical_candidate(previous: &ExtractedPrevious, current: &ExtractedCurrent) -> bool {
    // Still completely winning even if this move hadn't been found.
    match previous.second_subjective {
        Some(second) => {
            if second.kind == EvaluationKind::Centipawn && second.value >= 700 {
                return false;
            }
        }
        None => {
            if current.evaluation.kind == EvaluationKind::Centipawn
                && current.subjective.value >= 700
            {
                return false;
            }
        }
    }

    // Queen promotions cannot be critical.
    if current.played.promotion == Some(Role::Queen) {
        return false;
    }

    // Moves that must be played anyway to escape check cannot be either.
    if previous.position.is_check() {
        return false;
    }

    true
}
