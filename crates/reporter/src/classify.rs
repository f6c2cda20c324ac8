//! Tier decision for a single move.

use serde::{Deserialize, Serialize};
use shakmaty::Position;

use chess_core::Classification;
use state_tree::{NodeId, StateTree};

use crate::classification::brilliant::consider_brilliant_classification;
use crate::classification::critical::consider_critical_classification;
use crate::classification::point_loss::point_loss_classify;
use crate::error::ClassifyError;
use crate::opening::OpeningBook;
use crate::utils::extract::{extract_current, extract_previous};

/// Which optional tiers the classifier may assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    pub include_brilliant: bool,
    pub include_critical: bool,
    pub include_theory: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_brilliant: true,
            include_critical: true,
            include_theory: true,
        }
    }
}

/// Classify the move leading into `node`. A pure function of the node, its
/// parent's engine lines and the options: no hidden state. Returns
/// `InsufficientData` (defer, don't guess) while either position still
/// lacks lines.
pub fn classify(
    tree: &StateTree,
    node: NodeId,
    book: &OpeningBook,
    options: &AnalysisOptions,
) -> Result<Classification, ClassifyError> {
    if tree.node(node).parent.is_none() {
        return Err(ClassifyError::MissingParent);
    }

    let previous = extract_previous(tree, node).ok_or(ClassifyError::InsufficientData)?;
    let current = extract_current(tree, node).ok_or(ClassifyError::InsufficientData)?;

    // The only legal move is forced, whatever it does.
    if previous.position.legal_moves().len() <= 1 {
        return Ok(Classification::Forced);
    }

    // Still following the opening book.
    if options.include_theory && book.name_for(&current.fen).is_some() {
        return Ok(Classification::Theory);
    }

    // Delivering mate is always the best move.
    if current.position.is_checkmate() {
        return Ok(Classification::Best);
    }

    let top_move_played = previous.top_line.pv.first() == Some(&current.played_uci);

    let mut classification = if top_move_played {
        Classification::Best
    } else {
        point_loss_classify(&previous, &current)
    };

    if options.include_critical
        && top_move_played
        && consider_critical_classification(&previous, &current)
    {
        classification = Classification::Critical;
    }

    // Sacrifices upgrade a sound move to brilliant; ones the engine
    // disagrees with, but not badly, read as risky instead.
    if options.include_brilliant
        && (classification.merit() >= Classification::Best.merit()
            || matches!(
                classification,
                Classification::Okay | Classification::Inaccuracy
            ))
        && consider_brilliant_classification(&previous, &current)
    {
        classification = if classification.merit() >= Classification::Best.merit() {
            Classification::Brilliant
        } else {
            Classification::Risky
        };
    }

    Ok(classification)
}
