//! Whole-game analysis: classify the mainline, attach accuracies, derive
//! estimated ratings.

use serde::{Deserialize, Serialize};
use tracing::debug;

use chess_core::evaluation::top_engine_line;
use chess_core::Classification;
use state_tree::{mainline_chain, StateTree};

use crate::accuracy::{estimated_rating, game_accuracy, move_accuracy, Accuracies};
use crate::classify::{classify, AnalysisOptions};
use crate::opening::OpeningBook;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedRatings {
    pub white: u32,
    pub black: u32,
}

/// The annotated tree plus the per-side aggregates.
#[derive(Debug, Clone)]
pub struct GameAnalysis {
    pub tree: StateTree,
    pub accuracies: Accuracies,
    pub estimated_ratings: Option<EstimatedRatings>,
}

/// Classifies every mainline node that has the data for it, stamps opening
/// names and per-move accuracies, and aggregates. Nodes without engine
/// lines are deferred, not guessed; inalterable classifications survive
/// re-analysis untouched.
pub fn game_analysis(
    mut tree: StateTree,
    book: &OpeningBook,
    options: &AnalysisOptions,
) -> GameAnalysis {
    let chain = mainline_chain(&tree, tree.root_id());
    let mut classified = 0usize;
    let mut deferred = 0usize;

    for id in chain {
        if let Some(opening) = book.name_for(&tree.node(id).state.fen) {
            let opening = opening.to_string();
            tree.node_mut(id).state.opening = Some(opening);
        }

        if tree.node(id).parent.is_none() {
            continue;
        }

        let existing = tree.node(id).state.classification;
        if !existing.is_some_and(Classification::is_inalterable) {
            match classify(&tree, id, book, options) {
                Ok(classification) => {
                    tree.node_mut(id).state.classification = Some(classification);
                    classified += 1;
                }
                Err(err) => {
                    debug!(node = id.0, %err, "classification deferred");
                    deferred += 1;
                }
            }
        }

        let accuracy = {
            let node = tree.node(id);
            let parent = tree.node(node.parent.expect("non-root node"));
            match (
                top_engine_line(&parent.state.engine_lines),
                top_engine_line(&node.state.engine_lines),
                node.state.move_colour,
            ) {
                (Some(previous), Some(current), Some(colour)) => {
                    Some(move_accuracy(previous.evaluation, current.evaluation, colour))
                }
                _ => None,
            }
        };

        if let Some(accuracy) = accuracy {
            tree.node_mut(id).state.accuracy = Some(accuracy);
        }
    }

    debug!(classified, deferred, "game analysis pass complete");

    let accuracies = game_accuracy(&tree);

    let measured = |colour| {
        mainline_chain(&tree, tree.root_id()).iter().any(|&id| {
            let state = &tree.node(id).state;
            state.accuracy.is_some() && state.move_colour == Some(colour)
        })
    };

    let estimated_ratings = (measured(chess_core::PieceColour::White)
        && measured(chess_core::PieceColour::Black))
    .then(|| EstimatedRatings {
        white: estimated_rating(accuracies.white),
        black: estimated_rating(accuracies.black),
    });

    GameAnalysis {
        tree,
        accuracies,
        estimated_ratings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::evaluation::{EngineLine, Evaluation};
    use chess_core::Game;
    use state_tree::build_state_tree;

    fn line(index: u32, pv: &[&str], evaluation: Evaluation) -> EngineLine {
        EngineLine {
            index,
            depth: 18,
            pv: pv.iter().map(|uci| uci.to_string()).collect(),
            evaluation,
        }
    }

    fn evaluated_tree() -> StateTree {
        let game = Game::from_pgn("1. e4 e5 2. Nf3 *");
        let mut tree = build_state_tree(&game).unwrap();
        let chain = mainline_chain(&tree, tree.root_id());

        let lines: [(&str, &str, i32); 4] = [
            ("e2e4", "d2d4", 30),
            ("e7e5", "c7c5", 25),
            ("g1f3", "b1c3", 30),
            ("g8f6", "b8c6", 25),
        ];

        for (id, (best, second, cp)) in chain.iter().zip(lines) {
            tree.node_mut(*id).state.engine_lines = vec![
                line(1, &[best], Evaluation::centipawn(cp)),
                line(2, &[second], Evaluation::centipawn(cp - 15)),
            ];
        }

        tree
    }

    #[test]
    fn test_mainline_fully_classified() {
        let analysis = game_analysis(
            evaluated_tree(),
            &OpeningBook::empty(),
            &AnalysisOptions::default(),
        );

        let chain = mainline_chain(&analysis.tree, analysis.tree.root_id());
        for &id in &chain[1..] {
            let state = &analysis.tree.node(id).state;
            assert!(state.classification.is_some(), "node {} unclassified", id.0);
            assert!(state.accuracy.is_some());
        }

        assert!(analysis.tree.root().state.classification.is_none());
        assert!(analysis.accuracies.white > 90.0);
        assert!(analysis.accuracies.black > 90.0);
        assert!(analysis.estimated_ratings.is_some());
    }

    #[test]
    fn test_unevaluated_nodes_deferred() {
        let game = Game::from_pgn("1. e4 e5 *");
        let tree = build_state_tree(&game).unwrap();
        let analysis = game_analysis(
            tree,
            &OpeningBook::empty(),
            &AnalysisOptions::default(),
        );

        let chain = mainline_chain(&analysis.tree, analysis.tree.root_id());
        assert!(analysis.tree.node(chain[1]).state.classification.is_none());
        assert_eq!(analysis.accuracies.white, 100.0);
        assert!(analysis.estimated_ratings.is_none());
    }

    #[test]
    fn test_inalterable_classifications_survive() {
        let mut tree = evaluated_tree();
        let chain = mainline_chain(&tree, tree.root_id());

        // Pin a brilliant on a move the evaluations would call merely best.
        tree.node_mut(chain[1]).state.classification = Some(Classification::Brilliant);

        let analysis = game_analysis(
            tree,
            &OpeningBook::empty(),
            &AnalysisOptions::default(),
        );
        assert_eq!(
            analysis.tree.node(chain[1]).state.classification,
            Some(Classification::Brilliant)
        );
    }

    #[test]
    fn test_opening_names_stamped() {
        let book = OpeningBook::from_entries([(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR",
            "King's Pawn Game",
        )]);

        let analysis = game_analysis(evaluated_tree(), &book, &AnalysisOptions::default());
        let chain = mainline_chain(&analysis.tree, analysis.tree.root_id());

        assert_eq!(
            analysis.tree.node(chain[1]).state.opening.as_deref(),
            Some("King's Pawn Game")
        );
        assert_eq!(
            analysis.tree.node(chain[1]).state.classification,
            Some(Classification::Theory)
        );
        assert!(analysis.tree.node(chain[2]).state.opening.is_none());
    }
}
