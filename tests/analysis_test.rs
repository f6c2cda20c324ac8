//! Integration tests: the classification and accuracy engine over real
//! trees, plus the realtime driver.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use chess_core::evaluation::{subjective_evaluation, Evaluation, EngineLine};
use chess_core::notation::{parse_fen, set_fen_turn};
use chess_core::{Classification, Game, PieceColour};
use reporter::{
    classify, game_analysis, AnalysisOptions, AnonymousSession, MappedLines, OpeningBook,
    RealtimeAnalyser,
};
use state_tree::{build_state_tree, mainline_chain, StateTree};

fn line(index: u32, pv: &[&str], evaluation: Evaluation) -> EngineLine {
    EngineLine {
        index,
        depth: 18,
        pv: pv.iter().map(|uci| uci.to_string()).collect(),
        evaluation,
    }
}

/// `1. e4 e5 2. Nf3 Nc6` with steady engine lines on every node.
fn evaluated_tree() -> StateTree {
    let game = Game::from_pgn("1. e4 e5 2. Nf3 Nc6 *");
    let mut tree = build_state_tree(&game).unwrap();
    let chain = mainline_chain(&tree, tree.root_id());

    let per_node: [(&str, &str, i32); 5] = [
        ("e2e4", "d2d4", 30),
        ("e7e5", "c7c5", 25),
        ("g1f3", "b1c3", 30),
        ("b8c6", "g8f6", 25),
        ("f1b5", "f1c4", 30),
    ];

    for (id, (best, second, cp)) in chain.iter().zip(per_node) {
        tree.node_mut(*id).state.engine_lines = vec![
            line(1, &[best], Evaluation::centipawn(cp)),
            line(2, &[second], Evaluation::centipawn(cp - 12)),
        ];
    }

    tree
}

#[test]
fn test_perspective_correctness() {
    let evaluation = Evaluation::centipawn(150);
    assert_eq!(
        subjective_evaluation(evaluation, PieceColour::Black),
        Evaluation::centipawn(-150)
    );
    assert_eq!(
        subjective_evaluation(evaluation, PieceColour::White),
        Evaluation::centipawn(150)
    );
}

#[test]
fn test_turn_and_en_passant_interaction() {
    let black_fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR b KQkq d6 0 2";

    // Already Black's turn: the en-passant field is untouched.
    let unchanged = set_fen_turn(black_fen, PieceColour::Black);
    assert_eq!(
        parse_fen(&unchanged).en_passant_square.as_deref(),
        Some("d6")
    );

    // Flipping White → Black clears it.
    let white_fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
    let flipped = set_fen_turn(white_fen, PieceColour::Black);
    assert_eq!(parse_fen(&flipped).en_passant_square, None);
}

#[test]
fn test_full_game_report() {
    let analysis = game_analysis(
        evaluated_tree(),
        &OpeningBook::empty(),
        &AnalysisOptions::default(),
    );

    let chain = mainline_chain(&analysis.tree, analysis.tree.root_id());
    for &id in &chain[1..] {
        let state = &analysis.tree.node(id).state;
        // Every move matched the engine's first choice.
        assert_eq!(state.classification, Some(Classification::Best));
        assert!(state.accuracy.unwrap() > 95.0);
    }

    assert!(analysis.accuracies.white > 95.0);
    assert!(analysis.accuracies.black > 95.0);

    let ratings = analysis.estimated_ratings.unwrap();
    assert!(ratings.white >= 2000);
    assert!(ratings.black >= 2000);
}

#[test]
fn test_classification_idempotence() {
    let tree = evaluated_tree();
    let chain = mainline_chain(&tree, tree.root_id());
    let node = chain[1];
    let book = OpeningBook::empty();
    let options = AnalysisOptions::default();

    let first = classify(&tree, node, &book, &options).unwrap();
    let second = classify(&tree, node, &book, &options).unwrap();
    assert_eq!(first, second);
    assert!(first.is_inalterable());

    // A whole-tree re-analysis keeps the inalterable assignment too.
    let analysis = game_analysis(tree, &book, &options);
    let again = game_analysis(analysis.tree, &book, &options);
    assert_eq!(
        again.tree.node(node).state.classification,
        Some(Classification::Best)
    );
}

#[test]
fn test_theory_from_shipped_book() {
    let book_file = std::fs::File::open(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/data/openings.json"
    ))
    .expect("shipped opening book");
    let book = OpeningBook::from_json_reader(book_file).unwrap();

    let analysis = game_analysis(evaluated_tree(), &book, &AnalysisOptions::default());
    let chain = mainline_chain(&analysis.tree, analysis.tree.root_id());

    // 1. e4 is King's Pawn Opening and stays in book through 2... Nc6.
    let first = &analysis.tree.node(chain[1]).state;
    assert_eq!(first.classification, Some(Classification::Theory));
    assert_eq!(first.opening.as_deref(), Some("King's Pawn Opening"));

    let fourth = &analysis.tree.node(chain[4]).state;
    assert_eq!(fourth.classification, Some(Classification::Theory));
}

#[tokio::test]
async fn test_realtime_driver_classifies_appended_move() {
    let tree = evaluated_tree();
    let chain = mainline_chain(&tree, tree.root_id());
    let last = *chain.last().unwrap();

    // Strip the last node's lines; the driver must fetch them.
    let mut tree = tree;
    let last_fen = tree.node(last).state.fen.clone();
    tree.node_mut(last).state.engine_lines.clear();

    let provider = MappedLines(HashMap::from([(
        last_fen,
        vec![line(1, &["f1b5"], Evaluation::centipawn(30))],
    )]));

    let shared = Arc::new(Mutex::new(tree));
    let (driver, events, _updates) = RealtimeAnalyser::new(
        shared.clone(),
        Arc::new(OpeningBook::empty()),
        AnalysisOptions::default(),
        provider,
        AnonymousSession,
        false,
    );

    events.send(last).await.unwrap();
    drop(events);
    driver.run().await;

    let locked = shared.lock().await;
    let state = &locked.node(last).state;
    assert_eq!(state.classification, Some(Classification::Best));
    assert!(state.accuracy.is_some());
}
