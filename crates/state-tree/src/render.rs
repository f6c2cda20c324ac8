//! State tree → PGN renderer, with header synthesis.

use shakmaty::Position;

use chess_core::board::position_from_fen;
use chess_core::pgn::{extract_header, extract_headers};
use chess_core::{Game, PieceColour};

use crate::build::final_position;
use crate::navigate::{mainline_chain, node_move_number, node_siblings};
use crate::tree::{NodeId, StateTree};

/// Renders a state tree into PGN text. When a game context is provided,
/// headers are synthesized from it; if the context PGN's own final position
/// matches the tree's, its Result tag is adopted and its headers are merged
/// over the synthesized ones. Never fails on a well-formed tree.
pub fn render_state_tree(tree: &StateTree, game_context: Option<&Game>) -> String {
    let chain = mainline_chain(tree, tree.root_id());

    let moves = chain
        .iter()
        .filter(|&&id| tree.node(id).state.played_move.is_some())
        .map(|&id| render_node(tree, id, true, false))
        .collect::<Vec<_>>()
        .join(" ");

    let final_fen = &tree.node(*chain.last().unwrap()).state.fen;
    let mut result = derive_result(final_fen);

    let mut headers: Vec<(String, String)> = Vec::new();
    if let Some(context) = game_context {
        push_header(&mut headers, "FEN", &context.initial_position);
        push_header(&mut headers, "Date", context.date.as_deref().unwrap_or(""));
        push_header(
            &mut headers,
            "TimeControl",
            context.time_control.as_deref().unwrap_or(""),
        );
        push_header(&mut headers, "Variant", context.variant.as_deref().unwrap_or(""));
        push_header(&mut headers, "White", &context.players.white.username);
        push_header(&mut headers, "Black", &context.players.black.username);

        if !context.pgn.trim().is_empty() {
            // Retain the source result only if its final position still
            // matches the rendered line.
            if let Ok(source_final) = final_position(&context.pgn, &context.initial_position) {
                if &source_final == final_fen {
                    if let Some(source_result) = extract_header(&context.pgn, "Result") {
                        result = source_result;
                    }
                }
            }

            for (name, value) in extract_headers(&context.pgn) {
                upsert_header(&mut headers, &name, &value);
            }
        }
    }

    let header_block = headers
        .iter()
        .map(|(name, value)| format!("[{name} \"{value}\"]"))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{header_block}\n\n{moves} {result}")
        .trim()
        .to_string()
}

fn render_node(tree: &StateTree, id: NodeId, render_variations: bool, force_number: bool) -> String {
    let node = tree.node(id);
    let mut parts: Vec<String> = Vec::new();

    let move_number = node_move_number(tree, id);
    let white_move = move_number.fract() == 0.0;

    if white_move || force_number {
        parts.push(format!(
            "{}{}",
            move_number.floor() as u32,
            if white_move { "." } else { "..." }
        ));
    }

    parts.push(
        node.state
            .played_move
            .as_ref()
            .map(|played| played.san.clone())
            .unwrap_or_default(),
    );

    if let Some(nag) = node.state.classification.and_then(|tier| tier.nag()) {
        parts.push(nag.to_string());
    }

    if render_variations {
        for sibling in node_siblings(tree, id) {
            let rendered = mainline_chain(tree, sibling)
                .iter()
                .enumerate()
                .map(|(index, &line_id)| render_node(tree, line_id, index != 0, index == 0))
                .collect::<Vec<_>>()
                .join(" ");

            parts.push(format!("({rendered})"));
        }
    }

    parts.join(" ")
}

/// Result token from the final position alone: checkmate is decisive for
/// the side that delivered it, dead draws score half, anything else is
/// unknown.
fn derive_result(final_fen: &str) -> String {
    let position = match position_from_fen(final_fen) {
        Some(position) => position,
        None => return "*".to_string(),
    };

    if position.is_checkmate() {
        return match PieceColour::from(position.turn()) {
            PieceColour::Black => "1-0".to_string(),
            PieceColour::White => "0-1".to_string(),
        };
    }

    if position.is_stalemate() || position.is_insufficient_material() || position.halfmoves() >= 100
    {
        return "1/2-1/2".to_string();
    }

    "*".to_string()
}

fn push_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    if !value.is_empty() {
        headers.push((name.to_string(), value.to_string()));
    }
}

fn upsert_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.as_str() == name)
    {
        Some((_, existing_value)) => *existing_value = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_state_tree;
    use chess_core::{Classification, Game};

    #[test]
    fn test_render_plain_line() {
        let game = Game::from_pgn("1. e4 e5 2. Nf3 *");
        let tree = build_state_tree(&game).unwrap();
        assert_eq!(render_state_tree(&tree, None), "1. e4 e5 2. Nf3 *");
    }

    #[test]
    fn test_render_variation_at_same_point() {
        let game = Game::from_pgn("1. e4 e5 2. Nf3 (2. Bc4 Nf6) 2... Nc6 *");
        let tree = build_state_tree(&game).unwrap();
        // A black mainline move carries no number token, even after a
        // variation.
        assert_eq!(
            render_state_tree(&tree, None),
            "1. e4 e5 2. Nf3 (2. Bc4 Nf6) Nc6 *"
        );
    }

    #[test]
    fn test_render_black_variation_gets_dotted_number() {
        let game = Game::from_pgn("1. e4 e5 (1... c5 2. Nf3) 2. Nf3 *");
        let tree = build_state_tree(&game).unwrap();
        assert_eq!(
            render_state_tree(&tree, None),
            "1. e4 e5 (1... c5 2. Nf3) 2. Nf3 *"
        );
    }

    #[test]
    fn test_render_nag_annotations() {
        let game = Game::from_pgn("1. e4 e5 2. Nf3 *");
        let mut tree = build_state_tree(&game).unwrap();

        let chain = mainline_chain(&tree, tree.root_id());
        tree.node_mut(chain[1]).state.classification = Some(Classification::Blunder);
        tree.node_mut(chain[2]).state.classification = Some(Classification::Best);

        // Best has no NAG token; blunder renders as $4.
        assert_eq!(render_state_tree(&tree, None), "1. e4 $4 e5 2. Nf3 *");
    }

    #[test]
    fn test_checkmate_result_derived_from_final_position() {
        let game = Game::from_pgn("1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7#");
        let tree = build_state_tree(&game).unwrap();
        let rendered = render_state_tree(&tree, None);
        assert!(rendered.ends_with("4. Qxf7# 1-0"), "got: {rendered}");
    }

    #[test]
    fn test_context_headers_and_result_adoption() {
        let pgn = "[White \"anna\"]\n[Black \"ben\"]\n[Result \"1-0\"]\n\n1. e4 e5 2. Nf3 1-0";
        let mut game = Game::from_pgn(pgn);
        game.time_control = Some("600".to_string());
        game.players.white.username = "anna".to_string();
        game.players.black.username = "ben".to_string();

        let tree = build_state_tree(&game).unwrap();
        let rendered = render_state_tree(&tree, Some(&game));

        assert!(rendered.contains("[White \"anna\"]"));
        assert!(rendered.contains("[TimeControl \"600\"]"));
        // Final positions match, so the declared result survives.
        assert!(rendered.ends_with("1. e4 e5 2. Nf3 1-0"), "got: {rendered}");
    }

    #[test]
    fn test_result_not_adopted_when_positions_diverge() {
        let source_pgn = "[Result \"1-0\"]\n\n1. e4 e5 2. Nf3 1-0";
        let game = Game::from_pgn("1. e4 e5 2. Nc3 *");
        let tree = build_state_tree(&game).unwrap();

        let mut context = game.clone();
        context.pgn = source_pgn.to_string();
        let rendered = render_state_tree(&tree, Some(&context));
        assert!(rendered.ends_with("1. e4 e5 2. Nc3 *"), "got: {rendered}");
    }
}
