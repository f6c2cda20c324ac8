//! Defender discovery, by simulating each capture and recording the
//! smallest set of recapturers.

use chess_core::board::position_fen;

use super::attackers::attacking_moves;
use super::{play_raw, position_with_turn, put_piece_fen, BoardPiece, RawAttack};

/// The defenders of a piece. Where attackers exist, each capture is
/// simulated and the minimal recapture set is the answer; where none do,
/// the piece's colour is flipped in place and its attackers counted
/// instead.
pub fn defending_moves(fen: &str, piece: BoardPiece, transitive: bool) -> Vec<RawAttack> {
    let attacking = attacking_moves(fen, piece, false);

    let mut recapture_sets: Vec<Vec<RawAttack>> = Vec::new();
    for attack in &attacking {
        let Some(capture_board) = position_with_turn(fen, piece.colour.flip()) else {
            continue;
        };
        let Some((after, _)) = play_raw(&capture_board, attack) else {
            continue;
        };

        let landed = BoardPiece {
            role: attack.role,
            colour: attack.colour,
            square: attack.to,
        };
        recapture_sets.push(attacking_moves(&position_fen(&after), landed, transitive));
    }

    if let Some(smallest) = recapture_sets.into_iter().min_by_key(Vec::len) {
        return smallest;
    }

    let flipped = BoardPiece {
        role: piece.role,
        colour: piece.colour.flip(),
        square: piece.square,
    };
    let flipped_fen = put_piece_fen(fen, piece.square, piece.role, flipped.colour);
    attacking_moves(&flipped_fen, flipped, transitive)
}
