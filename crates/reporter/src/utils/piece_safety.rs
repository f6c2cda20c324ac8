//! Exchange-aware piece safety.

use shakmaty::Role;

use chess_core::PieceColour;

use super::attackers::attacking_moves;
use super::defenders::defending_moves;
use super::{board_pieces, lenient_position, piece_value, BoardPiece, MoveDetail, RawAttack};

fn to_board_piece(attack: &RawAttack) -> BoardPiece {
    BoardPiece {
        role: attack.role,
        colour: attack.colour,
        square: attack.from,
    }
}

/// Whether a piece survives the exchanges available against it.
pub fn is_piece_safe(fen: &str, piece: BoardPiece, played: Option<&MoveDetail>) -> bool {
    let direct_attackers: Vec<BoardPiece> = attacking_moves(fen, piece, false)
        .iter()
        .map(to_board_piece)
        .collect();

    let attackers: Vec<BoardPiece> = attacking_moves(fen, piece, true)
        .iter()
        .map(to_board_piece)
        .collect();

    let defenders: Vec<BoardPiece> = defending_moves(fen, piece, true)
        .iter()
        .map(to_board_piece)
        .collect();

    // Favourable, decimal sacrifices (rook for two minors etc.) are safe.
    if let Some(captured) = played.and_then(|played| played.capture) {
        if piece.role == Role::Rook
            && piece_value(captured) == piece_value(Role::Knight)
            && attackers.len() == 1
            && !defenders.is_empty()
            && piece_value(attackers[0].role) == piece_value(Role::Knight)
        {
            return true;
        }
    }

    // A piece with a direct attacker of lower value than itself isn't safe.
    if direct_attackers
        .iter()
        .any(|attacker| piece_value(attacker.role) < piece_value(piece.role))
    {
        return false;
    }

    // A piece that does not have more attackers than defenders is safe.
    if attackers.len() <= defenders.len() {
        return true;
    }

    // A piece lower in value than any direct attacker, with any defender
    // lower in value than all direct attackers, must be safe.
    let Some(lowest_attacker) = direct_attackers
        .iter()
        .min_by_key(|attacker| piece_value(attacker.role))
    else {
        return true;
    };

    if piece_value(piece.role) < piece_value(lowest_attacker.role)
        && defenders
            .iter()
            .any(|defender| piece_value(defender.role) < piece_value(lowest_attacker.role))
    {
        return true;
    }

    // A piece defended by any pawn, at this point, must be safe.
    if defenders.iter().any(|defender| defender.role == Role::Pawn) {
        return true;
    }

    false
}

/// The mover's pieces currently hanging: non-pawn, non-king pieces worth
/// more than whatever the move just captured, that fail the safety test.
pub fn unsafe_pieces(
    fen: &str,
    colour: PieceColour,
    played: Option<&MoveDetail>,
) -> Vec<BoardPiece> {
    let captured_value = played
        .and_then(|played| played.capture)
        .map(piece_value)
        .unwrap_or(0);

    let Some(position) = lenient_position(fen) else {
        return Vec::new();
    };

    board_pieces(&position, colour)
        .into_iter()
        .filter(|piece| {
            piece.role != Role::Pawn
                && piece.role != Role::King
                && piece_value(piece.role) > captured_value
                && !is_piece_safe(fen, *piece, played)
        })
        .collect()
}
