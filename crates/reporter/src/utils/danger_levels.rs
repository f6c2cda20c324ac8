//! Counterthreat detection: does acting on a threatened piece leave the
//! opponent facing an equal or larger problem?

use shakmaty::{Position, Role};

use chess_core::board::position_fen;
use chess_core::PieceColour;

use super::attackers::attacking_moves;
use super::piece_safety::unsafe_pieces;
use super::{lenient_position, piece_value, play_raw, BoardPiece, MoveDetail, RawAttack};

/// Attacking moves against unsafe pieces of `colour` that are worth at
/// least as much as the threatened piece.
fn relative_unsafe_piece_attacks(
    fen: &str,
    threatened: BoardPiece,
    colour: PieceColour,
    played: Option<&MoveDetail>,
) -> Vec<RawAttack> {
    unsafe_pieces(fen, colour, played)
        .into_iter()
        .filter(|piece| {
            piece.square != threatened.square
                && piece_value(piece.role) >= piece_value(threatened.role)
        })
        .flat_map(|piece| attacking_moves(fen, piece, false))
        .collect()
}

/// Assuming `threatened` is under threat, play `acting` (capturing it as
/// the opponent, or moving it to safety) and report whether the move
/// creates a greater counterthreat than the one it answered.
pub fn move_creates_greater_threat(
    fen: &str,
    threatened: BoardPiece,
    acting: &RawAttack,
) -> bool {
    // Relative attacks that existed even before the acting move.
    let previous_attacks =
        relative_unsafe_piece_attacks(fen, threatened, acting.colour, None);

    let Some(board) = lenient_position(fen) else {
        return false;
    };
    let Some((after, played)) = play_raw(&board, acting) else {
        return false;
    };
    let after_fen = position_fen(&after);

    let relative_attacks =
        relative_unsafe_piece_attacks(&after_fen, threatened, acting.colour, Some(&played));

    let has_new_attack = relative_attacks
        .iter()
        .any(|attack| !previous_attacks.contains(attack));

    if has_new_attack {
        return true;
    }

    // A lower-value piece sacrifice that, if taken, leads to mate.
    piece_value(threatened.role) < piece_value(Role::Queen)
        && after.legal_moves().iter().any(|reply| {
            let mut line = after.clone();
            line.play_unchecked(*reply);
            line.is_checkmate()
        })
}
