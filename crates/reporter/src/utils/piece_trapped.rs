//! Trapped-piece detection.

use shakmaty::{Position, Role};

use chess_core::board::position_fen;
use chess_core::notation::set_fen_turn;

use super::danger_levels::move_creates_greater_threat;
use super::piece_safety::is_piece_safe;
use super::{lenient_position, BoardPiece, MoveDetail, RawAttack};

/// A piece is trapped when it is unsafe where it stands and every square
/// it can reach is unsafe too, or reaching safety hands the opponent a
/// larger counterthreat.
pub fn is_piece_trapped(fen: &str, piece: BoardPiece) -> bool {
    let calibrated_fen = set_fen_turn(fen, piece.colour);

    let standing_safe = is_piece_safe(&calibrated_fen, piece, None);

    let Some(calibrated) = lenient_position(&calibrated_fen) else {
        return false;
    };

    let piece_moves: Vec<_> = calibrated
        .legal_moves()
        .iter()
        .filter(|mv| mv.from() == Some(piece.square))
        .cloned()
        .collect();

    let all_moves_unsafe = piece_moves.iter().all(|mv| {
        if mv.capture() == Some(Role::King) {
            return false;
        }

        let Some(detail) = MoveDetail::from_move(&calibrated, mv) else {
            return false;
        };

        let acting = RawAttack {
            role: detail.role,
            colour: detail.colour,
            from: detail.from,
            to: detail.to,
            promotion: detail.promotion,
        };

        if move_creates_greater_threat(&calibrated_fen, piece, &acting) {
            return true;
        }

        let mut escape_board = calibrated.clone();
        escape_board.play_unchecked(*mv);

        let escaped = BoardPiece {
            role: piece.role,
            colour: piece.colour,
            square: detail.to,
        };

        !is_piece_safe(&position_fen(&escape_board), escaped, Some(&detail))
    });

    !standing_safe && all_moves_unsafe
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::PieceColour;
    use shakmaty::Square;

    fn white_knight(square: Square) -> BoardPiece {
        BoardPiece {
            role: Role::Knight,
            colour: PieceColour::White,
            square,
        }
    }

    #[test]
    fn test_cornered_knight_is_trapped() {
        // White knight a8, attacked by the d8 rook. Its escapes are both
        // covered: b6 by the a7 pawn, c7 by the e8 knight.
        let fen = "N2rnk2/p7/8/8/8/8/8/4K3 w - - 0 1";
        assert!(is_piece_trapped(fen, white_knight(Square::A8)));
    }

    #[test]
    fn test_knight_with_safe_square_is_not_trapped() {
        // Same corner, but nothing covers c7.
        let fen = "N2r1k2/p7/8/8/8/8/8/4K3 w - - 0 1";
        assert!(!is_piece_trapped(fen, white_knight(Square::A8)));
    }

    #[test]
    fn test_safe_standing_piece_is_not_trapped() {
        // Unattacked knight in the open.
        let fen = "4k3/8/8/8/4N3/8/8/4K3 w - - 0 1";
        assert!(!is_piece_trapped(fen, white_knight(Square::E4)));
    }
}
