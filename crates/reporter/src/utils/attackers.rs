//! Attacker discovery: direct capturing moves plus transitive battery
//! attackers revealed by removing the piece at the front.

use shakmaty::{attacks, Position, Role, Square};

use chess_core::PieceColour;

use super::{position_with_turn, remove_piece_fen, BoardPiece, MoveDetail, RawAttack};

/// Moves by the opposite colour that capture on the piece's square, on a
/// board recalibrated so that side is to move. The enemy king is counted
/// as an attacker when adjacent even if the capture itself would be
/// illegal (a defended piece still ties the king down).
fn direct_attacking_moves(fen: &str, piece: BoardPiece) -> Vec<RawAttack> {
    let attacker_colour = piece.colour.flip();
    let Some(attacker_board) = position_with_turn(fen, attacker_colour) else {
        return Vec::new();
    };

    let mut attacking: Vec<RawAttack> = attacker_board
        .legal_moves()
        .iter()
        .filter_map(|mv| {
            let detail = MoveDetail::from_move(&attacker_board, mv)?;
            (detail.capture_square() == piece.square).then_some(RawAttack {
                role: detail.role,
                colour: attacker_colour,
                from: detail.from,
                to: piece.square,
                promotion: detail.promotion,
            })
        })
        .collect();

    let board = attacker_board.board();
    if let Some(king_square) = board.king_of(attacker_colour.into()) {
        if attacks::king_attacks(king_square).contains(piece.square)
            && !attacking.iter().any(|attack| attack.role == Role::King)
        {
            attacking.push(RawAttack {
                role: Role::King,
                colour: attacker_colour,
                from: king_square,
                to: piece.square,
                promotion: None,
            });
        }
    }

    attacking
}

/// All attacking moves against a piece. With `transitive`, batteries are
/// unrolled: each attacker is lifted off the board and any newly revealed
/// attackers are added, recursively.
pub fn attacking_moves(fen: &str, piece: BoardPiece, transitive: bool) -> Vec<RawAttack> {
    let mut attacking = direct_attacking_moves(fen, piece);

    if !transitive {
        return attacking;
    }

    struct TransitiveAttacker {
        direct_fen: String,
        square: Square,
        role: Role,
    }

    let mut frontier: Vec<TransitiveAttacker> = attacking
        .iter()
        .map(|attack| TransitiveAttacker {
            direct_fen: fen.to_string(),
            square: attack.from,
            role: attack.role,
        })
        .collect();

    while let Some(front) = frontier.pop() {
        // A king cannot stand at the front of a battery.
        if front.role == Role::King {
            continue;
        }

        let old_attacking: Vec<RawAttack> = direct_attacking_moves(&front.direct_fen, piece)
            .into_iter()
            .filter(|attack| attack.from != front.square)
            .collect();

        let lifted_fen = remove_piece_fen(&front.direct_fen, front.square);
        let new_attacking = direct_attacking_moves(&lifted_fen, piece);

        // Revealed attackers are the symmetric difference between the old
        // list (front excluded) and the list after lifting it.
        let revealed: Vec<RawAttack> = old_attacking
            .iter()
            .filter(|attack| !new_attacking.contains(attack))
            .chain(
                new_attacking
                    .iter()
                    .filter(|attack| !old_attacking.contains(attack)),
            )
            .copied()
            .collect();

        for attack in revealed {
            attacking.push(attack);
            frontier.push(TransitiveAttacker {
                direct_fen: lifted_fen.clone(),
                square: attack.from,
                role: attack.role,
            });
        }
    }

    attacking
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(role: Role, colour: PieceColour, square: Square) -> BoardPiece {
        BoardPiece {
            role,
            colour,
            square,
        }
    }

    #[test]
    fn test_direct_attacker_found() {
        // Black rook on a4 attacks the white knight on e4.
        let fen = "4k3/8/8/8/r3N3/8/8/4K3 w - - 0 1";
        let attacks = attacking_moves(
            fen,
            piece(Role::Knight, PieceColour::White, Square::E4),
            false,
        );

        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].role, Role::Rook);
        assert_eq!(attacks[0].from, Square::A4);
    }

    #[test]
    fn test_king_counted_even_when_capture_illegal() {
        // White pawn on d4 defended by the c3 pawn; the black king on d5
        // cannot legally take it but still counts as an attacker.
        let fen = "8/8/8/3k4/3P4/2P5/8/4K3 b - - 0 1";
        let attacks = attacking_moves(
            fen,
            piece(Role::Pawn, PieceColour::White, Square::D4),
            false,
        );

        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].role, Role::King);
    }

    #[test]
    fn test_battery_attackers_unrolled() {
        // Black rooks doubled on the e-file against the white pawn on e2.
        let fen = "4k3/4r3/4r3/8/8/8/4P3/K7 w - - 0 1";
        let target = piece(Role::Pawn, PieceColour::White, Square::E2);

        let direct = attacking_moves(fen, target, false);
        assert_eq!(direct.len(), 1);

        let transitive = attacking_moves(fen, target, true);
        assert_eq!(transitive.len(), 2);
        assert!(transitive.iter().any(|attack| attack.from == Square::E7));
    }

    #[test]
    fn test_no_attackers() {
        let fen = "4k3/8/8/8/4N3/8/8/4K3 w - - 0 1";
        let attacks = attacking_moves(
            fen,
            piece(Role::Knight, PieceColour::White, Square::E4),
            true,
        );
        assert!(attacks.is_empty());
    }
}
