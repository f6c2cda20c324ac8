//! Board-analysis helpers shared by the classification rules.

pub mod attackers;
pub mod defenders;
pub mod danger_levels;
pub mod extract;
pub mod piece_safety;
pub mod piece_trapped;

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Move, Position, Role, Square};

use chess_core::notation::set_fen_turn;
use chess_core::PieceColour;

/// A piece standing on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPiece {
    pub role: Role,
    pub colour: PieceColour,
    pub square: Square,
}

/// A capture or escape move considered during threat analysis. Kept as raw
/// coordinates so it can be replayed on recalibrated boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAttack {
    pub role: Role,
    pub colour: PieceColour,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

/// A fully resolved move on a known position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDetail {
    pub colour: PieceColour,
    pub role: Role,
    pub from: Square,
    pub to: Square,
    pub capture: Option<Role>,
    pub promotion: Option<Role>,
    pub en_passant: bool,
}

impl MoveDetail {
    pub fn from_move(pos: &Chess, mv: &Move) -> Option<Self> {
        Some(Self {
            colour: PieceColour::from(pos.turn()),
            role: mv.role(),
            from: mv.from()?,
            to: mv.to(),
            capture: mv.capture(),
            promotion: mv.promotion(),
            en_passant: mv.is_en_passant(),
        })
    }

    /// The square the captured piece actually stood on (differs from the
    /// destination for en passant).
    pub fn capture_square(&self) -> Square {
        if self.en_passant {
            Square::from_coords(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }
}

/// Exchange values. The king is priced high enough to lose every
/// comparison against a real attacker.
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 1,
        Role::Knight => 3,
        Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 99,
    }
}

/// Parse a FEN into a position, tolerating the impossible-check states
/// that turn recalibration can produce.
pub fn lenient_position(fen: &str) -> Option<Chess> {
    let parsed: Fen = fen.parse().ok()?;
    match parsed.into_position(CastlingMode::Standard) {
        Ok(position) => Some(position),
        Err(err) => err.ignore_impossible_check().ok(),
    }
}

/// The position with the side to move forced to `colour` (en passant
/// cleared if that flips the turn).
pub fn position_with_turn(fen: &str, colour: PieceColour) -> Option<Chess> {
    lenient_position(&set_fen_turn(fen, colour))
}

/// All pieces on the board of the given colour.
pub fn board_pieces(pos: &Chess, colour: PieceColour) -> Vec<BoardPiece> {
    let board = pos.board();
    Square::ALL
        .iter()
        .filter_map(|&square| {
            let piece = board.piece_at(square)?;
            (PieceColour::from(piece.color) == colour).then_some(BoardPiece {
                role: piece.role,
                colour,
                square,
            })
        })
        .collect()
}

/// Replays a raw attack as a legal move, returning the resulting position
/// and the resolved move. `None` when no matching legal move exists.
pub fn play_raw(pos: &Chess, raw: &RawAttack) -> Option<(Chess, MoveDetail)> {
    let legal = pos.legal_moves();
    let mv = legal.iter().find(|mv| {
        mv.from() == Some(raw.from)
            && mv.to() == raw.to
            && (raw.promotion.is_none() || mv.promotion() == raw.promotion)
    })?;

    let detail = MoveDetail::from_move(pos, mv)?;
    let mut after = pos.clone();
    after.play_unchecked(*mv);
    Some((after, detail))
}

/// Textual FEN surgery: the returned FEN has the piece at `square` removed.
/// Castling rights and en passant are cleared; these boards only feed
/// attack geometry.
pub fn remove_piece_fen(fen: &str, square: Square) -> String {
    edit_placement(fen, square, None)
}

/// Textual FEN surgery: the returned FEN has `role`/`colour` placed on
/// `square`, replacing whatever stood there.
pub fn put_piece_fen(fen: &str, square: Square, role: Role, colour: PieceColour) -> String {
    edit_placement(fen, square, Some((role, colour)))
}

fn edit_placement(fen: &str, square: Square, piece: Option<(Role, PieceColour)>) -> String {
    let mut parts: Vec<String> = fen.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        return fen.to_string();
    }

    let mut grid = [[None::<char>; 8]; 8]; // [rank][file], rank 0 = rank 1

    for (row, rank_text) in parts[0].split('/').enumerate().take(8) {
        let rank = 7 - row;
        let mut file = 0usize;
        for ch in rank_text.chars() {
            if let Some(run) = ch.to_digit(10) {
                file += run as usize;
            } else if file < 8 {
                grid[rank][file] = Some(ch);
                file += 1;
            }
        }
    }

    let rank = square.rank() as usize;
    let file = square.file() as usize;
    grid[rank][file] = piece.map(|(role, colour)| piece_char(role, colour));

    let mut placement = String::new();
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            match grid[rank][file] {
                Some(ch) => {
                    if empty > 0 {
                        placement.push_str(&empty.to_string());
                        empty = 0;
                    }
                    placement.push(ch);
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            placement.push_str(&empty.to_string());
        }
        if rank > 0 {
            placement.push('/');
        }
    }

    parts[0] = placement;
    if parts.len() > 2 {
        parts[2] = "-".to_string();
    }
    if parts.len() > 3 {
        parts[3] = "-".to_string();
    }

    parts.join(" ")
}

fn piece_char(role: Role, colour: PieceColour) -> char {
    let lower = match role {
        Role::Pawn => 'p',
        Role::Knight => 'n',
        Role::Bishop => 'b',
        Role::Rook => 'r',
        Role::Queen => 'q',
        Role::King => 'k',
    };
    match colour {
        PieceColour::White => lower.to_ascii_uppercase(),
        PieceColour::Black => lower,
    }
}
