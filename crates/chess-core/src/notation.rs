//! Pure functions over FEN strings and SAN/UCI move notation.

use crate::colour::PieceColour;

/// Castling availability for one side of the board, per colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingSide {
    pub white: bool,
    pub black: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights {
    pub kingside: CastlingSide,
    pub queenside: CastlingSide,
}

/// The six FEN fields, split and interpreted. Short FENs take defaults
/// (white to move, empty rights, clock 0, full-move 1); behaviour on
/// otherwise malformed input is undefined upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFen {
    pub parts: Vec<String>,
    pub turn_colour: PieceColour,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<String>,
    pub fifty_move_clock: u32,
    pub full_move_count: u32,
}

pub fn parse_fen(fen: &str) -> ParsedFen {
    let parts: Vec<String> = fen.split_whitespace().map(str::to_string).collect();

    let turn_colour = match parts.get(1).map(String::as_str) {
        Some("b") => PieceColour::Black,
        _ => PieceColour::White,
    };

    let castling = parts.get(2).map(String::as_str).unwrap_or("-");

    ParsedFen {
        turn_colour,
        castling_rights: CastlingRights {
            kingside: CastlingSide {
                white: castling.contains('K'),
                black: castling.contains('k'),
            },
            queenside: CastlingSide {
                white: castling.contains('Q'),
                black: castling.contains('q'),
            },
        },
        en_passant_square: parts
            .get(3)
            .filter(|square| square.as_str() != "-")
            .cloned(),
        fifty_move_clock: parts.get(4).and_then(|clock| clock.parse().ok()).unwrap_or(0),
        full_move_count: parts.get(5).and_then(|count| count.parse().ok()).unwrap_or(1),
        parts,
    }
}

/// Returns a new FEN with the turn field set to `colour`. If the turn
/// actually changes, the en-passant field is cleared: crossing a half-move
/// boundary invalidates any pending en-passant capture.
pub fn set_fen_turn(fen: &str, colour: PieceColour) -> String {
    let mut parts: Vec<String> = fen.split_whitespace().map(str::to_string).collect();
    if parts.len() < 4 {
        return fen.to_string();
    }

    if parts[1] != colour.fen_char().to_string() {
        parts[3] = "-".to_string();
    }
    parts[1] = colour.fen_char().to_string();

    parts.join(" ")
}

/// Surface features of a SAN token, by substring presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanTraits {
    pub castling: bool,
    pub check: bool,
    pub capture: bool,
    pub promotion: bool,
    pub checkmate: bool,
    /// First character of the SAN. Wrong for pawn moves (a file letter);
    /// derive the true moved piece from board state instead.
    pub piece: char,
}

pub fn parse_san_move(san: &str) -> SanTraits {
    SanTraits {
        castling: san.contains('O'),
        check: san.contains('+'),
        capture: san.contains('x'),
        promotion: san.contains('='),
        checkmate: san.contains('#'),
        piece: san.chars().next().unwrap_or(' '),
    }
}

/// A UCI move split by fixed-width slicing (chars 0-1, 2-3, optional 4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciParts {
    pub from: String,
    pub to: String,
    pub promotion: Option<char>,
}

pub fn parse_uci_move(uci: &str) -> UciParts {
    UciParts {
        from: uci.chars().take(2).collect(),
        to: uci.chars().skip(2).take(2).collect(),
        promotion: uci.chars().nth(4),
    }
}
