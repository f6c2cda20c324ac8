//! Bridging between FEN strings and shakmaty positions.

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, EnPassantMode};

/// Parse a FEN into a legal standard-chess position.
pub fn position_from_fen(fen: &str) -> Option<Chess> {
    let parsed: Fen = fen.parse().ok()?;
    parsed.into_position(CastlingMode::Standard).ok()
}

/// Render a position back to FEN text.
pub fn position_fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}
