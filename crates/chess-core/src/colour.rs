//! Piece colour, convertible to and from the shakmaty equivalent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceColour {
    White,
    Black,
}

impl PieceColour {
    pub fn flip(self) -> Self {
        match self {
            PieceColour::White => PieceColour::Black,
            PieceColour::Black => PieceColour::White,
        }
    }

    /// The single-character turn field used in FEN strings.
    pub fn fen_char(self) -> char {
        match self {
            PieceColour::White => 'w',
            PieceColour::Black => 'b',
        }
    }
}

impl From<shakmaty::Color> for PieceColour {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => PieceColour::White,
            shakmaty::Color::Black => PieceColour::Black,
        }
    }
}

impl From<PieceColour> for shakmaty::Color {
    fn from(colour: PieceColour) -> Self {
        match colour {
            PieceColour::White => shakmaty::Color::White,
            PieceColour::Black => shakmaty::Color::Black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip() {
        assert_eq!(PieceColour::White.flip(), PieceColour::Black);
        assert_eq!(PieceColour::Black.flip(), PieceColour::White);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&PieceColour::White).unwrap(),
            "\"white\""
        );
        assert_eq!(
            serde_json::from_str::<PieceColour>("\"black\"").unwrap(),
            PieceColour::Black
        );
    }
}
