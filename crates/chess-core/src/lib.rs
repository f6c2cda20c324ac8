//! Shared chess types and notation utilities for the analysis pipeline.

pub mod board;
pub mod classification;
pub mod colour;
pub mod evaluation;
pub mod game;
pub mod notation;
pub mod pgn;

pub use classification::Classification;
pub use colour::PieceColour;
pub use evaluation::{EngineLine, Evaluation, EvaluationKind};
pub use game::{Game, Player, Players, STANDARD_START_FEN};
