//! Immutable game input record.

use serde::{Deserialize, Serialize};

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Players {
    #[serde(default)]
    pub white: Player,
    #[serde(default)]
    pub black: Player,
}

/// The input record handed to the tree builder. Produced upstream (archive
/// fetch, paste box, ...); never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub pgn: String,
    #[serde(default = "default_initial_position")]
    pub initial_position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_control: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub players: Players,
}

fn default_initial_position() -> String {
    STANDARD_START_FEN.to_string()
}

impl Game {
    /// A game over the standard starting position with no metadata.
    pub fn from_pgn(pgn: impl Into<String>) -> Self {
        Self {
            pgn: pgn.into(),
            initial_position: default_initial_position(),
            variant: None,
            time_control: None,
            date: None,
            players: Players::default(),
        }
    }
}
