//! Opening-name book, keyed by the FEN piece-placement field.
//!
//! Move counters, castling rights and the turn are irrelevant to whether a
//! position is book, so only the first FEN field is used as the key.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    positions: HashMap<String, String>,
}

impl OpeningBook {
    /// An empty book; Theory classification is effectively disabled.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            positions: entries
                .into_iter()
                .map(|(fen, name)| (normalize_key(&fen.into()), name.into()))
                .collect(),
        }
    }

    /// Load a JSON book: an object mapping FENs (or bare piece-placement
    /// fields) to opening names.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, String> = serde_json::from_reader(reader)?;
        Ok(Self::from_entries(raw))
    }

    /// Load the bincode book format.
    pub fn from_bin_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let raw: HashMap<String, String> = bincode::deserialize_from(reader)?;
        Ok(Self::from_entries(raw))
    }

    /// Load a book by file extension (`.json`, anything else is treated as
    /// bincode).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if path.extension().is_some_and(|ext| ext == "json") {
            let file = File::open(path)?;
            Ok(Self::from_json_reader(BufReader::new(file))?)
        } else {
            Self::from_bin_path(path)
        }
    }

    /// The opening name for a position, if it is still in book.
    pub fn name_for(&self, fen: &str) -> Option<&str> {
        let placement = fen.split_whitespace().next()?;
        self.positions.get(placement).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn normalize_key(fen: &str) -> String {
    fen.split_whitespace().next().unwrap_or(fen).to_string()
}
