use core::fmt;
use std::{
    error::Error,
    fmt::{Display, Formatter},
};

use crate::types::SlotId;

/// Problems with the grid or word list that make a puzzle unsolvable before any search happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyGrid,
    RaggedGrid { row: usize, expected: usize, found: usize },
    EmptyWordList,
    EmptyLengthClass { length: usize },
    UnsupportedCharacter { word: String, character: char },
    NoWordsOfLength { slot_id: SlotId, length: usize },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyGrid => write!(f, "Grid has no rows"),
            ConfigError::RaggedGrid { row, expected, found } => write!(
                f,
                "Grid row {row} has {found} cells, expected {expected}"
            ),
            ConfigError::EmptyWordList => write!(f, "Word list is empty"),
            ConfigError::EmptyLengthClass { length } => {
                write!(f, "No words to index for length {length}")
            }
            ConfigError::UnsupportedCharacter { word, character } => {
                write!(f, "Word \"{word}\" contains unsupported character '{character}'")
            }
            ConfigError::NoWordsOfLength { slot_id, length } => {
                write!(f, "Slot {slot_id} has length {length} but no words have that length")
            }
        }
    }
}

impl Error for ConfigError {}

/// Result type for the loaders and the binary, where I/O errors mix with `ConfigError`s.
pub type FillResult<T = ()> = Result<T, Box<dyn Error>>;
