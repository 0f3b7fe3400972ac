pub mod arc_consistency;
pub mod backtracking_search;
pub mod constraint_graph;
pub mod error;
pub mod grid;
pub mod lexicon;
pub mod puzzle;
pub mod types;
pub mod word_list;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

pub use arc_consistency::SupportCheck;
pub use backtracking_search::{
    find_fill, find_fill_with_selector, FillFailure, FillOptions, FillSuccess, SelectionStrategy,
    SlotSelector, Statistics,
};
pub use error::{ConfigError, FillResult};
pub use grid::Occupancy;
pub use lexicon::Lexicon;
pub use puzzle::Puzzle;
pub use types::{Cell, Choice, Direction, SlotId, WordId};
pub use word_list::WordList;
