use std::fmt::{Display, Formatter};

/// An identifier for a given slot, based on its index in the constraint graph's `slots` arena.
pub type SlotId = usize;

/// An identifier for a given word, based on its index in the word class of its length.
pub type WordId = usize;

/// A letter of the lexicon's alphabet, `0` for 'a' through `25` for 'z'.
pub type Letter = u8;

/// Zero-indexed row and column of a cell in the grid, where row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The cell `offset` steps away from this one in the given direction.
    pub const fn step(self, direction: Direction, offset: usize) -> Self {
        match direction {
            Direction::Across => Self { row: self.row, col: self.col + offset },
            Direction::Down => Self { row: self.row + offset, col: self.col },
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A struct recording a slot assignment made during the filling process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

#[cfg(test)]
mod tests {
    use super::{Cell, Direction};

    #[test]
    fn test_step_follows_direction() {
        let cell = Cell::new(2, 3);
        assert_eq!(cell.step(Direction::Across, 2), Cell::new(2, 5));
        assert_eq!(cell.step(Direction::Down, 1), Cell::new(3, 3));
        assert_eq!(cell.step(Direction::Down, 0), cell);
    }
}
