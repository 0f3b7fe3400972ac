use std::fs;
use std::path::Path;

use smallvec::SmallVec;

use crate::error::{ConfigError, FillResult};
use crate::types::{Cell, Direction};
use crate::MAX_SLOT_LENGTH;

/// Character marking a fillable cell in a grid template. Anything else is a block.
pub const OPEN_CELL: char = '_';

/// Character used for blocks when rendering.
pub const BLOCKED_CELL: char = '#';

/// A rectangular matrix of cells, `true` where a letter can go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Occupancy {
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Occupancy, ConfigError> {
        let width = rows.first().ok_or(ConfigError::EmptyGrid)?.len();
        let height = rows.len();

        let mut cells = Vec::with_capacity(width * height);
        for (row, cells_in_row) in rows.into_iter().enumerate() {
            if cells_in_row.len() != width {
                return Err(ConfigError::RaggedGrid {
                    row,
                    expected: width,
                    found: cells_in_row.len(),
                });
            }
            cells.extend(cells_in_row);
        }

        Ok(Occupancy { width, height, cells })
    }

    /// Parse a grid template, with `_` representing open cells and any other character
    /// representing a block. Lines are trimmed and blank lines skipped.
    pub fn parse(template: &str) -> Result<Occupancy, ConfigError> {
        Occupancy::from_rows(
            template
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| line.chars().map(|c| c == OPEN_CELL).collect())
                .collect(),
        )
    }

    pub fn load<P: AsRef<Path>>(path: P) -> FillResult<Occupancy> {
        Ok(Occupancy::parse(&fs::read_to_string(path)?)?)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Is this cell inside the grid and open?
    pub fn is_open(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width && self.cells[cell.row * self.width + cell.col]
    }

    fn starts_run(&self, cell: Cell, direction: Direction) -> bool {
        let preceded_by_block = match direction {
            Direction::Across => cell.col == 0 || !self.is_open(Cell::new(cell.row, cell.col - 1)),
            Direction::Down => cell.row == 0 || !self.is_open(Cell::new(cell.row - 1, cell.col)),
        };
        self.is_open(cell) && preceded_by_block
    }

    fn run_from(&self, start_cell: Cell, direction: Direction) -> SmallVec<[Cell; MAX_SLOT_LENGTH]> {
        (0..)
            .map(|offset| start_cell.step(direction, offset))
            .take_while(|&cell| self.is_open(cell))
            .collect()
    }
}

/// The static shape of a slot found in the grid, before it's connected to anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGeometry {
    pub start_cell: Cell,
    pub direction: Direction,
    pub cells: SmallVec<[Cell; MAX_SLOT_LENGTH]>,
}

impl SlotGeometry {
    pub fn length(&self) -> usize {
        self.cells.len()
    }
}

/// Find every slot in the grid, in row-major order of their start cells with across slots before
/// down slots sharing the same start. Runs of a single cell aren't slots.
pub fn scan_slots(occupancy: &Occupancy) -> Vec<SlotGeometry> {
    let mut result = vec![];

    for row in 0..occupancy.height() {
        for col in 0..occupancy.width() {
            let start_cell = Cell::new(row, col);

            for direction in [Direction::Across, Direction::Down] {
                if !occupancy.starts_run(start_cell, direction) {
                    continue;
                }

                let cells = occupancy.run_from(start_cell, direction);
                if cells.len() > 1 {
                    result.push(SlotGeometry { start_cell, direction, cells });
                }
            }
        }
    }

    result
}
