use std::path::Path;

use log::info;

use crate::constraint_graph::{ConstraintGraph, Slot};
use crate::error::{ConfigError, FillResult};
use crate::grid::{Occupancy, BLOCKED_CELL};
use crate::lexicon::{letter_char, Lexicon, Word};
use crate::types::{Cell, Choice, SlotId};
use crate::word_list::WordList;

/// Everything static about one puzzle: the grid, the indexed words, and the slot graph with each
/// slot's initial domain.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub occupancy: Occupancy,
    pub lexicon: Lexicon,
    pub graph: ConstraintGraph,
}

impl Puzzle {
    pub fn new(occupancy: Occupancy, word_list: &WordList) -> Result<Puzzle, ConfigError> {
        let lexicon = Lexicon::from_word_list(word_list)?;
        let graph = ConstraintGraph::from_grid(&occupancy, &lexicon)?;

        info!(
            "Built puzzle: {}x{} grid, {} slots, {} words",
            occupancy.width(),
            occupancy.height(),
            graph.len(),
            word_list.len()
        );

        Ok(Puzzle { occupancy, lexicon, graph })
    }

    pub fn from_template(template: &str, word_list: &WordList) -> Result<Puzzle, ConfigError> {
        Puzzle::new(Occupancy::parse(template)?, word_list)
    }

    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(grid_path: P, words_path: Q) -> FillResult<Puzzle> {
        let occupancy = Occupancy::load(grid_path)?;
        let word_list = WordList::load(words_path)?;
        Ok(Puzzle::new(occupancy, &word_list)?)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.graph.slots
    }

    pub fn word(&self, slot_id: SlotId, word_id: usize) -> &Word {
        self.lexicon.word(self.graph.slot(slot_id).length, word_id)
    }

    pub fn word_for_choice(&self, choice: &Choice) -> &str {
        &self.word(choice.slot_id, choice.word_id).string
    }

    /// Turn the given fill choices into a rendered string: blocks as `#`, unfilled cells as `.`.
    pub fn render_grid(&self, choices: &[Choice]) -> String {
        let mut grid: Vec<Vec<char>> = (0..self.occupancy.height())
            .map(|row| {
                (0..self.occupancy.width())
                    .map(|col| {
                        if self.occupancy.is_open(Cell::new(row, col)) {
                            '.'
                        } else {
                            BLOCKED_CELL
                        }
                    })
                    .collect()
            })
            .collect();

        for choice in choices {
            let slot = self.graph.slot(choice.slot_id);
            let word = self.word(choice.slot_id, choice.word_id);

            for (&cell, &letter) in slot.cells.iter().zip(&word.letters) {
                grid[cell.row][cell.col] = letter_char(letter);
            }
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::error::ConfigError;
    use crate::types::Choice;
    use crate::word_list::WordList;

    use super::Puzzle;

    #[test]
    fn test_render_grid() {
        let puzzle = Puzzle::from_template(
            indoc! {"
                _##
                ___
            "},
            &WordList::from_words(["at", "cat", "bat", "rat", "tab"]),
        )
        .unwrap();

        assert_eq!(puzzle.render_grid(&[]), ".##\n...");

        // Slot 0 is the down slot at (0, 0); slot 1 is the across slot at (1, 0).
        let choices = [Choice { slot_id: 0, word_id: 0 }, Choice { slot_id: 1, word_id: 3 }];
        assert_eq!(puzzle.word_for_choice(&choices[1]), "tab");
        assert_eq!(puzzle.render_grid(&choices), "a##\ntab");
    }

    #[test]
    fn test_configuration_errors_surface_before_solving() {
        assert_eq!(
            Puzzle::from_template("___\n_\n", &WordList::from_words(["cat"])).unwrap_err(),
            ConfigError::RaggedGrid { row: 1, expected: 3, found: 1 }
        );
        assert_eq!(
            Puzzle::from_template("___", &WordList::default()).unwrap_err(),
            ConfigError::EmptyWordList
        );
    }
}
