use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use bit_set::BitSet;
use smallvec::SmallVec;

use crate::error::ConfigError;
use crate::grid::{scan_slots, Occupancy, SlotGeometry};
use crate::lexicon::Lexicon;
use crate::types::{Cell, Direction, SlotId};
use crate::MAX_SLOT_LENGTH;

/// A struct representing a crossing between one slot and another, referencing the other slot's id,
/// the shared cell, and the location of that cell within each slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub cell: Cell,
    pub cell_idx: usize,
    pub other_slot_cell: usize,
}

/// A word-shaped run of open cells, along with the words it may still take.
#[derive(Clone)]
pub struct Slot {
    pub id: SlotId,
    pub start_cell: Cell,
    pub direction: Direction,
    pub length: usize,
    pub cells: SmallVec<[Cell; MAX_SLOT_LENGTH]>,

    /// Ids of the words (within the word class for `length`) still available to this slot.
    pub domain: BitSet,

    pub crossings: SmallVec<[Crossing; MAX_SLOT_LENGTH]>,
}

impl Debug for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("id", &self.id)
            .field("start_cell", &self.start_cell)
            .field("direction", &self.direction)
            .field("length", &self.length)
            .field("domain_size", &self.domain.len())
            .field("crossings", &self.crossings)
            .finish()
    }
}

impl Slot {
    /// The cell shared with the given slot, if the two cross.
    pub fn overlap(&self, other_slot_id: SlotId) -> Option<Cell> {
        self.crossing_with(other_slot_id).map(|crossing| crossing.cell)
    }

    pub fn crossing_with(&self, other_slot_id: SlotId) -> Option<&Crossing> {
        self.crossings.iter().find(|crossing| crossing.other_slot_id == other_slot_id)
    }

    /// Neighbor slot ids mapped to the cell each one shares with this slot.
    pub fn neighbors(&self) -> impl Iterator<Item = (SlotId, Cell)> + '_ {
        self.crossings.iter().map(|crossing| (crossing.other_slot_id, crossing.cell))
    }

    pub fn index_of_cell(&self, cell: Cell) -> Option<usize> {
        self.cells.iter().position(|&c| c == cell)
    }
}

/// The slots of a grid and the crossings between them. Slots live in an arena addressed by
/// `SlotId`.
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    pub slots: Vec<Slot>,
    slot_ids_by_key: HashMap<(Cell, Direction), SlotId>,
}

impl ConstraintGraph {
    /// Build the graph for a grid, seeding each slot's domain with every word of its length.
    pub fn from_grid(occupancy: &Occupancy, lexicon: &Lexicon) -> Result<ConstraintGraph, ConfigError> {
        Self::from_geometry(scan_slots(occupancy), lexicon)
    }

    pub fn from_geometry(
        geometry: Vec<SlotGeometry>,
        lexicon: &Lexicon,
    ) -> Result<ConstraintGraph, ConfigError> {
        let slots = geometry
            .into_iter()
            .enumerate()
            .map(|(id, SlotGeometry { start_cell, direction, cells })| {
                let length = cells.len();
                if !lexicon.has_length(length) {
                    return Err(ConfigError::NoWordsOfLength { slot_id: id, length });
                }

                Ok(Slot {
                    id,
                    start_cell,
                    direction,
                    length,
                    cells,
                    domain: (0..lexicon.class_size(length)).collect(),
                    crossings: SmallVec::new(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let slot_ids_by_key = slots
            .iter()
            .map(|slot| ((slot.start_cell, slot.direction), slot.id))
            .collect();

        let mut graph = ConstraintGraph { slots, slot_ids_by_key };
        graph.compute_overlaps();
        Ok(graph)
    }

    /// Fill in the crossings for every slot by bucketing slots by the cells they cover. Two
    /// straight slots share at most one cell, and a cell belongs to at most one slot per direction.
    fn compute_overlaps(&mut self) {
        let mut entries_by_cell: HashMap<Cell, SmallVec<[(SlotId, usize); 2]>> = HashMap::new();

        for slot in &self.slots {
            for (cell_idx, &cell) in slot.cells.iter().enumerate() {
                entries_by_cell.entry(cell).or_default().push((slot.id, cell_idx));
            }
        }

        for slot in &mut self.slots {
            slot.crossings.clear();
        }

        for (cell, entries) in entries_by_cell {
            if entries.len() > 2 {
                panic!("More than two slots crossing in cell {cell}?");
            }
            if let &[(slot_id, cell_idx), (other_slot_id, other_slot_cell)] = entries.as_slice() {
                self.slots[slot_id].crossings.push(Crossing {
                    other_slot_id,
                    cell,
                    cell_idx,
                    other_slot_cell,
                });
                self.slots[other_slot_id].crossings.push(Crossing {
                    other_slot_id: slot_id,
                    cell,
                    cell_idx: other_slot_cell,
                    other_slot_cell: cell_idx,
                });
            }
        }

        // Keep crossings in cell order so iteration doesn't depend on hashing.
        for slot in &mut self.slots {
            slot.crossings.sort_by_key(|crossing| crossing.cell_idx);
        }
    }

    pub fn slot_id(&self, start_cell: Cell, direction: Direction) -> Option<SlotId> {
        self.slot_ids_by_key.get(&(start_cell, direction)).copied()
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        &self.slots[slot_id]
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Snapshot of every slot's domain, indexed by slot id.
    pub fn domains(&self) -> Vec<BitSet> {
        self.slots.iter().map(|slot| slot.domain.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::error::ConfigError;
    use crate::grid::Occupancy;
    use crate::lexicon::Lexicon;
    use crate::types::{Cell, Direction};
    use crate::word_list::WordList;

    use super::ConstraintGraph;

    fn lexicon() -> Lexicon {
        Lexicon::from_word_list(&WordList::from_words(["at", "cat", "bat", "rat", "tab", "arabs"]))
            .unwrap()
    }

    fn graph() -> ConstraintGraph {
        let occupancy = Occupancy::parse(indoc! {"
            #___#
            _#___
            _#__#
            ___##
            ##_##
        "})
        .unwrap();
        ConstraintGraph::from_grid(&occupancy, &lexicon()).expect("Failed to build graph")
    }

    #[test]
    fn test_domains_are_seeded_by_length() {
        let graph = graph();
        let domain_sizes: Vec<_> = graph.slots.iter().map(|slot| slot.domain.len()).collect();
        assert_eq!(domain_sizes, vec![4, 1, 4, 4, 4, 1, 4]);
    }

    #[test]
    fn test_neighbors() {
        let graph = graph();
        let id = |row, col, direction| graph.slot_id(Cell::new(row, col), direction).unwrap();

        let down = graph.slot(id(0, 2, Direction::Down));
        let mut neighbors: Vec<_> = down.neighbors().collect();
        neighbors.sort();
        assert_eq!(
            neighbors,
            vec![
                (id(0, 1, Direction::Across), Cell::new(0, 2)),
                (id(1, 2, Direction::Across), Cell::new(1, 2)),
                (id(2, 2, Direction::Across), Cell::new(2, 2)),
                (id(3, 0, Direction::Across), Cell::new(3, 2)),
            ]
        );

        let lonely = graph.slot(id(1, 0, Direction::Down));
        assert_eq!(
            lonely.neighbors().collect::<Vec<_>>(),
            vec![(id(3, 0, Direction::Across), Cell::new(3, 0))]
        );
    }

    #[test]
    fn test_overlaps_are_symmetric() {
        let graph = graph();

        for slot in &graph.slots {
            assert_eq!(slot.overlap(slot.id), None);

            for crossing in &slot.crossings {
                let other = graph.slot(crossing.other_slot_id);
                assert_eq!(other.overlap(slot.id), Some(crossing.cell));
                assert_eq!(slot.cells[crossing.cell_idx], crossing.cell);
                assert_eq!(other.cells[crossing.other_slot_cell], crossing.cell);
                assert_eq!(slot.index_of_cell(crossing.cell), Some(crossing.cell_idx));
            }
        }

        let across = graph.slot_id(Cell::new(0, 1), Direction::Across).unwrap();
        let lonely = graph.slot_id(Cell::new(1, 0), Direction::Down).unwrap();
        assert_eq!(graph.slot(across).overlap(lonely), None);
    }

    #[test]
    fn test_missing_length_class() {
        let occupancy = Occupancy::parse("____").unwrap();
        assert_eq!(
            ConstraintGraph::from_grid(&occupancy, &lexicon()).unwrap_err(),
            ConfigError::NoWordsOfLength { slot_id: 0, length: 4 }
        );
    }
}
