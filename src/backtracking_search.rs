use std::error::Error;
use std::fmt::{Display, Formatter};

use bit_set::BitSet;
use instant::{Duration, Instant};
use log::{debug, info, trace};

use crate::arc_consistency::{
    establish_arc_consistency, propagate, ArcQueue, DomainTrail, PropagationCounts, SupportCheck,
};
use crate::constraint_graph::Slot;
use crate::lexicon::Lexicon;
use crate::puzzle::Puzzle;
use crate::types::{Choice, SlotId, WordId};

/// Picks which unassigned slot to fill next. `assignment` is indexed by slot id.
pub trait SlotSelector {
    fn select(&self, slots: &[Slot], assignment: &[Option<WordId>]) -> Option<SlotId>;
}

fn unassigned<'a>(
    slots: &'a [Slot],
    assignment: &'a [Option<WordId>],
) -> impl Iterator<Item = &'a Slot> + 'a {
    slots.iter().filter(move |slot| assignment[slot.id].is_none())
}

/// Fill slots in the order they appear in the grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstUnassigned;

impl SlotSelector for FirstUnassigned {
    fn select(&self, slots: &[Slot], assignment: &[Option<WordId>]) -> Option<SlotId> {
        unassigned(slots, assignment).next().map(|slot| slot.id)
    }
}

/// Fill whichever slot has the fewest remaining options, breaking ties by grid order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MostConstrained;

impl SlotSelector for MostConstrained {
    fn select(&self, slots: &[Slot], assignment: &[Option<WordId>]) -> Option<SlotId> {
        unassigned(slots, assignment)
            .min_by_key(|slot| slot.domain.len())
            .map(|slot| slot.id)
    }
}

/// The "dom/ddeg" heuristic: take the number of remaining options for each slot, divide it by the
/// number of unfilled slots it crosses, and fill whichever slot has the lowest resulting value.
/// Slots that cross nothing unfilled go last.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomOverDegree;

impl DomOverDegree {
    fn priority(slot: &Slot, assignment: &[Option<WordId>]) -> u64 {
        let dom = slot.domain.len() as u64 * 1000;
        let ddeg = slot
            .crossings
            .iter()
            .filter(|crossing| assignment[crossing.other_slot_id].is_none())
            .count() as u64;

        if ddeg == 0 {
            u64::MAX
        } else {
            dom / ddeg
        }
    }
}

impl SlotSelector for DomOverDegree {
    fn select(&self, slots: &[Slot], assignment: &[Option<WordId>]) -> Option<SlotId> {
        unassigned(slots, assignment)
            .min_by_key(|slot| Self::priority(slot, assignment))
            .map(|slot| slot.id)
    }
}

/// The built-in slot selection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionStrategy {
    FirstUnassigned,
    #[default]
    MostConstrained,
    DomOverDegree,
}

impl SelectionStrategy {
    pub fn selector(self) -> &'static dyn SlotSelector {
        match self {
            SelectionStrategy::FirstUnassigned => &FirstUnassigned,
            SelectionStrategy::MostConstrained => &MostConstrained,
            SelectionStrategy::DomOverDegree => &DomOverDegree,
        }
    }
}

/// Settings for a fill run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOptions {
    pub selection: SelectionStrategy,
    pub support_check: SupportCheck,

    /// Make the whole grid arc-consistent before choosing anything.
    pub initial_arc_consistency: bool,

    /// May the same word fill more than one slot?
    pub allow_duplicate_words: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        FillOptions {
            selection: SelectionStrategy::default(),
            support_check: SupportCheck::default(),
            initial_arc_consistency: true,
            allow_duplicate_words: true,
        }
    }
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: u64,
    pub backtracks: u64,
    pub revisions: u64,
    pub pruned: u64,
    pub duration: Duration,
}

/// A struct representing the results of a fill operation.
#[derive(Debug, Clone)]
pub struct FillSuccess {
    pub statistics: Statistics,

    /// One choice per slot, in the order they were made.
    pub choices: Vec<Choice>,
}

impl FillSuccess {
    /// The chosen word for every slot, ordered by slot id.
    pub fn words<'a>(&self, puzzle: &'a Puzzle) -> Vec<(SlotId, &'a str)> {
        let mut words: Vec<_> = self
            .choices
            .iter()
            .map(|choice| (choice.slot_id, puzzle.word_for_choice(choice)))
            .collect();
        words.sort_by_key(|&(slot_id, _)| slot_id);
        words
    }
}

/// Every option was exhausted without finding a complete fill.
#[derive(Debug, Clone)]
pub struct FillFailure {
    pub statistics: Statistics,
}

impl Display for FillFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "No fill exists ({} states explored)", self.statistics.states)
    }
}

impl Error for FillFailure {}

/// Live state of one fill run. Domains are a private copy of the puzzle's, so the puzzle itself is
/// never modified.
struct Search<'a> {
    lexicon: &'a Lexicon,
    options: &'a FillOptions,
    selector: &'a dyn SlotSelector,
    slots: Vec<Slot>,
    assignment: Vec<Option<WordId>>,
    choices: Vec<Choice>,
    trail: DomainTrail,
    counts: PropagationCounts,
    statistics: Statistics,
}

impl<'a> Search<'a> {
    /// Does this word agree with every crossing slot that's already filled?
    fn agrees_with_assigned_neighbors(&self, slot_id: SlotId, word_id: WordId) -> bool {
        let slot = &self.slots[slot_id];
        let word = self.lexicon.word(slot.length, word_id);

        slot.crossings.iter().all(|crossing| {
            match self.assignment[crossing.other_slot_id] {
                Some(other_word_id) => {
                    let other_length = self.slots[crossing.other_slot_id].length;
                    let other_word = self.lexicon.word(other_length, other_word_id);
                    other_word.letters[crossing.other_slot_cell] == word.letters[crossing.cell_idx]
                }
                None => true,
            }
        })
    }

    /// Record the choice, collapse the slot's domain to it, and propagate. Returns false if some
    /// slot ran out of options; the caller is responsible for rolling back either way.
    fn commit(&mut self, choice: Choice) -> bool {
        let Choice { slot_id, word_id } = choice;
        let length = self.slots[slot_id].length;
        trace!("Trying {:?} for slot {}", self.lexicon.word(length, word_id).string, slot_id);

        let mut collapsed = BitSet::with_capacity(self.lexicon.class_size(length));
        collapsed.insert(word_id);
        self.trail.save(slot_id, &self.slots[slot_id].domain);
        self.slots[slot_id].domain = collapsed;
        self.assignment[slot_id] = Some(word_id);
        self.choices.push(choice);

        let mut queue = ArcQueue::new();
        queue.enqueue_dependents(&self.slots, slot_id);

        if !self.options.allow_duplicate_words && !self.eliminate_duplicates(choice, &mut queue) {
            return false;
        }

        propagate(
            self.lexicon,
            &mut self.slots,
            &mut queue,
            self.options.support_check,
            Some(&mut self.trail),
            &mut self.counts,
        )
        .is_ok()
    }

    /// Remove the chosen word from every other unfilled slot of the same length, queueing the
    /// slots that changed. Returns false if that empties a slot.
    fn eliminate_duplicates(&mut self, choice: Choice, queue: &mut ArcQueue) -> bool {
        let lexicon = self.lexicon;
        let length = self.slots[choice.slot_id].length;
        let words = &lexicon.word_class(length).words;
        let chosen = &words[choice.word_id].string;

        for other_slot_id in 0..self.slots.len() {
            let other_slot = &self.slots[other_slot_id];
            if other_slot.length != length || self.assignment[other_slot_id].is_some() {
                continue;
            }

            let dupes: BitSet = other_slot
                .domain
                .iter()
                .filter(|&word_id| &words[word_id].string == chosen)
                .collect();
            if dupes.is_empty() {
                continue;
            }

            self.trail.save(other_slot_id, &other_slot.domain);
            self.slots[other_slot_id].domain.difference_with(&dupes);
            self.counts.pruned += dupes.len() as u64;

            if self.slots[other_slot_id].domain.is_empty() {
                return false;
            }
            queue.enqueue_dependents(&self.slots, other_slot_id);
        }

        true
    }

    fn retract(&mut self, slot_id: SlotId, mark: usize) {
        self.trail.undo_to(mark, &mut self.slots);
        self.assignment[slot_id] = None;
        self.choices.pop();
    }

    /// Fill the remaining slots, returning true once every slot has a word. On false, all state is
    /// as it was when called.
    fn search(&mut self) -> bool {
        let Some(slot_id) = self.selector.select(&self.slots, &self.assignment) else {
            return true;
        };
        self.statistics.states += 1;

        // Options are tried in domain order; a value-ordering heuristic would sort this list.
        let options: Vec<WordId> = self.slots[slot_id].domain.iter().collect();

        for word_id in options {
            if !self.agrees_with_assigned_neighbors(slot_id, word_id) {
                continue;
            }

            let mark = self.trail.mark();
            if self.commit(Choice { slot_id, word_id }) && self.search() {
                return true;
            }

            self.retract(slot_id, mark);
            self.statistics.backtracks += 1;
        }

        debug!("Exhausted options for slot {slot_id}");
        false
    }
}

/// Search for a valid fill for the given puzzle.
pub fn find_fill(puzzle: &Puzzle, options: &FillOptions) -> Result<FillSuccess, FillFailure> {
    find_fill_with_selector(puzzle, options, options.selection.selector())
}

/// Search for a valid fill, choosing slots with a custom selector instead of `options.selection`.
pub fn find_fill_with_selector(
    puzzle: &Puzzle,
    options: &FillOptions,
    selector: &dyn SlotSelector,
) -> Result<FillSuccess, FillFailure> {
    let start = Instant::now();
    info!("Filling {} slots with {:?}", puzzle.graph.len(), options);

    let mut search = Search {
        lexicon: &puzzle.lexicon,
        options,
        selector,
        slots: puzzle.graph.slots.clone(),
        assignment: vec![None; puzzle.graph.len()],
        choices: Vec::with_capacity(puzzle.graph.len()),
        trail: DomainTrail::new(),
        counts: PropagationCounts::default(),
        statistics: Statistics::default(),
    };

    let consistent = if options.initial_arc_consistency {
        match establish_arc_consistency(search.lexicon, &mut search.slots, options.support_check) {
            Ok(counts) => {
                search.counts = counts;
                true
            }
            Err(exhausted) => {
                info!("Slot {} has no consistent options", exhausted.slot_id);
                false
            }
        }
    } else {
        true
    };

    let found = consistent && search.search();

    let mut statistics = search.statistics;
    statistics.revisions = search.counts.revisions;
    statistics.pruned = search.counts.pruned;
    statistics.duration = start.elapsed();

    if found {
        info!("Found fill: {:?}", statistics);
        Ok(FillSuccess { statistics, choices: search.choices })
    } else {
        info!("No fill found: {:?}", statistics);
        Err(FillFailure { statistics })
    }
}
