use std::collections::{HashSet, VecDeque};

use bit_set::BitSet;
use log::debug;

use crate::constraint_graph::Slot;
use crate::lexicon::{Lexicon, ALPHABET_SIZE};
use crate::types::{Letter, SlotId};

/// A directed constraint: make `slot_id` consistent with `other_slot_id` at their shared cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arc {
    pub slot_id: SlotId,
    pub other_slot_id: SlotId,
}

/// How a slot's word is judged to have support in a crossing slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupportCheck {
    /// Some word still in the crossing slot's domain has the same letter at the crossing.
    #[default]
    LiveDomain,

    /// Some word of the crossing slot's length has the same letter at the crossing, whether or
    /// not it's still in that slot's domain. This is weaker: it never looks at the other domain.
    FullClass,
}

/// Worklist of arcs to revise. An arc that's already waiting isn't added twice.
#[derive(Debug, Default)]
pub struct ArcQueue {
    queue: VecDeque<Arc>,
    queued: HashSet<Arc>,
}

impl ArcQueue {
    pub fn new() -> ArcQueue {
        ArcQueue::default()
    }

    /// A queue holding every arc in the graph, for a global consistency pass.
    pub fn with_all_arcs(slots: &[Slot]) -> ArcQueue {
        let mut queue = ArcQueue::new();
        for slot in slots {
            for crossing in &slot.crossings {
                queue.enqueue(Arc { slot_id: slot.id, other_slot_id: crossing.other_slot_id });
            }
        }
        queue
    }

    /// Enqueue the arcs pointing at `slot_id`, so that every crossing slot gets checked against
    /// its new domain.
    pub fn enqueue_dependents(&mut self, slots: &[Slot], slot_id: SlotId) {
        for crossing in &slots[slot_id].crossings {
            self.enqueue(Arc { slot_id: crossing.other_slot_id, other_slot_id: slot_id });
        }
    }

    pub fn enqueue(&mut self, arc: Arc) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }

    pub fn pop_front(&mut self) -> Option<Arc> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Undo log of domains overwritten during search. Entries are restored in reverse order, so a
/// slot saved more than once ends up with its oldest saved domain.
#[derive(Debug, Default)]
pub struct DomainTrail {
    entries: Vec<(SlotId, BitSet)>,
}

impl DomainTrail {
    pub fn new() -> DomainTrail {
        DomainTrail::default()
    }

    /// A position to later pass to `undo_to`.
    pub fn mark(&self) -> usize {
        self.entries.len()
    }

    pub fn save(&mut self, slot_id: SlotId, domain: &BitSet) {
        self.entries.push((slot_id, domain.clone()));
    }

    /// Restore every domain saved since `mark`.
    pub fn undo_to(&mut self, mark: usize, slots: &mut [Slot]) {
        while self.entries.len() > mark {
            if let Some((slot_id, domain)) = self.entries.pop() {
                slots[slot_id].domain = domain;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Propagation failed because this slot has no words left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainExhausted {
    pub slot_id: SlotId,
}

/// Work done by propagation, accumulated across calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationCounts {
    pub revisions: u64,
    pub pruned: u64,
}

/// Return the words in `arc.slot_id`'s domain that have no support in `arc.other_slot_id`.
fn unsupported_words(
    lexicon: &Lexicon,
    slots: &[Slot],
    arc: Arc,
    support_check: SupportCheck,
) -> BitSet {
    let slot = &slots[arc.slot_id];
    let other_slot = &slots[arc.other_slot_id];
    let crossing = slot.crossing_with(arc.other_slot_id).unwrap_or_else(|| {
        panic!("Arc between slots {} and {} that don't cross", arc.slot_id, arc.other_slot_id)
    });

    // Decide once per letter whether the crossing slot can put it in the shared cell; then
    // checking each word is a table lookup.
    let supported: [bool; ALPHABET_SIZE] = std::array::from_fn(|letter| {
        let candidates =
            lexicon.words_with_letter(other_slot.length, crossing.other_slot_cell, letter as Letter);

        match support_check {
            SupportCheck::LiveDomain => !candidates.is_disjoint(&other_slot.domain),
            SupportCheck::FullClass => !candidates.is_empty(),
        }
    });

    let words = &lexicon.word_class(slot.length).words;
    slot.domain
        .iter()
        .filter(|&word_id| !supported[words[word_id].letters[crossing.cell_idx] as usize])
        .collect()
}

/// Run AC-3 until the queue is empty. Whenever a slot's domain shrinks, every other slot crossing
/// it is re-queued. Fails as soon as any domain becomes empty, leaving the domains partially
/// pruned; when a trail is given, every domain is saved to it before it changes, so the caller can
/// roll back.
pub fn propagate(
    lexicon: &Lexicon,
    slots: &mut [Slot],
    queue: &mut ArcQueue,
    support_check: SupportCheck,
    mut trail: Option<&mut DomainTrail>,
    counts: &mut PropagationCounts,
) -> Result<(), DomainExhausted> {
    while let Some(arc) = queue.pop_front() {
        counts.revisions += 1;

        let removed = unsupported_words(lexicon, slots, arc, support_check);
        if removed.is_empty() {
            continue;
        }

        if let Some(trail) = trail.as_deref_mut() {
            trail.save(arc.slot_id, &slots[arc.slot_id].domain);
        }
        slots[arc.slot_id].domain.difference_with(&removed);
        counts.pruned += removed.len() as u64;

        if slots[arc.slot_id].domain.is_empty() {
            debug!("Slot {} exhausted while checking slot {}", arc.slot_id, arc.other_slot_id);
            return Err(DomainExhausted { slot_id: arc.slot_id });
        }

        for crossing in &slots[arc.slot_id].crossings {
            if crossing.other_slot_id != arc.other_slot_id {
                queue.enqueue(Arc { slot_id: crossing.other_slot_id, other_slot_id: arc.slot_id });
            }
        }
    }

    Ok(())
}

/// Make the whole graph arc-consistent, meaning every word left in every domain is compatible with
/// at least one word in each crossing slot's domain.
pub fn establish_arc_consistency(
    lexicon: &Lexicon,
    slots: &mut [Slot],
    support_check: SupportCheck,
) -> Result<PropagationCounts, DomainExhausted> {
    let mut counts = PropagationCounts::default();
    let mut queue = ArcQueue::with_all_arcs(slots);

    propagate(lexicon, slots, &mut queue, support_check, None, &mut counts)?;

    debug!(
        "Initial arc consistency: {} revisions, {} words pruned",
        counts.revisions, counts.pruned
    );
    Ok(counts)
}
