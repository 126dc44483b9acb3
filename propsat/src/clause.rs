//! Clause arenas: an immutable original set and an append/prune learnt set
//! (spec §3 "Formula", §5 "Clause storage is append-only for originals and
//! append-with-pruning for learnt"). Grounded in the teacher's
//! `cdcl::clause::{Clause, Clauses}`, with the two-watched-literal fields
//! dropped (propagation here does a full rescan, spec §4.4.2) and the
//! `DrupListener` dropped in favor of the structured in-memory proof log in
//! [`crate::proof`].

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use stable_vec::StableVec;

use crate::cnf::{Cnf, Lit};

pub type ClauseId = usize;

#[derive(Debug, Clone)]
pub struct Clause {
    pub literals: Vec<Lit>,
}

impl Clause {
    pub fn new(literals: Vec<Lit>) -> Clause {
        Clause { literals }
    }
}

/// Two arenas behind one id space: ids `< original.len()` index the
/// immutable original clauses; everything else indexes the learnt set.
/// Learnt clause ids stay stable across pruning because removed slots are
/// recycled through a free-index min-heap, exactly as
/// `cdcl::clause::Clauses` does.
pub struct ClauseArena {
    original: Vec<Clause>,
    learnt: StableVec<Clause>,
    free_learnt_indices: BinaryHeap<Reverse<usize>>,
    /// Ids of currently-live learnt clauses, in insertion order. Kept
    /// alongside the `StableVec` itself since the crate does not expose an
    /// index-yielding iterator; this is the source of truth for "which
    /// learnt ids currently exist".
    live_learnt_ids: Vec<ClauseId>,
}

impl ClauseArena {
    pub fn new(cnf: &Cnf) -> ClauseArena {
        let original = cnf.clauses.iter().map(|c| Clause::new(c.0.clone())).collect();
        ClauseArena {
            original,
            learnt: StableVec::new(),
            free_learnt_indices: BinaryHeap::new(),
            live_learnt_ids: Vec::new(),
        }
    }

    pub fn get(&self, id: ClauseId) -> &Clause {
        if id < self.original.len() {
            &self.original[id]
        } else {
            self.learnt.get(id - self.original.len()).expect("dangling learnt clause id")
        }
    }

    pub fn is_learnt(&self, id: ClauseId) -> bool {
        id >= self.original.len()
    }

    pub fn original_len(&self) -> usize {
        self.original.len()
    }

    pub fn learnt_len(&self) -> usize {
        self.learnt.num_elements()
    }

    /// Appends a clause to the learnt set, returning its (stable) id.
    pub fn learn(&mut self, literals: Vec<Lit>) -> ClauseId {
        let clause = Clause::new(literals);
        let offset = self.original.len();
        let id = if let Some(Reverse(index)) = self.free_learnt_indices.pop() {
            self.learnt.insert(index, clause);
            offset + index
        } else {
            offset + self.learnt.push(clause)
        };
        self.live_learnt_ids.push(id);
        id
    }

    pub fn original_ids(&self) -> impl Iterator<Item = ClauseId> {
        0..self.original.len()
    }

    /// Currently-live learnt clauses paired with their (stable) id.
    pub fn learnt_entries(&self) -> impl Iterator<Item = (ClauseId, &Clause)> {
        let offset = self.original.len();
        self.live_learnt_ids.iter().map(move |&id| {
            (id, self.learnt.get(id - offset).expect("live_learnt_ids tracks only live ids"))
        })
    }

    pub fn all_ids(&self) -> Vec<ClauseId> {
        let mut ids: Vec<ClauseId> = (0..self.original.len()).collect();
        ids.extend(self.live_learnt_ids.iter().copied());
        ids
    }

    /// Prunes exactly the given learnt-clause ids (the subsumption sweep run
    /// at every restart, spec §4.4.6 step 3), via targeted `StableVec`
    /// removal rather than a wholesale rebuild: surviving clauses keep their
    /// existing id, which a level-0 trail antecedent may still reference
    /// across the restart (the proof log itself never holds a clause id —
    /// it records literal vectors directly — but the trail does, via
    /// `AssignmentKind::Implied`).
    pub fn remove_learnt(&mut self, ids: &[ClauseId]) {
        let offset = self.original.len();
        for &id in ids {
            self.learnt.remove(id - offset).expect("id came from learnt_entries");
            self.free_learnt_indices.push(Reverse(id - offset));
        }
        self.live_learnt_ids.retain(|id| !ids.contains(id));
    }
}
