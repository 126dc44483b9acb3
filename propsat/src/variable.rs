//! The trail: a stack of decision levels, each an ordered sequence of
//! assignments (spec §3 "Trail"). Grounded in the teacher's
//! `cdcl::variable::{Assignment, AssignmentType}`, renamed to the spec's own
//! `Decision`/`Implied` vocabulary and with `AssignmentType::Known` dropped
//! (spec.md's trail has no notion of a variable known ahead of intake).

use std::collections::HashSet;

use crate::clause::ClauseId;
use crate::cnf::VarId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentKind {
    Decision,
    Implied(ClauseId),
}

#[derive(Debug, Clone, Copy)]
pub struct Assignment {
    pub value: bool,
    pub kind: AssignmentKind,
    pub level: usize,
}

/// Per-variable assignment, in-order stack and per-level grouping. Level 0
/// is created in [`Trail::new`] and is never popped (spec §3).
pub struct Trail {
    assignment: Vec<Option<Assignment>>,
    /// Remembered last-assigned polarity, default `false` (spec §4.4.5).
    phase: Vec<bool>,
    /// Flat assignment-order stack, oldest first.
    order: Vec<VarId>,
    /// `levels[l]` lists the variables assigned at decision level `l`, in
    /// assignment order; `levels[l][0]` is the decision when `l > 0`.
    levels: Vec<Vec<VarId>>,
}

impl Trail {
    pub fn new(num_vars: u32) -> Trail {
        Trail {
            assignment: vec![None; num_vars as usize],
            phase: vec![false; num_vars as usize],
            order: Vec::new(),
            levels: vec![Vec::new()],
        }
    }

    pub fn current_level(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn value_of(&self, var: VarId) -> Option<bool> {
        self.assignment[(var - 1) as usize].map(|a| a.value)
    }

    pub fn is_assigned(&self, var: VarId) -> bool {
        self.assignment[(var - 1) as usize].is_some()
    }

    pub fn assignment_of(&self, var: VarId) -> Option<Assignment> {
        self.assignment[(var - 1) as usize]
    }

    pub fn level_of(&self, var: VarId) -> Option<usize> {
        self.assignment[(var - 1) as usize].map(|a| a.level)
    }

    pub fn last_phase(&self, var: VarId) -> bool {
        self.phase[(var - 1) as usize]
    }

    pub fn assigned_count(&self) -> usize {
        self.order.len()
    }

    pub fn num_vars(&self) -> u32 {
        self.assignment.len() as u32
    }

    /// Assignment order, oldest first; used by conflict analysis to find
    /// "the variable most recently added to the trail" (spec §4.4.3).
    pub fn order(&self) -> &[VarId] {
        &self.order
    }

    /// Ids of every clause currently serving as the antecedent of an
    /// `Implied` assignment still on the trail. A restart's subsumption
    /// sweep over the learnt set (spec §4.4.6 step 3) must never drop one of
    /// these: the trail invariant (spec §3 "Trail") requires an antecedent
    /// reference to stay valid until its variable is unassigned, and a
    /// level-0 assignment is never unassigned by a restart's backjump.
    pub fn locked_antecedents(&self) -> HashSet<ClauseId> {
        self.assignment
            .iter()
            .filter_map(|a| match a {
                Some(Assignment { kind: AssignmentKind::Implied(id), .. }) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Opens a new decision level (spec §4.4.1 "open a new decision
    /// level").
    pub fn new_decision_level(&mut self) {
        self.levels.push(Vec::new());
    }

    /// Records an assignment at the current decision level.
    pub fn assign(&mut self, var: VarId, value: bool, kind: AssignmentKind) {
        debug_assert!(!self.is_assigned(var));
        let level = self.current_level();
        self.assignment[(var - 1) as usize] = Some(Assignment { value, kind, level });
        self.phase[(var - 1) as usize] = value;
        self.order.push(var);
        self.levels.last_mut().expect("level 0 always present").push(var);
    }

    /// Pops trail entries down to (and including) `level + 1`, atomically
    /// discarding each popped variable's kind, level and antecedent (spec
    /// §4.4.4). Level 0 is never popped. Returns the variables that were
    /// unassigned, so the VSIDS queue can be re-seeded for them.
    pub fn backjump_to(&mut self, level: usize) -> Vec<VarId> {
        let mut unassigned = Vec::new();
        while self.current_level() > level {
            let popped = self.levels.pop().expect("level 0 always present");
            for var in popped {
                self.assignment[(var - 1) as usize] = None;
                unassigned.push(var);
            }
        }
        let remaining: usize = self.levels.iter().map(Vec::len).sum();
        self.order.truncate(remaining);
        unassigned
    }
}
