//! Resolution-proof reconstruction for UNSAT results (spec §4.4.7). An
//! append-only, self-contained log: each step stores the two parent
//! clauses' literals directly rather than a reference into the clause
//! arena, so a later restart's learnt-clause pruning can never invalidate
//! an already-recorded step. Grounded in the teacher's own DRUP listener
//! (`cdcl::clause::DrupListener`, which already writes every learnt clause
//! to a proof file as clauses are pushed) generalized from a write-only
//! DRUP file into a structured in-memory log that also records the two
//! resolution parents and the pivot variable per step, since DRUP alone
//! only names the derived clause.

use crate::cnf::{Lit, VarId};

/// One binary-resolution derivation: `parents.0` and `parents.1` resolved
/// on `pivot` produce `derived`. `pivot` is `None` only for the degenerate
/// case of a clause that is the empty clause directly at intake (spec
/// §4.5), which is not itself a resolution step.
#[derive(Debug, Clone)]
pub struct ProofStep {
    pub parents: (Vec<Lit>, Vec<Lit>),
    pub pivot: Option<VarId>,
    pub derived: Vec<Lit>,
}

#[derive(Debug, Clone, Default)]
pub struct Proof {
    pub steps: Vec<ProofStep>,
}

impl Proof {
    pub fn new() -> Proof {
        Proof { steps: Vec::new() }
    }

    pub fn record(&mut self, parent1: Vec<Lit>, parent2: Vec<Lit>, pivot: Option<VarId>, derived: Vec<Lit>) {
        self.steps.push(ProofStep { parents: (parent1, parent2), pivot, derived });
    }

    /// A proof is a valid refutation iff it is non-empty and its last step
    /// derives the empty clause (spec §4.4.7 "terminated by the empty
    /// clause").
    pub fn is_refutation(&self) -> bool {
        match self.steps.last() {
            Some(step) => step.derived.is_empty(),
            None => false,
        }
    }

    /// Renders the proof as a numbering-free sequence of clauses in
    /// symbolic form, with the atom-id mapping inverted and the empty
    /// clause rendered as `[]` (spec §4.4.7).
    fn clause_str(lits: &[Lit], atom_names: &[String]) -> String {
        if lits.is_empty() {
            return "[]".to_string();
        }
        lits.iter()
            .map(|&l| {
                let name = &atom_names[(l.var() - 1) as usize];
                if l.sign() { name.clone() } else { format!("!{}", name) }
            })
            .collect::<Vec<_>>()
            .join(" \u{2228} ")
    }

    pub fn render(&self, atom_names: &[String]) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let pivot_str = match step.pivot {
                Some(var) => atom_names[(var - 1) as usize].clone(),
                None => "-".to_string(),
            };
            out.push_str(&format!(
                "({}) , ({}) |-[{}] {}\n",
                Self::clause_str(&step.parents.0, atom_names),
                Self::clause_str(&step.parents.1, atom_names),
                pivot_str,
                Self::clause_str(&step.derived, atom_names),
            ));
        }
        out
    }
}
