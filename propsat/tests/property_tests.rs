//! Property-based tests required by spec §8: random CNF vs. a brute-force
//! decider for `N <= 10`, an assignment-model check on every SAT output, and
//! a proof-replay check on every UNSAT output. Grounded in the teacher's own
//! `solver/tests/sat_solving_test.rs`, which drives `proptest!` over
//! generated CNF instances and cross-checks against a reference solver
//! (`CadicalSolver` there); `propsat` has no bundled reference solver, so the
//! reference here is a brute-force decider over the small variable counts
//! these properties restrict themselves to.

use std::collections::HashSet;

use proptest::prelude::*;

use propsat::cnf::{Cnf, CnfClause, Lit};
use propsat::{Config, SolveOutcome, Solver};

const MAX_VARS: u32 = 10;

fn cnf_strategy() -> impl Strategy<Value = Cnf> {
    (1u32..=MAX_VARS).prop_flat_map(|num_vars| {
        let lit = (1..=num_vars).prop_flat_map(move |v| any::<bool>().prop_map(move |sign| Lit::new(v, sign)));
        let clause = prop::collection::vec(lit, 1..=4).prop_map(|lits| {
            // Drop duplicate/tautological literals the same way intake does
            // (spec §3 invariants (i), (ii)); an empty result after cleanup
            // is dropped too, since a generated empty clause would trivially
            // force UNSAT and defeat the point of varying the formula.
            let mut seen: Vec<Lit> = Vec::new();
            for l in lits {
                if seen.contains(&l) || seen.contains(&-l) {
                    continue;
                }
                seen.push(l);
            }
            CnfClause(seen)
        });
        prop::collection::vec(clause, 1..=8).prop_map(move |clauses| {
            let clauses: Vec<CnfClause> = clauses.into_iter().filter(|c| !c.is_empty()).collect();
            let atom_names = (1..=num_vars).map(|v| format!("p{}", v)).collect();
            Cnf { clauses, num_vars, atom_names: atom_names, num_original_atoms: num_vars }
        })
    })
}

/// Exhaustive decider over `2^num_vars` assignments — exact, not a heuristic,
/// which is the point of using it as ground truth for `N <= 10`.
fn brute_force_sat(cnf: &Cnf) -> bool {
    let n = cnf.num_vars;
    'assignments: for bits in 0u32..(1u32 << n) {
        for clause in &cnf.clauses {
            let mut satisfied = false;
            for lit in &clause.0 {
                let value = bits & (1 << (lit.var() - 1)) != 0;
                if value == lit.sign() {
                    satisfied = true;
                    break;
                }
            }
            if !satisfied {
                continue 'assignments;
            }
        }
        return true;
    }
    false
}

fn model_satisfies(cnf: &Cnf, model: &propsat::solver::Model) -> bool {
    let values: std::collections::HashMap<&str, bool> =
        model.0.iter().map(|(name, value)| (name.as_str(), *value)).collect();
    cnf.clauses.iter().all(|clause| {
        clause.0.iter().any(|lit| {
            let name = &cnf.atom_names[(lit.var() - 1) as usize];
            values[name.as_str()] == lit.sign()
        })
    })
}

/// Binary resolution of `a` and `b` on `pivot`, mirroring
/// `propsat::solver`'s private `resolve` (spec §4.4.3 step 2b) — duplicated
/// here deliberately, since a proof-replay check must recompute the step
/// independently rather than trust the solver's own arithmetic.
fn resolve(a: &[Lit], b: &[Lit], pivot: u32) -> HashSet<Lit> {
    a.iter().chain(b.iter()).filter(|l| l.var() != pivot).copied().collect()
}

fn replay_proof(proof: &propsat::proof::Proof) -> bool {
    for step in &proof.steps {
        match step.pivot {
            None => {
                // Degenerate case: the empty clause was present at intake,
                // not derived (spec §4.5). Only valid as the sole step.
                if !step.derived.is_empty() {
                    return false;
                }
            }
            Some(pivot) => {
                let expected: HashSet<Lit> = resolve(&step.parents.0, &step.parents.1, pivot);
                let actual: HashSet<Lit> = step.derived.iter().copied().collect();
                if expected != actual {
                    return false;
                }
            }
        }
    }
    match proof.steps.last() {
        Some(step) => step.derived.is_empty(),
        None => false,
    }
}

proptest! {
    #[test]
    fn solver_agrees_with_brute_force(cnf in cnf_strategy()) {
        let expected_sat = brute_force_sat(&cnf);
        let outcome = Solver::new(&cnf, Config::default()).solve();
        match outcome {
            SolveOutcome::Satisfiable(_, _) => prop_assert!(expected_sat),
            SolveOutcome::Unsatisfiable(_, _) => prop_assert!(!expected_sat),
            SolveOutcome::Timeout(_) => prop_assert!(false, "no deadline was configured"),
        }
    }

    #[test]
    fn sat_model_satisfies_every_original_clause(cnf in cnf_strategy()) {
        if let SolveOutcome::Satisfiable(model, _) = Solver::new(&cnf, Config::default()).solve() {
            prop_assert!(model_satisfies(&cnf, &model));
        }
    }

    #[test]
    fn unsat_proof_replays_to_the_empty_clause(cnf in cnf_strategy()) {
        if let SolveOutcome::Unsatisfiable(proof, _) = Solver::new(&cnf, Config::default()).solve() {
            prop_assert!(replay_proof(&proof));
        }
    }

    #[test]
    fn solver_agrees_with_brute_force_no_restart_no_subsumption(cnf in cnf_strategy()) {
        let config = Config { use_restart: false, use_subsumption: false, ..Config::default() };
        let expected_sat = brute_force_sat(&cnf);
        let outcome = Solver::new(&cnf, config).solve();
        match outcome {
            SolveOutcome::Satisfiable(_, _) => prop_assert!(expected_sat),
            SolveOutcome::Unsatisfiable(_, _) => prop_assert!(!expected_sat),
            SolveOutcome::Timeout(_) => prop_assert!(false, "no deadline was configured"),
        }
    }
}
