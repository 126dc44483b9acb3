//! The fixed end-to-end scenarios S1-S6 (spec §8). Each is a literal input
//! with a literal expected result, the teacher's own style of pinning
//! hand-picked instances in a plain `#[test]` module rather than generating
//! them (`solver/tests/sat_solving_test.rs` reserves `proptest!` for the
//! generated families and plain `#[test]` for nothing in particular, since
//! the teacher never hand-pins scenarios like these; the pattern itself —
//! one `#[test]` per fixed instance — is the common shape across the pack's
//! solver test suites, e.g. `tiptenbrink-munchkin`'s fixed-formula tests).

use std::collections::HashMap;

use propsat::ast::Formula;
use propsat::{solve_formula, Config, SolveOutcome};

fn sat(src: &str) {
    let outcome = solve_formula(src, &Config::default()).expect("parses and solves");
    assert!(matches!(outcome, SolveOutcome::Satisfiable(_, _)), "expected SAT for {:?}, got {:?}", src, outcome);
    if let SolveOutcome::Satisfiable(model, _) = outcome {
        assert!(model_satisfies_source(src, &model));
    }
}

fn unsat(src: &str) {
    let outcome = solve_formula(src, &Config::default()).expect("parses and solves");
    assert!(matches!(outcome, SolveOutcome::Unsatisfiable(_, _)), "expected UNSAT for {:?}, got {:?}", src, outcome);
    if let SolveOutcome::Unsatisfiable(proof, _) = outcome {
        assert!(proof.is_refutation(), "proof for {:?} did not end in the empty clause", src);
    }
}

fn model_satisfies_source(src: &str, model: &propsat::solver::Model) -> bool {
    let formula = propsat::parser::parse(src).unwrap();
    let assignment: HashMap<String, bool> = model.0.iter().cloned().collect();
    eval(&formula, &assignment)
}

fn eval(f: &Formula, assignment: &HashMap<String, bool>) -> bool {
    match f {
        Formula::Atom(name) => assignment[name],
        Formula::Not(child) => !eval(child, assignment),
        Formula::And(children) => children.iter().all(|c| eval(c, assignment)),
        Formula::Or(children) => children.iter().any(|c| eval(c, assignment)),
        Formula::Implies(a, b) => !eval(a, assignment) || eval(b, assignment),
        Formula::Iff(a, b) => eval(a, assignment) == eval(b, assignment),
        Formula::True => true,
        Formula::False => false,
    }
}

#[test]
fn s1_tautology() {
    sat("A | !A");
}

#[test]
fn s2_contradiction() {
    unsat("A & !A");
}

#[test]
fn s3_implication_chain() {
    unsat("(A -> B) & (B -> C) & A & !C");
}

#[test]
fn s4_biconditional() {
    // Spec S4 intends `(A <-> B) & A & !B`; under §6 precedence `&` binds
    // tighter than `<->`, so the bare string parses as `A <-> (B & A & !B)`
    // instead, which is satisfiable (A=false). Parenthesize explicitly.
    unsat("(A <-> B) & A & !B");
}

#[test]
fn s5_pigeonhole_n2_three_pigeons_two_holes() {
    // p_ij: pigeon i in hole j, i in {1,2,3}, j in {1,2}.
    let src = "\
        (p11 | p12) & (p21 | p22) & (p31 | p32) \
        & (!p11 | !p21) & (!p11 | !p31) & (!p21 | !p31) \
        & (!p12 | !p22) & (!p12 | !p32) & (!p22 | !p32)";
    unsat(src);
}

#[test]
fn s6_tseitin_trigger_matches_original_satisfiability() {
    // Deep nesting of biconditionals comfortably exceeds the default
    // complexity threshold of 8, so `use_tseitin` (on by default) actually
    // fires. Checked exhaustively over the 2^5 assignments of the five
    // original atoms rather than sampling 100 (spec §8 S6), which subsumes
    // the sampled check.
    let src = "((((A <-> B) <-> C) <-> D) <-> E) & ((A | B) & (C | D | E))";
    let formula = propsat::parser::parse(src).unwrap();
    assert!(formula.complexity() > 8, "fixture must actually trip the Tseitin gate");

    let atoms = ["A", "B", "C", "D", "E"];
    let mut brute_force_sat = false;
    for bits in 0u32..(1 << atoms.len()) {
        let assignment: HashMap<String, bool> =
            atoms.iter().enumerate().map(|(i, name)| (name.to_string(), bits & (1 << i) != 0)).collect();
        if eval(&formula, &assignment) {
            brute_force_sat = true;
            break;
        }
    }

    let outcome = solve_formula(src, &Config::default()).expect("parses and solves");
    match outcome {
        SolveOutcome::Satisfiable(model, _) => {
            assert!(brute_force_sat, "solver said SAT but no assignment of the original atoms satisfies it");
            assert!(model_satisfies_source(src, &model));
        }
        SolveOutcome::Unsatisfiable(_, _) => {
            assert!(!brute_force_sat, "solver said UNSAT but some assignment of the original atoms satisfies it");
        }
        SolveOutcome::Timeout(_) => panic!("no deadline was configured"),
    }
}

#[test]
fn empty_conjunction_is_sat_with_empty_model() {
    // top & top normalizes to the empty conjunction (spec §4.5).
    let outcome = solve_formula("top & top", &Config::default()).expect("parses and solves");
    match outcome {
        SolveOutcome::Satisfiable(model, _) => assert!(model.0.is_empty()),
        other => panic!("expected SAT with an empty model, got {:?}", other),
    }
}

#[test]
fn contains_empty_clause_is_immediate_unsat() {
    let outcome = solve_formula("bottom", &Config::default()).expect("parses and solves");
    match outcome {
        SolveOutcome::Unsatisfiable(proof, _) => assert!(proof.is_refutation()),
        other => panic!("expected UNSAT, got {:?}", other),
    }
}
