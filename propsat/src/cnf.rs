//! CNF normalizer (spec §4.1), Tseitin encoder (spec §4.2), and the numeric
//! clause model (spec §3, §2.5) that the CDCL core runs on.
//!
//! The normalizer and Tseitin encoder work over [`Formula`] nodes and named
//! literals (`(String, bool)` pairs); only the final step maps atom names to
//! dense integer ids, matching the dependency order in spec §2 ("leaves
//! first": AST -> normalizer -> Tseitin -> subsumption -> numeric model).

use std::fmt;

use indexmap::IndexMap;

use crate::ast::Formula;
use crate::config::Config;
use crate::error::SolveError;
use crate::subsumption;

/// A variable identifier: a positive integer in `[1, N]` (spec §3).
pub type VarId = u32;

/// A signed non-zero integer literal. `sign(l)` is its polarity,
/// `var(l) = |l|` (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(i32);

impl Lit {
    pub fn new(var: VarId, sign: bool) -> Lit {
        assert!(var != 0, "variable 0 is not a valid literal");
        Lit(if sign { var as i32 } else { -(var as i32) })
    }

    pub fn pos(var: VarId) -> Lit {
        Lit::new(var, true)
    }

    pub fn neg(var: VarId) -> Lit {
        Lit::new(var, false)
    }

    #[inline]
    pub fn var(self) -> VarId {
        self.0.unsigned_abs()
    }

    #[inline]
    pub fn sign(self) -> bool {
        self.0 > 0
    }
}

impl std::ops::Neg for Lit {
    type Output = Lit;
    fn neg(self) -> Lit {
        Lit(-self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clause: a sequence of literals with no duplicates and no variable
/// appearing with both polarities (spec §3 invariants (i), (ii)).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CnfClause(pub Vec<Lit>);

impl CnfClause {
    pub fn empty() -> CnfClause {
        CnfClause(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for CnfClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "[]");
        }
        write!(f, "(")?;
        for (i, lit) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{}", lit)?;
        }
        write!(f, ")")
    }
}

/// The frozen numeric clause model the CDCL core runs on: clauses of
/// [`Lit`], plus the atom-to-id mapping needed to render a model or a proof
/// back in terms of the original formula's atoms.
#[derive(Debug, Clone)]
pub struct Cnf {
    pub clauses: Vec<CnfClause>,
    pub num_vars: u32,
    /// Names in id order (`atom_names[i-1]` is the name of variable `i`).
    /// Original atoms occupy a contiguous prefix; any Tseitin auxiliary
    /// variables follow.
    pub atom_names: Vec<String>,
    pub num_original_atoms: u32,
}

/// Removes a literal that occurs twice and rejects a clause where a
/// variable occurs with both polarities (a tautology) by returning `None`,
/// per spec §3 / §4.5 ("tautological ... clauses ... are dropped at
/// intake; the normalizer cleans them").
fn dedup_and_drop_tautologies(lits: Vec<(String, bool)>) -> Option<Vec<(String, bool)>> {
    let mut out: Vec<(String, bool)> = Vec::with_capacity(lits.len());
    for (name, sign) in lits {
        if let Some(&(_, existing_sign)) = out.iter().find(|(n, _)| *n == name) {
            if existing_sign != sign {
                return None;
            }
            continue;
        }
        out.push((name, sign));
    }
    Some(out)
}

/// Bottom-up constant folding and associative flattening (spec §4.1:
/// "Associative flattening of same-kind operators is performed on every
/// reconstruction. Constants are absorbed").
fn simplify(f: Formula) -> Formula {
    match f {
        Formula::Atom(_) | Formula::True | Formula::False => f,
        Formula::Not(child) => match simplify(*child) {
            Formula::True => Formula::False,
            Formula::False => Formula::True,
            Formula::Not(inner) => *inner,
            other => Formula::not(other),
        },
        Formula::And(children) => {
            let mut flat = Vec::with_capacity(children.len());
            for child in children {
                match simplify(child) {
                    Formula::True => {}
                    Formula::False => return Formula::False,
                    Formula::And(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            match flat.len() {
                0 => Formula::True,
                1 => flat.pop().unwrap(),
                _ => Formula::And(flat),
            }
        }
        Formula::Or(children) => {
            let mut flat = Vec::with_capacity(children.len());
            for child in children {
                match simplify(child) {
                    Formula::False => {}
                    Formula::True => return Formula::True,
                    Formula::Or(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            match flat.len() {
                0 => Formula::False,
                1 => flat.pop().unwrap(),
                _ => Formula::Or(flat),
            }
        }
        Formula::Implies(_, _) | Formula::Iff(_, _) => {
            unreachable!("eliminate_connectives runs before simplify")
        }
    }
}

/// Eliminates `Iff`/`Implies` via `A <-> B = (A -> B) & (B -> A)` and
/// `A -> B = !A | B` (spec §4.1).
fn eliminate_connectives(f: Formula) -> Formula {
    match f {
        Formula::Atom(_) | Formula::True | Formula::False => f,
        Formula::Not(child) => Formula::not(eliminate_connectives(*child)),
        Formula::And(children) => {
            Formula::And(children.into_iter().map(eliminate_connectives).collect())
        }
        Formula::Or(children) => {
            Formula::Or(children.into_iter().map(eliminate_connectives).collect())
        }
        Formula::Implies(a, b) => {
            let a = eliminate_connectives(*a);
            let b = eliminate_connectives(*b);
            Formula::or(vec![Formula::not(a), b])
        }
        Formula::Iff(a, b) => {
            let a = eliminate_connectives(*a);
            let b = eliminate_connectives(*b);
            Formula::and(vec![
                Formula::or(vec![Formula::not(a.clone()), b.clone()]),
                Formula::or(vec![Formula::not(b), a]),
            ])
        }
    }
}

/// Pushes negation inward to fixpoint: De Morgan's laws plus double-negation
/// and constant elimination (spec §4.1).
fn push_negation_inward(f: Formula) -> Formula {
    match f {
        Formula::Atom(_) | Formula::True | Formula::False => f,
        Formula::Not(inner) => match *inner {
            Formula::Atom(name) => Formula::not(Formula::Atom(name)),
            Formula::True => Formula::False,
            Formula::False => Formula::True,
            Formula::Not(grandchild) => push_negation_inward(*grandchild),
            Formula::And(children) => Formula::Or(
                children
                    .into_iter()
                    .map(|c| push_negation_inward(Formula::not(c)))
                    .collect(),
            ),
            Formula::Or(children) => Formula::And(
                children
                    .into_iter()
                    .map(|c| push_negation_inward(Formula::not(c)))
                    .collect(),
            ),
            Formula::Implies(_, _) | Formula::Iff(_, _) => {
                unreachable!("eliminate_connectives runs before push_negation_inward")
            }
        },
        Formula::And(children) => {
            Formula::And(children.into_iter().map(push_negation_inward).collect())
        }
        Formula::Or(children) => {
            Formula::Or(children.into_iter().map(push_negation_inward).collect())
        }
        Formula::Implies(_, _) | Formula::Iff(_, _) => {
            unreachable!("eliminate_connectives runs before push_negation_inward")
        }
    }
}

/// Distributes `Or` over `And` by direct cross-product (spec §4.1). Only
/// ever called on a formula already in NNF with constants folded away, so
/// every node is `Atom`, `Not(Atom)`, `And`, or `Or`.
fn distribute(f: &Formula) -> Vec<Vec<(String, bool)>> {
    match f {
        Formula::Atom(name) => vec![vec![(name.clone(), true)]],
        Formula::Not(inner) => match &**inner {
            Formula::Atom(name) => vec![vec![(name.clone(), false)]],
            _ => unreachable!("not in NNF"),
        },
        Formula::And(children) => children.iter().flat_map(distribute).collect(),
        Formula::Or(children) => children.iter().map(distribute).fold(vec![vec![]], |acc, next| {
            let mut out = Vec::with_capacity(acc.len() * next.len().max(1));
            for a in &acc {
                for b in &next {
                    let mut merged = a.clone();
                    merged.extend(b.iter().cloned());
                    out.push(merged);
                }
            }
            out
        }),
        Formula::True | Formula::False => unreachable!("constants folded away by simplify"),
        Formula::Implies(_, _) | Formula::Iff(_, _) => unreachable!("eliminated earlier"),
    }
}

/// Tseitin encoding (spec §4.2). Allocates one fresh auxiliary variable per
/// non-literal sub-expression and returns the literal `(name, sign)`
/// representing that sub-expression, pushing the biconditional's defining
/// clauses into `clauses` as a side effect. Aux names are drawn from a `$`
/// prefix the lexer can never produce from source text, so they can never
/// collide with a user atom.
fn tseitin_encode(
    f: &Formula,
    clauses: &mut Vec<Vec<(String, bool)>>,
    next_aux: &mut usize,
) -> (String, bool) {
    fn fresh(next_aux: &mut usize) -> String {
        let name = format!("$t{}", next_aux);
        *next_aux += 1;
        name
    }

    match f {
        Formula::Atom(name) => (name.clone(), true),
        Formula::Not(inner) => match &**inner {
            Formula::Atom(name) => (name.clone(), false),
            other => {
                let (u_name, u_sign) = tseitin_encode(other, clauses, next_aux);
                let t = fresh(next_aux);
                // t <-> !u : (!t | !u) & (u | t)
                clauses.push(vec![(t.clone(), false), (u_name.clone(), !u_sign)]);
                clauses.push(vec![(u_name, u_sign), (t.clone(), true)]);
                (t, true)
            }
        },
        Formula::And(children) => {
            let lits: Vec<(String, bool)> = children
                .iter()
                .map(|c| tseitin_encode(c, clauses, next_aux))
                .collect();
            let t = fresh(next_aux);
            // t <-> (u1 & ... & uk): for each ui, (!t | ui); and (!u1 | ... | !uk | t)
            for (name, sign) in &lits {
                clauses.push(vec![(t.clone(), false), (name.clone(), *sign)]);
            }
            let mut big = vec![(t.clone(), true)];
            big.extend(lits.iter().map(|(name, sign)| (name.clone(), !sign)));
            clauses.push(big);
            (t, true)
        }
        Formula::Or(children) => {
            let lits: Vec<(String, bool)> = children
                .iter()
                .map(|c| tseitin_encode(c, clauses, next_aux))
                .collect();
            let t = fresh(next_aux);
            // t <-> (u1 | ... | uk): (!t | u1 | ... | uk); and for each ui, (!ui | t)
            let mut big = vec![(t.clone(), false)];
            big.extend(lits.iter().cloned());
            clauses.push(big);
            for (name, sign) in &lits {
                clauses.push(vec![(name.clone(), !sign), (t.clone(), true)]);
            }
            (t, true)
        }
        Formula::True | Formula::False => unreachable!("constants folded away by simplify"),
        Formula::Implies(_, _) | Formula::Iff(_, _) => unreachable!("eliminated earlier"),
    }
}

/// Runs the normalizer (and, when the complexity gate trips, the Tseitin
/// encoder) over a parsed formula, returning a conjunction of named-literal
/// clauses. An empty result is the trivially-true empty conjunction; a
/// result containing one empty clause is trivially false (spec §4.5).
fn normalize_to_named(formula: &Formula, config: &Config) -> Vec<Vec<(String, bool)>> {
    let eliminated = eliminate_connectives(formula.clone());

    if config.use_tseitin && eliminated.complexity() > config.tseitin_threshold {
        let nnf = push_negation_inward(eliminated);
        let simplified = simplify(nnf);
        let mut clauses = Vec::new();
        match simplified {
            Formula::True => return Vec::new(),
            Formula::False => return vec![Vec::new()],
            other => {
                let mut next_aux = 0usize;
                let (root_name, root_sign) = tseitin_encode(&other, &mut clauses, &mut next_aux);
                clauses.push(vec![(root_name, root_sign)]);
            }
        }
        return clauses;
    }

    let nnf = push_negation_inward(eliminated);
    let simplified = simplify(nnf);
    match simplified {
        Formula::True => Vec::new(),
        Formula::False => vec![Vec::new()],
        other => distribute(&other),
    }
}

/// Builds the frozen numeric clause model from a conjunction of
/// named-literal clauses. Original atoms (from `original_atoms`, in
/// first-occurrence order) get ids `1..=k`; any further names encountered
/// (Tseitin auxiliaries) get the ids that follow, so the model projection
/// onto original atoms is just "take the first `k` ids" (spec §4.2: "any
/// satisfying assignment of C' restricted to phi's atoms").
fn build_numeric_model(
    named_clauses: Vec<Vec<(String, bool)>>,
    original_atoms: &[String],
) -> Cnf {
    let mut ids: IndexMap<String, VarId> = IndexMap::new();
    for name in original_atoms {
        let next = ids.len() as VarId + 1;
        ids.entry(name.clone()).or_insert(next);
    }
    let num_original_atoms = ids.len() as u32;

    let mut clauses = Vec::with_capacity(named_clauses.len());
    for named in named_clauses {
        let Some(deduped) = dedup_and_drop_tautologies(named) else { continue };
        let mut lits = Vec::with_capacity(deduped.len());
        for (name, sign) in deduped {
            let next = ids.len() as VarId + 1;
            let id = *ids.entry(name).or_insert(next);
            lits.push(Lit::new(id, sign));
        }
        clauses.push(CnfClause(lits));
    }

    let mut atom_names = vec![String::new(); ids.len()];
    for (name, id) in &ids {
        atom_names[(*id - 1) as usize] = name.clone();
    }

    Cnf { clauses, num_vars: ids.len() as u32, atom_names, num_original_atoms }
}

/// Runs the full pipeline (normalizer, optional Tseitin, optional
/// subsumption pre-processing, numeric model construction) over a parsed
/// formula.
pub fn build_cnf(formula: &Formula, config: &Config) -> Result<Cnf, SolveError> {
    let original_atoms = formula.atoms();
    let mut named = normalize_to_named(formula, config);
    if config.use_subsumption {
        named = subsumption::subsume(named);
    }
    Ok(build_numeric_model(named, &original_atoms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Formula;

    fn atom(name: &str) -> Formula {
        Formula::atom(name)
    }

    #[test]
    fn tautological_clause_is_dropped_not_an_error() {
        // A | !A distributes to a single clause containing both polarities
        // of A, which spec §3/§4.5 says is dropped at intake, not an error.
        let config = Config { use_tseitin: false, ..Config::default() };
        let cnf = build_cnf(&Formula::or(vec![atom("A"), Formula::not(atom("A"))]), &config).unwrap();
        assert!(cnf.clauses.is_empty());
        assert_eq!(cnf.num_original_atoms, 1, "A is still numbered even though no clause survives");
    }

    #[test]
    fn distributes_or_over_and() {
        // A | (B & C) -> (A | B) & (A | C)
        let config = Config { use_tseitin: false, ..Config::default() };
        let formula = Formula::or(vec![atom("A"), Formula::and(vec![atom("B"), atom("C")])]);
        let cnf = build_cnf(&formula, &config).unwrap();
        assert_eq!(cnf.clauses.len(), 2);
        for clause in &cnf.clauses {
            assert_eq!(clause.len(), 2);
        }
    }

    #[test]
    fn below_threshold_tseitin_is_a_no_op() {
        let config = Config::default();
        let formula = Formula::or(vec![atom("A"), atom("B")]);
        assert!(formula.complexity() <= config.tseitin_threshold);
        let cnf = build_cnf(&formula, &config).unwrap();
        // No `$t...` auxiliary variables introduced.
        assert_eq!(cnf.num_vars, cnf.num_original_atoms);
    }

    #[test]
    fn tseitin_gate_trips_above_threshold_and_preserves_satisfiability() {
        let config = Config::default();
        // Deep chain of nested Iffs, comfortably above the default threshold.
        let formula = Formula::iff(
            Formula::iff(Formula::iff(atom("A"), atom("B")), Formula::iff(atom("C"), atom("D"))),
            Formula::iff(atom("E"), Formula::and(vec![atom("A"), atom("B"), atom("C")])),
        );
        assert!(formula.complexity() > config.tseitin_threshold);
        let cnf = build_cnf(&formula, &config).unwrap();
        assert!(cnf.num_vars > cnf.num_original_atoms, "auxiliary variables must have been introduced");
        // The root unit clause forcing the whole encoding true must be present.
        assert!(cnf.clauses.iter().any(|c| c.len() == 1));
    }
}
