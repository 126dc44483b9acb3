//! The lenient DIMACS-like CNF intake format (spec §6). Deliberately **not**
//! built on the teacher's `dimacs` crate dependency: that crate enforces a
//! stricter grammar than this format wants (an optional/absent `p cnf`
//! header, a lone `0` line as an immediate-UNSAT empty clause, `c`-prefixed
//! comments, symbolic `pN` variable names) — the teacher's own
//! `CNF::from_dimacs` wraps `dimacs::parse` and turns any deviation into a
//! hard parse error. This reader is hand-rolled in the same line-oriented
//! style `taiocean1213-cnf-dpll-2wl` uses for its own lenient DIMACS
//! subset, and the `dimacs` crate dependency is dropped accordingly.

use crate::cnf::{Cnf, CnfClause, Lit};
use crate::error::{SolveError, SourcePos};

/// Parses CNF text directly into the numeric clause model. Lines starting
/// with `c` are comments; a `p cnf V C` header is tolerated and ignored;
/// every other non-empty line is a sequence of space-separated signed
/// integers terminated by `0`. A lone `0` is the empty clause. Variables
/// are named `p1`, `p2`, ... by their absolute id.
pub fn parse_dimacs(src: &str) -> Result<Cnf, SolveError> {
    let mut clauses: Vec<CnfClause> = Vec::new();
    let mut max_var: u32 = 0;

    for line in src.lines() {
        let offset = line.as_ptr() as usize - src.as_ptr() as usize;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') || trimmed.starts_with('p') {
            continue;
        }

        let mut lits: Vec<Lit> = Vec::new();
        for tok in trimmed.split_whitespace() {
            let n: i32 = tok
                .parse()
                .map_err(|_| SolveError::Parse(SourcePos(offset), format!("invalid integer {:?}", tok)))?;
            if n == 0 {
                break;
            }
            let var = n.unsigned_abs();
            max_var = max_var.max(var);
            lits.push(Lit::new(var, n > 0));
        }

        if let Some(deduped) = dedup_and_drop_tautologies(lits) {
            clauses.push(CnfClause(deduped));
        }
    }

    let atom_names = (1..=max_var).map(|v| format!("p{}", v)).collect();
    Ok(Cnf { clauses, num_vars: max_var, atom_names, num_original_atoms: max_var })
}

fn dedup_and_drop_tautologies(lits: Vec<Lit>) -> Option<Vec<Lit>> {
    let mut out: Vec<Lit> = Vec::with_capacity(lits.len());
    for lit in lits {
        if out.contains(&lit) {
            continue;
        }
        if out.iter().any(|&existing| existing == -lit) {
            return None;
        }
        out.push(lit);
    }
    Some(out)
}
