//! CDCL SAT solver for an infix propositional language, with resolution-proof
//! reconstruction on unsatisfiable inputs. See module docs for the pipeline:
//! [`parser`] and [`ast`] (intake), [`cnf`] (normalizer, Tseitin encoder,
//! numeric clause model), [`subsumption`] (pre-processor and restart-time
//! sweep), [`solver`] (the CDCL core), [`proof`] (resolution reconstruction).

pub mod ast;
pub mod clause;
pub mod cnf;
pub mod config;
pub mod dimacs;
pub mod error;
pub mod parser;
pub mod proof;
pub mod restart;
pub mod solver;
pub mod stats;
pub mod subsumption;
pub mod variable;
pub mod vsids;

pub use config::{Config, Deadline};
pub use error::SolveError;
pub use solver::{Model, SolveOutcome, Solver};
pub use stats::Stats;

use log::debug;

/// Parses an infix propositional formula and runs the full pipeline:
/// normalizer, optional Tseitin encoding, optional subsumption
/// pre-processing, numeric model construction, then the CDCL core.
pub fn solve_formula(src: &str, config: &Config) -> Result<SolveOutcome, SolveError> {
    let formula = parser::parse(src)?;
    debug!("parsed formula with {} atom(s)", formula.atoms().len());
    let cnf = cnf::build_cnf(&formula, config)?;
    debug!("built {} clause(s) over {} variable(s)", cnf.clauses.len(), cnf.num_vars);
    Ok(Solver::new(&cnf, config.clone()).solve())
}

/// Solves CNF given directly in the lenient DIMACS-like intake format
/// (spec §6), bypassing the infix parser and normalizer entirely.
pub fn solve_dimacs(src: &str, config: &Config) -> Result<SolveOutcome, SolveError> {
    let cnf = dimacs::parse_dimacs(src)?;
    debug!("parsed DIMACS intake: {} clause(s) over {} variable(s)", cnf.clauses.len(), cnf.num_vars);
    Ok(Solver::new(&cnf, config.clone()).solve())
}
