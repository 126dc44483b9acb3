use std::fmt;

/// A byte offset into the source text of a formula, used to pinpoint where
/// parsing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos(pub usize);

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {}", self.0)
    }
}

/// Errors that can be surfaced to a caller. `Satisfiable`/`Unsatisfiable`/
/// `Timeout` are not part of this type: they are terminal results, returned
/// through [`crate::solver::SolveOutcome`], not propagated as errors.
#[derive(thiserror::Error, Debug)]
pub enum SolveError {
    /// Invalid syntax encountered at intake. Surfaced to the caller without
    /// ever touching the solver.
    #[error("parse error at {0}: {1}")]
    Parse(SourcePos, String),

    /// The Tseitin encoder or CNF normalizer produced a structurally invalid
    /// formula. This indicates a bug in `propsat` itself, not in the input.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// A solver invariant (propagation, trail consistency, analysis
/// termination) failed. Unlike [`SolveError`], this is never returned: it is
/// reserved for conditions the specification states can never legitimately
/// arise, so recovering a possibly-corrupted model or proof would be worse
/// than stopping the process.
pub fn invariant_violation(where_: &'static str) -> ! {
    panic!("propsat: invariant violated in {}", where_)
}
