//! Solver configuration and the cooperative-cancellation deadline token
//! (spec §5, §6). A plain struct, not the teacher's trait-generic
//! `CDCLSolver<B, L, C, R>` pluggable-strategy system: the specification
//! fixes one branching heuristic (VSIDS), one learning scheme (first-UIP),
//! one clause-deletion policy (subsumption sweep at restart) and one
//! restart policy (fixed threshold), so there is nothing left to plug in.

use std::time::Instant;

/// An opaque cooperative-cancellation token (spec §5). The solver polls
/// [`Deadline::expired`] after each conflict analysis and after each
/// restart; it never suspends or spawns a watchdog thread.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// No deadline: the solver runs to completion.
    pub fn none() -> Deadline {
        Deadline(None)
    }

    /// Expires `from now + duration`.
    pub fn after(duration: std::time::Duration) -> Deadline {
        Deadline(Some(Instant::now() + duration))
    }

    pub fn at(instant: Instant) -> Deadline {
        Deadline(Some(instant))
    }

    pub fn expired(&self) -> bool {
        match self.0 {
            Some(instant) => Instant::now() >= instant,
            None => false,
        }
    }
}

impl Default for Deadline {
    fn default() -> Deadline {
        Deadline::none()
    }
}

/// Solver configuration (spec §6, "Configuration recognized by the solver
/// entry"). Defaults are spec.md's stated defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Enable the Tseitin encoder (§4.2) once the complexity gate trips.
    pub use_tseitin: bool,
    /// Structural-complexity threshold that gates Tseitin encoding (§4.2).
    pub tseitin_threshold: usize,
    /// Enable the subsumption pre-processor (§4.3) before search.
    pub use_subsumption: bool,
    /// Enable the fixed-threshold restart policy (§4.4.6).
    pub use_restart: bool,
    /// Conflicts between restarts.
    pub restart_threshold: u32,
    /// VSIDS per-conflict activity decay, applied as a multiplicative
    /// rescale of every other variable's score (§4.4.5).
    pub vsids_decay: f64,
    /// VSIDS per-conflict activity bump added to variables touched during
    /// conflict analysis (§4.4.5).
    pub vsids_bump: f64,
    /// Cooperative cancellation token (§5).
    pub deadline: Deadline,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            use_tseitin: true,
            tseitin_threshold: 8,
            use_subsumption: true,
            use_restart: true,
            restart_threshold: 5,
            vsids_decay: 0.95,
            vsids_bump: 1.0,
            deadline: Deadline::none(),
        }
    }
}
