//! Run statistics (spec §6 "Statistics"). A plain serde-serializable struct
//! the CLI can emit as JSON or text; `propsat` itself only ever fills it in,
//! never formats it for a terminal (formatting is the CLI's job per spec's
//! "out of scope: log/report formatting").

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub conflicts: u64,
    pub decisions: u64,
    pub propagations: u64,
    pub learnt_clauses: u64,
    pub restarts: u64,
    pub wall_clock_ms: u128,
}

impl Stats {
    /// On timeout every field is reported as `"N/A"`, with wall-clock
    /// specifically `"TIMEOUT"` (spec §6).
    pub fn render(&self, timed_out: bool) -> String {
        if timed_out {
            "conflicts=N/A decisions=N/A propagations=N/A learnt_clauses=N/A restarts=N/A wall_clock=TIMEOUT"
                .to_string()
        } else {
            format!(
                "conflicts={} decisions={} propagations={} learnt_clauses={} restarts={} wall_clock_ms={}",
                self.conflicts,
                self.decisions,
                self.propagations,
                self.learnt_clauses,
                self.restarts,
                self.wall_clock_ms,
            )
        }
    }
}
