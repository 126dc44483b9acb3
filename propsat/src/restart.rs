//! Fixed-threshold restart counter (spec §4.4.6, §8 property 9). The
//! teacher ships four interchangeable policies
//! (`RestartNever`/`RestartFixed`/`RestartGeom`/`RestartLuby`) behind a
//! `RestartPolicy` trait in `cdcl::satisfaction`; spec.md standardizes on
//! exactly one, so the trait and the geometric/Luby variants are dropped and
//! only the teacher's `RestartFixed` counter shape survives.

/// Counts conflicts since the last restart and reports when the configured
/// threshold is reached.
pub struct RestartCounter {
    conflicts_since_restart: u32,
    threshold: u32,
}

impl RestartCounter {
    pub fn new(threshold: u32) -> RestartCounter {
        RestartCounter { conflicts_since_restart: 0, threshold }
    }

    /// Call once per conflict. Returns `true` when a restart is due.
    pub fn on_conflict(&mut self) -> bool {
        self.conflicts_since_restart += 1;
        self.conflicts_since_restart >= self.threshold
    }

    /// Call after performing a restart (spec §4.4.6 step 4).
    pub fn reset(&mut self) {
        self.conflicts_since_restart = 0;
    }
}
