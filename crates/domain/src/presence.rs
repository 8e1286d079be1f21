//! Presence sample — one observation of the monitored process per poll tick.

use crate::time::Timestamp;

/// A single observation of whether the monitored process exists.
///
/// "Present" means at least one process with the configured name was found
/// in the OS process table. A `stale` sample carries the previous known
/// presence value because enumeration failed this tick; the state machine
/// ignores stale samples rather than acting on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceSample {
    /// Whether the process was observed (or, if stale, last observed).
    pub present: bool,
    /// When the observation was made.
    pub observed_at: Timestamp,
    /// Whether this sample repeats a previous value because enumeration failed.
    pub stale: bool,
}

impl PresenceSample {
    /// A fresh observation taken this tick.
    #[must_use]
    pub fn fresh(present: bool, observed_at: Timestamp) -> Self {
        Self {
            present,
            observed_at,
            stale: false,
        }
    }

    /// A stale sample repeating `previous` because enumeration failed.
    #[must_use]
    pub fn stale(previous: bool, observed_at: Timestamp) -> Self {
        Self {
            present: previous,
            observed_at,
            stale: true,
        }
    }
}
