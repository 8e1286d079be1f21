//! Presence port — one process-table observation per poll tick.

use proclink_domain::presence::PresenceSample;

/// Samples whether the monitored process currently exists.
///
/// Implementations never fail and never block longer than the OS call they
/// wrap: when enumeration is not possible (permissions, transient OS error)
/// they return the previous known presence value marked stale, and the state
/// machine skips that tick instead of acting on it.
pub trait PresenceSource {
    /// Take one observation of the monitored process.
    fn sample(&mut self) -> PresenceSample;
}
