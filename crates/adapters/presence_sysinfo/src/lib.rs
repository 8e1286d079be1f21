//! # proclink-adapter-presence-sysinfo
//!
//! [`PresenceSource`] implementation backed by `sysinfo` process-table
//! enumeration.
//!
//! "Present" means at least one process whose name matches the configured
//! name exactly exists; multiple instances count as present. The process
//! table is re-enumerated on every sample, so the call is only as slow as
//! one `sysinfo` refresh.
//!
//! ## Dependency rule
//! Depends on `proclink-app` (for the port) and `proclink-domain`. Never
//! imported by either.

use std::ffi::OsString;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use proclink_app::ports::PresenceSource;
use proclink_domain::presence::PresenceSample;
use proclink_domain::time::now;

/// Samples process presence from the OS process table.
pub struct SysinfoPresenceSource {
    system: System,
    process_name: OsString,
    last_present: bool,
}

impl SysinfoPresenceSource {
    /// Create a source watching for processes named exactly `process_name`.
    #[must_use]
    pub fn new(process_name: impl Into<OsString>) -> Self {
        Self {
            system: System::new(),
            process_name: process_name.into(),
            last_present: false,
        }
    }
}

impl PresenceSource for SysinfoPresenceSource {
    /// Refresh the process table and look the process up by exact name.
    ///
    /// A refresh that reports zero processes system-wide means enumeration
    /// failed (permissions, transient OS error); the previous presence value
    /// is returned marked stale instead of crashing the loop or reporting a
    /// spurious absence.
    fn sample(&mut self) -> PresenceSample {
        let refreshed = self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::new(),
        );
        let observed_at = now();

        if refreshed == 0 {
            tracing::warn!("process enumeration returned nothing, reporting stale sample");
            return PresenceSample::stale(self.last_present, observed_at);
        }

        let present = self
            .system
            .processes_by_exact_name(&self.process_name)
            .next()
            .is_some();
        self.last_present = present;
        PresenceSample::fresh(present, observed_at)
    }
}
