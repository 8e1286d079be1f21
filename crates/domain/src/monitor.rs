//! Monitor state machine — debounced process presence tracking.
//!
//! [`MonitorState`] is owned by exactly one poll loop and mutated only through
//! [`MonitorState::apply`], a pure function of the current state and one
//! presence sample. The grace window is a level-triggered deadline compared
//! against the sample's observation time on every tick, not a timer: that
//! keeps the machine a pure, testable function with no suspend/resume
//! dependency.
//!
//! Per logical transition between "entity should be on" and "entity should be
//! off" the machine emits exactly one [`DesiredState`]; steady state emits
//! nothing, so a poll tick never repeats a command.

use chrono::TimeDelta;

use crate::command::DesiredState;
use crate::presence::PresenceSample;
use crate::time::Timestamp;

/// Debounced view of the monitored process lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    /// Nothing observed yet. The first fresh sample is authoritative.
    #[default]
    Unknown,
    /// The process is present.
    Running,
    /// Presence was lost while running; holding off until the deadline in
    /// case the process comes straight back.
    GraceWindow {
        /// Absence observed at or after this instant turns the entity off.
        deadline: Timestamp,
    },
    /// The process is absent and the grace window (if any) has expired.
    Stopped,
}

impl MonitorState {
    /// Advance the machine by one sample.
    ///
    /// Returns the next state and the command emission, if this sample
    /// crossed a logical on/off boundary. `grace` is the debounce period; a
    /// zero (or negative) grace degenerates to emitting `Off` on the first
    /// sample that observes absence.
    ///
    /// Stale samples never advance the machine: the previous state is
    /// retained and nothing is emitted.
    #[must_use]
    pub fn apply(self, sample: &PresenceSample, grace: TimeDelta) -> (Self, Option<DesiredState>) {
        if sample.stale {
            return (self, None);
        }

        match (self, sample.present) {
            // First authoritative observation. An absent process assumes the
            // entity already sits at its default-off state, so no corrective
            // command is needed.
            (Self::Unknown, true) => (Self::Running, Some(DesiredState::On)),
            (Self::Unknown, false) => (Self::Stopped, None),

            (Self::Running, true) => (Self::Running, None),
            // Presence first lost: arm the grace deadline once. The deadline
            // is evaluated immediately so a zero grace turns off on this very
            // sample instead of burning a tick in the window.
            (Self::Running, false) => {
                let deadline = sample.observed_at + grace;
                if sample.observed_at >= deadline {
                    (Self::Stopped, Some(DesiredState::Off))
                } else {
                    (Self::GraceWindow { deadline }, None)
                }
            }

            // Any positive re-observation disarms the window. No emission:
            // the entity never went off.
            (Self::GraceWindow { .. }, true) => (Self::Running, None),
            // The deadline is never extended by later absent samples.
            (Self::GraceWindow { deadline }, false) => {
                if sample.observed_at >= deadline {
                    (Self::Stopped, Some(DesiredState::Off))
                } else {
                    (Self::GraceWindow { deadline }, None)
                }
            }

            (Self::Stopped, true) => (Self::Running, Some(DesiredState::On)),
            (Self::Stopped, false) => (Self::Stopped, None),
        }
    }

    /// Whether the entity should currently be on, per this state.
    ///
    /// `GraceWindow` counts as on: the off decision has not been taken yet.
    #[must_use]
    pub fn should_be_on(&self) -> bool {
        matches!(self, Self::Running | Self::GraceWindow { .. })
    }
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Running => f.write_str("running"),
            Self::GraceWindow { .. } => f.write_str("grace-window"),
            Self::Stopped => f.write_str("stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn present(secs: i64) -> PresenceSample {
        PresenceSample::fresh(true, at(secs))
    }

    fn absent(secs: i64) -> PresenceSample {
        PresenceSample::fresh(false, at(secs))
    }

    const GRACE: TimeDelta = TimeDelta::seconds(60);

    /// Run a sample sequence from `Unknown`, collecting emissions.
    fn run(samples: &[PresenceSample], grace: TimeDelta) -> (MonitorState, Vec<DesiredState>) {
        let mut state = MonitorState::Unknown;
        let mut emitted = Vec::new();
        for sample in samples {
            let (next, emission) = state.apply(sample, grace);
            state = next;
            emitted.extend(emission);
        }
        (state, emitted)
    }

    // Transition table rows.

    #[test]
    fn should_emit_on_when_unknown_observes_presence() {
        let (state, emission) = MonitorState::Unknown.apply(&present(0), GRACE);
        assert_eq!(state, MonitorState::Running);
        assert_eq!(emission, Some(DesiredState::On));
    }

    #[test]
    fn should_assume_off_when_unknown_observes_absence() {
        let (state, emission) = MonitorState::Unknown.apply(&absent(0), GRACE);
        assert_eq!(state, MonitorState::Stopped);
        assert_eq!(emission, None);
    }

    #[test]
    fn should_stay_running_without_emission_while_present() {
        let (state, emission) = MonitorState::Running.apply(&present(10), GRACE);
        assert_eq!(state, MonitorState::Running);
        assert_eq!(emission, None);
    }

    #[test]
    fn should_arm_grace_window_when_presence_first_lost() {
        let (state, emission) = MonitorState::Running.apply(&absent(10), GRACE);
        assert_eq!(
            state,
            MonitorState::GraceWindow {
                deadline: at(10) + GRACE
            }
        );
        assert_eq!(emission, None);
    }

    #[test]
    fn should_disarm_grace_window_on_return_without_emission() {
        let state = MonitorState::GraceWindow { deadline: at(70) };
        let (state, emission) = state.apply(&present(20), GRACE);
        assert_eq!(state, MonitorState::Running);
        assert_eq!(emission, None);
    }

    #[test]
    fn should_hold_grace_window_before_deadline() {
        let armed = MonitorState::GraceWindow { deadline: at(70) };
        let (state, emission) = armed.apply(&absent(30), GRACE);
        assert_eq!(state, armed);
        assert_eq!(emission, None);
    }

    #[test]
    fn should_not_extend_deadline_on_later_absent_samples() {
        let armed = MonitorState::GraceWindow { deadline: at(70) };
        let (state, _) = armed.apply(&absent(50), GRACE);
        assert_eq!(state, MonitorState::GraceWindow { deadline: at(70) });
    }

    #[test]
    fn should_emit_off_when_deadline_reached() {
        let armed = MonitorState::GraceWindow { deadline: at(70) };
        let (state, emission) = armed.apply(&absent(70), GRACE);
        assert_eq!(state, MonitorState::Stopped);
        assert_eq!(emission, Some(DesiredState::Off));
    }

    #[test]
    fn should_emit_off_when_deadline_long_past() {
        let armed = MonitorState::GraceWindow { deadline: at(70) };
        let (state, emission) = armed.apply(&absent(500), GRACE);
        assert_eq!(state, MonitorState::Stopped);
        assert_eq!(emission, Some(DesiredState::Off));
    }

    #[test]
    fn should_emit_on_when_stopped_observes_presence() {
        let (state, emission) = MonitorState::Stopped.apply(&present(0), GRACE);
        assert_eq!(state, MonitorState::Running);
        assert_eq!(emission, Some(DesiredState::On));
    }

    #[test]
    fn should_stay_stopped_without_emission_while_absent() {
        let (state, emission) = MonitorState::Stopped.apply(&absent(0), GRACE);
        assert_eq!(state, MonitorState::Stopped);
        assert_eq!(emission, None);
    }

    // Stale samples.

    #[test]
    fn should_ignore_stale_sample_in_every_state() {
        let states = [
            MonitorState::Unknown,
            MonitorState::Running,
            MonitorState::GraceWindow { deadline: at(70) },
            MonitorState::Stopped,
        ];
        for initial in states {
            let (state, emission) = initial.apply(&PresenceSample::stale(false, at(999)), GRACE);
            assert_eq!(state, initial);
            assert_eq!(emission, None);
        }
    }

    // Zero debounce.

    #[test]
    fn should_emit_off_immediately_when_grace_is_zero() {
        let (state, emission) = MonitorState::Running.apply(&absent(10), TimeDelta::zero());
        assert_eq!(state, MonitorState::Stopped);
        assert_eq!(emission, Some(DesiredState::Off));
    }

    // End-to-end sample sequences.

    #[test]
    fn should_suppress_off_when_process_returns_within_grace() {
        // Unknown → present → present → absent (still absent 10s later) →
        // present, grace 60s: only the initial On.
        let samples = [present(0), present(10), absent(20), absent(30), present(40)];
        let (state, emitted) = run(&samples, GRACE);
        assert_eq!(state, MonitorState::Running);
        assert_eq!(emitted, vec![DesiredState::On]);
    }

    #[test]
    fn should_emit_single_off_when_absence_outlasts_grace() {
        // Absence held for 70s at a 10s poll interval, grace 60s: Off fires
        // on the first tick at or past the 60s mark, exactly once.
        let mut samples = vec![present(0)];
        samples.extend((1..=7).map(|i| absent(10 * i)));
        let (state, emitted) = run(&samples, GRACE);
        assert_eq!(state, MonitorState::Stopped);
        assert_eq!(emitted, vec![DesiredState::On, DesiredState::Off]);
    }

    #[test]
    fn should_emit_off_exactly_at_the_grace_mark() {
        // Loss at t=10 arms deadline t=70; the t=70 tick emits, earlier ones
        // do not.
        let samples = [present(0), absent(10), absent(60)];
        let (state, emitted) = run(&samples, GRACE);
        assert!(matches!(state, MonitorState::GraceWindow { .. }));
        assert_eq!(emitted, vec![DesiredState::On]);

        let samples = [present(0), absent(10), absent(70)];
        let (_, emitted) = run(&samples, GRACE);
        assert_eq!(emitted, vec![DesiredState::On, DesiredState::Off]);
    }

    #[test]
    fn should_emit_nothing_when_process_never_appears() {
        let samples = [absent(0), absent(10), absent(20)];
        let (state, emitted) = run(&samples, GRACE);
        assert_eq!(state, MonitorState::Stopped);
        assert!(emitted.is_empty());
    }

    // Emission idempotence against a reference simulation.

    #[test]
    fn should_keep_entity_state_in_lockstep_with_emissions() {
        // Interpret emissions as the entity's on/off state (starting off,
        // the assumed hub default). After every fresh sample the entity must
        // agree with what the machine says it should be.
        let pattern = [
            true, true, false, true, false, false, false, false, false, false, false, true, true,
            false, true,
        ];
        let mut state = MonitorState::Unknown;
        let mut entity_on = false;

        for (tick, &p) in pattern.iter().enumerate() {
            let sample = PresenceSample::fresh(p, at(10 * i64::try_from(tick).unwrap()));
            let (next, emission) = state.apply(&sample, GRACE);
            state = next;

            if let Some(desired) = emission {
                entity_on = matches!(desired, DesiredState::On);
            }
            assert_eq!(entity_on, state.should_be_on(), "tick {tick}");
        }
    }

    #[test]
    fn should_alternate_emissions_for_any_presence_pattern() {
        // Idempotence of emission: commands strictly alternate, starting with
        // On, so unchanged truth never emits twice in a row.
        let pattern = [
            false, true, false, false, false, false, false, false, false, true, false, true, true,
            false, false, false, false, false, false, false, true,
        ];
        let sequences = [&pattern[..], &pattern[1..], &pattern[3..]];
        for samples in sequences {
            let samples: Vec<_> = samples
                .iter()
                .enumerate()
                .map(|(tick, &p)| PresenceSample::fresh(p, at(10 * i64::try_from(tick).unwrap())))
                .collect();
            let (_, emitted) = run(&samples, GRACE);
            for pair in emitted.windows(2) {
                assert_ne!(pair[0], pair[1]);
            }
            if let Some(first) = emitted.first() {
                assert_eq!(*first, DesiredState::On);
            }
        }
    }
}
