//! Orchestrator — the single poll loop driving the monitor.
//!
//! Strictly sequential per tick: sample, transition, (maybe) deliver, sleep.
//! The monitor state and the pending-command slot are touched by exactly one
//! execution context, so no locking is involved. The only blocking operation
//! is the actuator call, which the adapter bounds with a request timeout.

use std::time::Duration;

use chrono::TimeDelta;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use proclink_domain::command::ActuatorCommand;
use proclink_domain::entity::EntityRef;
use proclink_domain::monitor::MonitorState;

use crate::event::MonitorEvent;
use crate::ports::{Actuator, EventSink, PresenceSource};
use crate::retry::RetryPolicy;

/// Ticks between repeated reminders while the last send failed fatally.
const FATAL_REMINDER_TICKS: u64 = 60;

/// Timing and targeting settings for the poll loop.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// The hub entity driven by process presence.
    pub entity: EntityRef,
    /// Time between presence samples.
    pub poll_interval: Duration,
    /// Debounce grace period; zero means turn off on the first absent sample.
    pub grace: TimeDelta,
    /// Retry policy for transient actuator failures.
    pub retry: RetryPolicy,
}

/// Wires the presence source, the state machine, and the actuator together.
///
/// Owns the [`MonitorState`] and the one piece of orchestration state beyond
/// it: the pending-command slot, remembering a command that has not been
/// confirmed delivered so transient failures are retried on later ticks
/// instead of being silently dropped.
pub struct Orchestrator<S, A, E> {
    source: S,
    actuator: A,
    sink: E,
    settings: MonitorSettings,
    state: MonitorState,
    pending: Option<ActuatorCommand>,
    /// Display form of the last fatal send error and the tick it occurred on.
    last_fatal: Option<(String, u64)>,
    ticks: u64,
}

impl<S, A, E> Orchestrator<S, A, E>
where
    S: PresenceSource + Send,
    A: Actuator,
    E: EventSink,
{
    /// Create an orchestrator in the `Unknown` state with an empty pending slot.
    pub fn new(source: S, actuator: A, sink: E, settings: MonitorSettings) -> Self {
        Self {
            source,
            actuator,
            sink,
            settings,
            state: MonitorState::Unknown,
            pending: None,
            last_fatal: None,
            ticks: 0,
        }
    }

    /// Run the poll loop until `shutdown` is cancelled.
    ///
    /// The first tick fires immediately, so the first sample is authoritative
    /// ground truth right at startup. No command is issued after shutdown is
    /// requested; an in-flight tick is abandoned.
    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!(
            entity = %self.settings.entity,
            interval = ?self.settings.poll_interval,
            grace_secs = self.settings.grace.num_seconds(),
            "presence monitor started"
        );

        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Shutdown wins over a simultaneously ready tick; no command
                // may be issued once cancellation is requested.
                biased;
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => self.tick(&shutdown).await,
            }
        }

        tracing::info!("presence monitor stopped");
    }

    /// One poll tick: sample, transition, deliver whatever is pending.
    async fn tick(&mut self, shutdown: &CancellationToken) {
        self.ticks += 1;

        let sample = self.source.sample();
        tracing::trace!(present = sample.present, stale = sample.stale, "sampled presence");

        if sample.stale {
            // Keep the previous state; an already-pending command is still
            // worth delivering below.
            tracing::warn!(state = %self.state, "process enumeration failed, skipping transition");
        } else {
            let (next, emission) = self.state.apply(&sample, self.settings.grace);
            if next != self.state {
                tracing::info!(from = %self.state, to = %next, "state transition");
                self.sink.emit(MonitorEvent::StateTransition {
                    from: self.state,
                    to: next,
                    at: sample.observed_at,
                });
                self.state = next;
            }
            if let Some(desired) = emission {
                let command = ActuatorCommand::new(self.settings.entity.clone(), desired);
                if let Some(previous) = self.pending.replace(command) {
                    // The newest truth wins; the undelivered command is moot.
                    tracing::debug!(
                        superseded = %previous.desired_state,
                        "undelivered command superseded by new transition"
                    );
                }
            }
        }

        if self.pending.is_some() {
            self.deliver(shutdown).await;
        }
        self.remind_fatal();
    }

    /// Deliver the pending command with bounded retry.
    ///
    /// Transient failures back off and retry up to the policy's budget; when
    /// the budget is exhausted the command stays pending for the next tick.
    /// Fatal failures ([`ActuatorError::is_fatal`]) drop the command after
    /// reporting it once — later transitions still attempt to send.
    async fn deliver(&mut self, shutdown: &CancellationToken) {
        let Some(command) = self.pending.clone() else {
            return;
        };

        let mut attempt = 0u32;
        loop {
            if shutdown.is_cancelled() {
                return;
            }
            attempt += 1;

            match self.actuator.send(&command).await {
                Ok(()) => {
                    self.pending = None;
                    self.last_fatal = None;
                    tracing::info!(
                        entity = %command.target,
                        state = %command.desired_state,
                        attempt,
                        "command delivered"
                    );
                    self.sink.emit(MonitorEvent::CommandSent {
                        command,
                        attempts: attempt,
                    });
                    return;
                }
                Err(err) if err.is_fatal() => {
                    tracing::error!(
                        entity = %command.target,
                        state = %command.desired_state,
                        %err,
                        "command failed fatally, dropping it"
                    );
                    self.pending = None;
                    self.last_fatal = Some((err.to_string(), self.ticks));
                    self.sink.emit(MonitorEvent::CommandFailed {
                        command,
                        attempts: attempt,
                        error: err.to_string(),
                        fatal: true,
                    });
                    return;
                }
                Err(err) => {
                    if attempt >= self.settings.retry.max_attempts {
                        tracing::warn!(
                            %err,
                            attempts = attempt,
                            "retry budget exhausted, keeping command pending"
                        );
                        self.sink.emit(MonitorEvent::CommandFailed {
                            command,
                            attempts: attempt,
                            error: err.to_string(),
                            fatal: false,
                        });
                        return;
                    }
                    let delay = self.settings.retry.backoff_after(attempt);
                    tracing::debug!(%err, attempt, ?delay, "transient send failure, backing off");
                    tokio::select! {
                        () = shutdown.cancelled() => return,
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// Repeat a warning at reduced frequency while sends keep failing fatally.
    fn remind_fatal(&self) {
        if let Some((error, since)) = &self.last_fatal {
            let elapsed = self.ticks.saturating_sub(*since);
            if elapsed > 0 && elapsed.is_multiple_of(FATAL_REMINDER_TICKS) {
                tracing::warn!(
                    %error,
                    "actuation still failing, check the hub credential and entity id"
                );
            }
        }
    }
}
