//! Breathing cycle runner.
//!
//! The runner is a wall-clock-based state machine. It does not use internal
//! threads or timers. Instead every step leaves behind exactly one pending
//! [`Continuation`] that the host schedules and hands back via `fire()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Idle
//!           |
//!           +-- Inhale -> Hold -> Exhale -> Inhale -> ...
//! ```
//!
//! Each poll recomputes the remaining time from the phase start timestamp,
//! so a late or skipped poll never drifts the cycle.
//!
//! ## Usage
//!
//! ```ignore
//! let mut runner = BreathingRunner::new(cycle, RunnerTiming::default(), SystemClock);
//! runner.start();
//! while let Some(next) = runner.pending() {
//!     sleep(next.delay());
//!     runner.fire(next.id);
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::cycle::{BreathingCycle, Phase};
use crate::clock::Clock;
use crate::events::Event;

/// Smallest ring scale, shown at phase start and while stopped.
pub const MIN_SCALE: f64 = 0.6;
/// Largest ring scale, reached when a phase completes.
pub const MAX_SCALE: f64 = 1.4;
/// Shown instead of the remaining seconds while stopped.
pub const REMAINING_PLACEHOLDER: &str = "--";

/// Map phase progress onto the ring scale.
pub fn ring_scale(progress: f64) -> f64 {
    MIN_SCALE + progress.clamp(0.0, 1.0) * (MAX_SCALE - MIN_SCALE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerState {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuationKind {
    /// Re-measure the current phase.
    Poll,
    /// Begin the next phase after the inter-phase gap.
    Advance,
}

/// The single callback a running session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    pub id: u64,
    pub kind: ContinuationKind,
    pub delay_ms: u64,
}

impl Continuation {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerTiming {
    pub poll_interval_ms: u64,
    pub phase_gap_ms: u64,
}

impl Default for RunnerTiming {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            phase_gap_ms: 300,
        }
    }
}

/// Something that owns a breathing session and can be driven by continuations.
pub trait ContinuationHost {
    fn pending(&self) -> Option<Continuation>;
    fn fire(&mut self, id: u64) -> Vec<Event>;
    fn stop(&mut self) -> Vec<Event>;
}

#[derive(Debug, Clone)]
pub struct BreathingRunner<C: Clock> {
    cycle: BreathingCycle,
    timing: RunnerTiming,
    clock: C,
    state: RunnerState,
    phase_index: usize,
    /// Wall-clock start of the current phase; `None` during the gap.
    phase_started_ms: Option<u64>,
    /// Phases that ran to completion since `start()`.
    completed_phases: u32,
    pending: Option<Continuation>,
    next_id: u64,
}

impl<C: Clock> BreathingRunner<C> {
    pub fn new(cycle: BreathingCycle, timing: RunnerTiming, clock: C) -> Self {
        Self {
            cycle,
            timing,
            clock,
            state: RunnerState::Idle,
            phase_index: 0,
            phase_started_ms: None,
            completed_phases: 0,
            pending: None,
            next_id: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunnerState::Running
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        self.cycle.get(self.phase_index)
    }

    pub fn cycle(&self) -> &BreathingCycle {
        &self.cycle
    }

    pub fn completed_phases(&self) -> u32 {
        self.completed_phases
    }

    pub fn pending(&self) -> Option<Continuation> {
        self.pending
    }

    /// Whole seconds left in the current phase, or `None` when idle or
    /// between phases.
    pub fn remaining_secs(&self) -> Option<u64> {
        let elapsed_ms = self.elapsed_ms()?;
        let phase = self.current_phase()?;
        Some(phase.duration_secs.saturating_sub(elapsed_ms / 1000))
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        match (self.elapsed_ms(), self.current_phase()) {
            (Some(elapsed_ms), Some(phase)) => {
                (elapsed_ms as f64 / phase.duration_ms() as f64).min(1.0)
            }
            _ => 0.0,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin at the first phase. Does nothing while already running.
    pub fn start(&mut self) -> Vec<Event> {
        if self.state == RunnerState::Running {
            return Vec::new();
        }
        self.state = RunnerState::Running;
        self.phase_index = 0;
        self.completed_phases = 0;
        tracing::debug!("breathing session started");

        let mut events = vec![Event::BreathingStarted {
            at: self.clock.now(),
        }];
        events.extend(self.enter_phase());
        events
    }

    /// Run the continuation with `id`.
    ///
    /// Stale ids (superseded, already fired, or issued before a stop) are
    /// ignored.
    pub fn fire(&mut self, id: u64) -> Vec<Event> {
        if self.state != RunnerState::Running {
            return Vec::new();
        }
        let continuation = match self.pending {
            Some(c) if c.id == id => c,
            _ => {
                tracing::debug!(id, "ignoring stale continuation");
                return Vec::new();
            }
        };
        self.pending = None;
        match continuation.kind {
            ContinuationKind::Poll => self.poll(),
            ContinuationKind::Advance => self.enter_phase(),
        }
    }

    /// Return to idle and drop the pending continuation.
    ///
    /// Returns `None` when already idle. The stop event reports whether the
    /// session got past its first phase boundary, which is what counts as a
    /// completed exercise.
    pub fn stop(&mut self) -> Option<Event> {
        if self.state != RunnerState::Running {
            return None;
        }
        let completed_phases = self.completed_phases;
        self.state = RunnerState::Idle;
        self.pending = None;
        self.phase_started_ms = None;
        self.completed_phases = 0;
        tracing::debug!(completed_phases, "breathing session stopped");

        Some(Event::BreathingStopped {
            completed_phases,
            counts_as_exercise: completed_phases > 0,
            remaining_display: REMAINING_PLACEHOLDER.to_string(),
            scale: MIN_SCALE,
            at: self.clock.now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_phase(&mut self) -> Vec<Event> {
        let Some(phase) = self.current_phase().copied() else {
            return Vec::new();
        };
        self.phase_started_ms = Some(self.clock.now_ms());
        tracing::debug!(phase = %phase.name, "phase started");

        let mut events = vec![Event::PhaseStarted {
            phase_index: self.phase_index,
            phase: phase.name,
            duration_secs: phase.duration_secs,
            at: self.clock.now(),
        }];
        events.extend(self.poll());
        events
    }

    fn poll(&mut self) -> Vec<Event> {
        let (Some(phase), Some(remaining_secs)) =
            (self.current_phase().copied(), self.remaining_secs())
        else {
            return Vec::new();
        };
        let progress = self.progress();
        let at = self.clock.now();

        let mut events = vec![Event::PhaseTick {
            phase: phase.name,
            remaining_secs,
            progress,
            scale: ring_scale(progress),
            at,
        }];

        if remaining_secs == 0 {
            events.push(Event::PhaseCompleted {
                phase_index: self.phase_index,
                phase: phase.name,
                at,
            });
            self.completed_phases += 1;
            self.phase_index = self.cycle.next_index(self.phase_index);
            self.phase_started_ms = None;
            self.schedule(ContinuationKind::Advance, self.timing.phase_gap_ms);
        } else {
            self.schedule(ContinuationKind::Poll, self.timing.poll_interval_ms);
        }
        events
    }

    fn schedule(&mut self, kind: ContinuationKind, delay_ms: u64) {
        self.next_id += 1;
        self.pending = Some(Continuation {
            id: self.next_id,
            kind,
            delay_ms,
        });
    }

    fn elapsed_ms(&self) -> Option<u64> {
        if self.state != RunnerState::Running {
            return None;
        }
        let start = self.phase_started_ms?;
        Some(self.clock.now_ms().saturating_sub(start))
    }
}

impl<C: Clock> ContinuationHost for BreathingRunner<C> {
    fn pending(&self) -> Option<Continuation> {
        BreathingRunner::pending(self)
    }

    fn fire(&mut self, id: u64) -> Vec<Event> {
        BreathingRunner::fire(self, id)
    }

    fn stop(&mut self) -> Vec<Event> {
        BreathingRunner::stop(self).into_iter().collect()
    }
}
