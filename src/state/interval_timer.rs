//! Pomodoro interval timer state machine
//!
//! The machine owns its configuration and countdown state and has no notion
//! of wall-clock time: something outside calls [`IntervalTimer::tick`] once
//! per elapsed second while the timer is running. Phase transitions are
//! reported through a [`PhaseNotifier`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ConfigError, Phase, PhaseChange, TimerConfig, TimerState};

/// Receiver of phase-change notifications
pub trait PhaseNotifier {
    fn notify(&mut self, change: &PhaseChange);
}

impl PhaseNotifier for () {
    fn notify(&mut self, _change: &PhaseChange) {}
}

impl PhaseNotifier for Vec<PhaseChange> {
    fn notify(&mut self, change: &PhaseChange) {
        self.push(*change);
    }
}

/// Point-in-time view of a timer for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    #[serde(flatten)]
    pub state: TimerState,
    pub label: String,
    pub display: String,
    pub next_phase: Phase,
    pub session_in_cycle: u32,
    pub config: TimerConfig,
    pub tip: String,
}

/// Work / short break / long break countdown cycle
#[derive(Debug)]
pub struct IntervalTimer<N = ()> {
    config: TimerConfig,
    state: TimerState,
    notifier: N,
}

impl IntervalTimer<()> {
    /// Create a timer that discards phase notifications
    pub fn new(config: TimerConfig) -> Result<Self, ConfigError> {
        Self::with_notifier(config, ())
    }
}

impl<N: PhaseNotifier> IntervalTimer<N> {
    /// Create a timer that reports transitions to `notifier`
    pub fn with_notifier(config: TimerConfig, notifier: N) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: TimerState::new(config.duration_seconds(Phase::Work)),
            config,
            notifier,
        })
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Begin counting down. Returns whether the timer was started.
    pub fn start(&mut self) -> bool {
        if self.state.running || self.state.remaining_seconds == 0 {
            return false;
        }
        self.state.running = true;
        debug!("Timer started in {} with {}s left", self.state.phase, self.state.remaining_seconds);
        true
    }

    /// Stop counting down. Returns whether the timer was running.
    pub fn pause(&mut self) -> bool {
        if !self.state.running {
            return false;
        }
        self.state.running = false;
        debug!("Timer paused in {} with {}s left", self.state.phase, self.state.remaining_seconds);
        true
    }

    /// Start if stopped, pause if running. Returns the new running flag.
    pub fn toggle(&mut self) -> bool {
        if self.state.running {
            self.pause();
        } else {
            self.start();
        }
        self.state.running
    }

    /// Advance the countdown by one second.
    ///
    /// Does nothing unless running with time left. When the countdown
    /// reaches zero the phase transition runs before returning, and the
    /// emitted notification is returned as well.
    pub fn tick(&mut self) -> Option<PhaseChange> {
        if !self.state.running || self.state.remaining_seconds == 0 {
            return None;
        }
        self.state.remaining_seconds -= 1;
        if self.state.remaining_seconds == 0 {
            Some(self.on_expire())
        } else {
            None
        }
    }

    fn on_expire(&mut self) -> PhaseChange {
        let next = match self.state.phase {
            Phase::Work => {
                self.state.completed_work_sessions += 1;
                if self.long_break_due(self.state.completed_work_sessions) {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };

        self.state.phase = next;
        self.state.remaining_seconds = self.config.duration_seconds(next);

        let change = PhaseChange {
            new_phase: next,
            completed_work_sessions: self.state.completed_work_sessions,
        };
        info!(
            "Phase complete, entering {} ({} work sessions done)",
            next, self.state.completed_work_sessions
        );
        self.notifier.notify(&change);

        self.state.running = self.config.auto_start_next;
        change
    }

    fn long_break_due(&self, completed: u32) -> bool {
        completed % self.config.long_break_interval == 0
    }

    /// Return to the first work phase of a fresh cycle
    pub fn reset(&mut self) {
        self.state = TimerState::new(self.config.duration_seconds(Phase::Work));
    }

    /// Replace the configuration.
    ///
    /// A stopped timer restarts its cycle under the new configuration; a
    /// running timer keeps its current countdown and the new durations
    /// apply from the next phase on. Rejected configurations leave
    /// everything unchanged.
    pub fn apply_config(&mut self, config: TimerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        if !self.state.running {
            self.reset();
        }
        info!("Timer configuration applied: {:?}", self.config);
        Ok(())
    }

    /// Phase that follows the current one if it expired now
    pub fn next_phase(&self) -> Phase {
        match self.state.phase {
            Phase::Work if self.long_break_due(self.state.completed_work_sessions + 1) => {
                Phase::LongBreak
            }
            Phase::Work => Phase::ShortBreak,
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        }
    }

    /// Position within the current long-break cycle, counting from 1
    pub fn session_in_cycle(&self) -> u32 {
        let done = self.state.completed_work_sessions % self.config.long_break_interval;
        match self.state.phase {
            Phase::Work => done + 1,
            // a long break closes the cycle
            Phase::LongBreak => self.config.long_break_interval,
            Phase::ShortBreak => done,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state.clone(),
            label: self.state.phase.label().to_string(),
            display: self.state.display(),
            next_phase: self.next_phase(),
            session_in_cycle: self.session_in_cycle(),
            config: self.config,
            tip: self.tip(),
        }
    }

    /// Advice line shown next to the timer
    pub fn tip(&self) -> String {
        let c = &self.config;
        let done = self.state.completed_work_sessions;
        if done > 0 && self.long_break_due(done) {
            format!(
                "After {} work sessions, take a {} minute break!",
                c.long_break_interval, c.long_break_minutes
            )
        } else {
            format!(
                "Follow the Pomodoro technique: {} minutes work, {} minutes break. Repeat {} times then take a {} minute break.",
                c.work_minutes, c.short_break_minutes, c.long_break_interval, c.long_break_minutes
            )
        }
    }
}
