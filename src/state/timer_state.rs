//! Timer state structure and phase definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of the interval cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Phase::Work)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Runtime state of the interval timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub running: bool,
    pub completed_work_sessions: u32,
}

impl TimerState {
    /// Create a stopped timer at the start of a work phase
    pub fn new(work_seconds: u64) -> Self {
        Self {
            phase: Phase::Work,
            remaining_seconds: work_seconds,
            running: false,
            completed_work_sessions: 0,
        }
    }

    /// Check if the timer is counting down
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Remaining time as `MM:SS`
    pub fn display(&self) -> String {
        format_remaining(self.remaining_seconds)
    }
}

/// Format seconds as zero-padded `MM:SS`
pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Notification emitted on every phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseChange {
    pub new_phase: Phase,
    pub completed_work_sessions: u32,
}

impl PhaseChange {
    /// Default alert text for the new phase
    pub fn message(&self) -> &'static str {
        match self.new_phase {
            Phase::Work => "Time to focus! Work session started",
            Phase::ShortBreak => "Take a short break! You've earned it",
            Phase::LongBreak => "Take a long break! Relax and recharge",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_remaining(90), "01:30");
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(1500), "25:00");
        assert_eq!(format_remaining(59), "00:59");
        assert_eq!(format_remaining(3600), "60:00");
    }

    #[test]
    fn new_state_is_stopped_work() {
        let state = TimerState::new(300);
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.display(), "05:00");
        assert!(!state.is_running());
        assert_eq!(state.completed_work_sessions, 0);
    }

    #[test]
    fn phases_serialize_in_camel_case() {
        assert_eq!(serde_json::to_string(&Phase::ShortBreak).unwrap(), "\"shortBreak\"");
        let change = PhaseChange {
            new_phase: Phase::LongBreak,
            completed_work_sessions: 4,
        };
        let json = serde_json::to_value(change).unwrap();
        assert_eq!(json["newPhase"], "longBreak");
        assert_eq!(change.message(), "Take a long break! Relax and recharge");
    }
}
