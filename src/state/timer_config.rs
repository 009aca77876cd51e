//! Timer configuration and validation

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::Phase;

/// Configuration fields that can be rejected by validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigField {
    WorkDuration,
    ShortBreakDuration,
    LongBreakDuration,
    LongBreakInterval,
}

impl ConfigField {
    /// Name of the field as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::WorkDuration => "workDuration",
            ConfigField::ShortBreakDuration => "shortBreakDuration",
            ConfigField::LongBreakDuration => "longBreakDuration",
            ConfigField::LongBreakInterval => "longBreakInterval",
        }
    }

    /// Inclusive range of accepted values
    pub fn range(&self) -> (i64, i64) {
        match self {
            ConfigField::WorkDuration => (1, 60),
            ConfigField::ShortBreakDuration => (1, 30),
            ConfigField::LongBreakDuration => (1, 60),
            ConfigField::LongBreakInterval => (1, 10),
        }
    }

    fn range_reason(&self) -> String {
        let (min, max) = self.range();
        let unit = match self {
            ConfigField::LongBreakInterval => "sessions",
            _ => "minutes",
        };
        format!("Must be between {}-{} {}", min, max, unit)
    }

    fn check(&self, value: Option<i64>, errors: &mut Vec<FieldError>) -> u32 {
        let (min, max) = self.range();
        match value {
            None => {
                errors.push(FieldError::new(*self, "is required"));
                0
            }
            Some(v) if v < min || v > max => {
                errors.push(FieldError::new(*self, self.range_reason()));
                0
            }
            // in range, so the cast cannot truncate
            Some(v) => v as u32,
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected field and the reason it was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: ConfigField,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: ConfigField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Rejected configuration, carrying every offending field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration: {}", describe(.errors))]
pub struct ConfigError {
    pub errors: Vec<FieldError>,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigError {
    /// Names of the rejected fields, in declaration order
    pub fn fields(&self) -> Vec<ConfigField> {
        self.errors.iter().map(|e| e.field).collect()
    }

    /// Whether the given field was rejected
    pub fn names(&self, field: ConfigField) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Active timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    #[serde(rename = "workDuration", alias = "workMinutes")]
    pub work_minutes: u32,
    #[serde(rename = "shortBreakDuration", alias = "shortBreakMinutes")]
    pub short_break_minutes: u32,
    #[serde(rename = "longBreakDuration", alias = "longBreakMinutes")]
    pub long_break_minutes: u32,
    pub long_break_interval: u32,
    pub auto_start_next: bool,
}

impl TimerConfig {
    pub fn new(
        work_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        long_break_interval: u32,
        auto_start_next: bool,
    ) -> Self {
        Self {
            work_minutes,
            short_break_minutes,
            long_break_minutes,
            long_break_interval,
            auto_start_next,
        }
    }

    /// Check every numeric field against its range
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigDraft::from(*self).into_config().map(|_| ())
    }

    /// Length of a phase in seconds under this configuration
    pub fn duration_seconds(&self, phase: Phase) -> u64 {
        let minutes = match phase {
            Phase::Work => self.work_minutes,
            Phase::ShortBreak => self.short_break_minutes,
            Phase::LongBreak => self.long_break_minutes,
        };
        u64::from(minutes) * 60
    }

    /// Longest phase in seconds
    pub fn max_duration_seconds(&self) -> u64 {
        [Phase::Work, Phase::ShortBreak, Phase::LongBreak]
            .into_iter()
            .map(|p| self.duration_seconds(p))
            .max()
            .unwrap_or(0)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(25, 5, 15, 4, false)
    }
}

/// Stand-in for a value that is present but not an integer; always out of range
const NOT_AN_INTEGER: i64 = i64::MIN;

/// Accept whatever a settings form sends for a numeric field.
///
/// Null and blank strings count as empty, numeric strings are parsed, and
/// anything else that is not an integer becomes out of range.
fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim().parse().unwrap_or(NOT_AN_INTEGER)),
        Some(Value::Number(n)) => Some(n.as_i64().unwrap_or(NOT_AN_INTEGER)),
        Some(_) => Some(NOT_AN_INTEGER),
    })
}

/// Raw configuration input as submitted by a caller.
///
/// Numeric fields are optional and signed so that empty, negative,
/// fractional and oversized values all reach validation instead of failing
/// to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDraft {
    #[serde(
        default,
        rename = "workDuration",
        alias = "workMinutes",
        deserialize_with = "lenient_integer"
    )]
    pub work_minutes: Option<i64>,
    #[serde(
        default,
        rename = "shortBreakDuration",
        alias = "shortBreakMinutes",
        deserialize_with = "lenient_integer"
    )]
    pub short_break_minutes: Option<i64>,
    #[serde(
        default,
        rename = "longBreakDuration",
        alias = "longBreakMinutes",
        deserialize_with = "lenient_integer"
    )]
    pub long_break_minutes: Option<i64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub long_break_interval: Option<i64>,
    #[serde(default)]
    pub auto_start_next: bool,
}

impl ConfigDraft {
    /// Validate the draft, collecting every invalid field
    pub fn into_config(self) -> Result<TimerConfig, ConfigError> {
        let mut errors = Vec::new();

        let work = ConfigField::WorkDuration.check(self.work_minutes, &mut errors);
        let short = ConfigField::ShortBreakDuration.check(self.short_break_minutes, &mut errors);
        let long = ConfigField::LongBreakDuration.check(self.long_break_minutes, &mut errors);
        let interval = ConfigField::LongBreakInterval.check(self.long_break_interval, &mut errors);

        if !errors.is_empty() {
            return Err(ConfigError { errors });
        }

        Ok(TimerConfig::new(work, short, long, interval, self.auto_start_next))
    }
}

impl From<TimerConfig> for ConfigDraft {
    fn from(config: TimerConfig) -> Self {
        Self {
            work_minutes: Some(i64::from(config.work_minutes)),
            short_break_minutes: Some(i64::from(config.short_break_minutes)),
            long_break_minutes: Some(i64::from(config.long_break_minutes)),
            long_break_interval: Some(i64::from(config.long_break_interval)),
            auto_start_next: config.auto_start_next,
        }
    }
}
