use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::PersistentStore;

/// Store key the settings object lives under.
pub const SETTINGS_KEY: &str = "timer_settings";

/// The three countdown modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Work)
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "work" | "focus" => Ok(TimerMode::Work),
            "short" | "shortbreak" | "short-break" => Ok(TimerMode::ShortBreak),
            "long" | "longbreak" | "long-break" => Ok(TimerMode::LongBreak),
            _ => Err(ValidationError::InvalidSettingsValue {
                field: "mode".into(),
                message: format!("unknown mode '{s}' (expected work, short or long)"),
            }),
        }
    }
}

/// User-editable timer configuration.
///
/// Persisted as one JSON object. Every field is required when decoding: a
/// stored object with a missing or mistyped field is discarded as a whole in
/// favor of [`TimerSettings::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    /// Minutes.
    pub work_duration: u32,
    /// Minutes.
    pub short_break_duration: u32,
    /// Minutes.
    pub long_break_duration: u32,
    /// Work cycles per long break.
    pub long_break_interval: u32,
    pub auto_start_breaks: bool,
    pub auto_start_work: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
            long_break_interval: 4,
            auto_start_breaks: true,
            auto_start_work: true,
        }
    }
}

impl TimerSettings {
    /// Configured minutes for `mode`, as stored.
    pub fn duration_min(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_duration,
            TimerMode::ShortBreak => self.short_break_duration,
            TimerMode::LongBreak => self.long_break_duration,
        }
    }

    /// Countdown length for `mode` in seconds. Zero minutes counts as one.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        u64::from(self.duration_min(mode).max(1)) * 60
    }

    /// Long break interval, never below one.
    pub fn interval(&self) -> u32 {
        self.long_break_interval.max(1)
    }

    /// Whether entering `mode` starts the countdown immediately.
    pub fn auto_start(&self, mode: TimerMode) -> bool {
        if mode.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_work
        }
    }

    /// Reject zero durations and a zero interval.
    ///
    /// The engine itself tolerates such values; this is for callers that
    /// want to refuse them at input time.
    ///
    /// # Errors
    /// Returns the first field that is out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("workDuration", self.work_duration),
            ("shortBreakDuration", self.short_break_duration),
            ("longBreakDuration", self.long_break_duration),
            ("longBreakInterval", self.long_break_interval),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ValidationError::InvalidSettingsValue {
                    field: field.into(),
                    message: "must be at least 1".into(),
                });
            }
        }
        Ok(())
    }

    /// Copy with one field replaced, parsed from user input.
    ///
    /// `field` is `work`, `short`, `long`, `interval`, `auto-breaks` or
    /// `auto-work` (the camelCase storage names are accepted too). The
    /// result is validated as a whole.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidSettingsValue`] for an unknown
    /// field, an unparsable value, or a value out of range.
    pub fn with_field(&self, field: &str, value: &str) -> Result<Self, ValidationError> {
        let invalid = |message: String| ValidationError::InvalidSettingsValue {
            field: field.to_string(),
            message,
        };
        let minutes = || {
            value
                .parse::<u32>()
                .map_err(|_| invalid(format!("'{value}' is not a whole number")))
        };
        let flag = || {
            value
                .parse::<bool>()
                .map_err(|_| invalid(format!("'{value}' is not true or false")))
        };

        let mut next = *self;
        match field {
            "work" | "workDuration" => next.work_duration = minutes()?,
            "short" | "shortBreakDuration" => next.short_break_duration = minutes()?,
            "long" | "longBreakDuration" => next.long_break_duration = minutes()?,
            "interval" | "longBreakInterval" => next.long_break_interval = minutes()?,
            "auto-breaks" | "autoStartBreaks" => next.auto_start_breaks = flag()?,
            "auto-work" | "autoStartWork" => next.auto_start_work = flag()?,
            _ => return Err(invalid("unknown setting".into())),
        }
        next.validate()?;
        Ok(next)
    }

    /// Load from the store, falling back to defaults on absence or damage.
    pub fn load(store: &PersistentStore) -> Self {
        match store.load_json::<TimerSettings>(SETTINGS_KEY) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "discarding stored timer settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &PersistentStore) {
        store.save_json(SETTINGS_KEY, self);
    }
}
