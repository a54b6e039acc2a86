use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerMode, TimerSettings};

/// Every timer state change produces an Event.
/// The presentation layer polls snapshots or subscribes to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: TimerMode,
        remaining_secs: u64,
        active: bool,
        at: DateTime<Utc>,
    },
    /// A countdown finished, either naturally or because it was skipped.
    TimerCompleted {
        finished: TimerMode,
        next: TimerMode,
        completed_work_cycles: u64,
        skipped: bool,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: TimerSettings,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at, .. }
            | Event::ModeSwitched { at, .. }
            | Event::TimerCompleted { at, .. }
            | Event::SettingsUpdated { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let ev = Event::TimerCompleted {
            finished: TimerMode::Work,
            next: TimerMode::ShortBreak,
            completed_work_cycles: 1,
            skipped: false,
            auto_started: true,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "TimerCompleted");
        assert_eq!(json["finished"], "work");
        assert_eq!(json["next"], "shortBreak");
    }

    #[test]
    fn at_reads_timestamp_of_any_variant() {
        let at = Utc::now();
        let events = [
            Event::ModeSwitched {
                mode: TimerMode::LongBreak,
                remaining_secs: 900,
                active: false,
                at,
            },
            Event::SettingsUpdated {
                settings: TimerSettings::default(),
                at,
            },
        ];
        for ev in events {
            assert_eq!(ev.at(), at);
        }
    }
}
