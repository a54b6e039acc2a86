//! Timer engine implementation.
//!
//! The engine is a tick-driven state machine. It does not own a clock or a
//! thread: whoever drives it calls [`TimerEngine::tick`] once per elapsed
//! second while [`TimerEngine::wants_ticks`] is true.
//!
//! ## Mode Transitions
//!
//! ```text
//! Work --(complete, cycles % interval != 0)--> ShortBreak --(complete)--> Work
//! Work --(complete, cycles % interval == 0)--> LongBreak  --(complete)--> Work
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerSettings::default());
//! engine.toggle();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::TimerCompleted) when a countdown finishes
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::notifier::{Notifier, Silent};
use super::settings::{TimerMode, TimerSettings};
use crate::events::Event;

/// The mutable countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_secs: u64,
    pub is_active: bool,
    pub completed_work_cycles: u64,
}

/// Read-only view for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub is_active: bool,
    pub completed_work_cycles: u64,
    /// Position inside the current long-break interval.
    pub cycle_position: u64,
    pub long_break_interval: u32,
    /// 0.0 .. 1.0 through the current countdown.
    pub progress: f64,
    /// `MM:SS`
    pub display: String,
    pub sound_enabled: bool,
    pub settings: TimerSettings,
}

/// Core focus timer.
pub struct TimerEngine {
    settings: TimerSettings,
    state: TimerState,
    notifier: Box<dyn Notifier>,
    /// Whether completions play the cue. Not part of [`TimerState`].
    sound_enabled: bool,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("sound_enabled", &self.sound_enabled)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    /// Create an engine in work mode, full duration, inactive, zero cycles.
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            state: TimerState {
                mode: TimerMode::Work,
                remaining_secs: settings.duration_secs(TimerMode::Work),
                is_active: false,
                completed_work_cycles: 0,
            },
            notifier: Box::new(Silent),
            sound_enabled: true,
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    pub fn completed_work_cycles(&self) -> u64 {
        self.state.completed_work_cycles
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Configured length of the current mode, in seconds.
    pub fn total_secs(&self) -> u64 {
        self.settings.duration_secs(self.state.mode)
    }

    /// 0.0 .. 1.0 progress, measured against the current mode's configured
    /// duration. Clamped when settings shrank under a running countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs() as f64;
        ((total - self.state.remaining_secs as f64) / total).clamp(0.0, 1.0)
    }

    /// Completed cycles inside the current long-break interval.
    pub fn cycle_position(&self) -> u64 {
        self.state.completed_work_cycles % u64::from(self.settings.interval())
    }

    /// True while a tick source should be running.
    pub fn wants_ticks(&self) -> bool {
        self.state.is_active && self.state.remaining_secs > 0
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            total_secs: self.total_secs(),
            is_active: self.state.is_active,
            completed_work_cycles: self.state.completed_work_cycles,
            cycle_position: self.cycle_position(),
            long_break_interval: self.settings.interval(),
            progress: self.progress(),
            display: format_clock(self.state.remaining_secs),
            sound_enabled: self.sound_enabled,
            settings: self.settings,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter `target` with its full duration and apply the auto-start policy.
    pub fn switch_mode(&mut self, target: TimerMode) -> Event {
        self.state.mode = target;
        self.state.remaining_secs = self.settings.duration_secs(target);
        self.state.is_active = self.settings.auto_start(target);
        tracing::debug!(
            mode = ?target,
            remaining_secs = self.state.remaining_secs,
            active = self.state.is_active,
            "mode switched"
        );
        Event::ModeSwitched {
            mode: target,
            remaining_secs: self.state.remaining_secs,
            active: self.state.is_active,
            at: Utc::now(),
        }
    }

    /// Advance one second. Returns `Some(Event::TimerCompleted)` when the
    /// countdown reaches zero; the mode transition has already happened.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.wants_ticks() {
            return None;
        }
        self.state.remaining_secs -= 1;
        if self.state.remaining_secs == 0 {
            return Some(self.complete(false));
        }
        None
    }

    /// Pause or resume. No-op once the countdown is at zero.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.state.remaining_secs == 0 {
            return None;
        }
        self.state.is_active = !self.state.is_active;
        let mode = self.state.mode;
        let remaining_secs = self.state.remaining_secs;
        let at = Utc::now();
        if self.state.is_active {
            tracing::debug!(?mode, remaining_secs, "timer started");
            Some(Event::TimerStarted {
                mode,
                remaining_secs,
                at,
            })
        } else {
            tracing::debug!(?mode, remaining_secs, "timer paused");
            Some(Event::TimerPaused {
                mode,
                remaining_secs,
                at,
            })
        }
    }

    /// Stop and refill the current mode. Mode and cycles are kept.
    pub fn reset(&mut self) -> Event {
        self.state.is_active = false;
        self.state.remaining_secs = self.total_secs();
        Event::TimerReset {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Force completion of the current countdown.
    ///
    /// Counts exactly like a natural completion: the cue plays and a skipped
    /// work session still advances the cycle count.
    pub fn skip(&mut self) -> Event {
        self.state.is_active = false;
        self.complete(true)
    }

    /// Replace the settings. A countdown in progress keeps its remaining
    /// time; the new durations apply from the next switch or reset.
    pub fn update_settings(&mut self, settings: TimerSettings) -> Event {
        self.settings = settings;
        Event::SettingsUpdated {
            settings,
            at: Utc::now(),
        }
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    /// Flip the sound flag and return the new value.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, skipped: bool) -> Event {
        let finished = self.state.mode;
        if self.sound_enabled {
            if let Err(e) = self.notifier.play() {
                tracing::warn!(error = %e, "completion cue failed");
            }
        }

        let next = match finished {
            TimerMode::Work => {
                self.state.completed_work_cycles += 1;
                if self.state.completed_work_cycles % u64::from(self.settings.interval()) == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Work,
        };
        self.switch_mode(next);

        tracing::debug!(
            ?finished,
            ?next,
            skipped,
            cycles = self.state.completed_work_cycles,
            "countdown completed"
        );
        Event::TimerCompleted {
            finished,
            next,
            completed_work_cycles: self.state.completed_work_cycles,
            skipped,
            auto_started: self.state.is_active,
            at: Utc::now(),
        }
    }
}

/// `MM:SS`, with minutes allowed to exceed two digits.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
