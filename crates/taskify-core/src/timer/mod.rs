mod driver;
mod engine;
mod notifier;
mod settings;
mod ticker;

pub use driver::{FocusTimer, TICK_PERIOD};
pub use engine::{format_clock, TimerEngine, TimerSnapshot, TimerState};
pub use notifier::{Notifier, RecordingNotifier, Silent, TerminalBell};
pub use settings::{TimerMode, TimerSettings, SETTINGS_KEY};
pub use ticker::{ManualTicker, TickCallback, TickHandle, TickSource, TokioTicker};
