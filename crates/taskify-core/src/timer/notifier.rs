//! The audible completion cue.
//!
//! Playing the cue is best-effort. The engine logs a failed `play()` and
//! carries on with the transition.

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::NotifyError;

/// "Play a short audible cue."
pub trait Notifier: Send {
    fn play(&mut self) -> Result<(), NotifyError>;
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Notifier for TerminalBell {
    fn play(&mut self) -> Result<(), NotifyError> {
        let mut stderr = std::io::stderr();
        if !stderr.is_terminal() {
            return Err(NotifyError::Unavailable("stderr is not a terminal".into()));
        }
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// Does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Notifier for Silent {
    fn play(&mut self) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Counts cues instead of playing them. Clones share the counter.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    plays: Arc<AtomicUsize>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl Notifier for RecordingNotifier {
    fn play(&mut self) -> Result<(), NotifyError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
