//! Binds a [`TimerEngine`] to a [`TickSource`].
//!
//! Ticks are wanted exactly while the engine is active with time left. After
//! every command the driver reconciles: it starts a schedule if none is live
//! and ticks are wanted, or cancels the live one if they are not. Commands
//! that begin a fresh countdown (skip, mode switch) drop the live schedule
//! first so the new countdown's first second is a full period. At most one
//! schedule is live per driver. A generation counter, read under the same
//! lock as the engine, makes a callback that was already in flight when its
//! schedule got cancelled return without touching state.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::broadcast;

use super::engine::{TimerEngine, TimerSnapshot, TimerState};
use super::notifier::Notifier;
use super::settings::{TimerMode, TimerSettings};
use super::ticker::{TickHandle, TickSource};
use crate::events::Event;
use crate::storage::PersistentStore;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const EVENT_CAPACITY: usize = 64;

struct Shared {
    engine: TimerEngine,
    ticker: Box<dyn TickSource>,
    live: Option<TickHandle>,
    generation: u64,
    shut_down: bool,
    events: broadcast::Sender<Event>,
}

impl Shared {
    fn publish(&self, event: Option<Event>) -> Option<Event> {
        if let Some(ev) = &event {
            // No subscribers is fine.
            let _ = self.events.send(ev.clone());
        }
        event
    }

    fn reconcile(&mut self, weak: &Weak<Mutex<Shared>>) {
        let wanted = !self.shut_down && self.engine.wants_ticks();
        match (wanted, self.live) {
            (true, None) => {
                self.generation += 1;
                let generation = self.generation;
                let weak = weak.clone();
                let handle = self
                    .ticker
                    .schedule(TICK_PERIOD, Box::new(move || on_tick(&weak, generation)));
                tracing::trace!(generation, "tick schedule started");
                self.live = Some(handle);
            }
            (false, Some(_)) => self.cancel_live(),
            _ => {}
        }
    }

    fn cancel_live(&mut self) {
        if let Some(handle) = self.live.take() {
            self.ticker.cancel(handle);
            self.generation += 1;
            tracing::trace!(generation = self.generation, "tick schedule cancelled");
        }
    }
}

fn on_tick(weak: &Weak<Mutex<Shared>>, generation: u64) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let mut guard = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if guard.live.is_none() || guard.generation != generation {
        return;
    }
    let event = guard.engine.tick();
    guard.publish(event);
    guard.reconcile(weak);
}

/// A focus timer with its own tick schedule and settings persistence.
///
/// Dropping it (or calling [`FocusTimer::shutdown`]) cancels the schedule;
/// no tick reaches the engine afterwards.
pub struct FocusTimer {
    shared: Arc<Mutex<Shared>>,
    store: PersistentStore,
}

impl FocusTimer {
    /// Build a timer from the settings stored in `store`.
    pub fn new(
        store: PersistentStore,
        ticker: impl TickSource + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        let settings = TimerSettings::load(&store);
        let engine = TimerEngine::new(settings).with_notifier(notifier);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Mutex::new(Shared {
                engine,
                ticker: Box::new(ticker),
                live: None,
                generation: 0,
                shut_down: false,
                events,
            })),
            store,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply(&self, command: impl FnOnce(&mut TimerEngine) -> Option<Event>) -> Option<Event> {
        self.run(false, command)
    }

    /// Like [`FocusTimer::apply`], for commands that start a new countdown.
    fn restart(&self, command: impl FnOnce(&mut TimerEngine) -> Option<Event>) -> Option<Event> {
        self.run(true, command)
    }

    fn run(
        &self,
        restart: bool,
        command: impl FnOnce(&mut TimerEngine) -> Option<Event>,
    ) -> Option<Event> {
        let mut shared = self.lock();
        if restart {
            shared.cancel_live();
        }
        let event = command(&mut shared.engine);
        let event = shared.publish(event);
        shared.reconcile(&Arc::downgrade(&self.shared));
        event
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock().engine.snapshot()
    }

    pub fn state(&self) -> TimerState {
        self.lock().engine.state()
    }

    pub fn settings(&self) -> TimerSettings {
        *self.lock().engine.settings()
    }

    /// True while a tick schedule is live.
    pub fn is_ticking(&self) -> bool {
        self.lock().live.is_some()
    }

    /// Receive every event the timer produces from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.lock().events.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn toggle(&self) -> Option<Event> {
        self.apply(TimerEngine::toggle)
    }

    pub fn reset(&self) -> Option<Event> {
        self.apply(|engine| Some(engine.reset()))
    }

    pub fn skip(&self) -> Option<Event> {
        self.restart(|engine| Some(engine.skip()))
    }

    pub fn switch_mode(&self, mode: TimerMode) -> Option<Event> {
        self.restart(|engine| Some(engine.switch_mode(mode)))
    }

    /// Replace and persist the settings.
    pub fn update_settings(&self, settings: TimerSettings) -> Option<Event> {
        settings.save(&self.store);
        self.apply(|engine| Some(engine.update_settings(settings)))
    }

    pub fn set_sound_enabled(&self, enabled: bool) {
        self.lock().engine.set_sound_enabled(enabled);
    }

    pub fn toggle_sound(&self) -> bool {
        self.lock().engine.toggle_sound()
    }

    /// Cancel the tick schedule for good. Later commands still update the
    /// engine but never start ticking again.
    pub fn shutdown(&self) {
        let mut shared = self.lock();
        shared.shut_down = true;
        shared.reconcile(&Arc::downgrade(&self.shared));
    }
}

impl Drop for FocusTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
