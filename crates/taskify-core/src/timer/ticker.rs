//! Periodic tick sources.
//!
//! A tick source runs a callback once per period until the handle it returned
//! is cancelled. [`TokioTicker`] spawns an interval task on a tokio runtime;
//! [`ManualTicker`] only fires when told to.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

/// Identifies one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

pub trait TickSource: Send {
    /// Run `callback` every `period`, starting one period from now.
    fn schedule(&mut self, period: Duration, callback: TickCallback) -> TickHandle;

    /// Stop a schedule. Unknown or already-cancelled handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

/// Tick source backed by `tokio::time::interval`.
pub struct TokioTicker {
    runtime: Handle,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
    next_id: u64,
}

impl TokioTicker {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            tasks: HashMap::new(),
            next_id: 0,
        }
    }

    /// Bind to the runtime the caller is running on, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Schedules not yet cancelled.
    pub fn live_count(&self) -> usize {
        self.tasks.len()
    }
}

impl TickSource for TokioTicker {
    fn schedule(&mut self, period: Duration, mut callback: TickCallback) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        let task = self.runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                callback();
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[derive(Default)]
struct ManualInner {
    next_id: u64,
    /// `None` while the callback is out being invoked.
    callbacks: BTreeMap<TickHandle, Option<TickCallback>>,
    scheduled_total: u64,
}

/// Tick source fired by hand. Clones share the same schedules, so one clone
/// can be handed to a driver and another kept to fire it.
#[derive(Clone, Default)]
pub struct ManualTicker {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Invoke every live callback once, in scheduling order.
    ///
    /// Callbacks run without the internal lock held, so they may schedule or
    /// cancel (including cancelling themselves).
    pub fn fire(&self) {
        let handles: Vec<TickHandle> = self.lock().callbacks.keys().copied().collect();
        for handle in handles {
            let taken = self
                .lock()
                .callbacks
                .get_mut(&handle)
                .and_then(Option::take);
            let Some(mut callback) = taken else {
                continue;
            };
            callback();
            if let Some(slot) = self.lock().callbacks.get_mut(&handle) {
                *slot = Some(callback);
            }
        }
    }

    /// Fire `n` times.
    pub fn fire_n(&self, n: usize) {
        for _ in 0..n {
            self.fire();
        }
    }

    /// Schedules not yet cancelled.
    pub fn live_count(&self) -> usize {
        self.lock().callbacks.len()
    }

    /// Schedules ever created.
    pub fn scheduled_total(&self) -> u64 {
        self.lock().scheduled_total
    }
}

impl TickSource for ManualTicker {
    fn schedule(&mut self, _period: Duration, callback: TickCallback) -> TickHandle {
        let mut inner = self.lock();
        inner.next_id += 1;
        inner.scheduled_total += 1;
        let handle = TickHandle(inner.next_id);
        inner.callbacks.insert(handle, Some(callback));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.lock().callbacks.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, TickCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (
            count,
            Box::new(move || {
                inner.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn manual_ticker_fires_until_cancelled() {
        let mut ticker = ManualTicker::new();
        let (count, cb) = counter();
        let handle = ticker.schedule(Duration::from_secs(1), cb);
        ticker.fire_n(3);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        ticker.cancel(handle);
        ticker.fire();
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(ticker.live_count(), 0);
        assert_eq!(ticker.scheduled_total(), 1);
    }

    #[test]
    fn manual_callback_may_cancel_itself() {
        let ticker = ManualTicker::new();
        let mut remote = ticker.clone();
        let slot: Arc<Mutex<Option<TickHandle>>> = Arc::default();
        let slot_in_cb = Arc::clone(&slot);
        let mut canceller = ticker.clone();
        let handle = remote.schedule(
            Duration::from_secs(1),
            Box::new(move || {
                if let Some(h) = *slot_in_cb.lock().unwrap() {
                    canceller.cancel(h);
                }
            }),
        );
        *slot.lock().unwrap() = Some(handle);
        ticker.fire();
        assert_eq!(ticker.live_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_ticks_each_period_and_stops_on_cancel() {
        let mut ticker = TokioTicker::try_current().expect("inside a runtime");
        let (count, cb) = counter();
        let handle = ticker.schedule(Duration::from_secs(1), cb);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        ticker.cancel(handle);
        assert_eq!(ticker.live_count(), 0);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_tokio_ticker_aborts_tasks() {
        let mut ticker = TokioTicker::try_current().expect("inside a runtime");
        let (count, cb) = counter();
        ticker.schedule(Duration::from_secs(1), cb);
        drop(ticker);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
