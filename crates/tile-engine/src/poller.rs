//! Periodic driver for the [`Reconciler`].
//!
//! The poller owns the reconciler behind an async mutex and runs one tick per
//! interval on a spawned task. Ticks never overlap: the single task awaits
//! each tick before waiting for the next interval, and intervals that elapse
//! during a slow tick are skipped rather than queued.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tile_geom::Rect;
use tile_ids::WindowId;
use tokio::{
    sync::{Mutex as AsyncMutex, broadcast},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    reconcile::{Reconciler, TickOutcome},
    windows::frames_changed,
};

/// Capacity of the event channel. Slow subscribers lag rather than block.
const EVENT_BUFFER: usize = 256;

/// Events published by the poller for debug consumers.
#[derive(Clone, Debug, PartialEq)]
pub enum ReconcileEvent {
    /// Polling started; drag state was reset.
    Started,
    /// Polling stopped; drag state was reset.
    Stopped,
    /// Outcome of one tick.
    Tick(TickOutcome),
    /// The tracked frames moved by more than the change tolerance.
    LayoutChanged {
        /// Tracked frames after the tick, consumer space.
        frames: BTreeMap<WindowId, Rect>,
    },
}

/// A running poll task.
struct PollTask {
    /// Cancels the loop.
    token: CancellationToken,
    /// The spawned loop.
    handle: JoinHandle<()>,
}

/// Idle/polling state machine around a [`Reconciler`].
pub struct Poller {
    /// Shared with the poll task.
    reconciler: Arc<AsyncMutex<Reconciler>>,
    /// Event fan-out.
    events: broadcast::Sender<ReconcileEvent>,
    /// Present while polling.
    task: Mutex<Option<PollTask>>,
}

impl Poller {
    /// Wrap a reconciler. Polling does not start until [`Poller::start`].
    pub fn new(reconciler: Reconciler) -> Self {
        let (events, _rx) = broadcast::channel(EVENT_BUFFER);
        Self {
            reconciler: Arc::new(AsyncMutex::new(reconciler)),
            events,
            task: Mutex::new(None),
        }
    }

    /// Subscribe to tick outcomes and layout changes.
    pub fn subscribe(&self) -> broadcast::Receiver<ReconcileEvent> {
        self.events.subscribe()
    }

    /// Shared handle to the reconciler.
    pub fn reconciler(&self) -> Arc<AsyncMutex<Reconciler>> {
        self.reconciler.clone()
    }

    /// Whether a poll task is running.
    pub fn is_polling(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|t| !t.token.is_cancelled() && !t.handle.is_finished())
    }

    /// Reset drag state and start polling, replacing any running poll task.
    pub async fn start(&self) {
        let mut r = self.reconciler.lock().await;
        self.cancel_task();
        r.reset();
        let interval = r.config().poll_interval();
        let tolerance = r.config().change_tolerance;
        drop(r);

        let token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.reconciler.clone(),
            self.events.clone(),
            token.clone(),
            interval,
            tolerance,
        ));
        *self.task.lock() = Some(PollTask { token, handle });
        debug!(interval_ms = interval.as_millis(), "poller started");
        self.events.send(ReconcileEvent::Started).ok();
    }

    /// Stop polling and reset drag state.
    ///
    /// Cancellation and reset happen while holding the reconciler lock, so an
    /// in-flight tick finishes first and no tick runs after the reset.
    pub async fn stop(&self) {
        let mut r = self.reconciler.lock().await;
        let was_polling = self.cancel_task();
        r.reset();
        drop(r);
        if was_polling {
            debug!("poller stopped");
            self.events.send(ReconcileEvent::Stopped).ok();
        }
    }

    /// Reset drag state without changing the polling state, for use when a
    /// layout preview moves windows outside of a drag.
    pub async fn reset(&self) {
        self.reconciler.lock().await.reset();
    }

    /// Cancel the running task, if any. Returns whether one was running.
    fn cancel_task(&self) -> bool {
        match self.task.lock().take() {
            Some(t) => {
                t.token.cancel();
                true
            }
            None => false,
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel_task();
    }
}

/// Tick the reconciler on every interval until cancelled.
async fn poll_loop(
    reconciler: Arc<AsyncMutex<Reconciler>>,
    events: broadcast::Sender<ReconcileEvent>,
    cancel: CancellationToken,
    interval: Duration,
    change_tolerance: f64,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                trace!("poll loop cancelled");
                return;
            }
            _ = ticker.tick() => {
                let mut r = reconciler.lock().await;
                if cancel.is_cancelled() {
                    return;
                }
                let before = r.state().previous.clone();
                let outcome = r.tick().await;
                let after = &r.state().previous;
                let changed = frames_changed(&before, after, change_tolerance);
                let frames: BTreeMap<WindowId, Rect> =
                    after.iter().map(|(id, rect)| (*id, *rect)).collect();
                drop(r);

                events.send(ReconcileEvent::Tick(outcome)).ok();
                if changed {
                    events.send(ReconcileEvent::LayoutChanged { frames }).ok();
                }
            }
        }
    }
}
