//! Non-overlapping polling scheduler.
//!
//! A small explicit state machine (`Idle -> Running -> Idle`, or
//! `Stopping`) around a self-managed deadline rather than a deferred
//! callback timer - the non-overlap and graceful-stop guarantees are the
//! actual contract here.
//!
//! Tick semantics: the scheduler owns one logical execution slot. A tick
//! that comes due while a cycle is still running is not queued; at most
//! one overdue tick fires, immediately after the cycle completes.
//! Otherwise the next tick is measured from the end of the previous cycle
//! (end-relative, so slow cycles cannot pile up).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info};

/// Where the driver currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopping,
}

/// Drives a cycle function on a fixed cadence.
pub struct Scheduler {
    shutdown: watch::Sender<bool>,
    state: Arc<Mutex<SchedulerState>>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    /// Start ticking. The first tick fires one `interval` after start;
    /// each tick invokes `cycle` with a receiver that flips to `true`
    /// once [`stop`](Self::stop) has been requested, for cooperative
    /// cancellation between items.
    pub fn start<F, Fut>(interval: Duration, mut cycle: F) -> Self
    where
        F: FnMut(watch::Receiver<bool>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let cancel_rx = shutdown_rx.clone();
        let state = Arc::new(Mutex::new(SchedulerState::Idle));
        let task_state = Arc::clone(&state);

        let handle = tokio::spawn(async move {
            let mut next_due = Instant::now() + interval;
            loop {
                tokio::select! {
                    // Checked first so a pending stop always wins over a
                    // tick that is due at the same instant.
                    biased;

                    _ = shutdown_rx.changed() => {
                        break;
                    }
                    () = time::sleep_until(next_due) => {
                        *task_state.lock() = SchedulerState::Running;
                        let started = Instant::now();
                        cycle(cancel_rx.clone()).await;
                        *task_state.lock() = SchedulerState::Idle;

                        let now = Instant::now();
                        debug!(cycle_ms = now.duration_since(started).as_millis() as u64, "Cycle finished");
                        next_due = if now.duration_since(next_due) >= interval {
                            // A tick came due mid-cycle: fire it now, once.
                            now
                        } else {
                            now + interval
                        };
                    }
                }
            }
            *task_state.lock() = SchedulerState::Stopping;
            info!("Scheduler stopped");
        });

        Self {
            shutdown,
            state,
            handle,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    /// Request a graceful stop and wait for the driver to drain.
    ///
    /// No future tick will start a new cycle; a cycle already in progress
    /// is never interrupted, only awaited.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
