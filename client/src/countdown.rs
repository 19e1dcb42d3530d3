//! Reusable one-second countdown for code-resend and verification timers.
//!
//! The countdown runs on its own tokio task and publishes every tick through
//! a `watch` channel. Dropping the `Countdown` aborts the task, so a screen
//! that goes away never receives a late update.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pastus_core::format::format_remaining;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    Expired,
}

/// Value published on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub remaining: u32,
    pub state: CountdownState,
}

#[derive(Debug)]
pub struct Countdown {
    initial: u32,
    tx: Arc<watch::Sender<Tick>>,
    /// Bumped by every start and reset; a task only publishes for its own run.
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        let (tx, _) = watch::channel(Tick {
            remaining: seconds,
            state: CountdownState::Idle,
        });
        Self {
            initial: seconds,
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    /// Start from the full duration. Starting again while running restarts
    /// the count, which is what a "resend code" button wants.
    ///
    /// `on_elapsed` runs once, on the countdown task, when zero is reached.
    pub fn start<F>(&mut self, on_elapsed: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.abort();
        if self.initial == 0 {
            on_elapsed();
            self.tx.send_replace(Tick {
                remaining: 0,
                state: CountdownState::Expired,
            });
            return;
        }

        self.tx.send_replace(Tick {
            remaining: self.initial,
            state: CountdownState::Running,
        });
        let tx = Arc::clone(&self.tx);
        let generation = Arc::clone(&self.generation);
        let run = generation.load(Ordering::SeqCst);
        let mut remaining = self.initial;
        let mut on_elapsed = Some(on_elapsed);
        let period = Duration::from_secs(1);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            let current = || generation.load(Ordering::SeqCst) == run;
            loop {
                ticker.tick().await;
                remaining -= 1;
                let state = if remaining == 0 {
                    if !current() {
                        return;
                    }
                    if let Some(callback) = on_elapsed.take() {
                        callback();
                    }
                    CountdownState::Expired
                } else {
                    CountdownState::Running
                };
                // Checked under the channel lock so a stale run cannot
                // overwrite what reset or a restart published.
                let published = tx.send_if_modified(|tick| {
                    if !current() {
                        return false;
                    }
                    *tick = Tick { remaining, state };
                    true
                });
                if !published || state == CountdownState::Expired {
                    debug!(remaining, ?state, "countdown task finished");
                    return;
                }
            }
        }));
    }

    /// Stop and return to idle at the initial value.
    pub fn reset(&mut self) {
        self.abort();
        self.tx.send_replace(Tick {
            remaining: self.initial,
            state: CountdownState::Idle,
        });
    }

    pub fn remaining(&self) -> u32 {
        self.tx.borrow().remaining
    }

    pub fn state(&self) -> CountdownState {
        self.tx.borrow().state
    }

    /// `m : ss` text for the timer label.
    pub fn label(&self) -> String {
        format_remaining(self.remaining())
    }

    pub fn subscribe(&self) -> watch::Receiver<Tick> {
        self.tx.subscribe()
    }

    fn abort(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.abort();
    }
}
