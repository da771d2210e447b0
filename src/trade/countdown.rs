//! Countdown timer scoped to the COUNTDOWN phase
//!
//! The session owns at most one [`Countdown`]. Dropping it aborts the
//! background ticker, and every tick carries the generation of the countdown
//! that produced it so a late tick from an earlier countdown is recognised
//! and discarded.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

/// One timer tick delivered to the desk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    pub generation: u64,
}

/// Handle to a running ticker; aborts the ticker when dropped
#[derive(Debug, Default)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    pub fn spawned(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// A handle with no background task, for externally driven ticks
    pub fn detached() -> Self {
        Self { task: None }
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts the periodic ticker for a countdown
pub trait TickScheduler: Send + Sync {
    fn schedule(&self, generation: u64) -> TimerHandle;
}

/// Ticks on a tokio interval and forwards them to a channel
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    period: Duration,
    sender: mpsc::Sender<CountdownTick>,
}

impl IntervalScheduler {
    pub fn new(period: Duration, sender: mpsc::Sender<CountdownTick>) -> Self {
        Self { period, sender }
    }
}

impl TickScheduler for IntervalScheduler {
    fn schedule(&self, generation: u64) -> TimerHandle {
        let period = self.period;
        let sender = self.sender.clone();

        let task = tokio::spawn(async move {
            // The first tick fires one full period after entry.
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                if sender.send(CountdownTick { generation }).await.is_err() {
                    debug!(generation, "Tick receiver dropped, stopping countdown ticker");
                    break;
                }
            }
        });

        TimerHandle::spawned(task)
    }
}

/// Scheduler that starts nothing; ticks are fed in by the caller
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualScheduler;

impl TickScheduler for ManualScheduler {
    fn schedule(&self, _generation: u64) -> TimerHandle {
        TimerHandle::detached()
    }
}

/// Result of applying one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Still counting; value to display
    Remaining(i32),
    /// The counter passed zero and the ticker has been stopped
    Elapsed,
}

/// A running countdown: counter plus the ticker that drives it
#[derive(Debug)]
pub struct Countdown {
    generation: u64,
    remaining: i32,
    handle: TimerHandle,
}

impl Countdown {
    pub fn start(start: i32, generation: u64, scheduler: &dyn TickScheduler) -> Self {
        Self {
            generation,
            remaining: start,
            handle: scheduler.schedule(generation),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Decrement; the tick that would reach -1 stops the ticker
    pub fn tick(&mut self) -> CountdownStep {
        let next = self.remaining - 1;
        if next == -1 {
            self.handle.cancel();
            return CountdownStep::Elapsed;
        }
        self.remaining = next;
        CountdownStep::Remaining(next)
    }
}
