//! Rotation Scheduler
//!
//! Clears one shard per tick, round-robin, so the store forgets keys
//! gradually over a rolling window of `S × D` instead of all at once.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::domain::ShardedBloomFilter;
use crate::events::FilterEvent;
use crate::metrics::Metrics;
use crate::ports::EventSink;

/// Periodic shard flusher, not yet running
pub struct RotationScheduler {
    filter: Arc<ShardedBloomFilter>,
    period: Duration,
    sink: Arc<dyn EventSink<FilterEvent>>,
    metrics: Arc<Metrics>,
}

impl RotationScheduler {
    pub fn new(
        filter: Arc<ShardedBloomFilter>,
        period: Duration,
        sink: Arc<dyn EventSink<FilterEvent>>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            filter,
            period,
            sink,
            metrics,
        }
    }

    /// Spawn the flush loop on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime with a time driver, or with
    /// a zero period. Both are construction bugs, not runtime conditions.
    pub fn start(self) -> RotationHandle {
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => panic!("rotation scheduler started without a timer driver: {e}"),
        };
        assert!(
            !self.period.is_zero(),
            "rotation scheduler started with a zero flush interval"
        );

        // The first flush happens one full period after start
        let mut timer = interval_at(Instant::now() + self.period, self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let (stop_tx, stop_rx) = watch::channel(false);
        let cursor = Arc::new(AtomicUsize::new(0));
        let ticks = Arc::new(AtomicU64::new(0));

        let task = runtime.spawn(rotate(
            self,
            timer,
            stop_rx,
            Arc::clone(&cursor),
            Arc::clone(&ticks),
        ));

        RotationHandle {
            stop_tx,
            cursor,
            ticks,
            task: Some(task),
        }
    }
}

async fn rotate(
    scheduler: RotationScheduler,
    mut timer: Interval,
    mut stop_rx: watch::Receiver<bool>,
    cursor: Arc<AtomicUsize>,
    ticks: Arc<AtomicU64>,
) {
    let shard_count = scheduler.filter.shard_count();

    loop {
        tokio::select! {
            biased;

            changed = stop_rx.changed() => {
                // A dropped handle counts as a stop request
                if changed.is_err() || *stop_rx.borrow_and_update() {
                    break;
                }
            }

            _ = timer.tick() => {
                let index = cursor.load(Ordering::Acquire);
                let elements_forgotten = scheduler.filter.flush(index);
                cursor.store((index + 1) % shard_count, Ordering::Release);
                ticks.fetch_add(1, Ordering::Relaxed);

                scheduler.metrics.record_flush(elements_forgotten);
                scheduler.sink.emit(FilterEvent::ShardFlushed {
                    index,
                    elements_forgotten,
                });
            }
        }
    }

    drop(timer);
    scheduler.sink.emit(FilterEvent::RotationStopped {
        ticks: ticks.load(Ordering::Relaxed),
    });
}

/// Control handle of a running rotation scheduler
///
/// Dropping the handle also stops the scheduler.
#[derive(Debug)]
pub struct RotationHandle {
    stop_tx: watch::Sender<bool>,
    cursor: Arc<AtomicUsize>,
    ticks: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl RotationHandle {
    /// Ask the scheduler to stop. Idempotent; returns `true` only for the
    /// call that actually requested the stop.
    pub fn stop(&self) -> bool {
        !self.stop_tx.send_replace(true)
    }

    /// Whether a stop has been requested
    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Index of the shard the next tick will flush
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Number of ticks processed so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Stop the scheduler and wait until its task has released the timer
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "rotation task ended abnormally");
            }
        }
    }
}
