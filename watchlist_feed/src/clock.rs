//! Shared clock service.
//!
//! One background task ticks at a fixed period and publishes the current wall-clock
//! time on a `watch` channel. Every row derives its elapsed-time label from the latest
//! tick, so there is one timer for the whole view instead of one per row.
//!
//! The task is owned by `ClockService`: dropping the service (or calling `stop`) aborts
//! it, so the recurring timer never outlives its owner.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Default tick period.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// One clock reading.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Tick {
    /// Number of ticks published before this one.
    pub seq: u64,
    /// Wall-clock time of the tick.
    pub now: DateTime<Utc>,
}

/// Handle to the running clock task.
pub struct ClockService {
    rx: watch::Receiver<Tick>,
    task: JoinHandle<()>,
}

impl ClockService {
    /// Start ticking every `period`. The first tick is published immediately.
    pub fn start(period: Duration) -> Self {
        let (tx, rx) = watch::channel(Tick {
            seq: 0,
            now: Utc::now(),
        });

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // consume the immediate first tick; the channel already holds seq 0
            ticker.tick().await;

            let mut seq = 0u64;
            loop {
                ticker.tick().await;
                seq += 1;
                let tick = Tick { seq, now: Utc::now() };
                if tx.send(tick).is_err() {
                    debug!("All clock subscribers dropped; clock stopping");
                    break;
                }
            }
        });

        debug!("Clock started with period {:?}", period);
        Self { rx, task }
    }

    /// Receiver of future ticks. Each view keeps its own.
    pub fn subscribe(&self) -> watch::Receiver<Tick> {
        self.rx.clone()
    }

    /// Latest tick.
    pub fn now(&self) -> Tick {
        *self.rx.borrow()
    }

    /// `true` once the tick task has ended.
    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }

    /// Abort the tick task.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for ClockService {
    fn drop(&mut self) {
        self.task.abort();
        debug!("Clock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_advance_once_per_period() {
        let clock = ClockService::start(Duration::from_secs(1));
        let mut rx = clock.subscribe();
        assert_eq!(clock.now().seq, 0);

        for expected in 1..=3 {
            rx.changed().await.unwrap();
            assert_eq!(rx.borrow_and_update().seq, expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_the_task() {
        let clock = ClockService::start(Duration::from_secs(1));
        let mut rx = clock.subscribe();
        clock.stop();
        assert!(rx.changed().await.is_err());
        assert!(clock.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_service_releases_the_timer() {
        let clock = ClockService::start(Duration::from_secs(1));
        let mut rx = clock.subscribe();
        drop(clock);
        assert!(rx.changed().await.is_err());
    }
}
