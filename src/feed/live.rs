//! LiveFeed - drives `FeedSimulator::tick` on a recurring timer.
//!
//! The runner locks the shared simulator only for the duration of a single
//! synchronous tick, then publishes the new events on a broadcast channel.
//! `stop()` (or dropping the handle) cancels the timer; no events are
//! produced after it returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{log_feed_error, FeedError};
use crate::feed::simulator::FeedSimulator;
use crate::feed::ActivityEvent;

/// Buffer size of the live event channel; slow subscribers lag beyond this
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Handle to a running timer task.
pub struct LiveFeed {
    simulator: Arc<Mutex<FeedSimulator>>,
    shutdown: Arc<AtomicBool>,
    task: JoinHandle<()>,
    events_tx: broadcast::Sender<ActivityEvent>,
}

impl LiveFeed {
    /// Spawn the timer on the current tokio runtime.
    ///
    /// The first tick fires one full interval after spawning, matching a
    /// display that renders the seeded view first.
    ///
    /// # Errors
    /// `FeedError::StatePoisoned` if the simulator lock is poisoned.
    ///
    /// # Panics
    /// Must be called from within a tokio runtime.
    pub fn spawn(simulator: Arc<Mutex<FeedSimulator>>) -> Result<Self, FeedError> {
        let period = simulator
            .lock()
            .map_err(|_| FeedError::StatePoisoned)?
            .tick_interval();
        Ok(Self::spawn_with_interval(simulator, period))
    }

    /// Spawn with an explicit period, overriding the simulator's configuration
    pub fn spawn_with_interval(simulator: Arc<Mutex<FeedSimulator>>, period: Duration) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(run_ticks(
            Arc::clone(&simulator),
            period,
            Arc::clone(&shutdown),
            events_tx.clone(),
        ));

        tracing::info!(period_ms = period.as_millis() as u64, "[LiveFeed] started");

        Self {
            simulator,
            shutdown,
            task,
            events_tx,
        }
    }

    /// Receive every event produced after subscribing
    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEvent> {
        self.events_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.load(Ordering::SeqCst) && !self.task.is_finished()
    }

    /// Cancel the timer. Idempotent.
    ///
    /// Waits for a tick already holding the simulator lock, so the buffer no
    /// longer changes once this returns. Must not be called while the caller
    /// holds the simulator lock.
    pub fn stop(&self) {
        if !self.shutdown.swap(true, Ordering::SeqCst) {
            tracing::info!("[LiveFeed] stopped");
        }
        // A poisoned lock still means no tick is in progress
        drop(self.simulator.lock());
        self.task.abort();
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticks(
    simulator: Arc<Mutex<FeedSimulator>>,
    period: Duration,
    shutdown: Arc<AtomicBool>,
    events_tx: broadcast::Sender<ActivityEvent>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        let events = match simulator.lock() {
            // stop() may have won the race for the lock
            Ok(_) if shutdown.load(Ordering::SeqCst) => break,
            Ok(mut sim) => sim.tick(),
            Err(_) => {
                log_feed_error(&FeedError::StatePoisoned, "LiveFeed::run_ticks");
                break;
            }
        };

        for event in events {
            // No subscribers is fine; the buffer still holds the event
            let _ = events_tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedConfig;

    fn shared_simulator() -> Arc<Mutex<FeedSimulator>> {
        Arc::new(Mutex::new(
            FeedSimulator::seeded(FeedConfig::default(), 21).expect("valid config"),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_interval() {
        let simulator = shared_simulator();
        let live = LiveFeed::spawn(Arc::clone(&simulator)).unwrap();
        let mut rx = live.subscribe();

        tokio::time::sleep(Duration::from_millis(9_500)).await;

        assert_eq!(simulator.lock().unwrap().len(), 3);
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 3);
        live.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_production() {
        let simulator = shared_simulator();
        let live = LiveFeed::spawn(Arc::clone(&simulator)).unwrap();

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        live.stop();
        let after_stop = simulator.lock().unwrap().len();
        assert!(!live.is_running());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(simulator.lock().unwrap().len(), after_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let simulator = shared_simulator();
        {
            let _live = LiveFeed::spawn_with_interval(
                Arc::clone(&simulator),
                Duration::from_millis(100),
            );
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        let len = simulator.lock().unwrap().len();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(simulator.lock().unwrap().len(), len);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_waits_out_tick_blocked_on_lock() {
        let simulator = shared_simulator();
        let (locked_tx, locked_rx) = std::sync::mpsc::channel();

        // Hold the simulator lock across the first tick so the timer task
        // is parked inside lock() when stop() is called
        let holder = {
            let simulator = Arc::clone(&simulator);
            std::thread::spawn(move || {
                let _guard = simulator.lock().unwrap();
                locked_tx.send(()).unwrap();
                std::thread::sleep(Duration::from_millis(150));
            })
        };
        locked_rx.recv().unwrap();

        let live = LiveFeed::spawn_with_interval(Arc::clone(&simulator), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(100)).await;

        live.stop();
        let at_stop = simulator.lock().unwrap().len();
        holder.join().unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(at_stop, 0);
        assert_eq!(simulator.lock().unwrap().len(), at_stop);
    }
}
