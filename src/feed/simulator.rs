// FeedSimulator - bounded, insertion-ordered buffer of synthetic events
//
// Each instance owns its generator, clock and buffer, so independent
// simulators never share ids or state. All operations are synchronous;
// the live runner serializes access through a Mutex held for one tick.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::config::{FeedConfig, TickMode};
use crate::error::FeedError;
use crate::feed::catalog::FeedCatalog;
use crate::feed::clock::{Clock, SystemClock};
use crate::feed::generator::{EventGenerator, EventSource, TypeSelection};
use crate::feed::stats::ActivityStats;
use crate::feed::{ActivityEvent, ActivityType};

/// Simulated activity feed with oldest-first eviction.
///
/// The buffer is ordered by insertion (oldest at the front). Seeded events
/// are back-dated, so insertion order and timestamp order can differ.
pub struct FeedSimulator {
    config: FeedConfig,
    generator: EventGenerator,
    clock: Arc<dyn Clock>,
    buffer: VecDeque<ActivityEvent>,
    evicted: u64,
}

impl FeedSimulator {
    /// Create a simulator with every collaborator injected.
    ///
    /// # Errors
    /// `FeedError::InvalidArgument` if the configuration fails validation.
    /// Catalog emptiness is already rejected by `FeedCatalog::new`.
    pub fn new(
        config: FeedConfig,
        catalog: FeedCatalog,
        rng: Box<dyn RngCore + Send>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, FeedError> {
        config.validate()?;
        let capacity = config.retention_cap.min(1024);

        tracing::debug!(
            retention_cap = config.retention_cap,
            tick_mode = ?config.tick_mode,
            locations = catalog.locations().len(),
            "[FeedSimulator] created"
        );

        Ok(Self {
            config,
            generator: EventGenerator::new(catalog, rng),
            clock,
            buffer: VecDeque::with_capacity(capacity),
            evicted: 0,
        })
    }

    /// Default catalog, entropy-seeded RNG and system clock
    pub fn with_config(config: FeedConfig) -> Result<Self, FeedError> {
        Self::new(
            config,
            FeedCatalog::default(),
            Box::new(StdRng::from_entropy()),
            Arc::new(SystemClock),
        )
    }

    /// Default catalog and system clock with a reproducible RNG
    pub fn seeded(config: FeedConfig, seed: u64) -> Result<Self, FeedError> {
        Self::new(
            config,
            FeedCatalog::default(),
            Box::new(StdRng::seed_from_u64(seed)),
            Arc::new(SystemClock),
        )
    }

    /// Generate `count` back-dated events and append them to the buffer.
    ///
    /// Timestamps are spread uniformly over the configured window before
    /// "now". Returned events are in generation order, which callers must not
    /// treat as a time ordering.
    pub fn seed(&mut self, count: usize) -> Vec<ActivityEvent> {
        let now = self.clock.now();
        let window_ms = i64::from(self.config.seed_window_hours) * 60 * 60 * 1000;

        // Pre-allocate no more than the buffer can hold
        let mut events = Vec::with_capacity(count.min(self.config.retention_cap));
        for _ in 0..count {
            let age_ms = self.generator.rng().gen_range(0..window_ms);
            let timestamp = now - ChronoDuration::milliseconds(age_ms);
            let event =
                self.generator
                    .generate(EventSource::Seed, TypeSelection::Uniform, now, timestamp);
            events.push(event);
        }

        self.append(&events);
        tracing::info!(
            count,
            buffered = self.buffer.len(),
            "[FeedSimulator] seeded initial activity"
        );
        events
    }

    /// `seed` for signed input (e.g. values read from a UI or config).
    ///
    /// # Errors
    /// `FeedError::InvalidArgument` for negative counts; nothing is generated.
    pub fn seed_checked(&mut self, count: i64) -> Result<Vec<ActivityEvent>, FeedError> {
        let count = usize::try_from(count).map_err(|_| {
            FeedError::invalid("count", format!("must not be negative (got {})", count))
        })?;
        Ok(self.seed(count))
    }

    /// Generate the events for one timer tick, stamped now.
    ///
    /// Steady mode yields one uniformly typed event; bursty mode yields
    /// 1..=max_burst benign-biased events.
    pub fn tick(&mut self) -> Vec<ActivityEvent> {
        let now = self.clock.now();
        let (count, selection) = match self.config.tick_mode {
            TickMode::Steady => (1, TypeSelection::Uniform),
            TickMode::Bursty => {
                let count = self.generator.rng().gen_range(1..=self.config.max_burst);
                (count, TypeSelection::Biased)
            }
        };

        let events: Vec<ActivityEvent> = (0..count)
            .map(|_| {
                self.generator
                    .generate(EventSource::Tick, selection, now, now)
            })
            .collect();

        self.append(&events);
        tracing::debug!(
            generated = events.len(),
            buffered = self.buffer.len(),
            "[FeedSimulator] tick"
        );
        events
    }

    /// Copy of the buffer, oldest first
    pub fn snapshot(&self) -> Vec<ActivityEvent> {
        self.buffer.iter().cloned().collect()
    }

    /// Up to `limit` most recently inserted events, newest first
    pub fn recent(&self, limit: usize) -> Vec<ActivityEvent> {
        self.buffer.iter().rev().take(limit).cloned().collect()
    }

    /// Buffered events of one type (`None` = all), oldest first
    pub fn filter_by_type(&self, activity_type: Option<ActivityType>) -> Vec<ActivityEvent> {
        self.buffer
            .iter()
            .filter(|e| activity_type.map_or(true, |t| e.activity_type == t))
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> ActivityStats {
        ActivityStats::from_events(&self.buffer)
    }

    /// Change the eviction threshold, evicting immediately if needed.
    ///
    /// # Errors
    /// `FeedError::InvalidArgument` for a zero cap; state is left unchanged.
    pub fn set_retention_cap(&mut self, cap: usize) -> Result<(), FeedError> {
        if cap == 0 {
            return Err(FeedError::invalid(
                "retention_cap",
                "must be greater than 0",
            ));
        }
        self.config.retention_cap = cap;
        self.enforce_cap();
        Ok(())
    }

    pub fn retention_cap(&self) -> usize {
        self.config.retention_cap
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.config.tick_interval_ms)
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Total events dropped by eviction over the simulator's lifetime
    pub fn evicted_count(&self) -> u64 {
        self.evicted
    }

    fn append(&mut self, events: &[ActivityEvent]) {
        self.buffer.extend(events.iter().cloned());
        self.enforce_cap();
    }

    fn enforce_cap(&mut self) {
        let excess = self.buffer.len().saturating_sub(self.config.retention_cap);
        if excess > 0 {
            self.buffer.drain(..excess);
            self.evicted += excess as u64;
        }
    }
}

#[cfg(test)]
#[path = "simulator_tests.rs"]
mod tests;
