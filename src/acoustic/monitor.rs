// AcousticMonitor - listening state, spectrum frames and detection history
//
// poll() is the unit of simulated time: the caller drives it at the
// configured cadence. While listening each poll has a fixed chance of
// producing one detection; the history keeps the newest `history_len`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::acoustic::{SoundDetection, SoundProfile, SpectrumFrame};
use crate::config::AcousticConfig;
use crate::error::FeedError;
use crate::feed::{Clock, SystemClock};

const SPECTRUM_MAX: f32 = 100.0;

static NEXT_DETECTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub struct AcousticMonitor {
    config: AcousticConfig,
    profiles: Vec<SoundProfile>,
    rng: Box<dyn RngCore + Send>,
    clock: Arc<dyn Clock>,
    listening: bool,
    history: VecDeque<SoundDetection>,
}

impl AcousticMonitor {
    /// # Errors
    /// `FeedError::InvalidArgument` for an invalid config,
    /// `FeedError::Configuration` for an empty profile list.
    pub fn new(
        config: AcousticConfig,
        profiles: Vec<SoundProfile>,
        rng: Box<dyn RngCore + Send>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, FeedError> {
        config.validate()?;
        if profiles.is_empty() {
            return Err(FeedError::Configuration {
                reason: "sound profile list is empty".to_string(),
            });
        }

        Ok(Self {
            history: VecDeque::with_capacity(config.history_len),
            config,
            profiles,
            rng,
            clock,
            listening: false,
        })
    }

    pub fn with_config(config: AcousticConfig) -> Result<Self, FeedError> {
        Self::new(
            config,
            SoundProfile::defaults(),
            Box::new(StdRng::from_entropy()),
            Arc::new(SystemClock),
        )
    }

    pub fn seeded(config: AcousticConfig, seed: u64) -> Result<Self, FeedError> {
        Self::new(
            config,
            SoundProfile::defaults(),
            Box::new(StdRng::seed_from_u64(seed)),
            Arc::new(SystemClock),
        )
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Begin a fresh listening session; previous detections are discarded.
    pub fn start_listening(&mut self) {
        self.history.clear();
        self.listening = true;
        tracing::info!("[AcousticMonitor] listening started");
    }

    /// Stop producing detections. History is kept for display.
    pub fn stop_listening(&mut self) {
        if self.listening {
            tracing::info!(
                detections = self.history.len(),
                "[AcousticMonitor] listening stopped"
            );
        }
        self.listening = false;
    }

    /// Uniform spectrum frame for the visualizer
    pub fn sample_spectrum(&mut self) -> SpectrumFrame {
        let rng = &mut self.rng;
        let bins = (0..self.config.spectrum_bins)
            .map(|_| rng.gen_range(0.0..SPECTRUM_MAX))
            .collect();
        SpectrumFrame { bins }
    }

    /// Advance one poll period. Returns the new detection, if any.
    pub fn poll(&mut self) -> Option<SoundDetection> {
        if !self.listening || !self.rng.gen_bool(self.config.detection_probability) {
            return None;
        }

        let index = self.rng.gen_range(0..self.profiles.len());
        let profile = self.profiles[index].clone();
        let confidence = self.rng.gen_range(70..=99);
        let timestamp = self.clock.now();

        let sequence = NEXT_DETECTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let detection = SoundDetection {
            id: format!("sound_{}_{}", sequence, timestamp.timestamp_millis()),
            profile,
            timestamp,
            confidence,
        };

        tracing::debug!(
            kind = %detection.profile.kind,
            threat = ?detection.profile.threat,
            confidence,
            "[AcousticMonitor] sound detected"
        );

        self.history.push_front(detection.clone());
        self.history.truncate(self.config.history_len);
        Some(detection)
    }

    /// Recent detections, newest first
    pub fn history(&self) -> Vec<SoundDetection> {
        self.history.iter().cloned().collect()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.poll_interval_ms)
    }

    pub fn profiles(&self) -> &[SoundProfile] {
        &self.profiles
    }
}
