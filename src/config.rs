//! Configuration management for the simulators and recognition chain
//!
//! This module provides runtime configuration loading from JSON files so
//! retention, cadence and remote service settings can be adjusted without
//! recompilation. Missing or malformed files fall back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::FeedError;

/// Environment variable overriding the remote classification API key
pub const API_KEY_ENV: &str = "VANRAKSHAK_API_KEY";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub acoustic: AcousticConfig,
}

/// How many events a live tick produces and how their types are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    /// Exactly one event per tick, uniform type
    Steady,
    /// 1..=max_burst events per tick, benign-biased types
    Bursty,
}

/// Activity feed simulator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Maximum number of events retained before oldest-first eviction
    pub retention_cap: usize,
    /// Interval between live ticks in milliseconds
    pub tick_interval_ms: u64,
    pub tick_mode: TickMode,
    /// Upper bound of events per bursty tick
    pub max_burst: usize,
    /// Number of back-dated events for the initial view
    pub seed_count: usize,
    /// Seeds are spread uniformly over this many past hours
    pub seed_window_hours: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            retention_cap: 100,
            tick_interval_ms: 3000,
            tick_mode: TickMode::Steady,
            max_burst: 3,
            seed_count: 50,
            seed_window_hours: 24,
        }
    }
}

impl FeedConfig {
    /// Reject configurations the simulator cannot honor.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.retention_cap == 0 {
            return Err(FeedError::invalid("retention_cap", "must be greater than 0"));
        }
        if self.tick_interval_ms == 0 {
            return Err(FeedError::invalid(
                "tick_interval_ms",
                "must be greater than 0",
            ));
        }
        if self.max_burst == 0 {
            return Err(FeedError::invalid("max_burst", "must be at least 1"));
        }
        if self.seed_window_hours == 0 {
            return Err(FeedError::invalid(
                "seed_window_hours",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Recognition chain parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Remote classification endpoint
    pub remote_endpoint: String,
    /// API key for the remote endpoint; the remote path is unusable without it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Upper bound on a single remote call
    pub remote_timeout_ms: u64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            remote_endpoint: "https://api-inference.huggingface.co/models/microsoft/resnet-50"
                .to_string(),
            api_key: None,
            remote_timeout_ms: 10_000,
        }
    }
}

/// Acoustic monitor parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcousticConfig {
    /// Bins per spectrum frame
    pub spectrum_bins: usize,
    /// Chance that a poll while listening yields a detection
    pub detection_probability: f64,
    /// Detections kept, newest first
    pub history_len: usize,
    /// Poll cadence in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for AcousticConfig {
    fn default() -> Self {
        Self {
            spectrum_bins: 64,
            detection_probability: 0.3,
            history_len: 5,
            poll_interval_ms: 200,
        }
    }
}

impl AcousticConfig {
    /// Reject configurations the acoustic monitor cannot honor.
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.spectrum_bins == 0 {
            return Err(FeedError::invalid("spectrum_bins", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.detection_probability) {
            return Err(FeedError::invalid(
                "detection_probability",
                "must be within [0, 1]",
            ));
        }
        if self.history_len == 0 {
            return Err(FeedError::invalid("history_len", "must be at least 1"));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or defaults if the file is missing or invalid.
    /// The API key environment override is applied in both cases.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        };

        config.with_env_overrides(std::env::var(API_KEY_ENV).ok())
    }

    /// Load configuration from the default asset location
    pub fn load() -> Self {
        Self::load_from_file("assets/vanrakshak_config.json")
    }

    /// Apply an API key taken from the environment, if present and non-empty
    pub fn with_env_overrides(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            log::info!("[Config] Using remote API key from {}", API_KEY_ENV);
            self.recognition.api_key = Some(key);
        }
        self
    }
}
