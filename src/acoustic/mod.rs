//! Acoustic monitoring - simulated forest sound detections.
//!
//! [`AcousticMonitor`] produces random spectrum frames for display and, while
//! listening, occasional [`SoundDetection`]s drawn from a fixed set of
//! [`SoundProfile`]s. Only the most recent detections are kept, newest first.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod monitor;

pub use monitor::AcousticMonitor;

/// Threat classification attached to a sound profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    Normal,
    Low,
    Medium,
    High,
    Critical,
}

/// A recognizable sound class and the band it occupies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundProfile {
    pub kind: String,
    pub frequency_band: String,
    pub threat: ThreatLevel,
}

impl SoundProfile {
    pub fn new(
        kind: impl Into<String>,
        frequency_band: impl Into<String>,
        threat: ThreatLevel,
    ) -> Self {
        Self {
            kind: kind.into(),
            frequency_band: frequency_band.into(),
            threat,
        }
    }

    /// The six profiles the monitor draws from by default
    pub fn defaults() -> Vec<SoundProfile> {
        vec![
            SoundProfile::new("Tiger Roar", "50-100 Hz", ThreatLevel::Low),
            SoundProfile::new("Elephant Call", "10-30 Hz", ThreatLevel::Low),
            SoundProfile::new("Gunshot", "500-2000 Hz", ThreatLevel::Critical),
            SoundProfile::new("Chainsaw", "2000-4000 Hz", ThreatLevel::High),
            SoundProfile::new("Vehicle Engine", "100-500 Hz", ThreatLevel::Medium),
            SoundProfile::new("Forest Ambience", "20-20000 Hz", ThreatLevel::Normal),
        ]
    }
}

/// One detection emitted while listening
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundDetection {
    pub id: String,
    #[serde(flatten)]
    pub profile: SoundProfile,
    pub timestamp: DateTime<Utc>,
    /// Integer percentage in [70, 99]
    pub confidence: u8,
}

/// Spectrum magnitudes for one display frame, each bin in [0, 100)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumFrame {
    pub bins: Vec<f32>,
}

impl SpectrumFrame {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Index and magnitude of the loudest bin
    pub fn peak(&self) -> Option<(usize, f32)> {
        self.bins
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles() {
        let profiles = SoundProfile::defaults();
        assert_eq!(profiles.len(), 6);

        let gunshot = profiles.iter().find(|p| p.kind == "Gunshot").unwrap();
        assert_eq!(gunshot.threat, ThreatLevel::Critical);
        assert_eq!(gunshot.frequency_band, "500-2000 Hz");

        let ambience = profiles.last().unwrap();
        assert_eq!(ambience.kind, "Forest Ambience");
        assert_eq!(ambience.threat, ThreatLevel::Normal);
    }

    #[test]
    fn test_threat_ordering() {
        assert!(ThreatLevel::Critical > ThreatLevel::High);
        assert!(ThreatLevel::Low > ThreatLevel::Normal);
    }

    #[test]
    fn test_spectrum_peak() {
        let frame = SpectrumFrame {
            bins: vec![1.0, 42.5, 7.0],
        };
        assert_eq!(frame.peak(), Some((1, 42.5)));
        assert_eq!(SpectrumFrame { bins: vec![] }.peak(), None);
    }

    #[test]
    fn test_detection_serializes_flat() {
        let detection = SoundDetection {
            id: "sound_1".to_string(),
            profile: SoundProfile::new("Chainsaw", "2000-4000 Hz", ThreatLevel::High),
            timestamp: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
            confidence: 88,
        };
        let json = serde_json::to_value(&detection).unwrap();
        assert_eq!(json["kind"], "Chainsaw");
        assert_eq!(json["threat"], "high");
        assert_eq!(json["confidence"], 88);
    }
}
