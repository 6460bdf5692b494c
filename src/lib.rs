// Vanrakshak Core - wildlife monitoring simulators and species recognition
// Synthetic activity feed, acoustic monitor and image-label mapping chain

// Module declarations
pub mod acoustic;
pub mod config;
pub mod error;
pub mod feed;
pub mod recognition;

// Re-exports for convenience
pub use acoustic::{AcousticMonitor, SoundDetection, SoundProfile, SpectrumFrame, ThreatLevel};
pub use config::AppConfig;
pub use error::{ErrorCode, FeedError, RecognitionError};
pub use feed::{ActivityEvent, ActivityStats, ActivityType, FeedSimulator, LiveFeed, Severity};
pub use recognition::{
    ClassificationResult, ImageClassifier, ImagePayload, Prediction, SpeciesRecognizer,
};
