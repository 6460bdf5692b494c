//! Species recognition - maps generic image-classifier labels to wildlife
//! records through an ordered keyword table.
//!
//! Architecture:
//! - [`ImageClassifier`]: any capability returning ranked predictions
//! - [`LazyModel`]: primary on-device model, loaded once on demand
//! - [`RemoteClassifier`]: HTTP inference endpoint used as fallback
//! - [`SpeciesRecognizer`]: walks the provider chain, maps the top-1 label

use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::RecognitionError;

pub mod mapping;
pub mod model;
pub mod recognizer;
pub mod remote;

pub use mapping::{SpeciesMapping, SpeciesProfile};
pub use model::LazyModel;
pub use recognizer::SpeciesRecognizer;
pub use remote::RemoteClassifier;

/// Wildlife record shown by the demo panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub species: String,
    /// Integer percentage in [0, 100]
    pub confidence: u8,
    pub behavior: String,
    pub location: String,
}

/// One ranked output of a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Probability in [0, 1]
    #[serde(alias = "score")]
    pub probability: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// Encoded image bytes handed to classifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read an image file, guessing the MIME type from its extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let bytes = std::fs::read(&path)?;
        let mime_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self::new(bytes, mime_type))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// `data:<mime>;base64,<payload>` as posted to the remote service
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }
}

/// Capability producing predictions ordered by descending probability.
///
/// Only the first prediction is used by the recognizer.
pub trait ImageClassifier: Send + Sync {
    /// Name used in logs and `ClassificationUnavailable` attempt lists
    fn name(&self) -> &str;

    fn classify<'a>(
        &'a self,
        image: &'a ImagePayload,
    ) -> BoxFuture<'a, Result<Vec<Prediction>, RecognitionError>>;
}

/// Produces a ready classifier; invoked at most once per successful load.
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> BoxFuture<'static, Result<Arc<dyn ImageClassifier>, RecognitionError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_encodes_bytes() {
        let image = ImagePayload::new(vec![0xff, 0xd8, 0xff], "image/jpeg");
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn prediction_accepts_remote_score_field() {
        let parsed: Vec<Prediction> =
            serde_json::from_str(r#"[{"label": "tiger, Panthera tigris", "score": 0.91}]"#)
                .unwrap();
        assert_eq!(parsed[0].label, "tiger, Panthera tigris");
        assert!((parsed[0].probability - 0.91).abs() < f64::EPSILON);
    }

    #[test]
    fn from_path_guesses_mime() {
        let path = std::env::temp_dir().join("vanrakshak_payload_test.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let image = ImagePayload::from_path(&path).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.bytes(), &[1, 2, 3]);
        let _ = std::fs::remove_file(&path);
    }
}
