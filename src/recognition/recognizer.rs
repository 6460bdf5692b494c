// SpeciesRecognizer - ordered provider chain plus keyword mapping
//
// Chain order: primary model (if configured), then fallbacks in insertion
// order. A provider is skipped only when it fails, is not ready, or returns
// no predictions; a low-confidence answer is still an answer.

use std::sync::Arc;

use crate::config::RecognitionConfig;
use crate::error::{log_recognition_error, ErrorCode, RecognitionError};
use crate::recognition::mapping::SpeciesMapping;
use crate::recognition::model::LazyModel;
use crate::recognition::remote::RemoteClassifier;
use crate::recognition::{ClassificationResult, ImageClassifier, ImagePayload, ModelLoader};

/// Name given to the primary model built by `from_config`
pub const PRIMARY_MODEL_NAME: &str = "primary";

pub struct SpeciesRecognizer {
    mapping: SpeciesMapping,
    primary: Option<Arc<LazyModel>>,
    fallbacks: Vec<Arc<dyn ImageClassifier>>,
}

impl SpeciesRecognizer {
    /// Recognizer with no providers; add them with the `with_*` builders
    pub fn new(mapping: SpeciesMapping) -> Self {
        Self {
            mapping,
            primary: None,
            fallbacks: Vec::new(),
        }
    }

    /// Default mapping, optional primary model, remote fallback from config
    pub fn from_config(
        config: &RecognitionConfig,
        loader: Option<Arc<dyn ModelLoader>>,
    ) -> Result<Self, RecognitionError> {
        let mut recognizer = Self::new(SpeciesMapping::default());
        if let Some(loader) = loader {
            recognizer =
                recognizer.with_primary(Arc::new(LazyModel::new(PRIMARY_MODEL_NAME, loader)));
        }
        let remote = RemoteClassifier::from_config(config)?;
        Ok(recognizer.with_fallback(Arc::new(remote)))
    }

    /// Set (or replace) the primary model at the head of the chain
    pub fn with_primary(mut self, model: Arc<LazyModel>) -> Self {
        self.primary = Some(model);
        self
    }

    /// Append a provider to the end of the chain
    pub fn with_fallback(mut self, provider: Arc<dyn ImageClassifier>) -> Self {
        self.fallbacks.push(provider);
        self
    }

    pub fn mapping(&self) -> &SpeciesMapping {
        &self.mapping
    }

    pub fn primary(&self) -> Option<&Arc<LazyModel>> {
        self.primary.as_ref()
    }

    /// Provider names in the order they are tried
    pub fn provider_names(&self) -> Vec<String> {
        self.chain().iter().map(|p| p.name().to_string()).collect()
    }

    /// Load the primary model; concurrent callers share one attempt.
    ///
    /// # Errors
    /// `RecognitionError::ModelLoad` if no primary is configured or the load
    /// fails.
    pub async fn load_primary_model(&self) -> Result<(), RecognitionError> {
        match &self.primary {
            Some(model) => model.load().await,
            None => Err(RecognitionError::ModelLoad {
                reason: "no primary model configured".to_string(),
            }),
        }
    }

    /// Map a raw label without running any provider
    pub fn map_label(&self, label: &str, probability: f64) -> ClassificationResult {
        self.mapping.map_label(label, probability)
    }

    /// Classify an image through the provider chain.
    ///
    /// # Errors
    /// `RecognitionError::ClassificationUnavailable` when every provider
    /// failed; each attempt is listed in the error.
    pub async fn classify(
        &self,
        image: &ImagePayload,
    ) -> Result<ClassificationResult, RecognitionError> {
        let mut attempts = Vec::new();

        for provider in self.chain() {
            let failure = match provider.classify(image).await {
                Ok(predictions) => match predictions.into_iter().next() {
                    Some(top) => {
                        let result = self.mapping.map_label(&top.label, top.probability);
                        tracing::info!(
                            provider = provider.name(),
                            label = %top.label,
                            species = %result.species,
                            confidence = result.confidence,
                            "[SpeciesRecognizer] classified"
                        );
                        return Ok(result);
                    }
                    None => RecognitionError::NoPredictions {
                        provider: provider.name().to_string(),
                    },
                },
                Err(err) => err,
            };

            tracing::warn!(
                provider = provider.name(),
                code = failure.code(),
                "[SpeciesRecognizer] provider failed, advancing: {}",
                failure.message()
            );
            attempts.push(format!("{}: {}", provider.name(), failure.message()));
        }

        let err = RecognitionError::ClassificationUnavailable { attempts };
        log_recognition_error(&err, "SpeciesRecognizer::classify");
        Err(err)
    }

    fn chain(&self) -> Vec<&dyn ImageClassifier> {
        let mut chain: Vec<&dyn ImageClassifier> = Vec::with_capacity(self.fallbacks.len() + 1);
        if let Some(primary) = &self.primary {
            chain.push(&**primary);
        }
        for provider in &self.fallbacks {
            chain.push(&**provider);
        }
        chain
    }
}

#[cfg(test)]
#[path = "recognizer_tests.rs"]
mod tests;
