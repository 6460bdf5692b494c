// RemoteClassifier - HTTP inference endpoint used as the fallback provider
//
// Request:  POST <endpoint>, Authorization: Bearer <key>,
//           body {"inputs": "data:<mime>;base64,<image>"}
// Response: [{"label": "...", "score": 0.97}, ...] ordered by score
//
// No retries: a failed call is reported and the caller decides.

use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::json;

use crate::config::RecognitionConfig;
use crate::error::RecognitionError;
use crate::recognition::{ImageClassifier, ImagePayload, Prediction};

pub struct RemoteClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl RemoteClassifier {
    pub const NAME: &'static str = "remote";

    /// Build a client bounded by `timeout` for the whole request.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RecognitionError> {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|err| RecognitionError::Remote {
                provider: Self::NAME.to_string(),
                reason: format!("failed to build HTTP client: {}", err),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|key| !key.is_empty()),
            timeout,
        })
    }

    pub fn from_config(config: &RecognitionConfig) -> Result<Self, RecognitionError> {
        Self::new(
            config.remote_endpoint.clone(),
            config.api_key.clone(),
            Duration::from_millis(config.remote_timeout_ms),
        )
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, image: &ImagePayload) -> Result<Vec<Prediction>, RecognitionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RecognitionError::MissingCredentials {
                provider: Self::NAME.to_string(),
            })?;

        tracing::debug!(
            endpoint = %self.endpoint,
            bytes = image.bytes().len(),
            "[RemoteClassifier] sending image"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&json!({ "inputs": image.to_data_url() }))
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::RemoteStatus {
                provider: Self::NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let predictions: Vec<Prediction> = response
            .json()
            .await
            .map_err(|err| self.transport_error(err))?;

        tracing::debug!(
            count = predictions.len(),
            "[RemoteClassifier] received predictions"
        );
        Ok(predictions)
    }

    fn transport_error(&self, err: reqwest::Error) -> RecognitionError {
        if err.is_timeout() {
            RecognitionError::Timeout {
                provider: Self::NAME.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            RecognitionError::Remote {
                provider: Self::NAME.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

impl ImageClassifier for RemoteClassifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn classify<'a>(
        &'a self,
        image: &'a ImagePayload,
    ) -> BoxFuture<'a, Result<Vec<Prediction>, RecognitionError>> {
        Box::pin(self.request(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let remote = RemoteClassifier::new(
            "http://127.0.0.1:9/unused",
            None,
            Duration::from_millis(100),
        )
        .unwrap();
        assert!(!remote.has_credentials());

        let image = ImagePayload::new(vec![0u8; 4], "image/jpeg");
        let err = remote.classify(&image).await.unwrap_err();
        assert_eq!(
            err,
            RecognitionError::MissingCredentials {
                provider: "remote".to_string()
            }
        );
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let remote = RemoteClassifier::new(
            "http://127.0.0.1:9/unused",
            Some(String::new()),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!remote.has_credentials());
    }

    #[test]
    fn test_from_config_uses_endpoint() {
        let config = RecognitionConfig {
            api_key: Some("key".to_string()),
            ..RecognitionConfig::default()
        };
        let remote = RemoteClassifier::from_config(&config).unwrap();
        assert!(remote.has_credentials());
        assert!(remote.endpoint().contains("resnet-50"));
    }
}
