// Species recognition error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Recognition error code constants
///
/// Error code range: 2001-2009
pub struct RecognitionErrorCodes {}

impl RecognitionErrorCodes {
    /// Primary model failed to initialize
    pub const MODEL_LOAD: i32 = 2001;

    /// Provider is not ready (e.g. model not loaded yet)
    pub const PROVIDER_UNAVAILABLE: i32 = 2002;

    /// Remote service has no API key
    pub const MISSING_CREDENTIALS: i32 = 2003;

    /// Remote service answered with a non-success status
    pub const REMOTE_STATUS: i32 = 2004;

    /// Transport or decoding failure talking to the remote service
    pub const REMOTE: i32 = 2005;

    /// Remote service did not answer within the configured bound
    pub const TIMEOUT: i32 = 2006;

    /// Provider returned an empty prediction list
    pub const NO_PREDICTIONS: i32 = 2007;

    /// Every provider in the chain failed
    pub const CLASSIFICATION_UNAVAILABLE: i32 = 2008;

    /// Model state lock was poisoned
    pub const STATE_POISONED: i32 = 2009;
}

/// Log a recognition error with structured context
pub fn log_recognition_error(err: &RecognitionError, context: &str) {
    error!(
        "Recognition error in {}: code={}, component=SpeciesRecognizer, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Species recognition errors
///
/// Per-provider variants describe why a single link of the fallback chain
/// failed. `ClassificationUnavailable` is the terminal error for one request
/// and carries every attempt for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionError {
    ModelLoad { reason: String },

    ProviderUnavailable { provider: String },

    MissingCredentials { provider: String },

    RemoteStatus { provider: String, status: u16 },

    Remote { provider: String, reason: String },

    Timeout { provider: String, timeout_ms: u64 },

    NoPredictions { provider: String },

    ClassificationUnavailable { attempts: Vec<String> },

    StatePoisoned,
}

impl ErrorCode for RecognitionError {
    fn code(&self) -> i32 {
        match self {
            RecognitionError::ModelLoad { .. } => RecognitionErrorCodes::MODEL_LOAD,
            RecognitionError::ProviderUnavailable { .. } => {
                RecognitionErrorCodes::PROVIDER_UNAVAILABLE
            }
            RecognitionError::MissingCredentials { .. } => {
                RecognitionErrorCodes::MISSING_CREDENTIALS
            }
            RecognitionError::RemoteStatus { .. } => RecognitionErrorCodes::REMOTE_STATUS,
            RecognitionError::Remote { .. } => RecognitionErrorCodes::REMOTE,
            RecognitionError::Timeout { .. } => RecognitionErrorCodes::TIMEOUT,
            RecognitionError::NoPredictions { .. } => RecognitionErrorCodes::NO_PREDICTIONS,
            RecognitionError::ClassificationUnavailable { .. } => {
                RecognitionErrorCodes::CLASSIFICATION_UNAVAILABLE
            }
            RecognitionError::StatePoisoned => RecognitionErrorCodes::STATE_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            RecognitionError::ModelLoad { reason } => {
                format!("Failed to load classification model: {}", reason)
            }
            RecognitionError::ProviderUnavailable { provider } => {
                format!("Provider '{}' is not available", provider)
            }
            RecognitionError::MissingCredentials { provider } => {
                format!("Provider '{}' requires an API key", provider)
            }
            RecognitionError::RemoteStatus { provider, status } => {
                format!("Provider '{}' returned HTTP {}", provider, status)
            }
            RecognitionError::Remote { provider, reason } => {
                format!("Provider '{}' request failed: {}", provider, reason)
            }
            RecognitionError::Timeout {
                provider,
                timeout_ms,
            } => {
                format!("Provider '{}' timed out after {} ms", provider, timeout_ms)
            }
            RecognitionError::NoPredictions { provider } => {
                format!("Provider '{}' returned no predictions", provider)
            }
            RecognitionError::ClassificationUnavailable { attempts } => {
                if attempts.is_empty() {
                    "Classification unavailable: no providers configured".to_string()
                } else {
                    format!("Classification unavailable: {}", attempts.join("; "))
                }
            }
            RecognitionError::StatePoisoned => "Model state lock poisoned".to_string(),
        }
    }
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecognitionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for RecognitionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognition_error_codes() {
        assert_eq!(
            RecognitionError::ModelLoad {
                reason: "x".to_string()
            }
            .code(),
            2001
        );
        assert_eq!(
            RecognitionError::MissingCredentials {
                provider: "remote".to_string()
            }
            .code(),
            RecognitionErrorCodes::MISSING_CREDENTIALS
        );
        assert_eq!(
            RecognitionError::ClassificationUnavailable { attempts: vec![] }.code(),
            2008
        );
        assert_eq!(RecognitionError::StatePoisoned.code(), 2009);
    }

    #[test]
    fn test_unavailable_lists_attempts() {
        let err = RecognitionError::ClassificationUnavailable {
            attempts: vec![
                "primary: not loaded".to_string(),
                "remote: missing key".to_string(),
            ],
        };
        let message = err.message();
        assert!(message.contains("primary: not loaded"));
        assert!(message.contains("remote: missing key"));
    }

    #[test]
    fn test_timeout_message() {
        let err = RecognitionError::Timeout {
            provider: "remote".to_string(),
            timeout_ms: 10_000,
        };
        assert_eq!(err.message(), "Provider 'remote' timed out after 10000 ms");
    }
}
