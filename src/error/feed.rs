// Activity feed error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Feed error code constants
///
/// Error code range: 1001-1003
pub struct FeedErrorCodes {}

impl FeedErrorCodes {
    /// A caller supplied a malformed count, cap or interval
    pub const INVALID_ARGUMENT: i32 = 1001;

    /// Location or phrase tables are unusable
    pub const CONFIGURATION: i32 = 1002;

    /// Shared simulator Mutex was poisoned
    pub const STATE_POISONED: i32 = 1003;
}

/// Log a feed error with structured context
///
/// The logging is non-blocking and will not panic on failure. The error is
/// still returned to the caller; this helper only records it.
pub fn log_feed_error(err: &FeedError, context: &str) {
    error!(
        "Feed error in {}: code={}, component=FeedSimulator, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Activity feed errors
///
/// Generation itself never fails; these cover configuration input and
/// shared-state access only.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Negative count, zero retention cap, zero interval or bad burst range
    InvalidArgument { parameter: String, reason: String },

    /// Catalog tables are empty at construction time
    Configuration { reason: String },

    /// Simulator lock was poisoned by a panicking holder
    StatePoisoned,
}

impl FeedError {
    pub(crate) fn invalid(parameter: &str, reason: impl Into<String>) -> Self {
        FeedError::InvalidArgument {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }
}

impl ErrorCode for FeedError {
    fn code(&self) -> i32 {
        match self {
            FeedError::InvalidArgument { .. } => FeedErrorCodes::INVALID_ARGUMENT,
            FeedError::Configuration { .. } => FeedErrorCodes::CONFIGURATION,
            FeedError::StatePoisoned => FeedErrorCodes::STATE_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            FeedError::InvalidArgument { parameter, reason } => {
                format!("Invalid argument '{}': {}", parameter, reason)
            }
            FeedError::Configuration { reason } => {
                format!("Feed configuration error: {}", reason)
            }
            FeedError::StatePoisoned => "Feed simulator lock poisoned".to_string(),
        }
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FeedError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for FeedError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_error_codes() {
        assert_eq!(
            FeedError::invalid("retention_cap", "must be > 0").code(),
            FeedErrorCodes::INVALID_ARGUMENT
        );
        assert_eq!(
            FeedError::Configuration {
                reason: "empty".to_string()
            }
            .code(),
            FeedErrorCodes::CONFIGURATION
        );
        assert_eq!(
            FeedError::StatePoisoned.code(),
            FeedErrorCodes::STATE_POISONED
        );
    }

    #[test]
    fn test_feed_error_messages() {
        let err = FeedError::invalid("count", "must not be negative (got -3)");
        assert_eq!(
            err.message(),
            "Invalid argument 'count': must not be negative (got -3)"
        );

        let err = FeedError::Configuration {
            reason: "location table is empty".to_string(),
        };
        assert!(err.message().contains("location table is empty"));
    }

    #[test]
    fn test_feed_error_display() {
        let err = FeedError::StatePoisoned;
        let display = format!("{}", err);
        assert!(display.contains("FeedError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
