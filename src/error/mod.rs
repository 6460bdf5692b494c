// Error types for the conservation core
//
// This module defines custom error types for the activity feed and species
// recognition services, providing structured error handling with stable
// numeric codes the display layer can branch on.

mod feed;
mod recognition;

pub use feed::{log_feed_error, FeedError, FeedErrorCodes};
pub use recognition::{log_recognition_error, RecognitionError, RecognitionErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so callers can tell an error apart from a
/// low-confidence result without matching on message text.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
