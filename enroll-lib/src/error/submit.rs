//! Submission error types

use std::any::Any;

/// Failure reported by a submit transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The receiving side refused the submission (e.g. the username is taken).
    #[error("{0}")]
    Rejected(String),

    /// The receiving side could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// A failed submission attempt.
///
/// Always recoverable: the form returns to idle and the user may edit and
/// submit again.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmitError {
    /// The transport returned an error.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The transport panicked while the request was in flight.
    #[error("transport panicked: {0}")]
    Panicked(String),
}

impl SubmitError {
    /// Message suitable for showing to the user.
    ///
    /// Falls back to `fallback` when the transport gave no usable text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Transport(TransportError::Rejected(msg)) if !msg.trim().is_empty() => {
                msg.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

/// Text of a panic payload, or `"Unknown panic"` when it is neither a
/// `&str` nor a `String`.
pub fn extract_panic_message(panic: &(dyn Any + Send)) -> String {
    match panic.downcast_ref::<&str>() {
        Some(msg) => (*msg).to_string(),
        None => panic
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_else(|| "Unknown panic".to_string()),
    }
}
