//! Error taxonomy for the meeting workflow.
//!
//! Three kinds of failure, handled differently:
//! - `Validation`: bad input caught before any network call. Never retried.
//! - `Transport`: the network call itself failed. Eligible for retry.
//! - `Collaborator`: the remote service answered with an explicit error.
//!   Surfaced with the remote's message, not retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Collaborator(String),
}

impl WorkflowError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator(message.into())
    }

    /// Only transport failures are safe to retry blindly.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_is_bare_message() {
        let err = WorkflowError::validation("Transcript is missing or invalid.");
        assert_eq!(err.to_string(), "Transcript is missing or invalid.");
        assert!(err.is_validation());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_transport_shows_stage_message_and_is_retryable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let err = WorkflowError::transport("Error scheduling events", io);
        assert_eq!(err.to_string(), "Error scheduling events");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_collaborator_not_retryable() {
        let err = WorkflowError::collaborator("quota exceeded");
        assert_eq!(err.to_string(), "quota exceeded");
        assert!(!err.is_retryable());
    }
}
