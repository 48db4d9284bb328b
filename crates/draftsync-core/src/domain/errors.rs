//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including identifier validation failures and invalid state transitions.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid local (device-assigned) identifier
    #[error("Invalid local ID: {0}")]
    InvalidLocalId(String),

    /// Invalid remote (server-assigned) identifier
    #[error("Invalid remote ID: {0}")]
    InvalidRemoteId(String),

    /// Invalid state transition attempt
    #[error("Invalid state transition from {from} to {to}")]
    InvalidState {
        /// The current state
        from: String,
        /// The attempted target state
        to: String,
    },

    /// A draft carries neither a local nor a remote identifier
    #[error("Draft has no identifier")]
    MissingIdentity,

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidRemoteId("".to_string());
        assert_eq!(err.to_string(), "Invalid remote ID: ");

        let err = DomainError::InvalidState {
            from: "unauthenticated".to_string(),
            to: "idle".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition from unauthenticated to idle"
        );

        assert_eq!(
            DomainError::MissingIdentity.to_string(),
            "Draft has no identifier"
        );
    }

    #[test]
    fn test_error_equality() {
        let err1 = DomainError::InvalidLocalId("a b".to_string());
        let err2 = DomainError::InvalidLocalId("a b".to_string());
        let err3 = DomainError::InvalidLocalId("other".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
