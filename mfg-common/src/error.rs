//! Common error types for MFG

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Common result type for MFG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across MFG services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One or more form fields failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Caller lacks the permission grant or the document state forbids the change
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A step of a multi-step document write failed; partial writes were unwound
    #[error("{step} failed: {source}")]
    Orchestration {
        step: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap a failure with the name of the orchestration step that produced it
    pub fn orchestration(step: &'static str, source: Error) -> Self {
        Error::Orchestration {
            step,
            source: Box::new(source),
        }
    }

    /// Shorthand for a not-found error on a tenant-scoped row
    pub fn not_found(entity: &str, id: &str) -> Self {
        Error::NotFound(format!("{} {}", entity, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orchestration_message_names_step() {
        let err = Error::orchestration(
            "insert purchase order delivery",
            Error::Internal("disk full".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "insert purchase order delivery failed: Internal error: disk full"
        );
    }

    #[test]
    fn test_orchestration_keeps_source() {
        use std::error::Error as _;

        let err = Error::orchestration("insert header", Error::NotFound("x".into()));
        let source = err.source().expect("source should be preserved");
        assert_eq!(source.to_string(), "Not found: x");
    }
}
