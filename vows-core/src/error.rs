//! Error types for the vows site.

use serde::Serialize;
use thiserror::Error;

/// A single failed validation rule, reported back to the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur in vows operations.
#[derive(Error, Debug)]
pub enum VowsError {
    #[error("Invalid form data")]
    Validation(Vec<FieldError>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("ICS generation error: {0}")]
    Encoding(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Payment error: {0}")]
    Payment(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VowsError {
    /// Shorthand for a validation failure on one field.
    pub fn invalid(field: &str, message: &str) -> Self {
        VowsError::Validation(vec![FieldError::new(field, message)])
    }

    /// Whether the caller may simply resubmit the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VowsError::Conflict(_))
    }
}

impl From<garde::Report> for VowsError {
    fn from(report: garde::Report) -> Self {
        let fields = report
            .iter()
            .map(|(path, error)| FieldError::new(path.to_string(), error.message()))
            .collect();
        VowsError::Validation(fields)
    }
}

/// garde rule for text fields that must hold more than whitespace.
pub(crate) fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }
    Ok(())
}

/// Result type alias for vows operations.
pub type VowsResult<T> = Result<T, VowsError>;
