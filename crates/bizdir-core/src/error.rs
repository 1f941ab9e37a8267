//! Error types for the business directory.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("An account with email {email} already exists")]
    DuplicateEmail { email: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("New password must be different from the current password")]
    SamePassword,

    #[error("No account is signed in")]
    Unauthenticated,

    #[error("Authorization denied: {reason}")]
    Unauthorized { reason: String },

    #[error("Missing required input: {field}")]
    MissingInput { field: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DirectoryError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::MissingInput {
            field: field.into(),
        }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
