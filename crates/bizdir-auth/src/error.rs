//! Session store error types.

use bizdir_core::error::DirectoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("an account with email {0} already exists")]
    DuplicateEmail(String),

    #[error("no account found with email {0}")]
    UnknownEmail(String),

    #[error("account {0} is missing from the account set")]
    AccountMissing(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("new password must be different from the current password")]
    SamePassword,

    #[error("no account is signed in")]
    NotSignedIn,

    #[error("{0} is required")]
    MissingInput(&'static str),
}

impl From<AuthError> for DirectoryError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail(email) => DirectoryError::DuplicateEmail { email },
            AuthError::UnknownEmail(email) => DirectoryError::NotFound {
                entity: "account".into(),
                id: format!("email={email}"),
            },
            AuthError::AccountMissing(id) => DirectoryError::NotFound {
                entity: "account".into(),
                id,
            },
            AuthError::InvalidCredentials => DirectoryError::InvalidCredential,
            AuthError::SamePassword => DirectoryError::SamePassword,
            AuthError::NotSignedIn => DirectoryError::Unauthenticated,
            AuthError::MissingInput(field) => DirectoryError::MissingInput {
                field: field.into(),
            },
        }
    }
}
