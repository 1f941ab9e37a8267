//! Credential checks.
//!
//! Passwords are stored in clear text in the durable mirror, so
//! verification is a plain comparison. It still walks every byte so
//! the time taken does not depend on where the first mismatch is.

use crate::error::AuthError;

/// Compare a candidate password with the stored one.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    let (a, b) = (candidate.as_bytes(), stored.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Reject a password change that keeps the same password.
pub fn ensure_changed(current: &str, next: &str) -> Result<(), AuthError> {
    if current == next {
        return Err(AuthError::SamePassword);
    }
    Ok(())
}

/// Reject empty or whitespace-only input for a required field.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::MissingInput(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() {
        assert!(verify_password("hunter2", "hunter2"));
    }

    #[test]
    fn wrong_password_does_not_match() {
        assert!(!verify_password("hunter3", "hunter2"));
        assert!(!verify_password("hunter", "hunter2"));
        assert!(!verify_password("", "hunter2"));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert!(!verify_password("Hunter2", "hunter2"));
    }

    #[test]
    fn same_password_is_rejected() {
        assert!(matches!(
            ensure_changed("secret", "secret"),
            Err(AuthError::SamePassword)
        ));
        assert!(ensure_changed("secret", "secret2").is_ok());
    }

    #[test]
    fn blank_input_is_missing() {
        assert!(matches!(
            require("name", "   "),
            Err(AuthError::MissingInput("name"))
        ));
        assert!(require("name", "Ada").is_ok());
    }
}
