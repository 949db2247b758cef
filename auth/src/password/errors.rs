use thiserror::Error;

/// Error type for password operations.
///
/// Every variant indicates a deployment defect (bad algorithm parameters or
/// unusable stored salt), never a wrong password.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Invalid password hashing parameters: {0}")]
    InvalidParameters(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
