use thiserror::Error;

/// Business errors for profile workflows
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("profile already exists")]
    AlreadyExists,
    #[error("profile not found")]
    NotFound,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl ProfileError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ProfileError::Validation(_) => 1001,
            ProfileError::AlreadyExists => 1002,
            ProfileError::NotFound => 1003,
            ProfileError::Forbidden(_) => 1004,
            ProfileError::Repository(_) => 1200,
        }
    }
}
