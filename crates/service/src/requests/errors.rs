use thiserror::Error;

/// Failures of lifecycle operations. Each class is reported distinctly; none is retried here.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("service request not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store error: {0}")]
    Store(String),
}

impl RequestError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            RequestError::Validation(_) => 2001,
            RequestError::Forbidden(_) => 2002,
            RequestError::NotFound => 2003,
            RequestError::Conflict(_) => 2004,
            RequestError::Store(_) => 2200,
        }
    }
}
