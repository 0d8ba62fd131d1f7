use thiserror::Error;

use crate::profiles::errors::ProfileError;
use crate::requests::errors::RequestError;

/// Errors from operations that span more than one module, e.g. role views.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl ServiceError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Request(e) => e.code(),
            ServiceError::Profile(e) => e.code(),
        }
    }
}
