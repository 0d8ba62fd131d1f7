use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use service::errors::ServiceError;
use service::profiles::ProfileError;
use service::requests::RequestError;

/// JSON error body returned by every handler.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, title: title.into(), detail, code: None }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail.into()))
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some(detail.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, title = %self.title, detail = ?self.detail, "request failed");
        }
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl From<RequestError> for JsonApiError {
    fn from(e: RequestError) -> Self {
        let code = e.code();
        let (status, title) = match &e {
            RequestError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            RequestError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            RequestError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            RequestError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            RequestError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Store Error"),
        };
        JsonApiError::new(status, title, Some(e.to_string())).with_code(code)
    }
}

impl From<ProfileError> for JsonApiError {
    fn from(e: ProfileError) -> Self {
        let code = e.code();
        let (status, title) = match &e {
            ProfileError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            ProfileError::AlreadyExists => (StatusCode::CONFLICT, "Profile Exists"),
            ProfileError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ProfileError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            ProfileError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Store Error"),
        };
        JsonApiError::new(status, title, Some(e.to_string())).with_code(code)
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Request(e) => e.into(),
            ServiceError::Profile(e) => e.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_map_to_distinct_statuses() {
        let cases = [
            (RequestError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (RequestError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (RequestError::NotFound, StatusCode::NOT_FOUND),
            (RequestError::Conflict("x".into()), StatusCode::CONFLICT),
            (RequestError::Store("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            let code = err.code();
            let api: JsonApiError = err.into();
            assert_eq!(api.status, status);
            assert_eq!(api.code, Some(code));
        }
    }

    #[test]
    fn profile_exists_is_conflict() {
        let api: JsonApiError = ProfileError::AlreadyExists.into();
        assert_eq!(api.status, StatusCode::CONFLICT);
    }
}
