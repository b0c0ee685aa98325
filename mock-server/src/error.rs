use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Handler failures, rendered as `{message, code, success: false}`.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("name taken")]
    NameTaken,
    #[error("group {0} does not exist")]
    UnknownGroup(u64),
    #[error("group {0} still has facilities")]
    GroupInUse(u64),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing or invalid bearer token")]
    Unauthorized,
}

impl BackendError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            BackendError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            BackendError::NameTaken => (StatusCode::CONFLICT, "CONFLICT"),
            BackendError::UnknownGroup(_) => (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_GROUP"),
            BackendError::GroupInUse(_) => (StatusCode::CONFLICT, "GROUP_IN_USE"),
            BackendError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            BackendError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        tracing::debug!(%status, code, "request rejected: {self}");
        let body = json!({
            "message": self.to_string(),
            "code": code,
            "success": false,
        });
        (status, Json(body)).into_response()
    }
}
