use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Every variant renders as `{"ok": false, "message": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("허용되지 않은 메서드입니다.")]
    MethodNotAllowed,

    /// Server configuration is missing or malformed.
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    /// A dependency call failed or answered with an unexpected shape.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Upstream { status, .. } => *status,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", message);
        } else {
            tracing::debug!(status = status.as_u16(), "{}", message);
        }

        let body = Json(json!({
            "ok": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
