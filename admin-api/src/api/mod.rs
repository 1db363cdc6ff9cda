mod sms;
mod users;

use axum::{body::Bytes, routing::post, Router};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/send-sms",
            post(sms::send_sms).fallback(method_not_allowed),
        )
        .route(
            "/admin/delete-auth-user",
            post(users::delete_auth_user).fallback(method_not_allowed),
        )
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Parse a JSON request body. Handlers parse explicitly so each one controls
/// where validation happens relative to authorization. An empty body is `{}`.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Invalid request body: {}", e);
        AppError::BadRequest("요청 본문 형식이 올바르지 않습니다.".to_string())
    })
}
