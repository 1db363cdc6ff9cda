use axum::{body::Bytes, extract::State, http::HeaderMap, http::StatusCode, Json};
use moim_firebase_shared::FirebaseError;
use serde::Deserialize;

use super::parse_body;
use crate::error::{AppError, Result};
use crate::middleware::bearer_token;
use crate::utils::{canonical_email, mask_email};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAuthUserRequest {
    pub target_user_id: Option<String>,
}

pub(super) async fn delete_auth_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>> {
    let admin = state.verifier.verify(bearer_token(&headers)).await?;

    let payload: DeleteAuthUserRequest = parse_body(&body)?;

    let target_user_id = payload.target_user_id.as_deref().unwrap_or_default().trim();
    if target_user_id.is_empty() {
        return Err(AppError::BadRequest("삭제할 사용자 ID가 없습니다.".to_string()));
    }

    let email = canonical_email(target_user_id, &state.config.auth_email_domain);

    let project_id = state.config.firebase.project_id.as_deref().ok_or_else(|| {
        AppError::Config("FIREBASE_PROJECT_ID가 설정되지 않았습니다.".to_string())
    })?;

    let access_token = state
        .token_minter
        .access_token()
        .await
        .map_err(|e| mint_failure(&e))?;

    let local_id = state
        .identity
        .find_local_id_by_email(&access_token, project_id, &email)
        .await
        .map_err(|e| {
            tracing::error!("Auth user lookup failed: {}", e);
            AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: "Firebase 사용자 조회에 실패했습니다.".to_string(),
            }
        })?;

    let Some(local_id) = local_id else {
        tracing::info!(admin = %admin.email, target = %mask_email(&email), "Auth user already absent");
        return Ok(Json(serde_json::json!({
            "ok": true,
            "alreadyDeleted": true,
        })));
    };

    state
        .identity
        .delete_account(&access_token, project_id, &local_id)
        .await
        .map_err(|e| {
            tracing::error!("Auth user deletion failed: {}", e);
            AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: e
                    .upstream_message()
                    .unwrap_or("Firebase 사용자 삭제에 실패했습니다.")
                    .to_string(),
            }
        })?;

    tracing::info!(admin = %admin.email, target = %mask_email(&email), "Auth user deleted");

    Ok(Json(serde_json::json!({
        "ok": true,
        "deleted": true,
    })))
}

/// Operator-facing message for each way minting can fail.
fn mint_failure(err: &FirebaseError) -> AppError {
    tracing::error!(code = err.code(), "Service account token minting failed: {}", err);

    let message = match err {
        FirebaseError::ServiceAccountJsonParse(_) => {
            "FIREBASE_SERVICE_ACCOUNT_JSON 형식이 올바르지 않습니다."
        }
        FirebaseError::ServiceAccountNotConfigured => "Firebase 서비스 계정 설정이 없습니다.",
        FirebaseError::KeyParseError(_) => "Firebase 서비스 계정 개인키 형식이 올바르지 않습니다.",
        FirebaseError::TokenRequestFailed(_) => "Firebase 관리자 토큰 발급에 실패했습니다.",
        FirebaseError::AccessTokenMissing => "Firebase 관리자 토큰 응답이 올바르지 않습니다.",
        _ => "Firebase 관리자 인증 설정을 확인해 주세요.",
    };

    AppError::Config(message.to_string())
}
