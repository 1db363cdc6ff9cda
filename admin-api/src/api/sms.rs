use axum::{body::Bytes, extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use super::parse_body;
use crate::error::{AppError, Result};
use crate::middleware::bearer_token;
use crate::utils::normalize_phone;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SendSmsRequest {
    pub message: Option<String>,
    pub recipients: Option<Vec<SmsRecipient>>,
}

#[derive(Debug, Deserialize)]
pub struct SmsRecipient {
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsResponse {
    pub ok: bool,
    pub success_count: usize,
    pub failed_count: usize,
    pub message: String,
}

pub(super) async fn send_sms(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SendSmsResponse>> {
    let sms = state.sms.as_ref().ok_or_else(|| {
        AppError::Config("SMS 발송 설정(BIZGO_API_URL, BIZGO_API_KEY)이 없습니다.".to_string())
    })?;

    let payload: SendSmsRequest = parse_body(&body)?;

    let message = payload.message.as_deref().unwrap_or_default().trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("메시지 내용을 입력해 주세요.".to_string()));
    }

    let phones: Vec<String> = payload
        .recipients
        .unwrap_or_default()
        .iter()
        .filter_map(|recipient| recipient.phone.as_deref())
        .map(normalize_phone)
        .filter(|phone| !phone.is_empty())
        .collect();

    if phones.is_empty() {
        return Err(AppError::BadRequest("유효한 수신자 번호가 없습니다.".to_string()));
    }

    let admin = state.verifier.verify(bearer_token(&headers)).await?;

    let summary = sms.dispatch(&phones, message).await;

    tracing::info!(
        admin = %admin.email,
        success_count = summary.success_count,
        failed_count = summary.failed_count,
        "SMS dispatch finished"
    );

    if summary.success_count == 0 {
        return Err(AppError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            message: format!("문자 발송에 모두 실패했습니다({}건).", summary.failed_count),
        });
    }

    let message = if summary.failed_count > 0 {
        format!("일부 실패({}건)", summary.failed_count)
    } else {
        "발송 완료".to_string()
    };

    Ok(Json(SendSmsResponse {
        ok: true,
        success_count: summary.success_count,
        failed_count: summary.failed_count,
        message,
    }))
}
