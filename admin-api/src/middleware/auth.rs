use std::collections::HashSet;

use axum::http::{header, HeaderMap, StatusCode};
use moim_firebase_shared::IdentityToolkitClient;

use crate::error::{AppError, Result};
use crate::utils::mask_email;

/// Who may call the admin endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminPolicy {
    /// No allow-list configured: admin endpoints are open.
    Unrestricted,
    /// Only these (lowercased) account emails are admins.
    RestrictedTo(HashSet<String>),
}

impl AdminPolicy {
    /// Parse a comma-separated allow-list. Blank entries are dropped; an
    /// empty result means `Unrestricted`.
    pub fn from_list(raw: Option<&str>) -> Self {
        let emails: HashSet<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();

        if emails.is_empty() {
            AdminPolicy::Unrestricted
        } else {
            AdminPolicy::RestrictedTo(emails)
        }
    }

    pub fn allows(&self, email: &str) -> bool {
        match self {
            AdminPolicy::Unrestricted => true,
            AdminPolicy::RestrictedTo(emails) => emails.contains(email),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAdmin {
    /// Verified admin email; empty when the policy is `Unrestricted`.
    pub email: String,
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Checks a client ID token against Firebase and the admin allow-list.
#[derive(Clone)]
pub struct CredentialVerifier {
    policy: AdminPolicy,
    api_key: Option<String>,
    identity: IdentityToolkitClient,
}

impl CredentialVerifier {
    pub fn new(policy: AdminPolicy, api_key: Option<String>, identity: IdentityToolkitClient) -> Self {
        Self {
            policy,
            api_key,
            identity,
        }
    }

    pub async fn verify(&self, token: Option<&str>) -> Result<CurrentAdmin> {
        let AdminPolicy::RestrictedTo(_) = &self.policy else {
            return Ok(CurrentAdmin {
                email: String::new(),
            });
        };

        let token = token.ok_or_else(|| {
            AppError::Unauthenticated("관리자 인증 토큰이 필요합니다.".to_string())
        })?;

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            tracing::error!("FIREBASE_API_KEY is not configured; cannot verify admin tokens");
            AppError::Unauthenticated("인증 검증 키가 설정되지 않았습니다.".to_string())
        })?;

        let email = self
            .identity
            .lookup_email_by_id_token(api_key, token)
            .await
            .map_err(|e| {
                tracing::warn!("Admin token lookup failed: {}", e);
                AppError::Upstream {
                    status: StatusCode::UNAUTHORIZED,
                    message: "관리자 인증 확인에 실패했습니다.".to_string(),
                }
            })?
            .map(|email| email.trim().to_lowercase())
            .unwrap_or_default();

        if email.is_empty() || !self.policy.allows(&email) {
            tracing::warn!(email = %mask_email(&email), "Rejected non-admin account");
            return Err(AppError::Forbidden("관리자 권한이 없습니다.".to_string()));
        }

        tracing::debug!(email = %email, "Admin verified");

        Ok(CurrentAdmin { email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn restricted() -> AdminPolicy {
        AdminPolicy::from_list(Some("admin@moim.org"))
    }

    fn verifier(policy: AdminPolicy, api_key: Option<&str>, base_url: &str) -> CredentialVerifier {
        CredentialVerifier::new(
            policy,
            api_key.map(str::to_string),
            IdentityToolkitClient::new(reqwest::Client::new(), base_url),
        )
    }

    async fn identity_returning(email: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts:lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{ "localId": "uid-1", "email": email }]
            })))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_policy_from_list() {
        assert_eq!(AdminPolicy::from_list(None), AdminPolicy::Unrestricted);
        assert_eq!(AdminPolicy::from_list(Some("")), AdminPolicy::Unrestricted);

        let policy = AdminPolicy::from_list(Some(" Admin@Moim.org ,,other@moim.org"));
        assert!(policy.allows("admin@moim.org"));
        assert!(policy.allows("other@moim.org"));
        assert!(!policy.allows("Admin@Moim.org"));
        assert!(!policy.allows("stranger@moim.org"));
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer  xyz "));
        assert_eq!(bearer_token(&headers), Some("xyz"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn test_unrestricted_skips_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let admin = verifier(AdminPolicy::Unrestricted, None, &server.uri())
            .verify(None)
            .await
            .unwrap();
        assert_eq!(admin.email, "");
    }

    #[tokio::test]
    async fn test_missing_token_and_missing_key() {
        let err = verifier(restricted(), Some("key"), "http://127.0.0.1:9")
            .verify(None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err = verifier(restricted(), None, "http://127.0.0.1:9")
            .verify(Some("token"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_allow_listed_email_is_lowercased() {
        let server = identity_returning("ADMIN@moim.org").await;

        let admin = verifier(restricted(), Some("key"), &server.uri())
            .verify(Some("token"))
            .await
            .unwrap();
        assert_eq!(admin.email, "admin@moim.org");
    }

    #[tokio::test]
    async fn test_other_email_is_forbidden() {
        let server = identity_returning("member@moim.org").await;

        let err = verifier(restricted(), Some("key"), &server.uri())
            .verify(Some("token"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rejected_token_is_upstream_401() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts:lookup"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "INVALID_ID_TOKEN" }
            })))
            .mount(&server)
            .await;

        let err = verifier(restricted(), Some("key"), &server.uri())
            .verify(Some("token"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream { .. }));
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }
}
