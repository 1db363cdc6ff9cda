use std::fmt;

use serde::{Deserialize, Serialize};

/// Resolved Firebase service account credentials
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Service account JSON as downloaded from the Firebase console.
/// Every field is optional so that a partial blob is "not configured"
/// rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceAccountJson {
    pub project_id: Option<String>,
    pub client_email: Option<String>,
    pub private_key: Option<String>,
}

/// OAuth2 Token Cache
#[derive(Debug, Clone)]
pub struct TokenCache {
    pub client_email: String,
    pub access_token: String,
    pub expires_at: i64,
}

/// JWT Claims for the Google OAuth2 JWT-bearer grant
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

/// Google OAuth2 Token Response
#[derive(Debug, Default, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// `accounts:lookup` request keyed by a client ID token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdTokenLookupRequest<'a> {
    pub id_token: &'a str,
}

/// `projects/{id}/accounts:lookup` request keyed by email
#[derive(Debug, Serialize)]
pub struct EmailLookupRequest<'a> {
    pub email: [&'a str; 1],
}

/// `projects/{id}/accounts:delete` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest<'a> {
    pub local_id: &'a str,
}

/// `accounts:lookup` response
#[derive(Debug, Default, Deserialize)]
pub struct AccountsLookupResponse {
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub local_id: Option<String>,
    pub email: Option<String>,
}

/// Google API error envelope: `{"error": {"code": 400, "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}
