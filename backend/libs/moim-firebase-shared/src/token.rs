use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::credentials::ServiceAccountConfig;
use crate::errors::FirebaseError;
use crate::models::*;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Scopes needed for Identity Toolkit account management.
pub const IDENTITY_TOOLKIT_SCOPE: &str =
    "https://www.googleapis.com/auth/identitytoolkit https://www.googleapis.com/auth/cloud-platform";

const ASSERTION_LIFETIME_SECS: i64 = 3600;

const REFRESH_MARGIN_SECS: i64 = 60;

/// Service account access token source.
///
/// Signs an RS256 assertion with the service account key and exchanges it at
/// the OAuth2 token endpoint. The resulting access token is cached per client
/// email and reused until shortly before it expires.
pub struct TokenMinter {
    credentials: ServiceAccountConfig,
    token_uri: String,
    token_cache: Mutex<Option<TokenCache>>,
    http_client: reqwest::Client,
}

impl TokenMinter {
    pub fn new(
        http_client: reqwest::Client,
        credentials: ServiceAccountConfig,
        token_uri: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            token_uri: token_uri.into(),
            token_cache: Mutex::new(None),
            http_client,
        }
    }

    /// Build the signed `header.payload.signature` assertion for `key`.
    pub fn build_assertion(
        key: &ServiceAccountKey,
        audience: &str,
        now: DateTime<Utc>,
    ) -> Result<String, FirebaseError> {
        let iat = now.timestamp();
        let exp = (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp();

        let claims = JwtClaims {
            iss: key.client_email.clone(),
            sub: key.client_email.clone(),
            scope: IDENTITY_TOOLKIT_SCOPE.to_string(),
            aud: audience.to_string(),
            exp,
            iat,
        };

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| FirebaseError::KeyParseError(e.to_string()))?;

        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| FirebaseError::JwtEncodeError(e.to_string()))
    }

    /// Get an access token for privileged Identity Toolkit calls (with caching)
    pub async fn access_token(&self) -> Result<String, FirebaseError> {
        let key = self.credentials.resolve()?;

        if let Some(token) = self.cached_token(&key.client_email) {
            return Ok(token);
        }

        let assertion = Self::build_assertion(&key, &self.token_uri, Utc::now())?;

        let params = [
            ("grant_type", JWT_BEARER_GRANT_TYPE),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| FirebaseError::TokenRequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %error_text, "OAuth token exchange rejected");
            return Err(FirebaseError::TokenRequestFailed(format!(
                "status {}",
                status
            )));
        }

        let token_response: GoogleTokenResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("OAuth token response is not valid JSON: {}", e);
                return Err(FirebaseError::AccessTokenMissing);
            }
        };

        let access_token = token_response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(FirebaseError::AccessTokenMissing)?;

        let expires_in = token_response
            .expires_in
            .unwrap_or(ASSERTION_LIFETIME_SECS)
            .clamp(0, ASSERTION_LIFETIME_SECS);

        {
            let mut cache = self
                .token_cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *cache = Some(TokenCache {
                client_email: key.client_email.clone(),
                access_token: access_token.clone(),
                expires_at: Utc::now().timestamp().saturating_add(expires_in),
            });
        }

        tracing::debug!(client_email = %key.client_email, expires_in, "Minted service account access token");

        Ok(access_token)
    }

    fn cached_token(&self, client_email: &str) -> Option<String> {
        let cache = self
            .token_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        cache
            .as_ref()
            .filter(|cached| cached.client_email == client_email)
            .filter(|cached| cached.expires_at > Utc::now().timestamp() + REFRESH_MARGIN_SECS)
            .map(|cached| cached.access_token.clone())
    }
}
