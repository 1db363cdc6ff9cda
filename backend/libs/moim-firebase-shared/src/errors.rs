use thiserror::Error;

/// Firebase Client Error Types
#[derive(Error, Debug)]
pub enum FirebaseError {
    #[error("Failed to parse service account JSON: {0}")]
    ServiceAccountJsonParse(String),

    #[error("Service account is not configured")]
    ServiceAccountNotConfigured,

    #[error("Failed to parse private key: {0}")]
    KeyParseError(String),

    #[error("Failed to encode JWT: {0}")]
    JwtEncodeError(String),

    #[error("Token request failed: {0}")]
    TokenRequestFailed(String),

    #[error("Token response did not contain an access token")]
    AccessTokenMissing,

    #[error("Identity Toolkit request failed: {0}")]
    RequestError(String),

    #[error("Identity Toolkit API error: {status} - {message}")]
    ApiError { status: u16, message: String },
}

impl FirebaseError {
    /// Stable machine-readable reason, used by callers to pick operator messages.
    pub fn code(&self) -> &'static str {
        match self {
            FirebaseError::ServiceAccountJsonParse(_) => "SERVICE_ACCOUNT_JSON_PARSE_FAILED",
            FirebaseError::ServiceAccountNotConfigured => "SERVICE_ACCOUNT_NOT_CONFIGURED",
            FirebaseError::KeyParseError(_) => "SERVICE_ACCOUNT_PRIVATE_KEY_INVALID",
            FirebaseError::JwtEncodeError(_) => "JWT_ENCODE_FAILED",
            FirebaseError::TokenRequestFailed(_) => "OAUTH_TOKEN_EXCHANGE_FAILED",
            FirebaseError::AccessTokenMissing => "OAUTH_ACCESS_TOKEN_MISSING",
            FirebaseError::RequestError(_) => "IDENTITY_TOOLKIT_REQUEST_FAILED",
            FirebaseError::ApiError { .. } => "IDENTITY_TOOLKIT_API_ERROR",
        }
    }

    /// Message reported by the upstream API, if it sent one.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            FirebaseError::ApiError { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_for_config_failures() {
        assert_eq!(
            FirebaseError::ServiceAccountJsonParse("eof".into()).code(),
            "SERVICE_ACCOUNT_JSON_PARSE_FAILED"
        );
        assert_eq!(
            FirebaseError::ServiceAccountNotConfigured.code(),
            "SERVICE_ACCOUNT_NOT_CONFIGURED"
        );
    }

    #[test]
    fn test_upstream_message() {
        let err = FirebaseError::ApiError {
            status: 400,
            message: "USER_NOT_FOUND".to_string(),
        };
        assert_eq!(err.upstream_message(), Some("USER_NOT_FOUND"));

        let err = FirebaseError::ApiError {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.upstream_message(), None);
        assert_eq!(FirebaseError::AccessTokenMissing.upstream_message(), None);
    }
}
