use crate::errors::FirebaseError;
use crate::models::{ServiceAccountJson, ServiceAccountKey};

/// Raw service account settings as they arrive from the environment.
///
/// Two shapes are accepted: discrete `client_email` / `private_key` values,
/// or the full JSON key file in `json`. Discrete values take precedence.
#[derive(Debug, Clone, Default)]
pub struct ServiceAccountConfig {
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    pub json: Option<String>,
}

impl ServiceAccountConfig {
    /// Resolve the credentials used to sign an assertion.
    pub fn resolve(&self) -> Result<ServiceAccountKey, FirebaseError> {
        let mut client_email = non_empty(self.client_email.as_deref());
        let mut private_key = non_empty(self.private_key.as_deref());

        if client_email.is_none() || private_key.is_none() {
            if let Some(parsed) = self.parse_json()? {
                client_email = client_email.or_else(|| non_empty(parsed.client_email.as_deref()));
                private_key = private_key.or_else(|| non_empty(parsed.private_key.as_deref()));
            }
        }

        match (client_email, private_key) {
            (Some(client_email), Some(private_key)) => Ok(ServiceAccountKey {
                client_email,
                private_key: normalize_private_key(&private_key),
            }),
            _ => Err(FirebaseError::ServiceAccountNotConfigured),
        }
    }

    /// `project_id` embedded in the JSON key file, if any.
    pub fn project_id(&self) -> Option<String> {
        self.parse_json()
            .ok()
            .flatten()
            .and_then(|parsed| non_empty(parsed.project_id.as_deref()))
    }

    fn parse_json(&self) -> Result<Option<ServiceAccountJson>, FirebaseError> {
        let Some(raw) = non_empty(self.json.as_deref()) else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| FirebaseError::ServiceAccountJsonParse(e.to_string()))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Env files usually carry the PEM on one line with literal `\n` escapes,
/// sometimes wrapped in quotes.
fn normalize_private_key(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);

    unquoted.replace("\\n", "\n")
}
