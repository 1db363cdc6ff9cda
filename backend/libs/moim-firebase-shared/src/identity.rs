use crate::errors::FirebaseError;
use crate::models::*;

pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Google Identity Toolkit client
///
/// Covers the three account calls the admin tooling needs: resolving a client
/// ID token to its account, finding an account by email, and deleting an
/// account by `localId`.
#[derive(Clone)]
pub struct IdentityToolkitClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl IdentityToolkitClient {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }

    /// Resolve a client ID token to the email of its first account.
    ///
    /// Returns `Ok(None)` when the lookup succeeds but carries no email.
    pub async fn lookup_email_by_id_token(
        &self,
        api_key: &str,
        id_token: &str,
    ) -> Result<Option<String>, FirebaseError> {
        let url = format!("{}/accounts:lookup", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&IdTokenLookupRequest { id_token })
            .send()
            .await
            .map_err(|e| FirebaseError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let lookup: AccountsLookupResponse = response
            .json()
            .await
            .map_err(|e| FirebaseError::RequestError(e.to_string()))?;

        Ok(lookup.users.into_iter().next().and_then(|user| user.email))
    }

    /// Find the `localId` of the account registered under `email`.
    pub async fn find_local_id_by_email(
        &self,
        access_token: &str,
        project_id: &str,
        email: &str,
    ) -> Result<Option<String>, FirebaseError> {
        let url = format!("{}/projects/{}/accounts:lookup", self.base_url, project_id);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&EmailLookupRequest { email: [email] })
            .send()
            .await
            .map_err(|e| FirebaseError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let lookup: AccountsLookupResponse = response
            .json()
            .await
            .map_err(|e| FirebaseError::RequestError(e.to_string()))?;

        Ok(lookup
            .users
            .into_iter()
            .find_map(|user| user.local_id.filter(|id| !id.is_empty())))
    }

    /// Delete the account identified by `local_id`.
    pub async fn delete_account(
        &self,
        access_token: &str,
        project_id: &str,
        local_id: &str,
    ) -> Result<(), FirebaseError> {
        let url = format!("{}/projects/{}/accounts:delete", self.base_url, project_id);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&DeleteAccountRequest { local_id })
            .send()
            .await
            .map_err(|e| FirebaseError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }
}

async fn api_error(response: reqwest::Response) -> FirebaseError {
    let status = response.status().as_u16();
    let error_text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ApiErrorResponse>(&error_text)
        .ok()
        .and_then(|body| body.error)
        .and_then(|error| error.message)
        .unwrap_or_default();

    FirebaseError::ApiError { status, message }
}
