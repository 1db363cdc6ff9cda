use std::time::Duration;

use moim_firebase_shared::{ServiceAccountConfig, DEFAULT_IDENTITY_TOOLKIT_URL, DEFAULT_TOKEN_URI};
use serde::Deserialize;

use crate::middleware::AdminPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub admin: AdminPolicy,
    pub firebase: FirebaseConfig,
    pub bizgo: Option<BizgoConfig>,
    /// Domain appended to bare user ids to form the auth email.
    pub auth_email_domain: String,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Web API key used to resolve client ID tokens.
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub service_account: ServiceAccountConfig,
    pub identity_toolkit_url: String,
    pub oauth_token_url: String,
}

#[derive(Debug, Clone)]
pub struct BizgoConfig {
    pub api_url: String,
    pub api_key: String,
}

/// Flat view of the environment. Keys are the lowercased variable names.
#[derive(Debug, Deserialize)]
struct RawConfig {
    server: ServerConfig,
    admin_emails: Option<String>,
    vite_admin_emails: Option<String>,
    firebase_api_key: Option<String>,
    vite_firebase_api_key: Option<String>,
    firebase_project_id: Option<String>,
    vite_firebase_project_id: Option<String>,
    firebase_service_account_email: Option<String>,
    firebase_service_account_private_key: Option<String>,
    firebase_service_account_json: Option<String>,
    bizgo_api_url: Option<String>,
    bizgo_api_key: Option<String>,
    #[serde(default = "default_auth_email_domain")]
    auth_email_domain: String,
    #[serde(default = "default_identity_toolkit_url")]
    identity_toolkit_url: String,
    #[serde(default = "default_oauth_token_url")]
    oauth_token_url: String,
    #[serde(default = "default_http_timeout_secs")]
    http_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_auth_email_domain() -> String {
    "myapp.com".to_string()
}

fn default_identity_toolkit_url() -> String {
    DEFAULT_IDENTITY_TOOLKIT_URL.to_string()
}

fn default_oauth_token_url() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_environment(config::Environment::default().separator("__"))
    }

    /// Build from an explicit variable map instead of the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self::from_environment(
            config::Environment::default()
                .separator("__")
                .source(Some(vars)),
        )
    }

    fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
        let raw: RawConfig = config::Config::builder()
            .add_source(environment)
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .build()?
            .try_deserialize()?;

        Ok(raw.into())
    }
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let service_account = ServiceAccountConfig {
            client_email: non_empty(raw.firebase_service_account_email),
            private_key: non_empty(raw.firebase_service_account_private_key),
            json: non_empty(raw.firebase_service_account_json),
        };

        let project_id = non_empty(raw.firebase_project_id)
            .or_else(|| non_empty(raw.vite_firebase_project_id))
            .or_else(|| service_account.project_id());

        let admin_emails =
            non_empty(raw.admin_emails).or_else(|| non_empty(raw.vite_admin_emails));

        let bizgo = match (non_empty(raw.bizgo_api_url), non_empty(raw.bizgo_api_key)) {
            (Some(api_url), Some(api_key)) => Some(BizgoConfig { api_url, api_key }),
            _ => None,
        };

        Self {
            server: raw.server,
            admin: AdminPolicy::from_list(admin_emails.as_deref()),
            firebase: FirebaseConfig {
                api_key: non_empty(raw.firebase_api_key)
                    .or_else(|| non_empty(raw.vite_firebase_api_key)),
                project_id,
                service_account,
                identity_toolkit_url: raw.identity_toolkit_url,
                oauth_token_url: raw.oauth_token_url,
            },
            bizgo,
            auth_email_domain: raw.auth_email_domain.trim().to_string(),
            http_timeout: Duration::from_secs(raw.http_timeout_secs.max(1)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
