//! Moim admin proxy.
//!
//! Forwards admin-only operations from the website to third-party providers:
//! SMS dispatch through Bizgo and account deletion through Firebase Auth.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{routing::get, Router};
use moim_firebase_shared::{IdentityToolkitClient, TokenMinter};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::CredentialVerifier;
use crate::services::SmsService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: CredentialVerifier,
    pub identity: IdentityToolkitClient,
    pub token_minter: Arc<TokenMinter>,
    /// `None` when Bizgo is not configured.
    pub sms: Option<SmsService>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let identity = IdentityToolkitClient::new(
            http_client.clone(),
            config.firebase.identity_toolkit_url.clone(),
        );

        let verifier = CredentialVerifier::new(
            config.admin.clone(),
            config.firebase.api_key.clone(),
            identity.clone(),
        );

        let token_minter = TokenMinter::new(
            http_client.clone(),
            config.firebase.service_account.clone(),
            config.firebase.oauth_token_url.clone(),
        );

        let sms = config
            .bizgo
            .as_ref()
            .map(|bizgo| SmsService::new(http_client.clone(), bizgo));

        Ok(Self {
            config: Arc::new(config),
            verifier,
            identity,
            token_minter: Arc::new(token_minter),
            sms,
        })
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api::routes())
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
