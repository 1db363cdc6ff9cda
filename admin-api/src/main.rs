use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moim_admin_api::config::Config;
use moim_admin_api::middleware::AdminPolicy;
use moim_admin_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "moim_admin_api=debug,moim_firebase_shared=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Configuration loaded successfully");

    if config.admin == AdminPolicy::Unrestricted {
        tracing::warn!("ADMIN_EMAILS is empty; admin endpoints are open to any caller");
    } else if config.firebase.api_key.is_none() {
        tracing::warn!("FIREBASE_API_KEY is not set; admin token verification will fail");
    }
    if config.bizgo.is_none() {
        tracing::warn!("BIZGO_API_URL/BIZGO_API_KEY not set; SMS dispatch is disabled");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Build application state
    let state = AppState::new(config)?;

    // Build router
    let app = app(state);

    // Start server
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
