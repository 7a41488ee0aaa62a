//! Branchgate API composition root.
//!
//! Serves the capability snapshot of the session actor so the client can
//! render tabs, sections, and buttons before any record is fetched.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod session;
mod state;

use branchgate_application::PolicyEvaluator;
use branchgate_core::AppError;
use branchgate_infrastructure::StaticPolicySource;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let policy = PolicyEvaluator::from_source(&StaticPolicySource::embedded())?;

    if config.dev_session_enabled {
        warn!("DEV_SESSION_ENABLED is set; sessions can be seeded without authentication");
    }

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            config.session_inactivity_minutes,
        )));

    let app_state = AppState {
        policy,
        dev_session_enabled: config.dev_session_enabled,
    };
    let app = api_router::build_router(app_state, &config.frontend_url, session_layer)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "branchgate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
