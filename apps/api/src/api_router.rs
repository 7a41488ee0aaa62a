use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use branchgate_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<MemoryStore>,
) -> Result<Router, AppError> {
    let authenticated_routes = Router::new()
        .route(
            "/api/session/branch",
            put(handlers::session::switch_branch_handler),
        )
        .route_layer(from_fn(middleware::require_auth));

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/capabilities",
            get(handlers::capabilities::list_capabilities_handler),
        )
        .route(
            "/api/capabilities/{resource}",
            get(handlers::capabilities::resource_capabilities_handler),
        )
        .route(
            "/api/session",
            get(handlers::session::current_actor_handler)
                .delete(handlers::session::logout_handler),
        )
        .route(
            "/api/dev/session",
            post(handlers::session::dev_session_handler),
        )
        .merge(authenticated_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state);

    Ok(app)
}
