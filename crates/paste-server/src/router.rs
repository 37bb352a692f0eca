use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// HTTP endpoint paths.
pub mod endpoints {
    pub const CREATE_TEXT: &str = "/create_text";
    pub const READ_TEXT: &str = "/read/";
    pub const HEALTH: &str = "/health";
}

/// Build the axum router with all pastebin endpoints.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(endpoints::CREATE_TEXT, post(handler::create_text))
        .route(endpoints::READ_TEXT, post(handler::read_text))
        .route(endpoints::HEALTH, get(handler::health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
