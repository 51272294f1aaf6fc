pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::report::catalog::{Category, CATALOG};
use crate::report::handlers as reports;
use crate::session::handlers as sessions;
use crate::state::AppState;

/// GET /api/v1/categories
async fn categories_handler() -> Json<&'static [Category]> {
    Json(&CATALOG[..])
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_report_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/categories", get(categories_handler))
        // Stateless report API
        .route("/api/v1/reports/normalize", post(reports::handle_normalize))
        .route("/api/v1/reports/ingest", post(reports::handle_ingest))
        // Presentation sessions
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            delete(sessions::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/report",
            put(sessions::handle_present_report),
        )
        .route("/api/v1/sessions/:id/view", get(sessions::handle_get_view))
        .route(
            "/api/v1/sessions/:id/anchors",
            delete(sessions::handle_clear_anchors),
        )
        .route(
            "/api/v1/sessions/:id/anchors/:key",
            put(sessions::handle_register_anchor),
        )
        .route(
            "/api/v1/sessions/:id/scroll/:key",
            post(sessions::handle_scroll),
        )
        .layer(body_limit)
        .with_state(state)
}
