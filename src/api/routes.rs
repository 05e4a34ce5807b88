use axum::{
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Content
        .route("/search", get(handlers::search))
        .route("/titles/:media_type/:id", get(handlers::get_title))
        .route(
            "/titles/:media_type/:id/availability",
            get(handlers::get_availability),
        )
        // Watchlist
        .route(
            "/watchlist",
            get(handlers::get_watchlist).post(handlers::add_to_watchlist),
        )
        .route(
            "/watchlist/:id",
            get(handlers::watchlist_membership).delete(handlers::remove_from_watchlist),
        )
}
