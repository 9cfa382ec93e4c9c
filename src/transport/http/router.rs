use crate::transport::http::handlers::{cars, health};
use crate::transport::http::types::AppState;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(cars::index_handler).post(cars::submit_handler))
        .route("/health", get(health::healthcheck_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
