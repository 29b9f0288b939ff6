use super::handlers::{milongas, posts};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// `"*"` allows any origin; otherwise a comma separated list. A list with no
/// parseable origin falls back to any.
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if allowed_origins.trim() == "*" {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        warn!("No usable CORS origin in {:?}, allowing any", allowed_origins);
        return layer.allow_origin(Any);
    }

    info!("CORS restricted to {:?}", origins);
    layer.allow_origin(origins)
}

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    Router::new()
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route("/api/posts/:post_id", get(posts::get_post))
        .route("/api/posts/:post_id/comments", post(posts::post_comment))
        .route(
            "/api/posts/:post_id/comments/:node_id/reactions",
            post(posts::react_to_comment),
        )
        .route("/api/milongas", get(milongas::list_milongas))
        .route("/api/milongas/:milonga_id", get(milongas::get_milonga))
        .route(
            "/api/milongas/:milonga_id/inquiries",
            post(milongas::post_inquiry),
        )
        .route(
            "/api/milongas/:milonga_id/inquiries/:node_id/reactions",
            post(milongas::react_to_inquiry),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}
