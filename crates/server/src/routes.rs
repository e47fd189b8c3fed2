//! Route configuration.

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health check (intentionally unauthenticated for load balancers/k8s probes)
        .route("/v1/health", get(handlers::health_check))
        // Quota discovery
        .route("/v1/quotas", get(handlers::get_quotas))
        // Parent records
        .route("/v1/parents", post(handlers::create_parent))
        .route(
            "/v1/parents/{parent_id}",
            get(handlers::get_parent).delete(handlers::delete_parent),
        )
        // Asset pipeline
        .route(
            "/v1/parents/{parent_id}/assets",
            post(handlers::upload_asset).get(handlers::list_assets),
        )
        .route(
            "/v1/parents/{parent_id}/assets/order",
            put(handlers::reorder_assets),
        )
        .route(
            "/v1/assets/{asset_id}",
            get(handlers::get_asset)
                .patch(handlers::update_asset)
                .delete(handlers::delete_asset),
        );

    let mut router = Router::new().merge(api_routes);

    // Conditionally add metrics endpoint based on config.
    // SECURITY: When enabled, this endpoint MUST be network-restricted
    // to authorized Prometheus scraper IPs only.
    // See crate::metrics module documentation for details.
    if state.config.server.metrics_enabled {
        let metrics_routes = Router::new().route("/metrics", get(metrics_handler));
        router = router.merge(metrics_routes);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
