use axum::routing::{get, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    analytics_handlers, item_handlers, movement_request_handlers, ops_handlers, user_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/items",
            get(item_handlers::list_items).post(item_handlers::create_item),
        )
        .route("/v1/items/scan", post(item_handlers::scan_item))
        .route("/v1/items/:item_id", get(item_handlers::get_item))
        .route("/v1/items/:item_id/assign", post(item_handlers::assign_item))
        .route(
            "/v1/movement-requests",
            get(movement_request_handlers::list_requests)
                .post(movement_request_handlers::create_request),
        )
        .route(
            "/v1/movement-requests/:request_id/review",
            post(movement_request_handlers::review_request),
        )
        .route(
            "/v1/users",
            get(user_handlers::list_users).post(user_handlers::create_user),
        )
        .route(
            "/v1/analytics/dashboard",
            get(analytics_handlers::dashboard),
        )
        .route(
            "/v1/analytics/item-history/:item_id",
            get(analytics_handlers::item_history),
        )
        .route(
            "/v1/analytics/user-activity/:user_id",
            get(analytics_handlers::user_activity),
        )
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
