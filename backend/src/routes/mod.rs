//! Route definitions for the Inventory Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Live alert stream (public; carries no more than the alert feed)
        .route("/ws/alerts", get(handlers::alerts_ws))
        // Protected routes - product catalog
        .nest("/products", product_routes())
        // Protected routes - stock ledger
        .nest("/inventory", inventory_routes())
        // Protected routes - alert monitor
        .nest("/alerts", alert_routes())
        // Protected routes - social trends
        .nest("/trends", trend_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/forecasts", get(handlers::get_forecasts))
        .route("/:product_id/forecasts/generate", post(handlers::generate_forecasts))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock ledger routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/movements",
            get(handlers::list_movements).post(handlers::record_movement),
        )
        .route("/reorder-recommendations", get(handlers::reorder_recommendations))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Alert monitor routes (protected)
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_alerts))
        .route("/unread-count", get(handlers::unread_count))
        .route("/sweep", post(handlers::run_sweep))
        .route("/:alert_id/read", put(handlers::mark_read))
        .route("/:alert_id/resolve", put(handlers::resolve_alert))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Social trend routes (protected)
fn trend_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_trends))
        .route_layer(middleware::from_fn(auth_middleware))
}
