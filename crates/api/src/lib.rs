//! HTTP API server with observability for the inventory service.
//!
//! Provides REST endpoints for items, variants and sales, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use inventory::{InventoryService, InventoryStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::{AppState, items, orders, variants};

/// Inventory routes, mounted both at the root and under `/api`.
fn inventory_routes<S: InventoryStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/items", post(items::create::<S>).get(items::list::<S>))
        .route("/items/{id}", get(items::get::<S>))
        .route("/items/{item_id}/variants", post(items::add_variant::<S>))
        .route("/variants/{variant_id}", get(variants::get::<S>))
        .route(
            "/variants/{variant_id}/stock",
            patch(variants::update_stock::<S>),
        )
        .route("/orders", post(orders::sell::<S>))
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: InventoryStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .merge(inventory_routes::<S>())
        .nest("/api", inventory_routes::<S>())
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around an explicitly passed store.
pub fn create_state<S: InventoryStore>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        inventory: InventoryService::new(store),
    })
}
