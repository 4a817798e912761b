//! HTTP API server for the fruit storefront.
//!
//! Serves the catalog, order and cart endpoints on top of the checkout
//! coordinator, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use checkout::{CheckoutCoordinator, CheckoutError, FlushPolicy};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::KeyValueStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: KeyValueStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    let api = Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", get(routes::products::list::<S>))
        .route("/products/{id}", get(routes::products::get::<S>))
        .route(
            "/orders",
            post(routes::orders::create::<S>).get(routes::orders::list::<S>),
        )
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/cart/add", post(routes::cart::add::<S>))
        .route("/cart/validate", post(routes::cart::validate::<S>))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(metrics_router)
        .fallback(routes::health::not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Restores the shop from `store` and wraps it in application state.
///
/// Missing documents are seeded and written back before the state is returned.
pub async fn create_state<S: KeyValueStore + 'static>(
    store: S,
    policy: FlushPolicy,
) -> Result<Arc<AppState<S>>, CheckoutError> {
    let coordinator = CheckoutCoordinator::open(store, policy).await?;
    Ok(Arc::new(AppState { coordinator }))
}
