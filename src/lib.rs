//! Booking API for a braiding salon: service catalog, price estimates and
//! the step-by-step booking wizard.

pub mod booking;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod pricing;
pub mod render;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::booking::Submitter;
use crate::cache::{AppCache, CacheStats};
use crate::catalog::Catalog;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub cache: AppCache,
    pub submitter: Submitter,
}

impl AppState {
    pub fn new(catalog: Catalog, cache: AppCache, submitter: Submitter) -> Self {
        Self {
            catalog: Arc::new(catalog),
            cache,
            submitter,
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(pricing::router())
        .merge(booking::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    submitter: &'static str,
    services: usize,
    cache: CacheStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        submitter: state.submitter.name(),
        services: state.catalog.services().len(),
        cache: state.cache.stats(),
    })
}
