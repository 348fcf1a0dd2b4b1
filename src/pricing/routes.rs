//! Catalog and stateless estimate endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::calculators::compute_estimate;
use super::requests::EstimateRequest;
use super::responses::{CatalogResponse, EstimateResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/catalog", get(catalog))
        .route("/api/estimate", post(estimate))
}

/// Services and add-ons with prices
async fn catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse::from(state.catalog.as_ref()))
}

/// Estimate a selection without creating a booking session
async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>> {
    let selection = request.into_selection();
    let outcome = compute_estimate(&selection, &state.catalog);
    let response = EstimateResponse::from_outcome(outcome, state.catalog.currency())?;
    Ok(Json(response))
}
