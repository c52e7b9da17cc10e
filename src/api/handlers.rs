//! API Handlers
//!
//! HTTP request handlers for each calculator endpoint.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

use crate::cache::{CalcRepository, Store, SystemClock};
use crate::calc::MortgageCalculator;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CacheEntryResponse, CalculateRequest, CalculateResponse, HealthResponse, StatsResponse,
};
use crate::service::CalcService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside calculation service
    pub service: CalcService,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(service: CalcService) -> Self {
        Self { service }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Wires a wall-clock store, the repository with the configured TTL and
    /// the mortgage calculator.
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(Store::new(Arc::new(SystemClock)));
        let repository = Arc::new(CalcRepository::new(store, config.cache_ttl));
        let calculator = Arc::new(MortgageCalculator::default());
        Self::new(CalcService::new(repository, calculator))
    }

    /// The repository behind the service, shared with the sweeper.
    pub fn repository(&self) -> Arc<CalcRepository> {
        self.service.repository().clone()
    }
}

/// Handler for POST /execute
///
/// Validates the request and returns the (possibly memoized) calculation.
pub async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> ApiResult<Json<CalculateResponse>> {
    let Json(req) = payload.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let aggregates = state.service.calculate(&req)?;

    Ok(Json(CalculateResponse::new(&req, aggregates)))
}

/// Handler for GET /cache
///
/// Lists every cached calculation, oldest first.
pub async fn cache_list_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CacheEntryResponse>>> {
    let entries = state.service.list()?;
    info!(count = entries.len(), "cache entries retrieved");

    Ok(Json(entries.into_iter().map(CacheEntryResponse::from).collect()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let repository = state.service.repository();

    Json(StatsResponse::new(
        repository.stats(),
        repository.store().len(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
