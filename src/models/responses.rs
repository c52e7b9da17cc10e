//! Response DTOs for the calculator API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{ListedResult, StatsSnapshot};
use crate::models::{CalcAggregates, CalcParams, CalcProgram, CalculateRequest};

/// Response body for POST /execute
#[derive(Debug, Clone, Serialize)]
pub struct CalculateResponse {
    pub params: CalcParams,
    pub program: CalcProgram,
    pub aggregates: CalcAggregates,
}

impl CalculateResponse {
    /// Pairs a request with its computed aggregates.
    pub fn new(request: &CalculateRequest, aggregates: CalcAggregates) -> Self {
        Self {
            params: request.params(),
            program: request.program,
            aggregates,
        }
    }
}

/// One element of the GET /cache listing
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntryResponse {
    pub id: u64,
    pub params: CalcParams,
    pub program: CalcProgram,
    pub aggregates: CalcAggregates,
}

impl From<ListedResult<CalculateRequest, CalcAggregates>> for CacheEntryResponse {
    fn from(entry: ListedResult<CalculateRequest, CalcAggregates>) -> Self {
        Self {
            id: entry.id,
            params: entry.request.params(),
            program: entry.request.program,
            aggregates: entry.result,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses, decode failures included
    pub misses: u64,
    /// Number of stored values that failed to decode
    pub decode_failures: u64,
    /// Number of successful cache writes
    pub writes: u64,
    /// Number of cache writes that failed to encode
    pub write_failures: u64,
    /// Current number of entries in the store, expired ones included
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from repository counters
    pub fn new(stats: StatsSnapshot, total_entries: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            decode_failures: stats.decode_failures,
            writes: stats.writes,
            write_failures: stats.write_failures,
            total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
