//! Request and Response models for the calculator API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, plus the
//! calculation types they carry.

pub mod calc;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use calc::{CalcAggregates, CalcParams, CalcProgram};
pub use requests::CalculateRequest;
pub use responses::{
    CacheEntryResponse, CalculateResponse, ErrorResponse, HealthResponse, StatsResponse,
};
