//! Mortgage Calculator - memoized mortgage calculation service
//!
//! Serves annuity calculations over HTTP and caches results in an in-memory
//! TTL store keyed by the request parameters.

pub mod api;
pub mod cache;
pub mod calc;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod tasks;
pub mod telemetry;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweeper;
