//! API Module
//!
//! HTTP handlers and routing for the calculator REST API.
//!
//! # Endpoints
//! - `POST /execute` - Calculate a mortgage (memoized)
//! - `GET /cache` - List cached calculations
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
