//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: evicts expired cache entries at the configured interval

mod sweeper;

pub use sweeper::spawn_sweeper;
