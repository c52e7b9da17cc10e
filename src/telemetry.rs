//! Logging setup
//!
//! `local` logs human-readable text at debug level, `dev` logs JSON at debug
//! level and `prod` logs JSON at info level. `RUST_LOG` overrides the level.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use crate::config::Environment;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(env: Environment) -> &'static str {
    match env {
        Environment::Local | Environment::Dev => "mortgage_calculator=debug,tower_http=debug",
        Environment::Prod => "mortgage_calculator=info,tower_http=info",
    }
}

/// Installs the global tracing subscriber for `env`.
pub fn init_tracing(env: Environment) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(env).into());

    let (text, json) = match env {
        Environment::Local => (Some(fmt::layer()), None),
        Environment::Dev | Environment::Prod => (None, Some(fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
}
