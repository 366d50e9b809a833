//! Logging bootstrap.
//!
//! Every Beacon crate logs through `tracing`. Hosts that have no subscriber of
//! their own call [`init`] once at startup; the filter comes from the
//! `BEACON_LOG` environment variable (`EnvFilter` syntax) and defaults to
//! `warn`. With the `tracing-json` feature the output is JSON lines.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const ENV_VAR: &str = "BEACON_LOG";

/// Directives used when [`ENV_VAR`] is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str = "warn";

/// The filter [`init`] installs.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a global `fmt` subscriber. Fails if one is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    #[cfg(feature = "tracing-json")]
    let builder = builder.json();
    builder.try_init()
}
