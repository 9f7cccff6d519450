#![forbid(unsafe_code)]

//! Structured logging helpers.
//!
//! The engine logs through `tracing` under these targets:
//!
//! | Target | Content |
//! |--------|---------|
//! | `tilegrid.store` | committed and rejected collection mutations |
//! | `tilegrid.drag` | drag-session transitions (per-frame at `trace`) |
//! | `tilegrid.controller` | holds, lease conflicts, commit decisions |
//!
//! Libraries never install a global subscriber. Hosts that want JSON output
//! enable the `tracing-json` feature and call [`init_json_logging`] once.

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Error returned when a global subscriber cannot be installed.
pub type LoggingInitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install a JSON subscriber filtered by `filter` (e.g. `"tilegrid=debug"`).
///
/// `RUST_LOG` overrides `filter` when set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(filter: &str) -> Result<(), LoggingInitError> {
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::try_new(filter)?,
    };
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
}
