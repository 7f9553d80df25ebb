//! Observability: tracing init.
//!
//! Uses config::ObservabilityConfig for VENVKIT_QUIET, VENVKIT_LOG_LEVEL, VENVKIT_LOG_JSON.

use tracing_subscriber::{prelude::*, EnvFilter};

/// Initialize tracing. Call at process startup.
/// When VENVKIT_QUIET=1, only WARN and above are logged.
///
/// Logs go to stderr so that command output on stdout (paths, JSON) stays machine-readable.
pub fn init_tracing() {
    let cfg = crate::config::ObservabilityConfig::from_env();
    let level: String = if cfg.quiet {
        "venvkit=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

/// Whether info-level progress output should be suppressed.
pub fn is_quiet() -> bool {
    crate::config::ObservabilityConfig::from_env().quiet
}
