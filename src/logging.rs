/// Logging setup for the converters.
///
/// Diagnostics go to stderr through `tracing`, filtered by `RUST_LOG`
/// (default `info`). The one-line completion message each command prints is
/// plain stdout and is not affected by the filter.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
