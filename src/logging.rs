/// Logging setup for the command-line binaries.
///
/// Library code emits `tracing` events; binaries call `init` once at
/// startup. Verbosity comes from `RUST_LOG` (e.g. `RUST_LOG=fwii_service=debug`)
/// and defaults to `info`. Log lines go to stderr so that report output on
/// stdout stays clean for redirection.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Builds the filter from `RUST_LOG`, falling back to `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_LOG_FILTER))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
