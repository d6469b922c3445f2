//! Tracing subscriber setup shared by both binaries.
//!
//! Respects `RUST_LOG`; falls back to `info` for this crate and
//! `tower_http`.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "agentcore_shim=info,lambda_invoker=info,tower_http=info";

/// Human-readable output for the local server.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .init();
}

/// Lambda variant: CloudWatch stamps every line already, and colors only
/// add noise there.
pub fn init_lambda_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
