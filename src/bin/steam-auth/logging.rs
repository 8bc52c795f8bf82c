//! Logging setup.

use std::io;

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Used if `RUST_LOG` is not set.
static DEFAULT_FILTER: &str = "WARN,steam_auth=DEBUG,steam_openid=DEBUG";

/// Logs go to stderr so stdout stays clean for command output.
pub fn init() {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
	let level = env_filter.to_string();

	tracing_subscriber::fmt()
		.with_writer(io::stderr)
		.with_env_filter(env_filter)
		.init();

	debug!(%level, "initialized logging");
}
