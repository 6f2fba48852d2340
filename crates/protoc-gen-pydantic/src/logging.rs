//! Diagnostic logging to stderr
//!
//! stdout carries the encoded response, so every log line goes to stderr.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable read when `--log-level` is not given
pub const LOG_ENV: &str = "PROTOC_GEN_PYDANTIC_LOG";

/// Filter used when neither the flag nor the environment sets one
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Pick the filter directive: flag first, then environment, then default
pub fn directive(flag: Option<&str>, env: Option<String>) -> String {
    flag.map(str::to_string)
        .or(env.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// Initialize the stderr subscriber
pub fn init_logging(flag: Option<&str>) {
    let directive = directive(flag, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false),
    );

    // Ignore the error if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}
