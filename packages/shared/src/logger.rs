//! Logging setup utilities for the chat server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the server library crate and the binary log at `default_log_level`,
/// plus `tower_http` so request traces show up. The filter can be
/// overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "hatchat_server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use hatchat_shared::logger::setup_logger;
///
/// setup_logger("hatchat_server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

const SERVER_CRATE_TARGET: &str = "hatchat_server";

fn default_filter(binary_name: &str, level: &str) -> String {
    let mut targets = vec![
        SERVER_CRATE_TARGET.to_string(),
        binary_name.replace('-', "_"),
        "tower_http".to_string(),
    ];
    targets.dedup();
    targets
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
