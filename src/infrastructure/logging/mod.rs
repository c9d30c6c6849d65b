// Logging module - Logging infrastructure
use crate::domain::error::{TailError, TailResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::io;

/// Filter directive for a configured level name
fn filter_directive(log_level: &str, verbose: bool) -> String {
    let level = if verbose {
        "debug"
    } else {
        match log_level {
            "error" | "warn" | "info" | "debug" | "trace" => log_level,
            _ => "warn",
        }
    };
    format!("serial_tail={level},warn")
}

/// Initialize logging system.
///
/// Diagnostics go to stderr so that stdout carries only the tailed lines.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(log_level: &str, verbose: bool) -> TailResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level, verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true)
        )
        .try_init()
        .map_err(|e| TailError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;

    tracing::debug!("serial-tail logging system initialized");
    Ok(())
}
