//! Tracing subscriber setup for the command-line tools.
//!
//! Logs always go to stderr: stdout carries the result or workload stream and
//! must stay clean for diffing.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `--log-level` nor `RUST_LOG` is given
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Initializes the global subscriber.
///
/// `RUST_LOG`, when set, takes precedence over `level`. With `json` set the
/// output is one JSON object per event.
///
/// # Errors
///
/// Fails on an unparseable filter directive, or if a global subscriber is
/// already installed.
pub fn setup_logging(level: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = level.unwrap_or(DEFAULT_LOG_LEVEL);
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_line_number(false)
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false)
            )
            .try_init()?;
    }

    tracing::debug!("Logging initialized with level: {}", log_level);
    Ok(())
}
