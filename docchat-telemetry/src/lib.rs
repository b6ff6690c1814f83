//! # docchat-telemetry
//!
//! Logging setup for the docchat binaries and an in-memory capture layer for
//! tests.
//!
//! ```rust,ignore
//! docchat_telemetry::init_with_format("docchat", LogFormat::Json)?;
//! tracing::info!("ready");
//! ```
//!
//! Filtering follows `RUST_LOG` and defaults to `info`.

pub mod memory;

use std::str::FromStr;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub use memory::{CaptureLayer, CapturedEvent, SharedEventStorage};

const DEFAULT_FILTER: &str = "info";

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for terminals.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected 'pretty' or 'json')")),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber with human-readable output on stderr.
pub fn init_telemetry(service_name: &str) -> Result<(), TryInitError> {
    init_with_format(service_name, LogFormat::Pretty)
}

/// Install the global subscriber with the given output format.
///
/// Fails if a global subscriber is already set.
pub fn init_with_format(service_name: &str, format: LogFormat) -> Result<(), TryInitError> {
    let registry = Registry::default().with(env_filter());
    match format {
        LogFormat::Pretty => {
            registry.with(fmt::layer().with_writer(std::io::stderr).with_target(false)).try_init()?
        }
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_current_span(false))
            .try_init()?,
    }
    tracing::debug!(service.name = service_name, ?format, "telemetry initialized");
    Ok(())
}

/// Install the global subscriber with human-readable output plus capture
/// into `storage`.
pub fn init_with_storage(
    service_name: &str,
    storage: Arc<SharedEventStorage>,
) -> Result<(), TryInitError> {
    Registry::default()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(CaptureLayer::new(storage))
        .try_init()?;
    tracing::debug!(service.name = service_name, "telemetry initialized with capture");
    Ok(())
}

/// A subscriber that only captures, for use with
/// [`tracing::subscriber::set_default`] in tests.
pub fn capture_subscriber(
    storage: Arc<SharedEventStorage>,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    Registry::default().with(CaptureLayer::new(storage))
}

#[cfg(test)]
mod test_capture;
