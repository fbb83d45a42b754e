//! Tracing subscriber setup
//!
//! Logs go to stderr so that `--json` output on stdout stays parseable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{CliError, Result};

/// Initialize the tracing subscriber
///
/// `RUST_LOG` wins over the configured filter. `verbose` raises the
/// configured filter to `debug`.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let directive = if verbose { "debug" } else { config.filter.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .map_err(|e| CliError::Logging {
            message: format!("Invalid log filter: {}", e),
        })?;

    let subscriber = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Compact => subscriber
            .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => subscriber
            .with(fmt::layer().pretty().with_target(true).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}
