use std::str::FromStr;

use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Directive used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LOG_DIRECTIVE: &str = "migrater=info";

/// Output format of the console logs, read from `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format `{}`, expected `pretty` or `json`", other)),
        }
    }
}

impl LogFormat {
    /// Unset or unknown values fall back to `Pretty`.
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT").ok().and_then(|value| value.parse().ok()).unwrap_or_default()
    }
}

/// Initialize the tracing subscriber, one line per event in the format chosen by `LOG_FORMAT`.
///
/// Also installs color_eyre, so action errors and panics carry their span trace.
pub fn init_logging() {
    color_eyre::install().expect("Unable to install color_eyre");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    let subscriber = tracing_subscriber::registry().with(env_filter).with(ErrorLayer::default());

    match LogFormat::from_env() {
        LogFormat::Json => subscriber.with(fmt::layer().json().with_current_span(true).with_span_list(false)).init(),
        LogFormat::Pretty => subscriber.with(fmt::layer().with_target(false)).init(),
    }
}
