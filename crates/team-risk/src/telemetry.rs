use crate::config::{ReportFormat, TelemetryConfig};
use std::env;
use std::io::IsTerminal;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Where the active log filter directive came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOrigin {
    RustLog,
    RiskLogLevel,
}

impl FilterOrigin {
    pub const fn variable(self) -> &'static str {
        match self {
            Self::RustLog => "RUST_LOG",
            Self::RiskLogLevel => "RISK_LOG_LEVEL",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("{} value '{directive}' is not a valid log filter", origin.variable())]
    InvalidFilter {
        origin: FilterOrigin,
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("log subscriber could not be installed: {0}")]
    SubscriberInstalled(String),
}

/// Picks `RUST_LOG` when it is set and non-blank, otherwise the configured
/// `RISK_LOG_LEVEL`. A malformed directive is an error, never a silent fallback.
pub fn log_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let (origin, directive) = match env::var(FilterOrigin::RustLog.variable()) {
        Ok(value) if !value.trim().is_empty() => (FilterOrigin::RustLog, value),
        _ => (FilterOrigin::RiskLogLevel, config.log_level.clone()),
    };

    EnvFilter::try_new(directive.trim()).map_err(|source| TelemetryError::InvalidFilter {
        origin,
        directive,
        source,
    })
}

/// Colour log lines only next to the coloured console report, and only when
/// a person is watching stderr.
pub fn colored_logs(format: ReportFormat, stderr_is_terminal: bool) -> bool {
    format == ReportFormat::Console && stderr_is_terminal
}

/// Logs go to stderr; stdout carries the rendered report alone.
pub fn init(config: &TelemetryConfig, format: ReportFormat) -> Result<(), TelemetryError> {
    let filter = log_filter(config)?;
    let ansi = colored_logs(format, std::io::stderr().is_terminal());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .compact()
        .try_init()
        .map_err(|err| TelemetryError::SubscriberInstalled(err.to_string()))
}
