use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PR_AGE_DAYS: u32 = 10;
pub const DEFAULT_OVERLOAD_THRESHOLD: u32 = 5;

/// Thresholds the engine scores against. Supplied per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub pr_age_threshold_days: u32,
    pub overload_threshold: u32,
    /// Attach the thresholds to the report for audit output.
    pub verbose: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pr_age_threshold_days: DEFAULT_PR_AGE_DAYS,
            overload_threshold: DEFAULT_OVERLOAD_THRESHOLD,
            verbose: false,
        }
    }
}

/// Output selector consumed by the rendering adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Console,
    Markdown,
    Json,
    Summary,
}

impl ReportFormat {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Summary => "summary",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "summary" | "text" => Ok(Self::Summary),
            other => Err(ConfigError::InvalidFormat(other.to_string())),
        }
    }
}

/// Top-level configuration for the analyzer binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub format: ReportFormat,
    pub data_dir: PathBuf,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let pr_age_threshold_days = env::var("RISK_PR_AGE_DAYS")
            .unwrap_or_else(|_| DEFAULT_PR_AGE_DAYS.to_string())
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidPrAge)?;

        let overload_threshold = env::var("RISK_OVERLOAD_THRESHOLD")
            .unwrap_or_else(|_| DEFAULT_OVERLOAD_THRESHOLD.to_string())
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidOverload)?;

        let format = env::var("RISK_FORMAT")
            .unwrap_or_else(|_| ReportFormat::Console.label().to_string())
            .parse::<ReportFormat>()?;

        let data_dir = env::var("RISK_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let log_level = env::var("RISK_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            analysis: AnalysisConfig {
                pr_age_threshold_days,
                overload_threshold,
                verbose: false,
            },
            format,
            data_dir: PathBuf::from(data_dir),
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPrAge,
    InvalidOverload,
    InvalidFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPrAge => {
                write!(f, "RISK_PR_AGE_DAYS must be a non-negative whole number")
            }
            ConfigError::InvalidOverload => {
                write!(f, "RISK_OVERLOAD_THRESHOLD must be a non-negative whole number")
            }
            ConfigError::InvalidFormat(value) => write!(
                f,
                "unknown report format '{}' (expected console, md, json or summary)",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) fn env_guard() -> &'static std::sync::Mutex<()> {
    static GUARD: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();
    GUARD.get_or_init(|| std::sync::Mutex::new(()))
}
