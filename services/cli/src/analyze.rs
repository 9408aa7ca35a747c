use crate::render::render;
use chrono::{DateTime, Local, Utc};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use team_risk::analysis::{parse_timestamp, ActivitySource, RiskEngine, RiskReport};
use team_risk::config::AppConfig;
use team_risk::{telemetry, AppError, ReportFormat};
use tracing::{debug, info};

#[derive(Args, Debug, Default)]
pub(crate) struct AnalyzeArgs {
    /// PR age threshold in days
    #[arg(long = "pr-age", value_name = "DAYS")]
    pub(crate) pr_age: Option<u32>,
    /// Overload threshold for assigned items
    #[arg(long, value_name = "COUNT")]
    pub(crate) overload: Option<u32>,
    /// Output format: console, md, json or summary
    #[arg(long, value_parser = parse_format)]
    pub(crate) format: Option<ReportFormat>,
    /// Include the thresholds used in the report
    #[arg(long)]
    pub(crate) verbose: bool,
    /// Directory holding github.json and meetings.json
    #[arg(long, conflicts_with_all = ["github", "meetings"])]
    pub(crate) data_dir: Option<PathBuf>,
    /// Explicit GitHub export (requires --meetings)
    #[arg(long, requires = "meetings")]
    pub(crate) github: Option<PathBuf>,
    /// Explicit meeting log (requires --github)
    #[arg(long, requires = "github")]
    pub(crate) meetings: Option<PathBuf>,
    /// Reference instant for PR ages (RFC 3339 or YYYY-MM-DD, defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

fn parse_format(raw: &str) -> Result<ReportFormat, String> {
    raw.parse::<ReportFormat>().map_err(|err| err.to_string())
}

pub(crate) fn run_analysis(args: AnalyzeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    args.apply_to(&mut config);
    telemetry::init(&config.telemetry, config.format)?;
    debug!(?config.analysis, format = config.format.label(), data_dir = %config.data_dir.display(), "configuration resolved");

    let report = build_report(&args, &config)?;
    let rendered = render(&report, config.format, Local::now())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}

impl AnalyzeArgs {
    /// Flags win over environment and `.env` values.
    pub(crate) fn apply_to(&self, config: &mut AppConfig) {
        if let Some(days) = self.pr_age {
            config.analysis.pr_age_threshold_days = days;
        }
        if let Some(count) = self.overload {
            config.analysis.overload_threshold = count;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        config.analysis.verbose = self.verbose;
    }
}

pub(crate) fn build_report(args: &AnalyzeArgs, config: &AppConfig) -> Result<RiskReport, AppError> {
    let activity = match (&args.github, &args.meetings) {
        (Some(github), Some(meetings)) => ActivitySource::from_paths(github, meetings)?,
        _ => ActivitySource::from_dir(&config.data_dir)?,
    };

    let now = args.now.unwrap_or_else(Utc::now);
    let report = RiskEngine::new(config.analysis).analyze(&activity, now);
    info!(
        score = report.score,
        level = report.risk_level.label(),
        pull_requests = activity.pull_requests.len(),
        issues = activity.issues.len(),
        meetings = activity.meetings.len(),
        "risk report generated"
    );

    Ok(report)
}
