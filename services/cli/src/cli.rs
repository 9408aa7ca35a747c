use crate::analyze::{run_analysis, AnalyzeArgs};
use clap::{Parser, Subcommand};
use team_risk::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "team-risk",
    about = "Score delivery risk from pull request, issue and meeting activity",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze team risk factors (default command)
    Analyze(AnalyzeArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Analyze(AnalyzeArgs::default()));

    match command {
        Command::Analyze(args) => run_analysis(args),
    }
}
