mod analyze;
mod cli;
mod render;

use team_risk::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
