//! Risk scoring for software team activity.
//!
//! Pull requests, issues and meetings go in; a scored, explained
//! [`RiskReport`](analysis::RiskReport) comes out. The engine is a pure
//! function of its inputs and the reference instant it is given.

pub mod analysis;
pub mod config;
pub mod error;
pub mod telemetry;

pub use analysis::{RiskEngine, RiskReport, TeamActivity};
pub use config::{AnalysisConfig, AppConfig, ReportFormat};
pub use error::AppError;
