mod detectors;
pub mod domain;
pub mod report;
mod rules;
mod source;

pub use domain::{
    parse_timestamp, Issue, Meeting, PullRequest, PullRequestStatus, RiskCategory, RiskLevel,
    TeamActivity,
};
pub use report::{
    AuditThresholds, ContributorLoadEntry, Driver, HistoricalTrend, RiskReport, TrendDirection,
    WhatIfScenario,
};
pub use rules::{rule_for, ScoringRule, MAX_SCORE, SCORING_RULES};
pub use source::{ActivityLoadError, ActivitySource, GITHUB_FILE, MEETINGS_FILE};

use crate::config::AnalysisConfig;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Stateless scorer; one instance can serve any number of invocations.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: AnalysisConfig,
}

impl RiskEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Scores `activity` with ages measured against `now`.
    pub fn analyze(&self, activity: &TeamActivity, now: DateTime<Utc>) -> RiskReport {
        let signals = detectors::detect(activity, &self.config, now);
        debug!(
            aging_prs = signals.aging_pull_requests.len(),
            blocked_issues = signals.blocked_issues.len(),
            meetings_without_actions = signals.meetings_without_actions.len(),
            meetings_without_follow_up = signals.meetings_without_follow_up.len(),
            overloaded = signals.overloaded.len(),
            avg_meeting_gap_days = ?signals.avg_meeting_gap_days,
            "activity signals detected"
        );

        let breakdown = rules::score_signals(&signals);
        let report = report::compose(&signals, breakdown, &self.config);
        debug!(
            score = report.score,
            level = report.risk_level.label(),
            drivers = report.drivers.len(),
            "risk report composed"
        );

        report
    }

    pub fn analyze_now(&self, activity: &TeamActivity) -> RiskReport {
        self.analyze(activity, Utc::now())
    }
}
