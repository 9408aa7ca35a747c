mod narrative;
mod projections;
pub mod views;

pub use views::{
    AuditThresholds, ContributorLoadEntry, Driver, HistoricalTrend, RiskReport, TrendDirection,
    WhatIfScenario,
};

use super::detectors::ActivitySignals;
use super::domain::RiskLevel;
use super::rules::ScoreBreakdown;
use crate::config::AnalysisConfig;
use narrative::Findings;

pub(crate) fn compose(
    signals: &ActivitySignals<'_>,
    breakdown: ScoreBreakdown,
    config: &AnalysisConfig,
) -> RiskReport {
    let risk_level = RiskLevel::classify(breakdown.score);
    let findings = Findings {
        aging_pull_requests: signals.aging_pull_requests.len(),
        blocked_issues: signals.blocked_issues.len(),
        meetings_without_follow_up: signals.meetings_without_follow_up.len(),
        meetings_without_actions: signals.meetings_without_actions.len(),
        overloaded: &signals.overloaded,
        pr_age_threshold: config.pr_age_threshold_days,
        overload_threshold: config.overload_threshold,
    };

    let what_if_scenarios =
        projections::what_if_scenarios(&breakdown, |category| signals.count(category));
    let debug = config.verbose.then(|| AuditThresholds {
        pr_age_threshold: config.pr_age_threshold_days,
        overload_threshold: config.overload_threshold,
    });

    RiskReport {
        old_pr_count: findings.aging_pull_requests,
        blocked_issue_count: findings.blocked_issues,
        meetings_without_actions_count: findings.meetings_without_actions,
        meetings_without_follow_up_count: findings.meetings_without_follow_up,
        avg_meeting_gap_days: signals.avg_meeting_gap_days,
        aging_pull_requests: signals
            .aging_pull_requests
            .iter()
            .map(|pr| pr.id.clone())
            .collect(),
        blocked_issues: signals
            .blocked_issues
            .iter()
            .map(|issue| issue.id.clone())
            .collect(),
        overloaded: signals.overloaded.clone(),
        score: breakdown.score,
        risk_level,
        executive_summary: narrative::executive_summary(risk_level),
        strategic_insight: narrative::strategic_insight(&breakdown.drivers),
        insights: narrative::insights(&findings),
        recommended_actions: narrative::recommended_actions(&findings),
        what_if_scenarios,
        historical_trend: projections::historical_trend(breakdown.score),
        drivers: breakdown.drivers,
        debug,
    }
}
