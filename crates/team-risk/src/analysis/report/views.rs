use super::super::domain::{RiskCategory, RiskLevel};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Driver {
    pub category: RiskCategory,
    pub label: &'static str,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorLoadEntry {
    pub contributor: String,
    pub load: u32,
}

/// Projection assuming one category's contribution is removed entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhatIfScenario {
    pub category: RiskCategory,
    pub scenario: String,
    pub projected_score: u8,
    pub projected_level: RiskLevel,
    pub impact: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Increasing => "↑",
            Self::Decreasing => "↓",
            Self::Stable => "→",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Increasing => "Increasing risk",
            Self::Decreasing => "Decreasing risk",
            Self::Stable => "Stable",
        }
    }
}

/// Synthetic backcast derived from the current score alone. Illustrative
/// only: no prior report is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoricalTrend {
    pub week_minus_2: u8,
    pub week_minus_1: u8,
    pub current: u8,
    pub direction: TrendDirection,
    pub change: i32,
    pub trend: String,
}

/// Thresholds echoed back in verbose mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuditThresholds {
    pub pr_age_threshold: u32,
    pub overload_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    pub old_pr_count: usize,
    pub blocked_issue_count: usize,
    pub meetings_without_actions_count: usize,
    pub meetings_without_follow_up_count: usize,
    /// `None` when fewer than two meetings exist.
    pub avg_meeting_gap_days: Option<f64>,
    pub aging_pull_requests: Vec<String>,
    pub blocked_issues: Vec<String>,
    pub overloaded: Vec<ContributorLoadEntry>,
    pub score: u8,
    pub risk_level: RiskLevel,
    pub executive_summary: &'static str,
    pub strategic_insight: String,
    pub drivers: Vec<Driver>,
    pub insights: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub what_if_scenarios: Vec<WhatIfScenario>,
    pub historical_trend: HistoricalTrend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<AuditThresholds>,
}
