use super::super::domain::{RiskCategory, RiskLevel};
use super::super::rules::{ScoreBreakdown, MAX_SCORE};
use super::views::{HistoricalTrend, TrendDirection, WhatIfScenario};

const MAX_SCENARIOS: usize = 3;
const TREND_THRESHOLD: i32 = 5;

/// Categories a team can act on directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reduction {
    ResolveBlocked,
    CloseAging,
    Redistribute,
}

impl Reduction {
    /// Scenario order.
    const ORDERED: [Self; 3] = [Self::ResolveBlocked, Self::CloseAging, Self::Redistribute];

    const fn category(self) -> RiskCategory {
        match self {
            Self::ResolveBlocked => RiskCategory::BlockedIssues,
            Self::CloseAging => RiskCategory::AgingPullRequests,
            Self::Redistribute => RiskCategory::ContributorOverload,
        }
    }

    fn describe(self, count: usize) -> String {
        match self {
            Self::ResolveBlocked if count == 1 => "If 1 blocked issue is resolved".to_string(),
            Self::ResolveBlocked => format!("If {count} blocked issues are resolved"),
            Self::CloseAging if count == 1 => "If 1 aging PR is merged/closed".to_string(),
            Self::CloseAging => format!("If {count} aging PRs are merged/closed"),
            Self::Redistribute => {
                "If workload is redistributed from overloaded contributors".to_string()
            }
        }
    }
}

pub(crate) fn what_if_scenarios(
    breakdown: &ScoreBreakdown,
    count_for: impl Fn(RiskCategory) -> usize,
) -> Vec<WhatIfScenario> {
    Reduction::ORDERED
        .iter()
        .filter_map(|&reduction| {
            let category = reduction.category();
            let points = breakdown.points_for(category);
            if points == 0 {
                return None;
            }

            let projected_score = u32::from(breakdown.score).saturating_sub(points) as u8;
            Some(WhatIfScenario {
                category,
                scenario: reduction.describe(count_for(category)),
                projected_score,
                projected_level: RiskLevel::classify(projected_score),
                impact: -(points as i32),
            })
        })
        .take(MAX_SCENARIOS)
        .collect()
}

fn clamp_score(value: i32) -> i32 {
    value.clamp(0, i32::from(MAX_SCORE))
}

/// Fixed display heuristic: both prior weeks are functions of `current`
/// alone and must keep this exact formula.
pub(crate) fn historical_trend(current: u8) -> HistoricalTrend {
    let current_value = i32::from(current);
    let week_minus_1 = clamp_score(current_value - 8 + current_value % 5);
    let week_minus_2 = clamp_score(week_minus_1 - 9 + current_value % 3);

    let change = current_value - week_minus_2;
    let direction = if change > TREND_THRESHOLD {
        TrendDirection::Increasing
    } else if change < -TREND_THRESHOLD {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    HistoricalTrend {
        week_minus_2: week_minus_2 as u8,
        week_minus_1: week_minus_1 as u8,
        current,
        direction,
        change,
        trend: format!(
            "{} {} ({:+} points over 2 weeks)",
            direction.arrow(),
            direction.label(),
            change
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::rules::score_counts;

    #[test]
    fn trend_matches_backcast_formula() {
        let trend = historical_trend(65);
        assert_eq!(trend.week_minus_1, 57);
        assert_eq!(trend.week_minus_2, 50);
        assert_eq!(trend.change, 15);
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.trend, "↑ Increasing risk (+15 points over 2 weeks)");
    }

    #[test]
    fn trend_of_zero_is_stable() {
        let trend = historical_trend(0);
        assert_eq!((trend.week_minus_2, trend.week_minus_1), (0, 0));
        assert_eq!(trend.trend, "→ Stable (+0 points over 2 weeks)");
    }

    #[test]
    fn trend_is_bounded_and_deterministic_for_every_score() {
        for score in 0..=MAX_SCORE {
            let first = historical_trend(score);
            assert!(first.week_minus_1 <= MAX_SCORE);
            assert!(first.week_minus_2 <= MAX_SCORE);
            assert_eq!(first, historical_trend(score));
        }
    }

    #[test]
    fn scenarios_follow_fixed_order_and_reclassify() {
        // aging 2 -> 20, blocked 2 -> 30, follow-up 3 -> 20, overload 1 -> 10 = 80
        let counts = |category: RiskCategory| -> usize {
            match category {
                RiskCategory::AgingPullRequests => 2,
                RiskCategory::BlockedIssues => 2,
                RiskCategory::MissingFollowUp => 3,
                RiskCategory::ContributorOverload => 1,
            }
        };
        let breakdown = score_counts(counts);
        assert_eq!(breakdown.score, 80);

        let scenarios = what_if_scenarios(&breakdown, counts);
        let summary: Vec<(&str, u8, RiskLevel, i32)> = scenarios
            .iter()
            .map(|s| (s.scenario.as_str(), s.projected_score, s.projected_level, s.impact))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("If 2 blocked issues are resolved", 50, RiskLevel::High, -30),
                ("If 2 aging PRs are merged/closed", 60, RiskLevel::High, -20),
                (
                    "If workload is redistributed from overloaded contributors",
                    70,
                    RiskLevel::High,
                    -10
                ),
            ]
        );
    }

    #[test]
    fn singular_scenarios_and_inactive_categories() {
        let counts = |category: RiskCategory| -> usize {
            match category {
                RiskCategory::BlockedIssues => 1,
                RiskCategory::AgingPullRequests => 1,
                _ => 0,
            }
        };
        let breakdown = score_counts(counts);
        let scenarios = what_if_scenarios(&breakdown, counts);
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].scenario, "If 1 blocked issue is resolved");
        assert_eq!(scenarios[0].projected_score, 10);
        assert_eq!(scenarios[0].projected_level, RiskLevel::Low);
        assert_eq!(scenarios[1].scenario, "If 1 aging PR is merged/closed");
        assert_eq!(scenarios[1].projected_score, 15);
    }

    #[test]
    fn follow_up_gaps_never_produce_scenarios() {
        let counts = |category: RiskCategory| -> usize {
            match category {
                RiskCategory::MissingFollowUp => 4,
                _ => 0,
            }
        };
        let breakdown = score_counts(counts);
        assert_eq!(breakdown.score, 20);
        assert!(what_if_scenarios(&breakdown, counts).is_empty());

        let categories: Vec<RiskCategory> = Reduction::ORDERED
            .iter()
            .map(|reduction| reduction.category())
            .collect();
        assert!(!categories.contains(&RiskCategory::MissingFollowUp));
    }
}
