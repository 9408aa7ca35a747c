use super::detectors::ActivitySignals;
use super::domain::RiskCategory;
use super::report::Driver;

pub const MAX_SCORE: u8 = 100;

/// Weight and cap applied to one scored category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRule {
    pub category: RiskCategory,
    pub weight: u32,
    pub cap: u32,
}

impl ScoringRule {
    pub const fn label(&self) -> &'static str {
        self.category.label()
    }

    pub fn points(&self, count: usize) -> u32 {
        let raw = (count as u64).saturating_mul(u64::from(self.weight));
        raw.min(u64::from(self.cap)) as u32
    }
}

pub const SCORING_RULES: [ScoringRule; 4] = [
    ScoringRule {
        category: RiskCategory::AgingPullRequests,
        weight: 10,
        cap: 40,
    },
    ScoringRule {
        category: RiskCategory::BlockedIssues,
        weight: 15,
        cap: 30,
    },
    ScoringRule {
        category: RiskCategory::MissingFollowUp,
        weight: 7,
        cap: 20,
    },
    ScoringRule {
        category: RiskCategory::ContributorOverload,
        weight: 10,
        cap: 20,
    },
];

pub fn rule_for(category: RiskCategory) -> &'static ScoringRule {
    match category {
        RiskCategory::AgingPullRequests => &SCORING_RULES[0],
        RiskCategory::BlockedIssues => &SCORING_RULES[1],
        RiskCategory::MissingFollowUp => &SCORING_RULES[2],
        RiskCategory::ContributorOverload => &SCORING_RULES[3],
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ScoreBreakdown {
    pub score: u8,
    /// Non-zero contributions, highest first; ties keep evaluation order.
    pub drivers: Vec<Driver>,
}

impl ScoreBreakdown {
    pub fn points_for(&self, category: RiskCategory) -> u32 {
        self.drivers
            .iter()
            .find(|driver| driver.category == category)
            .map(|driver| driver.points)
            .unwrap_or(0)
    }
}

pub(crate) fn score_signals(signals: &ActivitySignals<'_>) -> ScoreBreakdown {
    score_counts(|category| signals.count(category))
}

pub(crate) fn score_counts(count_for: impl Fn(RiskCategory) -> usize) -> ScoreBreakdown {
    let mut score: u32 = 0;
    let mut drivers = Vec::new();

    for category in RiskCategory::ordered() {
        let rule = rule_for(category);
        let points = rule.points(count_for(category));
        if points == 0 {
            continue;
        }

        score = (score + points).min(u32::from(MAX_SCORE));
        drivers.push(Driver {
            category,
            label: rule.label(),
            points,
        });
    }

    drivers.sort_by(|a, b| b.points.cmp(&a.points));

    ScoreBreakdown {
        score: score as u8,
        drivers,
    }
}
