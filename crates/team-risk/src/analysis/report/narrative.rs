use super::super::detectors::FOLLOW_UP_WINDOW_DAYS;
use super::super::domain::RiskLevel;
use super::views::{ContributorLoadEntry, Driver};

const MAX_NARRATIVE_ENTRIES: usize = 5;
const MAX_REASSIGNED_ITEMS: u32 = 2;

/// Counts the narrative templates are parameterized by.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Findings<'a> {
    pub aging_pull_requests: usize,
    pub blocked_issues: usize,
    pub meetings_without_follow_up: usize,
    pub meetings_without_actions: usize,
    pub overloaded: &'a [ContributorLoadEntry],
    pub pr_age_threshold: u32,
    pub overload_threshold: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    AgingPullRequests,
    BlockedIssues,
    MissingFollowUp,
    MissingActionItems,
    ContributorOverload,
}

const INSIGHT_ORDER: [Topic; 5] = [
    Topic::AgingPullRequests,
    Topic::BlockedIssues,
    Topic::MissingFollowUp,
    Topic::MissingActionItems,
    Topic::ContributorOverload,
];

const ACTION_ORDER: [Topic; 5] = [
    Topic::ContributorOverload,
    Topic::AgingPullRequests,
    Topic::MissingFollowUp,
    Topic::BlockedIssues,
    Topic::MissingActionItems,
];

pub(crate) const fn executive_summary(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "The team is in a Critical risk state. Without immediate intervention, delivery commitments are at risk of failure within the current sprint.",
        RiskLevel::High => "The team is operating in a High-risk state. Without intervention, sprint predictability and review throughput are likely to degrade within the next cycle.",
        RiskLevel::Medium => "The team shows Moderate operational risk. Unaddressed, current patterns could escalate within 2-3 sprints.",
        RiskLevel::Low => "The team is currently operating in a Low-risk state with stable workflow patterns. Continue current practices.",
    }
}

/// Expects `drivers` already sorted highest first.
pub(crate) fn strategic_insight(drivers: &[Driver]) -> String {
    match drivers {
        [first, second, ..] => format!(
            "{} and {} are the dominant instability drivers.",
            first.label,
            second.label.to_lowercase()
        ),
        [only] => format!("{} is the primary instability driver.", only.label),
        [] => "No significant risk drivers detected.".to_string(),
    }
}

pub(crate) fn insights(findings: &Findings<'_>) -> Vec<String> {
    INSIGHT_ORDER
        .iter()
        .filter_map(|topic| findings.insight(*topic))
        .take(MAX_NARRATIVE_ENTRIES)
        .collect()
}

pub(crate) fn recommended_actions(findings: &Findings<'_>) -> Vec<String> {
    ACTION_ORDER
        .iter()
        .filter_map(|topic| findings.action(*topic))
        .take(MAX_NARRATIVE_ENTRIES)
        .collect()
}

impl Findings<'_> {
    fn count(&self, topic: Topic) -> usize {
        match topic {
            Topic::AgingPullRequests => self.aging_pull_requests,
            Topic::BlockedIssues => self.blocked_issues,
            Topic::MissingFollowUp => self.meetings_without_follow_up,
            Topic::MissingActionItems => self.meetings_without_actions,
            Topic::ContributorOverload => self.overloaded.len(),
        }
    }

    fn insight(&self, topic: Topic) -> Option<String> {
        let count = self.count(topic);
        if count == 0 {
            return None;
        }

        let sentence = match topic {
            Topic::AgingPullRequests => format!(
                "Review throughput bottleneck: {} PR(s) open > {} days. Consider adding reviewers or reducing PR size.",
                count, self.pr_age_threshold
            ),
            Topic::BlockedIssues => format!(
                "{} blocked issue(s) detected. Escalate external dependencies.",
                count
            ),
            Topic::MissingFollowUp => format!(
                "{} meeting(s) lacked follow-up PRs within {} days. Improve accountability tracking.",
                count, FOLLOW_UP_WINDOW_DAYS
            ),
            Topic::MissingActionItems => format!(
                "{} meeting(s) ended without action items. Enforce structured close-outs.",
                count
            ),
            Topic::ContributorOverload => {
                let names: Vec<String> = self
                    .overloaded
                    .iter()
                    .map(|entry| format!("@{}", entry.contributor))
                    .collect();
                format!(
                    "Workload imbalance: {} exceed {}-item threshold. Consider redistribution.",
                    names.join(", "),
                    self.overload_threshold
                )
            }
        };

        Some(sentence)
    }

    fn action(&self, topic: Topic) -> Option<String> {
        let count = self.count(topic);
        if count == 0 {
            return None;
        }

        let sentence = match topic {
            Topic::ContributorOverload => {
                let top = self.overloaded.first()?;
                let reassign = top
                    .load
                    .saturating_sub(self.overload_threshold)
                    .min(MAX_REASSIGNED_ITEMS);
                format!(
                    "Reassign {} item(s) from @{} to balance workload",
                    reassign, top.contributor
                )
            }
            Topic::AgingPullRequests => format!(
                "Review and prioritize {} PR(s) older than {} days",
                count, self.pr_age_threshold
            ),
            Topic::MissingFollowUp => format!(
                "Assign owners to {} meeting(s) lacking follow-up",
                count
            ),
            Topic::BlockedIssues => {
                format!("Escalate {} blocked issue(s) in next standup", count)
            }
            Topic::MissingActionItems => format!(
                "Add action items to {} meeting(s) retroactively",
                count
            ),
        };

        Some(sentence)
    }
}
