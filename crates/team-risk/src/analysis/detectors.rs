use super::domain::{Issue, Meeting, PullRequest, RiskCategory, TeamActivity};
use super::report::ContributorLoadEntry;
use crate::config::AnalysisConfig;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const BLOCKED_LABEL: &str = "blocked";
/// Inclusive window, in days after a meeting, in which a pull request counts as follow-up.
pub(crate) const FOLLOW_UP_WINDOW_DAYS: f64 = 3.0;

/// Raw findings from one pass over the activity records.
#[derive(Debug)]
pub(crate) struct ActivitySignals<'a> {
    pub aging_pull_requests: Vec<&'a PullRequest>,
    pub blocked_issues: Vec<&'a Issue>,
    pub avg_meeting_gap_days: Option<f64>,
    pub meetings_without_actions: Vec<&'a Meeting>,
    pub meetings_without_follow_up: Vec<&'a Meeting>,
    pub overloaded: Vec<ContributorLoadEntry>,
}

impl ActivitySignals<'_> {
    pub fn count(&self, category: RiskCategory) -> usize {
        match category {
            RiskCategory::AgingPullRequests => self.aging_pull_requests.len(),
            RiskCategory::BlockedIssues => self.blocked_issues.len(),
            RiskCategory::MissingFollowUp => self.meetings_without_follow_up.len(),
            RiskCategory::ContributorOverload => self.overloaded.len(),
        }
    }
}

pub(crate) fn detect<'a>(
    activity: &'a TeamActivity,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> ActivitySignals<'a> {
    let load = contributor_load(&activity.issues, &activity.pull_requests);

    ActivitySignals {
        aging_pull_requests: aging_pull_requests(
            &activity.pull_requests,
            config.pr_age_threshold_days,
            now,
        ),
        blocked_issues: blocked_issues(&activity.issues),
        avg_meeting_gap_days: average_meeting_gap(&activity.meetings),
        meetings_without_actions: meetings_without_action_items(&activity.meetings),
        meetings_without_follow_up: meetings_without_follow_up(
            &activity.meetings,
            &activity.pull_requests,
        ),
        overloaded: load.overloaded(config.overload_threshold),
    }
}

/// Whole days in `delta`, truncated toward zero.
fn whole_days(delta: Duration) -> i64 {
    delta.num_milliseconds() / MILLIS_PER_DAY
}

fn fractional_days(delta: Duration) -> f64 {
    delta.num_milliseconds() as f64 / MILLIS_PER_DAY as f64
}

pub(crate) fn aging_pull_requests(
    pull_requests: &[PullRequest],
    threshold_days: u32,
    now: DateTime<Utc>,
) -> Vec<&PullRequest> {
    pull_requests
        .iter()
        .filter(|pr| pr.status.is_open())
        .filter(|pr| whole_days(now - pr.created_at) > i64::from(threshold_days))
        .collect()
}

pub(crate) fn blocked_issues(issues: &[Issue]) -> Vec<&Issue> {
    issues
        .iter()
        .filter(|issue| issue.has_label(BLOCKED_LABEL))
        .collect()
}

/// Mean whole-day gap between consecutive meetings; `None` below two meetings.
pub(crate) fn average_meeting_gap(meetings: &[Meeting]) -> Option<f64> {
    if meetings.len() < 2 {
        return None;
    }

    let mut ordered: Vec<&Meeting> = meetings.iter().collect();
    ordered.sort_by_key(|meeting| meeting.date);

    let total_gap: i64 = ordered
        .windows(2)
        .map(|pair| whole_days((pair[1].date - pair[0].date).abs()))
        .sum();

    Some(total_gap as f64 / (ordered.len() - 1) as f64)
}

pub(crate) fn meetings_without_action_items(meetings: &[Meeting]) -> Vec<&Meeting> {
    meetings
        .iter()
        .filter(|meeting| !meeting.has_action_items)
        .collect()
}

pub(crate) fn meetings_without_follow_up<'a>(
    meetings: &'a [Meeting],
    pull_requests: &[PullRequest],
) -> Vec<&'a Meeting> {
    meetings
        .iter()
        .filter(|meeting| {
            !pull_requests.iter().any(|pr| {
                let offset = fractional_days(pr.created_at - meeting.date);
                (0.0..=FOLLOW_UP_WINDOW_DAYS).contains(&offset)
            })
        })
        .collect()
}

/// Per-contributor load that remembers first-insertion order.
#[derive(Debug, Default)]
pub(crate) struct ContributorLoad {
    entries: Vec<ContributorLoadEntry>,
    index: HashMap<String, usize>,
}

impl ContributorLoad {
    fn increment(&mut self, contributor: &str) {
        match self.index.get(contributor) {
            Some(&position) => self.entries[position].load += 1,
            None => {
                self.index
                    .insert(contributor.to_string(), self.entries.len());
                self.entries.push(ContributorLoadEntry {
                    contributor: contributor.to_string(),
                    load: 1,
                });
            }
        }
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[ContributorLoadEntry] {
        &self.entries
    }

    /// Entries strictly above `threshold`, in first-insertion order.
    pub fn overloaded(&self, threshold: u32) -> Vec<ContributorLoadEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.load > threshold)
            .cloned()
            .collect()
    }
}

/// Issues are counted before pull requests; only open pull requests add load.
pub(crate) fn contributor_load(issues: &[Issue], pull_requests: &[PullRequest]) -> ContributorLoad {
    let mut load = ContributorLoad::default();

    for assignee in issues.iter().filter_map(|issue| issue.assignee.as_deref()) {
        load.increment(assignee);
    }

    for author in pull_requests
        .iter()
        .filter(|pr| pr.status.is_open())
        .filter_map(|pr| pr.author.as_deref())
    {
        load.increment(author);
    }

    load
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::PullRequestStatus;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0)
            .single()
            .expect("valid reference instant")
    }

    fn pr(id: &str, status: PullRequestStatus, created_at: DateTime<Utc>, author: &str) -> PullRequest {
        PullRequest {
            id: id.to_string(),
            status,
            created_at,
            author: Some(author.to_string()),
        }
    }

    fn meeting(date: DateTime<Utc>, has_action_items: bool) -> Meeting {
        Meeting {
            date,
            has_action_items,
        }
    }

    fn issue(id: &str, assignee: Option<&str>, labels: &[&str]) -> Issue {
        Issue {
            id: id.to_string(),
            assignee: assignee.map(str::to_string),
            labels: labels.iter().map(|label| label.to_string()).collect(),
        }
    }

    #[test]
    fn aging_uses_whole_day_truncation() {
        let now = now();
        let pulls = vec![
            pr("9.9d", PullRequestStatus::Open, now - Duration::hours(9 * 24 + 22), "a"),
            pr("10.1d", PullRequestStatus::Open, now - Duration::hours(10 * 24 + 3), "a"),
            pr("10.9d", PullRequestStatus::Open, now - Duration::hours(10 * 24 + 22), "a"),
            pr("11d", PullRequestStatus::Open, now - Duration::days(11), "a"),
            pr("closed", PullRequestStatus::Closed, now - Duration::days(30), "a"),
        ];

        let ids: Vec<&str> = aging_pull_requests(&pulls, 10, now)
            .into_iter()
            .map(|pr| pr.id.as_str())
            .collect();
        assert_eq!(ids, vec!["11d"]);

        let ids: Vec<&str> = aging_pull_requests(&pulls, 9, now)
            .into_iter()
            .map(|pr| pr.id.as_str())
            .collect();
        assert_eq!(ids, vec!["10.1d", "10.9d", "11d"]);
    }

    #[test]
    fn blocked_label_is_case_sensitive() {
        let issues = vec![
            issue("1", None, &["blocked"]),
            issue("2", None, &["Blocked"]),
            issue("3", None, &["blocked-by-infra"]),
            issue("4", None, &[]),
        ];
        let blocked = blocked_issues(&issues);
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].id, "1");
    }

    #[test]
    fn meeting_gap_requires_two_meetings() {
        assert_eq!(average_meeting_gap(&[]), None);
        assert_eq!(average_meeting_gap(&[meeting(now(), true)]), None);
    }

    #[test]
    fn meeting_gap_sorts_and_truncates_each_gap() {
        let base = now();
        let meetings = vec![
            meeting(base + Duration::days(7), true),
            meeting(base, true),
            meeting(base + Duration::hours(3 * 24 + 20), false),
        ];
        // gaps after sorting: 3 (3.83 truncated) and 3 (3.17 truncated)
        assert_eq!(average_meeting_gap(&meetings), Some(3.0));
    }

    #[test]
    fn follow_up_window_is_inclusive_on_both_ends() {
        let day = now();
        let meetings = vec![meeting(day, true)];

        let on_start = vec![pr("1", PullRequestStatus::Closed, day, "a")];
        assert!(meetings_without_follow_up(&meetings, &on_start).is_empty());

        let on_end = vec![pr("1", PullRequestStatus::Open, day + Duration::days(3), "a")];
        assert!(meetings_without_follow_up(&meetings, &on_end).is_empty());

        let past_end = vec![pr(
            "1",
            PullRequestStatus::Open,
            day + Duration::days(3) + Duration::milliseconds(1),
            "a",
        )];
        assert_eq!(meetings_without_follow_up(&meetings, &past_end).len(), 1);

        let before = vec![pr("1", PullRequestStatus::Open, day - Duration::hours(1), "a")];
        assert_eq!(meetings_without_follow_up(&meetings, &before).len(), 1);
    }

    #[test]
    fn load_counts_issues_then_open_pull_requests_in_insertion_order() {
        let now = now();
        let issues = vec![
            issue("1", Some("zoe"), &[]),
            issue("2", None, &["blocked"]),
            issue("3", Some("adam"), &[]),
            issue("4", Some("zoe"), &[]),
        ];
        let pulls = vec![
            pr("10", PullRequestStatus::Open, now, "mia"),
            pr("11", PullRequestStatus::Closed, now, "adam"),
            pr("12", PullRequestStatus::Open, now, "adam"),
            PullRequest {
                id: "13".to_string(),
                status: PullRequestStatus::Open,
                created_at: now,
                author: None,
            },
        ];

        let load = contributor_load(&issues, &pulls);
        let entries: Vec<(&str, u32)> = load
            .entries()
            .iter()
            .map(|entry| (entry.contributor.as_str(), entry.load))
            .collect();
        assert_eq!(entries, vec![("zoe", 2), ("adam", 2), ("mia", 1)]);
    }

    #[test]
    fn overload_requires_strictly_more_than_threshold() {
        let five: Vec<Issue> = (0..5)
            .map(|n| issue(&n.to_string(), Some("sam"), &[]))
            .collect();
        assert!(contributor_load(&five, &[]).overloaded(5).is_empty());

        let six: Vec<Issue> = (0..6)
            .map(|n| issue(&n.to_string(), Some("sam"), &[]))
            .collect();
        let overloaded = contributor_load(&six, &[]).overloaded(5);
        assert_eq!(overloaded.len(), 1);
        assert_eq!(overloaded[0].contributor, "sam");
        assert_eq!(overloaded[0].load, 6);
    }
}
