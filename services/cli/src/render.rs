use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use team_risk::analysis::{Driver, RiskLevel, RiskReport, TrendDirection};
use team_risk::{AppError, ReportFormat};

const METER_BLOCKS: usize = 20;
const RULE_WIDTH: usize = 50;

pub(crate) fn render(
    report: &RiskReport,
    format: ReportFormat,
    generated_at: DateTime<Local>,
) -> Result<String, AppError> {
    let rendered = match format {
        ReportFormat::Console => render_console(report, generated_at),
        ReportFormat::Markdown => render_markdown(report),
        ReportFormat::Json => serde_json::to_string_pretty(report)? + "\n",
        ReportFormat::Summary => render_summary(report),
    };
    Ok(rendered)
}

fn status_icon(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "🔴",
        RiskLevel::High => "🟠",
        RiskLevel::Medium => "🟡",
        RiskLevel::Low => "🟢",
    }
}

fn paint(level: RiskLevel, text: &str) -> String {
    match level {
        RiskLevel::Critical => text.red().bold().to_string(),
        RiskLevel::High => text.yellow().to_string(),
        RiskLevel::Medium => text.cyan().to_string(),
        RiskLevel::Low => text.green().to_string(),
    }
}

fn risk_meter(score: u8, level: RiskLevel) -> String {
    let filled = ((f64::from(score) / 100.0) * METER_BLOCKS as f64).round() as usize;
    let filled = filled.min(METER_BLOCKS);
    let empty = METER_BLOCKS - filled;
    format!(
        "[{}{}] {}%",
        paint(level, &"█".repeat(filled)),
        "░".repeat(empty).dimmed(),
        score
    )
}

fn key_metrics(report: &RiskReport) -> Vec<String> {
    let mut lines = vec![
        format!("- {} PRs older than threshold", report.old_pr_count),
        format!("- {} Issues marked blocked", report.blocked_issue_count),
        format!(
            "- {} Meetings without action items",
            report.meetings_without_actions_count
        ),
        format!(
            "- {} Meetings without follow-up actions/PRs",
            report.meetings_without_follow_up_count
        ),
    ];

    if let Some(gap) = report.avg_meeting_gap_days {
        lines.push(format!("- Avg meeting gap: {gap:.1} days"));
    }

    if report.overloaded.is_empty() {
        lines.push("- No contributors flagged for overload".to_string());
    } else {
        for entry in &report.overloaded {
            lines.push(format!(
                "- Contributor @{} assigned {} items (capacity risk)",
                entry.contributor, entry.load
            ));
        }
    }

    lines
}

fn driver_lines(drivers: &[Driver], bullet: &str, empty: &str) -> String {
    if drivers.is_empty() {
        return empty.to_string();
    }
    drivers
        .iter()
        .map(|driver| format!("  {bullet} {} (+{})", driver.label, driver.points))
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_console(report: &RiskReport, generated_at: DateTime<Local>) -> String {
    let level = report.risk_level;
    let banner = format!(
        "{} TEAM HEALTH STATUS: {} RISK",
        status_icon(level),
        level.label().to_uppercase()
    );
    let rule = "═".repeat(RULE_WIDTH).bold().to_string();

    let mut lines = vec![
        String::new(),
        rule.clone(),
        paint(level, &banner).bold().to_string(),
        format!("   Risk Index: {}/100", report.score).dimmed().to_string(),
        rule,
        String::new(),
        format!("Risk Meter: {}", risk_meter(report.score, level)),
        String::new(),
        "Executive Summary".bold().underline().to_string(),
        report.executive_summary.italic().to_string(),
        String::new(),
        "Key Metrics".bold().underline().to_string(),
    ];
    lines.extend(key_metrics(report));

    lines.push(String::new());
    lines.push("Top Risk Drivers".bold().to_string());
    lines.push(driver_lines(&report.drivers, "•", "None"));

    if !report.recommended_actions.is_empty() {
        lines.push(String::new());
        lines.push("Recommended Actions".bold().underline().to_string());
        lines.extend(
            report
                .recommended_actions
                .iter()
                .enumerate()
                .map(|(index, action)| format!("  {}. {}", index + 1, action).green().to_string()),
        );
    }

    if !report.what_if_scenarios.is_empty() {
        lines.push(String::new());
        lines.push("📊 Simulation Mode".bold().underline().to_string());
        for scenario in &report.what_if_scenarios {
            let projected = format!(
                "    → Projected Score: {} ({})",
                scenario.projected_score,
                scenario.projected_level.label()
            );
            lines.push(format!("  {}:", scenario.scenario));
            lines.push(paint(scenario.projected_level, &projected));
            lines.push(
                format!("    → Impact: {} points", scenario.impact)
                    .green()
                    .to_string(),
            );
        }
    }

    let trend = &report.historical_trend;
    let trend_line = format!("  Trend:   {}", trend.trend);
    let trend_line = match trend.direction {
        TrendDirection::Increasing => trend_line.red().bold().to_string(),
        TrendDirection::Decreasing => trend_line.green().bold().to_string(),
        TrendDirection::Stable => trend_line.yellow().bold().to_string(),
    };
    lines.extend([
        String::new(),
        "📈 Risk Trend (Last 3 Weeks, simulated)"
            .bold()
            .underline()
            .to_string(),
        format!("  Week -2: {}", trend.week_minus_2),
        format!("  Week -1: {}", trend.week_minus_1),
        format!("  Current: {}", trend.current),
        trend_line,
        String::new(),
        format!(
            "{}{}",
            "🎯 Operational Signal: ".cyan().bold(),
            report.strategic_insight
        ),
    ]);

    if let Some(debug) = &report.debug {
        lines.push(
            format!(
                "Thresholds: PR age > {} days, overload > {} items",
                debug.pr_age_threshold, debug.overload_threshold
            )
            .dimmed()
            .to_string(),
        );
    }

    lines.extend([
        String::new(),
        "─".repeat(RULE_WIDTH).dimmed().to_string(),
        format!(
            "Report generated: {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        )
        .dimmed()
        .to_string(),
    ]);

    join_lines(lines)
}

fn render_markdown(report: &RiskReport) -> String {
    let mut lines = vec![
        "# 🚨 Risk Report".to_string(),
        String::new(),
        format!("**Risk score:** {}/100", report.score),
        format!("**Risk level:** {}", report.risk_level.label()),
        String::new(),
    ];
    lines.extend(key_metrics(report));
    lines.extend([
        String::new(),
        "## Top drivers".to_string(),
        String::new(),
        driver_lines(&report.drivers, "-", "_None_"),
    ]);
    join_lines(lines)
}

/// Plain-text digest suitable for chat or tool output.
fn render_summary(report: &RiskReport) -> String {
    let gap = report
        .avg_meeting_gap_days
        .map(|gap| gap.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let overloaded = if report.overloaded.is_empty() {
        "• None".to_string()
    } else {
        report
            .overloaded
            .iter()
            .map(|entry| format!("• @{} ({} items)", entry.contributor, entry.load))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let drivers = report
        .drivers
        .iter()
        .map(|driver| format!("• {}: +{}", driver.label, driver.points))
        .collect::<Vec<_>>()
        .join("\n");

    let insights = if report.insights.is_empty() {
        "No specific recommendations.".to_string()
    } else {
        report
            .insights
            .iter()
            .enumerate()
            .map(|(index, insight)| format!("{}. {}", index + 1, insight))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "🚨 Team Risk Analysis\n\n\
         Risk Score: {}/100\n\n\
         Old PRs (> threshold): {}\n\
         Blocked Issues: {}\n\
         Meetings w/o Action Items: {}\n\
         Meetings w/o Follow-up: {}\n\
         Average Meeting Gap: {} days\n\n\
         Overloaded Contributors:\n{}\n\n\
         Top Risk Drivers:\n{}\n\n\
         💡 Recommendations:\n{}\n",
        report.score,
        report.old_pr_count,
        report.blocked_issue_count,
        report.meetings_without_actions_count,
        report.meetings_without_follow_up_count,
        gap,
        overloaded,
        drivers,
        insights
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use team_risk::analysis::{Issue, PullRequest, PullRequestStatus, RiskEngine, TeamActivity};
    use team_risk::AnalysisConfig;

    fn sample_report() -> RiskReport {
        let now = Utc
            .with_ymd_and_hms(2025, 9, 24, 12, 0, 0)
            .single()
            .expect("valid instant");
        let activity = TeamActivity::new(
            vec![PullRequest {
                id: "9".to_string(),
                status: PullRequestStatus::Open,
                created_at: now - Duration::days(20),
                author: Some("jo".to_string()),
            }],
            vec![Issue {
                id: "3".to_string(),
                assignee: None,
                labels: vec!["blocked".to_string()],
            }],
            vec![],
        );
        RiskEngine::new(AnalysisConfig::default()).analyze(&activity, now)
    }

    #[test]
    fn markdown_lists_metrics_and_drivers() {
        let report = sample_report();
        let rendered = render(&report, ReportFormat::Markdown, Local::now()).expect("renders");
        assert!(rendered.starts_with("# 🚨 Risk Report"));
        assert!(rendered.contains("**Risk score:** 25/100"));
        assert!(rendered.contains("**Risk level:** Medium"));
        assert!(rendered.contains("- 1 PRs older than threshold"));
        assert!(rendered.contains("- No contributors flagged for overload"));
        assert!(rendered.contains("  - Blocked issues (+15)\n  - Aging PRs (+10)"));
        assert!(!rendered.contains("Avg meeting gap"));
    }

    #[test]
    fn markdown_layout_is_line_exact() {
        let report = sample_report();
        let rendered = render(&report, ReportFormat::Markdown, Local::now()).expect("renders");
        let expected = "# 🚨 Risk Report\n\
                        \n\
                        **Risk score:** 25/100\n\
                        **Risk level:** Medium\n\
                        \n\
                        - 1 PRs older than threshold\n\
                        - 1 Issues marked blocked\n\
                        - 0 Meetings without action items\n\
                        - 0 Meetings without follow-up actions/PRs\n\
                        - No contributors flagged for overload\n\
                        \n\
                        ## Top drivers\n\
                        \n  - Blocked issues (+15)\n  - Aging PRs (+10)\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn console_sections_appear_in_order() {
        let report = sample_report();
        let rendered = render(&report, ReportFormat::Console, Local::now()).expect("renders");
        assert!(rendered.starts_with('\n'));
        assert!(rendered.ends_with('\n'));

        let positions: Vec<usize> = [
            "Executive Summary",
            "Key Metrics",
            "Top Risk Drivers",
            "Recommended Actions",
            "Simulation Mode",
            "Risk Trend (Last 3 Weeks, simulated)",
            "Operational Signal",
            "Report generated:",
        ]
        .iter()
        .map(|heading| rendered.find(heading).expect("section present"))
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn console_includes_narrative_sections() {
        let report = sample_report();
        let rendered = render(&report, ReportFormat::Console, Local::now()).expect("renders");
        assert!(rendered.contains("TEAM HEALTH STATUS: MEDIUM RISK"));
        assert!(rendered.contains("Risk Index: 25/100"));
        assert!(rendered.contains("Escalate 1 blocked issue(s) in next standup"));
        assert!(rendered.contains("If 1 blocked issue is resolved:"));
        assert!(rendered.contains("Blocked issues and aging prs are the dominant instability drivers."));
    }

    #[test]
    fn summary_marks_missing_gap_as_not_applicable() {
        let report = sample_report();
        let rendered = render(&report, ReportFormat::Summary, Local::now()).expect("renders");
        assert!(rendered.contains("Average Meeting Gap: N/A days"));
        assert!(rendered.contains("• None"));
        assert!(rendered.contains("• Blocked issues: +15"));
        assert!(rendered.contains("1. Review throughput bottleneck"));
    }

    #[test]
    fn json_round_trips_through_serde() {
        let report = sample_report();
        let rendered = render(&report, ReportFormat::Json, Local::now()).expect("renders");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(value["score"], 25);
        assert_eq!(value["drivers"][0]["label"], "Blocked issues");
    }

    #[test]
    fn meter_fills_proportionally() {
        let meter = risk_meter(50, RiskLevel::High);
        assert_eq!(meter.matches('█').count(), 10);
        assert_eq!(meter.matches('░').count(), 10);
        assert!(meter.ends_with("50%"));
    }
}
