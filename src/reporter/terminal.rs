use crate::engine::DashboardSummary;
use crate::model::Severity;
use crate::reporter::Reporter;
use colored::Colorize;

pub struct TerminalReporter {
    verbose: bool,
}

impl TerminalReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn severity_label(&self, severity: Severity) -> colored::ColoredString {
        let label = format!("[{}]", severity);
        match severity {
            Severity::Critical => label.red().bold(),
            Severity::High => label.yellow().bold(),
            Severity::Medium => label.cyan(),
            Severity::Low => label.white(),
        }
    }

    fn score_label(&self, score: f64) -> colored::ColoredString {
        let label = format!("{:.1}", score);
        if score >= 75.0 {
            label.red().bold()
        } else if score >= 50.0 {
            label.yellow().bold()
        } else if score >= 25.0 {
            label.cyan()
        } else if score > 0.0 {
            label.white()
        } else {
            label.green()
        }
    }

    /// Ten-character bar for a score out of 100.
    fn score_bar(&self, score: f64) -> String {
        let filled = ((score / 100.0) * 10.0).round() as usize;
        let filled = filled.min(10);
        format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, summary: &DashboardSummary) -> String {
        let mut output = String::new();
        let risk = &summary.risk_score;

        output.push_str(&format!(
            "\n{}\n\n",
            " Compliance Sentinel — risk posture ".bold().reversed()
        ));
        output.push_str(&format!(
            "  Overall risk   {} {} / 100\n",
            self.score_bar(risk.overall_score),
            self.score_label(risk.overall_score)
        ));
        output.push_str(&format!(
            "  Findings       {} total ({} critical, {} high)\n",
            summary.total_findings, summary.critical_findings, summary.high_findings
        ));
        let pending = format!("{}", summary.pending_reviews);
        output.push_str(&format!(
            "  Pending review {}\n",
            if summary.pending_reviews > 0 {
                pending.yellow().bold()
            } else {
                pending.green()
            }
        ));

        if !risk.framework_scores.is_empty() {
            output.push_str("\n  Framework scores:\n");
            let mut scores: Vec<_> = risk.framework_scores.iter().collect();
            scores.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
            for (framework, score) in scores {
                output.push_str(&format!(
                    "    {:<10} {} {}\n",
                    framework.to_string(),
                    self.score_bar(*score),
                    self.score_label(*score)
                ));
            }
        }

        if !summary.agent_statuses.is_empty() {
            output.push_str("\n  Agents:\n");
            let mut agents: Vec<_> = summary.agent_statuses.values().collect();
            agents.sort_by(|a, b| a.agent_name.cmp(&b.agent_name));
            for agent in agents {
                let state = if agent.is_active {
                    "active".green()
                } else {
                    "inactive".red()
                };
                output.push_str(&format!(
                    "    {:<14} {}  findings today: {}  errors: {}\n",
                    agent.agent_name, state, agent.findings_today, agent.error_count
                ));
            }
        }

        if !summary.recent_findings.is_empty() {
            output.push_str("\n  Recent findings:\n");
            for finding in &summary.recent_findings {
                output.push_str(&format!(
                    "    {} {}\n",
                    self.severity_label(finding.severity),
                    finding.title
                ));
                if self.verbose {
                    output.push_str(&format!(
                        "        source: {}  confidence: {:.2}  id: {}\n",
                        finding.source, finding.confidence, finding.id
                    ));
                    if let Some(excerpt) = &finding.raw_content {
                        for line in excerpt.lines().take(3) {
                            output.push_str(&format!("        {}\n", line.dimmed()));
                        }
                    }
                }
            }
        }

        if summary.pending_reviews > 0 {
            output.push_str(&format!(
                "\n  {} {} finding(s) await human review\n",
                "ACTION".yellow().bold(),
                summary.pending_reviews
            ));
        } else {
            output.push_str(&format!("\n  {} no review required\n", "OK".green().bold()));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComplianceFramework;
    use crate::test_utils::fixtures::{create_finding, summary_with_findings};

    #[test]
    fn test_empty_summary_reports_ok() {
        colored::control::set_override(false);
        let reporter = TerminalReporter::new(false);
        let output = reporter.report(&summary_with_findings(vec![]));
        assert!(output.contains("0 total"));
        assert!(output.contains("no review required"));
    }

    #[test]
    fn test_findings_render_with_severity_labels() {
        colored::control::set_override(false);
        let reporter = TerminalReporter::new(false);
        let summary = summary_with_findings(vec![
            create_finding("f-1", Severity::Critical, 1.0),
            create_finding("f-2", Severity::Low, 0.3),
        ]);
        let output = reporter.report(&summary);
        assert!(output.contains("[CRITICAL]"));
        assert!(output.contains("[LOW]"));
    }

    #[test]
    fn test_framework_scores_render() {
        colored::control::set_override(false);
        let reporter = TerminalReporter::new(false);
        let mut summary = summary_with_findings(vec![]);
        summary
            .risk_score
            .framework_scores
            .insert(ComplianceFramework::Hipaa, 100.0);
        let output = reporter.report(&summary);
        assert!(output.contains("HIPAA"));
        assert!(output.contains("██████████"));
    }

    #[test]
    fn test_verbose_includes_ids() {
        colored::control::set_override(false);
        let reporter = TerminalReporter::new(true);
        let summary = summary_with_findings(vec![create_finding("f-42", Severity::High, 0.7)]);
        let output = reporter.report(&summary);
        assert!(output.contains("f-42"));
        assert!(output.contains("confidence: 0.70"));
    }

    #[test]
    fn test_pending_reviews_flagged() {
        colored::control::set_override(false);
        let reporter = TerminalReporter::new(false);
        let mut summary = summary_with_findings(vec![]);
        summary.pending_reviews = 2;
        let output = reporter.report(&summary);
        assert!(output.contains("2 finding(s) await human review"));
    }
}
