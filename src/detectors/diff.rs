//! Code-review diff detector.
//!
//! Scans a unified diff for framework-relevant keywords and for changes
//! under security-sensitive paths. Paths are pulled from the `+++` headers
//! of the diff itself.

use super::patterns::DiffPatterns;
use super::{line_context, Detector};
use crate::model::{Finding, SignalSource};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Detector confidence for a keyword hit in a diff body.
const KEYWORD_CONFIDENCE: f64 = 0.7;
/// Detector confidence for a high-risk path modification.
const PATH_CONFIDENCE: f64 = 0.8;
/// Lines of surrounding diff kept as supporting excerpt.
const CONTEXT_LINES: usize = 3;

/// Scans code-review diffs against the configured keyword tables.
#[derive(Debug, Clone, Default)]
pub struct DiffDetector {
    patterns: DiffPatterns,
}

impl DiffDetector {
    pub fn new(patterns: DiffPatterns) -> Self {
        Self { patterns }
    }

    /// Analyze one change's diff. `change_id` is the caller's stable
    /// locator for the change (review id, PR number, file stem) and seeds
    /// every finding id.
    pub fn analyze(
        &self,
        change_id: &str,
        source_url: Option<&str>,
        diff: &str,
        now: DateTime<Utc>,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();
        let diff_lower = diff.to_lowercase();

        for entry in &self.patterns.framework_keywords {
            for keyword in &entry.keywords {
                if !diff_lower.contains(&keyword.to_lowercase()) {
                    continue;
                }
                let framework = entry.framework;
                let Ok(finding) = Finding::new(
                    format!("diff-{change_id}-{}-{keyword}", framework.as_str()),
                    SignalSource::CodeReview,
                    format!("Potential {framework} relevance: '{keyword}' found in change {change_id}"),
                    format!(
                        "The pattern '{keyword}' was detected in change {change_id}. \
                         This may indicate changes relevant to {framework} compliance."
                    ),
                    self.patterns.severity_for(keyword),
                    vec![framework],
                    KEYWORD_CONFIDENCE,
                    now,
                ) else {
                    continue;
                };
                let mut finding = finding.with_raw_content(line_context(diff, keyword, CONTEXT_LINES));
                if let Some(url) = source_url {
                    finding = finding.with_source_url(url);
                }
                findings.push(finding.with_metadata("keyword", keyword.as_str()));
            }
        }

        for path in changed_paths(diff) {
            for risk_path in &self.patterns.high_risk_paths {
                if !path.contains(risk_path.as_str()) {
                    continue;
                }
                let Ok(finding) = Finding::new(
                    format!("diff-{change_id}-highrisk-{path}"),
                    SignalSource::CodeReview,
                    format!("High-risk file modified: {path}"),
                    format!("File '{path}' in a security/compliance-sensitive path was modified."),
                    crate::model::Severity::High,
                    vec![],
                    PATH_CONFIDENCE,
                    now,
                ) else {
                    continue;
                };
                let mut finding = finding.with_metadata("path", path.as_str());
                if let Some(url) = source_url {
                    finding = finding.with_source_url(url);
                }
                findings.push(finding);
                break;
            }
        }

        debug!(change_id, count = findings.len(), "Diff analyzed");
        findings
    }
}

impl Detector for DiffDetector {
    fn name(&self) -> &'static str {
        "diff_monitor"
    }

    fn source(&self) -> SignalSource {
        SignalSource::CodeReview
    }
}

/// Paths touched by a unified diff, taken from its `+++ b/...` headers.
fn changed_paths(diff: &str) -> Vec<String> {
    use regex::Regex;
    use std::sync::LazyLock;

    static HEADER_PATTERN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^\+\+\+ (?:b/)?(.+)$").unwrap());

    HEADER_PATTERN
        .captures_iter(diff)
        .map(|caps| caps[1].to_string())
        .filter(|path| path != "/dev/null")
        .collect()
}
