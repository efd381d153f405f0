//! Document detector.
//!
//! Flags outdated compliance language and stale policy documents. Staleness
//! windows are matched against the document title per doc type.

use super::patterns::DocumentPatterns;
use super::{char_context, Detector};
use crate::model::{ComplianceFramework, Finding, Severity, SignalSource};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Detector confidence for an outdated-language hit.
const OUTDATED_CONFIDENCE: f64 = 0.85;
/// Detector confidence for a staleness finding.
const STALENESS_CONFIDENCE: f64 = 0.95;
/// Characters of surrounding text kept as supporting excerpt.
const CONTEXT_CHARS: usize = 200;

/// One document handed to the detector.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub doc_id: String,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Scans documents against the configured language and staleness tables.
#[derive(Debug, Clone, Default)]
pub struct DocumentDetector {
    patterns: DocumentPatterns,
}

impl DocumentDetector {
    pub fn new(patterns: DocumentPatterns) -> Self {
        Self { patterns }
    }

    /// Analyze a single document.
    pub fn analyze(&self, doc: &DocumentInput, now: DateTime<Utc>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let content_lower = doc.content.to_lowercase();

        for pattern in &self.patterns.outdated {
            if !content_lower.contains(&pattern.pattern.to_lowercase()) {
                continue;
            }
            let Ok(finding) = Finding::new(
                format!("doc-{}-{}", doc.doc_id, pattern.name),
                SignalSource::Document,
                format!("Outdated compliance language: '{}'", pattern.pattern),
                format!(
                    "Document '{}' contains outdated language: '{}'. {} \
                     Suggested replacement: '{}'.",
                    doc.title, pattern.pattern, pattern.reason, pattern.replacement
                ),
                pattern.severity,
                pattern.frameworks.clone(),
                OUTDATED_CONFIDENCE,
                now,
            ) else {
                continue;
            };
            let mut finding = finding
                .with_raw_content(char_context(&doc.content, &pattern.pattern, CONTEXT_CHARS))
                .with_metadata("doc_id", doc.doc_id.as_str())
                .with_metadata("doc_title", doc.title.as_str())
                .with_metadata("pattern", pattern.name.as_str())
                .with_metadata("suggested_replacement", pattern.replacement.as_str());
            if let Some(url) = &doc.url {
                finding = finding.with_source_url(url.as_str());
            }
            findings.push(finding);
        }

        if let Some(last_modified) = doc.last_modified {
            findings.extend(self.check_staleness(doc, last_modified, now));
        }

        debug!(doc_id = %doc.doc_id, count = findings.len(), "Document analyzed");
        findings
    }

    /// Staleness findings for a document whose type matches a window.
    ///
    /// A document past its window is MEDIUM; past twice the window, HIGH.
    fn check_staleness(
        &self,
        doc: &DocumentInput,
        last_modified: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();
        let title_lower = doc.title.to_lowercase();
        let age = now - last_modified;

        for window in &self.patterns.staleness {
            let readable = window.doc_type.replace('_', " ");
            let dashed = window.doc_type.replace('_', "-");
            if !title_lower.contains(&readable) && !title_lower.contains(&dashed) {
                continue;
            }
            let threshold = Duration::days(window.max_age_days);
            if age <= threshold {
                continue;
            }
            let severity = if age < threshold * 2 {
                Severity::Medium
            } else {
                Severity::High
            };
            let Ok(finding) = Finding::new(
                format!("doc-{}-stale-{}", doc.doc_id, window.doc_type),
                SignalSource::Document,
                format!(
                    "Stale document: '{}' not updated in {} days",
                    doc.title,
                    age.num_days()
                ),
                format!(
                    "Document '{}' was last modified {} days ago. \
                     Documents of this type should be reviewed at least every {} days.",
                    doc.title,
                    age.num_days(),
                    window.max_age_days
                ),
                severity,
                vec![ComplianceFramework::Soc2, ComplianceFramework::Gdpr],
                STALENESS_CONFIDENCE,
                now,
            ) else {
                continue;
            };
            let mut finding = finding
                .with_metadata("doc_id", doc.doc_id.as_str())
                .with_metadata("last_modified", last_modified.to_rfc3339())
                .with_metadata("days_since_update", age.num_days() as f64)
                .with_metadata("threshold_days", window.max_age_days as f64);
            if let Some(url) = &doc.url {
                finding = finding.with_source_url(url.as_str());
            }
            findings.push(finding);
        }

        findings
    }
}

impl Detector for DocumentDetector {
    fn name(&self) -> &'static str {
        "doc_crawler"
    }

    fn source(&self) -> SignalSource {
        SignalSource::Document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 25, 12, 0, 0).unwrap()
    }

    fn doc(doc_id: &str, title: &str, content: &str) -> DocumentInput {
        DocumentInput {
            doc_id: doc_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            url: None,
            last_modified: None,
        }
    }

    fn detector() -> DocumentDetector {
        DocumentDetector::new(DocumentPatterns::default())
    }

    #[test]
    fn test_detects_outdated_language() {
        let findings = detector().analyze(
            &doc(
                "policy-1",
                "Data Transfer Policy",
                "International transfers rely on the Safe Harbor agreement.",
            ),
            ts(),
        );
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.id, "doc-policy-1-safe_harbor");
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.frameworks, vec![ComplianceFramework::Gdpr]);
        assert!(finding.description.contains("Schrems I"));
        assert!(finding
            .raw_content
            .as_deref()
            .unwrap()
            .contains("Safe Harbor"));
    }

    #[test]
    fn test_detects_multiple_patterns() {
        let findings = detector().analyze(
            &doc(
                "policy-2",
                "Privacy Notes",
                "We use privacy shield and implied consent for EU users.",
            ),
            ts(),
        );
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_clean_recent_document_yields_nothing() {
        let mut input = doc("ok-1", "Privacy Policy", "All current and specific.");
        input.last_modified = Some(ts() - Duration::days(30));
        assert!(detector().analyze(&input, ts()).is_empty());
    }

    #[test]
    fn test_stale_document_within_double_window_is_medium() {
        let mut input = doc("policy-3", "Privacy Policy v2", "fine text");
        input.last_modified = Some(ts() - Duration::days(400));

        let findings = detector().analyze(&input, ts());
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.id, "doc-policy-3-stale-privacy_policy");
        assert_eq!(finding.severity, Severity::Medium);
        assert_eq!(finding.confidence, 0.95);
    }

    #[test]
    fn test_very_stale_document_is_high() {
        let mut input = doc("policy-4", "Security Policy", "fine text");
        // security_policy window is 180 days; 400 > 360
        input.last_modified = Some(ts() - Duration::days(400));

        let findings = detector().analyze(&input, ts());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_staleness_matches_dashed_titles() {
        let mut input = doc("plan-1", "incident-response-plan.md", "steps");
        input.last_modified = Some(ts() - Duration::days(800));

        let findings = detector().analyze(&input, ts());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "doc-plan-1-stale-incident_response_plan");
    }

    #[test]
    fn test_unmatched_title_skips_staleness() {
        let mut input = doc("notes-1", "Meeting Notes", "old but fine");
        input.last_modified = Some(ts() - Duration::days(2000));
        assert!(detector().analyze(&input, ts()).is_empty());
    }

    #[test]
    fn test_outdated_and_stale_combine() {
        let mut input = doc(
            "policy-5",
            "Compliance Report Q1",
            "We still reference privacy shield here.",
        );
        input.last_modified = Some(ts() - Duration::days(100));

        let findings = detector().analyze(&input, ts());
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().any(|f| f.id.contains("privacy_shield")));
        assert!(findings.iter().any(|f| f.id.contains("stale")));
    }
}
