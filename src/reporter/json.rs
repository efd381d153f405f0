use crate::engine::DashboardSummary;
use crate::reporter::Reporter;

pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for JsonReporter {
    fn report(&self, summary: &DashboardSummary) -> String {
        serde_json::to_string_pretty(summary)
            .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize summary: {}"}}"#, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{create_finding, summary_with_findings};
    use crate::model::Severity;

    #[test]
    fn test_json_output_structure() {
        let reporter = JsonReporter::new();
        let summary = summary_with_findings(vec![]);
        let output = reporter.report(&summary);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["total_findings"], 0);
        assert_eq!(parsed["pending_reviews"], 0);
        assert_eq!(parsed["risk_score"]["overall_score"], 0.0);
    }

    #[test]
    fn test_json_output_with_findings() {
        let reporter = JsonReporter::new();
        let summary = summary_with_findings(vec![create_finding(
            "doc-1-safe_harbor",
            Severity::Critical,
            1.0,
        )]);
        let output = reporter.report(&summary);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["total_findings"], 1);
        assert_eq!(parsed["critical_findings"], 1);
        assert_eq!(parsed["recent_findings"][0]["id"], "doc-1-safe_harbor");
        assert_eq!(parsed["recent_findings"][0]["severity"], "critical");
    }
}
