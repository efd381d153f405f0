//! Human-in-the-loop trigger policy.

use crate::config::TriggerConfig;
use crate::model::{Finding, RiskScore, Severity};

/// Decides whether a freshly ingested batch must open review requests.
#[derive(Debug, Clone, Default)]
pub struct TriggerPolicy {
    config: TriggerConfig,
}

impl TriggerPolicy {
    pub fn new(config: TriggerConfig) -> Self {
        Self { config }
    }

    /// A batch triggers review when the current overall score has reached
    /// the threshold, or when the batch itself carries enough CRITICAL
    /// findings.
    pub fn should_trigger(&self, current: &RiskScore, newly_ingested: &[Finding]) -> bool {
        if current.overall_score >= self.config.score_threshold {
            return true;
        }
        let new_critical = newly_ingested
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count();
        new_critical >= self.config.critical_count
    }

    /// Only CRITICAL and HIGH findings get an automatic review, even inside
    /// a triggered batch.
    pub fn requires_review(&self, finding: &Finding) -> bool {
        matches!(finding.severity, Severity::Critical | Severity::High)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskScore, SignalSource};
    use chrono::{DateTime, TimeZone, Utc};

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 25, 12, 0, 0).unwrap()
    }

    fn finding(id: &str, severity: Severity) -> Finding {
        Finding::new(
            id,
            SignalSource::ChatMessage,
            "test",
            "test",
            severity,
            vec![],
            0.6,
            ts(),
        )
        .unwrap()
    }

    fn score(overall: f64) -> RiskScore {
        RiskScore {
            overall_score: overall,
            ..RiskScore::zero(ts())
        }
    }

    #[test]
    fn test_triggers_on_score_threshold() {
        let policy = TriggerPolicy::default();
        assert!(policy.should_trigger(&score(50.0), &[]));
        assert!(policy.should_trigger(&score(80.0), &[finding("f", Severity::Low)]));
        assert!(!policy.should_trigger(&score(49.9), &[]));
    }

    #[test]
    fn test_triggers_on_new_critical() {
        let policy = TriggerPolicy::default();
        let batch = vec![finding("f-1", Severity::Critical)];
        assert!(policy.should_trigger(&score(10.0), &batch));
    }

    #[test]
    fn test_low_batch_below_threshold_does_not_trigger() {
        let policy = TriggerPolicy::default();
        let batch = vec![
            finding("f-1", Severity::Low),
            finding("f-2", Severity::Medium),
            finding("f-3", Severity::High),
        ];
        assert!(!policy.should_trigger(&score(20.0), &batch));
    }

    #[test]
    fn test_requires_review_only_high_and_critical() {
        let policy = TriggerPolicy::default();
        assert!(policy.requires_review(&finding("f", Severity::Critical)));
        assert!(policy.requires_review(&finding("f", Severity::High)));
        assert!(!policy.requires_review(&finding("f", Severity::Medium)));
        assert!(!policy.requires_review(&finding("f", Severity::Low)));
    }

    #[test]
    fn test_custom_critical_count() {
        let policy = TriggerPolicy::new(TriggerConfig {
            score_threshold: 50.0,
            critical_count: 2,
        });
        let one = vec![finding("f-1", Severity::Critical)];
        let two = vec![
            finding("f-1", Severity::Critical),
            finding("f-2", Severity::Critical),
        ];
        assert!(!policy.should_trigger(&score(0.0), &one));
        assert!(policy.should_trigger(&score(0.0), &two));
    }
}
