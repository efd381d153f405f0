#[cfg(test)]
pub mod fixtures {
    use crate::engine::DashboardSummary;
    use crate::model::{Finding, RiskScore, Severity, SignalSource};
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashMap;

    pub fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 25, 12, 0, 0).unwrap()
    }

    pub fn create_finding(id: &str, severity: Severity, confidence: f64) -> Finding {
        Finding::new(
            id,
            SignalSource::Document,
            format!("Test finding {id}"),
            "test description",
            severity,
            vec![],
            confidence,
            fixed_time(),
        )
        .unwrap()
    }

    /// Dashboard summary over a finding list, counts derived, no reviews.
    pub fn summary_with_findings(findings: Vec<Finding>) -> DashboardSummary {
        let critical = findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count();
        let high = findings
            .iter()
            .filter(|f| f.severity == Severity::High)
            .count();
        DashboardSummary {
            risk_score: RiskScore {
                critical_count: critical,
                high_count: high,
                findings_count: findings.len(),
                ..RiskScore::zero(fixed_time())
            },
            pending_reviews: 0,
            total_findings: findings.len(),
            critical_findings: critical,
            high_findings: high,
            agent_statuses: HashMap::new(),
            recent_findings: findings,
        }
    }
}
