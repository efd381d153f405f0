//! Risk calculator: maps the current finding set to a risk score.
//!
//! Pure and deterministic; every call derives the score from scratch so it
//! can never drift from the finding set that produced it.

use crate::config::ScoringConfig;
use crate::model::{ComplianceFramework, Finding, RiskScore, Severity};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Compute the overall and per-framework risk scores for a finding set.
///
/// Each finding contributes `severity_weight * confidence`. The overall
/// score saturates at `overall_divisor` weighted findings; each framework
/// score saturates at `framework_divisor`. A finding with no frameworks
/// contributes to the overall score only.
pub fn compute(findings: &[Finding], config: &ScoringConfig, now: DateTime<Utc>) -> RiskScore {
    if findings.is_empty() {
        return RiskScore::zero(now);
    }

    let weight_of = |f: &Finding| config.weight(f.severity) * f.confidence;

    let total_weight: f64 = findings.iter().map(weight_of).sum();
    let overall = (total_weight / config.overall_divisor * config.max_score).min(config.max_score);

    let mut framework_scores: HashMap<ComplianceFramework, f64> = HashMap::new();
    for framework in ComplianceFramework::ALL {
        let mut contributing = false;
        let mut fw_weight = 0.0;
        for finding in findings.iter().filter(|f| f.frameworks.contains(&framework)) {
            contributing = true;
            fw_weight += weight_of(finding);
        }
        if contributing {
            let score =
                (fw_weight / config.framework_divisor * config.max_score).min(config.max_score);
            framework_scores.insert(framework, score);
        }
    }

    let critical_count = findings
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .count();
    let high_count = findings
        .iter()
        .filter(|f| f.severity == Severity::High)
        .count();

    RiskScore {
        overall_score: round_one_decimal(overall),
        framework_scores,
        findings_count: findings.len(),
        critical_count,
        high_count,
        last_updated: now,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
