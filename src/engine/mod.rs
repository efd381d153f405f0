//! Aggregation engine: the stateful coordinator.
//!
//! Owns the finding set, the derived risk score, the review ledger and the
//! agent registry. All mutable state sits behind a single mutex so the
//! ingest critical section (dedup, append, recompute, trigger) is one
//! atomic unit per call and queries always observe a consistent snapshot.
//! Nothing in here blocks on I/O; detectors do their own fetching before
//! handing findings over.

pub mod traits;

pub use traits::{Clock, IdGenerator, ManualClock, SequenceIdGenerator, SystemClock, UuidGenerator};

use crate::config::SentinelConfig;
use crate::ledger::ReviewLedger;
use crate::model::{
    AgentStatus, ComplianceFramework, Finding, HITLReview, ReviewDecision, ReviewStatus,
    RiskScore, Severity,
};
use crate::policy::TriggerPolicy;
use crate::registry::AgentRegistry;
use crate::scoring;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// How many findings the dashboard lists as "recent".
const RECENT_FINDINGS_LIMIT: usize = 10;

/// Snapshot of aggregated state for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub risk_score: RiskScore,
    pub pending_reviews: usize,
    pub total_findings: usize,
    pub critical_findings: usize,
    pub high_findings: usize,
    pub agent_statuses: HashMap<String, AgentStatus>,
    /// The most recently detected findings, newest first; ties on the
    /// detection timestamp break toward the most recently ingested.
    pub recent_findings: Vec<Finding>,
}

#[derive(Debug, Default)]
struct EngineState {
    findings: Vec<Finding>,
    seen_ids: FxHashSet<String>,
    current_risk: Option<RiskScore>,
    ledger: ReviewLedger,
    registry: AgentRegistry,
}

/// The signal-to-risk aggregation engine.
///
/// Explicitly constructed with its dependencies; hosting services own the
/// instance and hand out references, there is no process-wide singleton.
pub struct AggregationEngine {
    config: SentinelConfig,
    policy: TriggerPolicy,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    state: Mutex<EngineState>,
}

impl AggregationEngine {
    pub fn new(config: SentinelConfig, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        let policy = TriggerPolicy::new(config.trigger.clone());
        Self {
            config,
            policy,
            clock,
            ids,
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Ingest a batch of findings and return the updated risk score.
    ///
    /// Findings whose id has been seen before (including earlier in the
    /// same batch) are silently dropped and counted. The score is
    /// recomputed over the full accumulated set; the trigger policy is
    /// evaluated against only the newly accepted subset, and every
    /// accepted CRITICAL/HIGH finding gets a pending review when the batch
    /// triggers.
    pub fn ingest(&self, findings: Vec<Finding>) -> RiskScore {
        let now = self.clock.now();
        let mut state = self.state.lock();

        let mut accepted: Vec<Finding> = Vec::new();
        let mut duplicates = 0usize;
        for finding in findings {
            if state.seen_ids.contains(&finding.id) {
                duplicates += 1;
                continue;
            }
            state.seen_ids.insert(finding.id.clone());
            accepted.push(finding);
        }
        state.findings.extend(accepted.iter().cloned());

        let risk = scoring::compute(&state.findings, &self.config.scoring, now);
        state.current_risk = Some(risk.clone());

        info!(
            accepted = accepted.len(),
            duplicates,
            total = state.findings.len(),
            overall_score = risk.overall_score,
            "Ingested findings"
        );

        if self.policy.should_trigger(&risk, &accepted) {
            for finding in accepted.iter().filter(|f| self.policy.requires_review(f)) {
                state.ledger.create(&finding.id, self.ids.next_id(), now);
            }
        }

        risk
    }

    /// The last computed risk score, computed lazily over the (possibly
    /// empty) finding set if no ingestion has happened yet.
    pub fn risk_score(&self) -> RiskScore {
        let mut state = self.state.lock();
        self.current_risk_locked(&mut state)
    }

    fn current_risk_locked(&self, state: &mut EngineState) -> RiskScore {
        if let Some(risk) = &state.current_risk {
            return risk.clone();
        }
        let risk = scoring::compute(&state.findings, &self.config.scoring, self.clock.now());
        state.current_risk = Some(risk.clone());
        risk
    }

    /// Findings with the given severity. Order is unspecified.
    pub fn findings_by_severity(&self, severity: Severity) -> Vec<Finding> {
        let state = self.state.lock();
        state
            .findings
            .iter()
            .filter(|f| f.severity == severity)
            .cloned()
            .collect()
    }

    /// Findings referencing the given framework. Order is unspecified.
    pub fn findings_by_framework(&self, framework: ComplianceFramework) -> Vec<Finding> {
        let state = self.state.lock();
        state
            .findings
            .iter()
            .filter(|f| f.frameworks.contains(&framework))
            .cloned()
            .collect()
    }

    /// Resolve a review; `None` for an unknown id.
    pub fn resolve_review(
        &self,
        review_id: &str,
        decision: ReviewDecision,
        reviewer: &str,
        notes: Option<String>,
    ) -> Option<HITLReview> {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state
            .ledger
            .resolve(review_id, decision, reviewer, notes, now)
            .cloned()
    }

    pub fn reviews(&self) -> Vec<HITLReview> {
        self.state.lock().ledger.all().to_vec()
    }

    pub fn reviews_by_status(&self, status: ReviewStatus) -> Vec<HITLReview> {
        self.state
            .lock()
            .ledger
            .by_status(status)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn pending_reviews(&self) -> Vec<HITLReview> {
        self.reviews_by_status(ReviewStatus::Pending)
    }

    /// Upsert a detector's status; the findings counter accumulates.
    pub fn update_agent_status(&self, name: &str, is_active: bool, findings_delta: u64) {
        let now = self.clock.now();
        self.state
            .lock()
            .registry
            .update(name, is_active, findings_delta, now);
    }

    /// Count a detector-side failure.
    pub fn record_agent_error(&self, name: &str) {
        let now = self.clock.now();
        self.state.lock().registry.record_error(name, now);
    }

    /// Consistent snapshot of everything a dashboard needs.
    pub fn dashboard_summary(&self) -> DashboardSummary {
        let mut state = self.state.lock();
        let risk = self.current_risk_locked(&mut state);

        let mut indexed: Vec<(usize, &Finding)> = state.findings.iter().enumerate().collect();
        indexed.sort_by(|(ia, fa), (ib, fb)| {
            fb.detected_at
                .cmp(&fa.detected_at)
                .then_with(|| ib.cmp(ia))
        });
        let recent_findings: Vec<Finding> = indexed
            .into_iter()
            .take(RECENT_FINDINGS_LIMIT)
            .map(|(_, f)| f.clone())
            .collect();

        DashboardSummary {
            pending_reviews: state.ledger.pending_count(),
            total_findings: state.findings.len(),
            critical_findings: risk.critical_count,
            high_findings: risk.high_count,
            agent_statuses: state
                .registry
                .all()
                .map(|s| (s.agent_name.clone(), s.clone()))
                .collect(),
            recent_findings,
            risk_score: risk,
        }
    }
}
