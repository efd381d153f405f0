//! Review ledger: review requests and their lifecycle transitions.

use crate::model::{HITLReview, ReviewDecision, ReviewStatus};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use tracing::info;

/// Append-only store of review requests with O(1) id lookup.
#[derive(Debug, Default)]
pub struct ReviewLedger {
    reviews: Vec<HITLReview>,
    index: FxHashMap<String, usize>,
}

impl ReviewLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a pending review for a finding. The caller supplies the fresh
    /// review id (the engine injects its id generator).
    pub fn create(&mut self, finding_id: &str, review_id: String, now: DateTime<Utc>) -> &HITLReview {
        let review = HITLReview::new(review_id.clone(), finding_id, now);
        info!(review_id = %review.id, finding_id, "HITL review created");
        let idx = self.reviews.len();
        self.index.insert(review_id, idx);
        self.reviews.push(review);
        &self.reviews[idx]
    }

    /// Resolve a review, returning `None` for an unknown id.
    ///
    /// Deliberately does not guard on the current status: resolving an
    /// already-terminal review overwrites status, reviewer, notes and the
    /// resolution timestamp. Current behavior, pending product
    /// clarification on idempotent-retry semantics.
    pub fn resolve(
        &mut self,
        review_id: &str,
        decision: ReviewDecision,
        reviewer: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Option<&HITLReview> {
        let idx = *self.index.get(review_id)?;
        let review = &mut self.reviews[idx];
        review.status = decision.as_status();
        review.reviewer = Some(reviewer.to_string());
        review.notes = notes;
        review.resolved_at = Some(now);
        info!(review_id, status = %review.status, reviewer, "Review resolved");
        Some(review)
    }

    pub fn all(&self) -> &[HITLReview] {
        &self.reviews
    }

    pub fn by_status(&self, status: ReviewStatus) -> Vec<&HITLReview> {
        self.reviews.iter().filter(|r| r.status == status).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.reviews
            .iter()
            .filter(|r| r.status == ReviewStatus::Pending)
            .count()
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}
