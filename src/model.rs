//! Core data model: findings, risk scores, reviews, agent status.
//!
//! Records here cross the engine boundary, so every enumeration carries a
//! stable lowercase string tag and every record derives serde both ways.

use crate::error::SentinelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Severity of a finding, ordered by risk.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// A regulatory framework a finding may relate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceFramework {
    Gdpr,
    Soc2,
    Hipaa,
    PciDss,
    #[serde(rename = "iso_27001")]
    Iso27001,
}

impl ComplianceFramework {
    /// All known frameworks, in per-framework scoring order.
    pub const ALL: [ComplianceFramework; 5] = [
        ComplianceFramework::Gdpr,
        ComplianceFramework::Soc2,
        ComplianceFramework::Hipaa,
        ComplianceFramework::PciDss,
        ComplianceFramework::Iso27001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceFramework::Gdpr => "gdpr",
            ComplianceFramework::Soc2 => "soc2",
            ComplianceFramework::Hipaa => "hipaa",
            ComplianceFramework::PciDss => "pci_dss",
            ComplianceFramework::Iso27001 => "iso_27001",
        }
    }
}

impl std::fmt::Display for ComplianceFramework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ComplianceFramework::Gdpr => "GDPR",
            ComplianceFramework::Soc2 => "SOC2",
            ComplianceFramework::Hipaa => "HIPAA",
            ComplianceFramework::PciDss => "PCI-DSS",
            ComplianceFramework::Iso27001 => "ISO-27001",
        };
        write!(f, "{}", label)
    }
}

/// Where a signal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    CodeReview,
    ChatMessage,
    Document,
}

impl SignalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalSource::CodeReview => "code_review",
            SignalSource::ChatMessage => "chat_message",
            SignalSource::Document => "document",
        }
    }
}

impl std::fmt::Display for SignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque metadata value attached to a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Str(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Str(v)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Num(v)
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

/// A single detected compliance-relevant signal.
///
/// Identity is the `id` string: callers construct it deterministically from
/// source + pattern + locator so re-detecting the same underlying event
/// never yields two different ids. Once built a finding is never mutated;
/// only engine-derived state (score, reviews) evolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub source: SignalSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(default)]
    pub frameworks: Vec<ComplianceFramework>,
    /// Detector confidence in [0.0, 1.0].
    pub confidence: f64,
    pub detected_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, MetaValue>,
}

impl Finding {
    /// Build a finding, rejecting malformed input at construction time.
    ///
    /// The engine never re-validates, so this is the single gate for
    /// confidence range and required fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        source: SignalSource,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        frameworks: Vec<ComplianceFramework>,
        confidence: f64,
        detected_at: DateTime<Utc>,
    ) -> Result<Self, SentinelError> {
        let finding = Self {
            id: id.into(),
            source,
            source_url: None,
            title: title.into(),
            description: description.into(),
            severity,
            frameworks,
            confidence,
            detected_at,
            raw_content: None,
            metadata: HashMap::new(),
        };
        finding.validate()?;
        Ok(finding)
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_raw_content(mut self, content: impl Into<String>) -> Self {
        self.raw_content = Some(content.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Check the construction invariants.
    ///
    /// Used by `new` and by ingestion paths that deserialize findings from
    /// external callers.
    pub fn validate(&self) -> Result<(), SentinelError> {
        if self.id.trim().is_empty() {
            return Err(SentinelError::InvalidFinding {
                id: self.id.clone(),
                reason: "id must not be empty".to_string(),
            });
        }
        if self.title.trim().is_empty() {
            return Err(SentinelError::InvalidFinding {
                id: self.id.clone(),
                reason: "title must not be empty".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.confidence) || !self.confidence.is_finite() {
            return Err(SentinelError::InvalidFinding {
                id: self.id.clone(),
                reason: format!("confidence {} out of [0.0, 1.0]", self.confidence),
            });
        }
        Ok(())
    }
}

/// Aggregated risk score derived from the current finding set.
///
/// Never stored independently of the findings that produced it; the engine
/// recomputes it on every ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScore {
    /// Overall score in [0, 100], rounded to one decimal place.
    pub overall_score: f64,
    /// Per-framework scores, only for frameworks with a contributing finding.
    #[serde(default)]
    pub framework_scores: HashMap<ComplianceFramework, f64>,
    pub findings_count: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub last_updated: DateTime<Utc>,
}

impl RiskScore {
    /// The score of an empty finding set.
    pub fn zero(now: DateTime<Utc>) -> Self {
        Self {
            overall_score: 0.0,
            framework_scores: HashMap::new(),
            findings_count: 0,
            critical_count: 0,
            high_count: 0,
            last_updated: now,
        }
    }
}

/// Lifecycle state of a review. Pending is initial; the rest are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Dismissed,
    Escalated,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Dismissed => "dismissed",
            ReviewStatus::Escalated => "escalated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The resolvable subset of [`ReviewStatus`]: a review can leave pending but
/// never return to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Dismissed,
    Escalated,
}

impl ReviewDecision {
    pub fn as_status(&self) -> ReviewStatus {
        match self {
            ReviewDecision::Approved => ReviewStatus::Approved,
            ReviewDecision::Dismissed => ReviewStatus::Dismissed,
            ReviewDecision::Escalated => ReviewStatus::Escalated,
        }
    }
}

/// A human-in-the-loop review request for one finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HITLReview {
    pub id: String,
    pub finding_id: String,
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set exactly when the review leaves pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl HITLReview {
    pub fn new(id: impl Into<String>, finding_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            finding_id: finding_id.into(),
            status: ReviewStatus::Pending,
            reviewer: None,
            notes: None,
            created_at: now,
            resolved_at: None,
        }
    }
}

/// Liveness and throughput of one external detector.
///
/// Created on first report, updated thereafter, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatus {
    pub agent_name: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub findings_today: u64,
    pub error_count: u64,
}

impl AgentStatus {
    pub fn new(agent_name: impl Into<String>, is_active: bool, now: DateTime<Utc>) -> Self {
        Self {
            agent_name: agent_name.into(),
            is_active,
            last_heartbeat: Some(now),
            findings_today: 0,
            error_count: 0,
        }
    }
}
