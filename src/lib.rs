pub mod cli;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod model;
pub mod policy;
pub mod registry;
pub mod reporter;
pub mod scoring;

#[cfg(test)]
pub mod test_utils;

pub use cli::{Cli, Command, OutputFormat, ScanArgs, SignalKind};
pub use config::{ScoringConfig, SentinelConfig, TriggerConfig};
pub use detectors::{
    ChatDetector, ChatMessage, Detector, DiffDetector, DocumentDetector, DocumentInput,
};
pub use engine::{
    AggregationEngine, Clock, DashboardSummary, IdGenerator, ManualClock, SequenceIdGenerator,
    SystemClock, UuidGenerator,
};
pub use error::{Result, SentinelError};
pub use model::{
    AgentStatus, ComplianceFramework, Finding, HITLReview, MetaValue, ReviewDecision,
    ReviewStatus, RiskScore, Severity, SignalSource,
};
pub use reporter::{json::JsonReporter, terminal::TerminalReporter, Reporter};
