//! Agent status registry: liveness and throughput of external detectors.

use crate::model::AgentStatus;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;

/// Tracks one [`AgentStatus`] per named detector. Entries are created on
/// first report and never deleted during a process lifetime.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: FxHashMap<String, AgentStatus>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert an agent status. The findings counter is incremented by the
    /// delta rather than overwritten, and the heartbeat always refreshes.
    pub fn update(&mut self, name: &str, is_active: bool, findings_delta: u64, now: DateTime<Utc>) {
        let status = self
            .agents
            .entry(name.to_string())
            .or_insert_with(|| AgentStatus::new(name, is_active, now));
        status.is_active = is_active;
        status.findings_today += findings_delta;
        status.last_heartbeat = Some(now);
    }

    /// Count one detector-side failure. Creates the entry if the agent has
    /// never reported, and refreshes the heartbeat.
    pub fn record_error(&mut self, name: &str, now: DateTime<Utc>) {
        let status = self
            .agents
            .entry(name.to_string())
            .or_insert_with(|| AgentStatus::new(name, true, now));
        status.error_count += 1;
        status.last_heartbeat = Some(now);
    }

    pub fn get(&self, name: &str) -> Option<&AgentStatus> {
        self.agents.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &AgentStatus> {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
