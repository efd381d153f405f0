//! Configuration loading for compliance-sentinel.
//!
//! Everything tunable lives here: severity weights, scoring divisors,
//! trigger thresholds, and the detector pattern tables. All sections are
//! `#[serde(default)]`, so a missing file or a partial `.sentinel.yaml`
//! falls back to the built-in defaults.

use crate::detectors::patterns::{ChatPatterns, DiffPatterns, DocumentPatterns};
use crate::error::{Result, SentinelError};
use crate::model::Severity;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".sentinel.yaml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    pub scoring: ScoringConfig,
    pub trigger: TriggerConfig,
    pub detectors: DetectorConfig,
}

/// Weights and divisors for the risk calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub low_weight: f64,
    pub medium_weight: f64,
    pub high_weight: f64,
    pub critical_weight: f64,
    /// Weighted-finding sum at which the overall score saturates.
    pub overall_divisor: f64,
    /// Per-framework saturation point; smaller so framework-specific
    /// severity saturates faster than the aggregate.
    pub framework_divisor: f64,
    pub max_score: f64,
}

impl ScoringConfig {
    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.low_weight,
            Severity::Medium => self.medium_weight,
            Severity::High => self.high_weight,
            Severity::Critical => self.critical_weight,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            low_weight: 1.0,
            medium_weight: 3.0,
            high_weight: 7.0,
            critical_weight: 15.0,
            overall_divisor: 20.0,
            framework_divisor: 10.0,
            max_score: 100.0,
        }
    }
}

/// Thresholds for the HITL trigger policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Overall risk score at or above which a batch triggers review.
    pub score_threshold: f64,
    /// Number of CRITICAL findings in a batch that triggers review.
    pub critical_count: usize,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            score_threshold: 50.0,
            critical_count: 1,
        }
    }
}

/// Pattern tables for each detector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub diff: DiffPatterns,
    pub chat: ChatPatterns,
    pub document: DocumentPatterns,
}

impl SentinelConfig {
    /// Load configuration from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SentinelError::read_error(path, e))?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| SentinelError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `.sentinel.yaml` from a directory if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            debug!(dir = %dir.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Serialized default config, written by `sentinel init`.
    pub fn template() -> String {
        let header = "# compliance-sentinel configuration.\n\
                      # Every section is optional; omitted values use the built-in defaults.\n";
        match serde_yaml::to_string(&Self::default()) {
            Ok(body) => format!("{header}{body}"),
            Err(_) => header.to_string(),
        }
    }
}
