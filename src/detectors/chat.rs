//! Chat-message detector.
//!
//! Flags policy-relevant conversations by matching messages against the
//! configured pattern table. One finding per pattern per message, keyed by
//! the first keyword that hits.

use super::patterns::ChatPatterns;
use super::Detector;
use crate::model::{Finding, SignalSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Detector confidence for keyword matches in free-form chat.
const CHAT_CONFIDENCE: f64 = 0.6;
/// Characters of the message kept as supporting excerpt.
const EXCERPT_CHARS: usize = 500;

/// One chat message handed to the detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub channel: String,
    pub user: String,
    pub text: String,
    /// Platform timestamp, used verbatim in the finding id.
    pub ts: String,
}

/// Scans chat messages against the configured policy patterns.
#[derive(Debug, Clone, Default)]
pub struct ChatDetector {
    patterns: ChatPatterns,
}

impl ChatDetector {
    pub fn new(patterns: ChatPatterns) -> Self {
        Self { patterns }
    }

    /// Analyze a single message.
    pub fn analyze(&self, message: &ChatMessage, now: DateTime<Utc>) -> Vec<Finding> {
        let mut findings = Vec::new();
        let text_lower = message.text.to_lowercase();

        for pattern in &self.patterns.patterns {
            let Some(keyword) = pattern
                .keywords
                .iter()
                .find(|k| text_lower.contains(&k.to_lowercase()))
            else {
                continue;
            };

            let pretty_name = pattern.name.replace('_', " ");
            let framework_list = pattern
                .frameworks
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let Ok(finding) = Finding::new(
                format!("chat-{}-{}-{}", message.channel, message.ts, pattern.name),
                SignalSource::ChatMessage,
                format!("Policy-relevant conversation: {pretty_name}"),
                format!(
                    "Keyword '{keyword}' detected in #{} by {}. \
                     This may relate to {framework_list} compliance.",
                    message.channel, message.user
                ),
                pattern.severity,
                pattern.frameworks.clone(),
                CHAT_CONFIDENCE,
                now,
            ) else {
                continue;
            };

            let excerpt: String = message.text.chars().take(EXCERPT_CHARS).collect();
            findings.push(
                finding
                    .with_raw_content(excerpt)
                    .with_metadata("channel", message.channel.as_str())
                    .with_metadata("user", message.user.as_str())
                    .with_metadata("pattern", pattern.name.as_str())
                    .with_metadata("keyword", keyword.as_str()),
            );
        }

        debug!(
            channel = %message.channel,
            count = findings.len(),
            "Chat message analyzed"
        );
        findings
    }

    /// Analyze a batch of messages.
    pub fn analyze_batch(&self, messages: &[ChatMessage], now: DateTime<Utc>) -> Vec<Finding> {
        messages
            .iter()
            .flat_map(|message| self.analyze(message, now))
            .collect()
    }
}

impl Detector for ChatDetector {
    fn name(&self) -> &'static str {
        "chat_monitor"
    }

    fn source(&self) -> SignalSource {
        SignalSource::ChatMessage
    }
}
