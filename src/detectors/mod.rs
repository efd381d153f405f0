//! Stateless detectors: text in, findings out.
//!
//! Each detector applies a configuration-driven pattern table to one kind
//! of signal and constructs findings with deterministic ids, so
//! re-detecting the same underlying event always produces the same id and
//! the engine's dedup holds. Detectors never touch engine state and never
//! propagate transport errors; a caller that fails to read its input hands
//! the engine an empty batch.

pub mod chat;
pub mod diff;
pub mod document;
pub mod patterns;

pub use chat::{ChatDetector, ChatMessage};
pub use diff::DiffDetector;
pub use document::{DocumentDetector, DocumentInput};

use crate::model::SignalSource;

/// Common surface of the detectors, used for agent-status bookkeeping.
pub trait Detector {
    /// Stable agent name reported to the status registry.
    fn name(&self) -> &'static str;

    /// The signal kind this detector classifies.
    fn source(&self) -> SignalSource;
}

/// Extract the lines around the first case-insensitive hit of `needle`.
pub(crate) fn line_context(content: &str, needle: &str, context_lines: usize) -> String {
    let needle_lower = needle.to_lowercase();
    let lines: Vec<&str> = content.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.to_lowercase().contains(&needle_lower) {
            let start = i.saturating_sub(context_lines);
            let end = (i + context_lines + 1).min(lines.len());
            return lines[start..end].join("\n");
        }
    }
    String::new()
}

/// Extract the characters around the first case-insensitive hit of
/// `needle`, clamped to UTF-8 boundaries.
pub(crate) fn char_context(content: &str, needle: &str, context_chars: usize) -> String {
    let idx = match content.to_lowercase().find(&needle.to_lowercase()) {
        Some(idx) => idx,
        None => return String::new(),
    };

    let mut start = idx.saturating_sub(context_chars);
    while start > 0 && !content.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (idx + needle.len() + context_chars).min(content.len());
    while end < content.len() && !content.is_char_boundary(end) {
        end += 1;
    }
    format!("...{}...", &content[start..end])
}
