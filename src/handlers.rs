//! CLI command handlers.
//!
//! Separated from main.rs so the wiring (config -> detectors -> engine ->
//! reporter) is unit-testable. Handlers own process concerns: reading
//! inputs, exit codes, printing. Detector-side read failures never reach
//! the engine as errors; they become an empty batch plus an error tick on
//! the agent's status.

use crate::cli::{OutputFormat, ScanArgs, SignalKind};
use crate::config::{SentinelConfig, CONFIG_FILE_NAME};
use crate::detectors::{
    ChatDetector, ChatMessage, Detector, DiffDetector, DocumentDetector, DocumentInput,
};
use crate::engine::{AggregationEngine, SystemClock, UuidGenerator};
use crate::reporter::{json::JsonReporter, terminal::TerminalReporter, Reporter};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;
use walkdir::WalkDir;

/// Extensions treated as scannable documents.
const DOC_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Write a default configuration file into `dir`.
pub fn handle_init(dir: &Path) -> ExitCode {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        eprintln!(
            "{} {} already exists",
            "error:".red().bold(),
            path.display()
        );
        return ExitCode::from(2);
    }
    match std::fs::write(&path, SentinelConfig::template()) {
        Ok(()) => {
            println!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{} failed to write {}: {}",
                "error:".red().bold(),
                path.display(),
                e
            );
            ExitCode::from(2)
        }
    }
}

/// Scan the given inputs and report the aggregated risk posture.
///
/// Exit code 1 when the run leaves findings pending human review.
pub fn run_scan(args: &ScanArgs) -> ExitCode {
    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return ExitCode::from(2);
        }
    };

    let engine = AggregationEngine::new(
        config.clone(),
        Arc::new(SystemClock),
        Arc::new(UuidGenerator),
    );

    match args.signal {
        SignalKind::Document => scan_documents(&engine, &config, &args.paths),
        SignalKind::Diff => scan_diffs(&engine, &config, &args.paths),
        SignalKind::Chat => scan_chats(&engine, &config, &args.paths),
    }

    let summary = engine.dashboard_summary();
    let reporter: Box<dyn Reporter> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalReporter::new(args.verbose)),
        OutputFormat::Json => Box::new(JsonReporter::new()),
    };
    println!("{}", reporter.report(&summary));

    if summary.pending_reviews > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn load_config(args: &ScanArgs) -> crate::error::Result<SentinelConfig> {
    match &args.config {
        Some(path) => SentinelConfig::load(path),
        None => SentinelConfig::discover(Path::new(".")),
    }
}

fn scan_documents(engine: &AggregationEngine, config: &SentinelConfig, paths: &[PathBuf]) {
    let detector = DocumentDetector::new(config.detectors.document.clone());
    let now = Utc::now();

    for path in collect_document_files(paths) {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read document");
                engine.record_agent_error(detector.name());
                continue;
            }
        };
        let doc = document_input(&path, content);
        let findings = detector.analyze(&doc, now);
        let count = findings.len() as u64;
        engine.ingest(findings);
        engine.update_agent_status(detector.name(), true, count);
    }
}

fn scan_diffs(engine: &AggregationEngine, config: &SentinelConfig, paths: &[PathBuf]) {
    let detector = DiffDetector::new(config.detectors.diff.clone());
    let now = Utc::now();

    for path in paths {
        let diff = match std::fs::read_to_string(path) {
            Ok(diff) => diff,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read diff");
                engine.record_agent_error(detector.name());
                continue;
            }
        };
        let change_id = file_stem(path);
        let findings = detector.analyze(&change_id, None, &diff, now);
        let count = findings.len() as u64;
        engine.ingest(findings);
        engine.update_agent_status(detector.name(), true, count);
    }
}

fn scan_chats(engine: &AggregationEngine, config: &SentinelConfig, paths: &[PathBuf]) {
    let detector = ChatDetector::new(config.detectors.chat.clone());
    let now = Utc::now();

    for path in paths {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read chat log");
                engine.record_agent_error(detector.name());
                continue;
            }
        };

        let mut messages: Vec<ChatMessage> = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ChatMessage>(line) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        line = line_num + 1,
                        error = %e,
                        "Skipping malformed chat line"
                    );
                    engine.record_agent_error(detector.name());
                }
            }
        }

        let findings = detector.analyze_batch(&messages, now);
        let count = findings.len() as u64;
        engine.ingest(findings);
        engine.update_agent_status(detector.name(), true, count);
    }
}

/// Expand directories into their document files; keep plain files as-is.
fn collect_document_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if is_document(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DOC_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn document_input(path: &Path, content: String) -> DocumentInput {
    // first markdown heading wins, file name otherwise
    let title = content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| file_name(path));

    let last_modified: Option<DateTime<Utc>> = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    DocumentInput {
        doc_id: file_stem(path),
        title,
        content,
        url: None,
        last_modified,
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scan_args(paths: Vec<PathBuf>, signal: SignalKind) -> ScanArgs {
        ScanArgs {
            paths,
            signal,
            format: OutputFormat::Json,
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn test_handle_init_creates_file() {
        let dir = TempDir::new().unwrap();
        let result = handle_init(dir.path());
        assert_eq!(result, ExitCode::SUCCESS);
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_handle_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "existing").unwrap();
        assert_eq!(handle_init(dir.path()), ExitCode::from(2));
    }

    #[test]
    fn test_scan_benign_document_passes() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("notes.md"),
            "# Meeting Notes\nNothing sensitive here.\n",
        )
        .unwrap();

        let args = scan_args(vec![dir.path().to_path_buf()], SignalKind::Document);
        assert_eq!(run_scan(&args), ExitCode::SUCCESS);
    }

    #[test]
    fn test_scan_risky_document_requests_review() {
        let dir = TempDir::new().unwrap();
        // two HIGH outdated-language hits push the score past the trigger
        fs::write(
            dir.path().join("transfers.md"),
            "# Data Transfer Policy\nWe rely on safe harbor and privacy shield.\n",
        )
        .unwrap();

        let args = scan_args(vec![dir.path().to_path_buf()], SignalKind::Document);
        assert_eq!(run_scan(&args), ExitCode::from(1));
    }

    #[test]
    fn test_scan_critical_chat_requests_review() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("chat.jsonl");
        fs::write(
            &log,
            r#"{"channel":"eng","user":"sam","text":"let's skip auth for now","ts":"1"}"#,
        )
        .unwrap();

        let args = scan_args(vec![log], SignalKind::Chat);
        assert_eq!(run_scan(&args), ExitCode::from(1));
    }

    #[test]
    fn test_scan_diff_with_secret() {
        let dir = TempDir::new().unwrap();
        let diff = dir.path().join("change.diff");
        fs::write(
            &diff,
            "+++ b/src/pay.rs\n+const STRIPE_KEY: &str = \"sk_live\";\n",
        )
        .unwrap();

        let args = scan_args(vec![diff], SignalKind::Diff);
        // stripe_key is a CRITICAL keyword, so a review opens
        assert_eq!(run_scan(&args), ExitCode::from(1));
    }

    #[test]
    fn test_scan_missing_config_fails() {
        let dir = TempDir::new().unwrap();
        let args = ScanArgs {
            paths: vec![dir.path().to_path_buf()],
            signal: SignalKind::Document,
            format: OutputFormat::Json,
            config: Some(PathBuf::from("/nonexistent/config.yaml")),
            verbose: false,
        };
        assert_eq!(run_scan(&args), ExitCode::from(2));
    }

    #[test]
    fn test_scan_unreadable_input_does_not_crash() {
        let args = scan_args(
            vec![PathBuf::from("/nonexistent/change.diff")],
            SignalKind::Diff,
        );
        assert_eq!(run_scan(&args), ExitCode::SUCCESS);
    }

    #[test]
    fn test_collect_document_files_filters_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "x").unwrap();
        fs::write(dir.path().join("b.txt"), "x").unwrap();
        fs::write(dir.path().join("c.rs"), "x").unwrap();

        let files = collect_document_files(&[dir.path().to_path_buf()]);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_document_input_title_from_heading() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("privacy-policy.md");
        fs::write(&path, "# Privacy Policy\nbody\n").unwrap();

        let doc = document_input(&path, fs::read_to_string(&path).unwrap());
        assert_eq!(doc.title, "Privacy Policy");
        assert_eq!(doc.doc_id, "privacy-policy");
        assert!(doc.last_modified.is_some());
    }

    #[test]
    fn test_document_input_title_falls_back_to_file_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "no heading here\n").unwrap();

        let doc = document_input(&path, fs::read_to_string(&path).unwrap());
        assert_eq!(doc.title, "notes.txt");
    }
}
