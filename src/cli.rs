use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

/// Which detector the scanned inputs belong to.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum SignalKind {
    #[default]
    Document,
    Diff,
    Chat,
}

#[derive(Parser, Debug)]
#[command(
    name = "sentinel",
    version,
    about = "Compliance signal aggregation with weighted risk scoring and HITL review",
    long_about = "sentinel scans documents, code-review diffs and chat transcripts for \
                  compliance-relevant signals, aggregates them into a risk posture and \
                  flags findings that need human review."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan inputs with a detector and report the aggregated risk posture
    Scan(ScanArgs),
    /// Write a default .sentinel.yaml configuration file
    Init {
        /// Directory to write the configuration into
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Paths to scan (files, or directories for document scans)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Signal kind of the inputs
    #[arg(short = 't', long = "type", value_enum, default_value_t = SignalKind::Document)]
    pub signal: SignalKind,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Configuration file (defaults to ./.sentinel.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
