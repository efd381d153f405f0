use clap::Parser;
use compliance_sentinel::{
    cli::{Cli, Command},
    handlers::{handle_init, run_scan},
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Command::Scan(args) if args.verbose => "debug",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Scan(args) => run_scan(&args),
        Command::Init { dir } => handle_init(&dir),
    }
}
