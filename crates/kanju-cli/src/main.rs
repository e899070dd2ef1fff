mod app;
mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::Status;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut app = match app::Kanju::new(&cli) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Failed to start: {e}");
            eprintln!("kanju: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    let stdin = std::io::stdin();
    match commands::run(&mut app, cli.command, &mut stdout.lock(), &mut stdin.lock()) {
        Ok(Status::Done) => ExitCode::SUCCESS,
        Ok(Status::Rejected) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("kanju: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so command output on stdout stays pipeable.
fn init_tracing(verbose: bool) {
    let default = if verbose { "kanju=debug" } else { "kanju=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
