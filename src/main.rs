mod config;
mod host;
mod render;
mod session;

use std::io::Write;
use std::process::ExitCode;

use channel::{CloseKind, ConnectionState};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, SessionConfig};
use crate::render::TerminalRenderer;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = match SessionConfig::try_from(cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("livesearch: {error}");
            return ExitCode::from(2);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("livesearch: failed to start runtime: {error}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = runtime.block_on(session::run(config, TerminalRenderer::new(std::io::stdout()), stdin));
    // A pending stdin read cannot be cancelled; don't wait for it.
    runtime.shutdown_background();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(error) => {
            eprintln!("livesearch: {error}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        state = %outcome.state,
        batches = outcome.renderer.batches(),
        error = outcome.renderer.last_error(),
        "session ended"
    );
    let _ = outcome.renderer.into_inner().flush();

    if outcome.state == ConnectionState::Closed(CloseKind::Clean) { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
