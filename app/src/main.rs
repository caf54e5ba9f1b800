//! BW Diet CLI
//!
//! Local-first body metrics tracker. All state lives in one JSON
//! snapshot file; every command loads it, applies at most one mutation
//! and saves it back.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use bw_diet_app::{
    cli::{self, Cli},
    config,
    error::AppError,
    services::DietService,
    store::JsonFileStore,
};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Bad input is reported plainly; anything else is logged
            let user_error = err
                .downcast_ref::<AppError>()
                .is_some_and(AppError::is_user_error);
            if user_error {
                eprintln!("Error: {:#}", err);
            } else {
                error!(error = %err, "Command failed");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::AppConfig::load()?;

    let path = cli.data.clone().unwrap_or_else(|| config.storage.path.clone());
    let store = JsonFileStore::new(path, config.storage.pretty);
    debug!(
        version = env!("CARGO_PKG_VERSION"),
        path = %store.path().display(),
        "Opening snapshot store"
    );

    let mut service = DietService::open(store)?;

    let mut stdout = io::stdout().lock();
    cli::run(cli.command, cli.json, &mut service, &config, &mut stdout)?;

    // Surface a save that failed during the command
    service.flush()?;
    Ok(())
}

/// Initialize tracing/logging
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "bw_diet_app=info".into()
        } else {
            "bw_diet_app=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(io::stderr))
            .init();
    }
}
