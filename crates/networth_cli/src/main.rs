//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load config, start logging, open and bootstrap the store.
//! - Print a deterministic status line for quick local sanity checks.
//!
//! Bootstrap failures are fatal: the process exits non-zero.

use clap::Parser;
use log::error;
use networth_core::{
    core_version, init_logging, AppConfig, SqliteStore, StoreOptions, UserService,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "networth",
    version,
    about = "Open the net-worth database and print a status line"
)]
struct Cli {
    /// Directory holding `database.txt`
    #[arg(default_value = ".")]
    config_dir: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.config_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("networth: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_dir: PathBuf) -> Result<(), String> {
    let config = AppConfig::load(&config_dir).map_err(|err| err.to_string())?;
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, log_dir).map_err(|err| err.to_string())?;
    }

    let store = SqliteStore::open(
        &config.database_path,
        StoreOptions {
            busy_timeout: config.busy_timeout(),
        },
    )
    .map_err(|err| format!("failed to bootstrap database: {err}"))?;

    let users = UserService::new(&store)
        .list_users()
        .map_err(|err| err.to_string())?;
    println!("networth_core version={}", core_version());
    println!("networth_core users={}", users.len());

    store.close().map_err(|err| err.to_string())
}
