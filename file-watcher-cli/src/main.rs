//! file-watcher — exit with a distinguished code on the first filesystem change.
//!
//! # Usage
//!
//! ```text
//! file-watcher            # watch $HOME (%USERPROFILE% on Windows)
//! ```
//!
//! Exit codes: `80211` when a non-ignored create/change/rename/delete is seen,
//! `1` when the watch directory is missing or invalid.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use file_watcher_core::{WatchConfig, INVALID_PATH_EXIT_CODE};

const PROGRAM_NAME: &str = "file-watcher";
const PROGRAM_URL: &str = env!("CARGO_PKG_REPOSITORY");

#[derive(Parser, Debug)]
#[command(
    name = "file-watcher",
    version,
    about = "Block until something changes under the user's profile directory",
    long_about = None,
)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    let config = match WatchConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            println!("Error\n{err}");
            process::exit(INVALID_PATH_EXIT_CODE);
        }
    };

    print_banner();

    let trigger = file_watcher_daemon::start_blocking(config).context("watch exited with error")?;
    process::exit(trigger.exit_code());
}

fn print_banner() {
    println!("{PROGRAM_NAME}, version: {}", env!("CARGO_PKG_VERSION"));
    println!("{PROGRAM_URL}");
    println!();
}
