//! context-hash CLI Binary
//!
//! Prints the build-context digest on stdout. Errors go to stderr with exit code 1.

use clap::Parser;
use context_hash::cli::{execute, resolve_config, Cli};
use context_hash::logging::init_logging;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("context-hash starting");

    match execute(&cli, &config) {
        Ok(digest) => {
            info!("Command completed successfully");
            println!("{}", digest);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
