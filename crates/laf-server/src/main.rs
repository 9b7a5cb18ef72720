//! laf server
//!
//! Composition root: loads settings, starts logging, and builds the
//! process-wide resource registry before anything else runs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod context;

#[derive(Debug, Parser)]
#[command(name = "laf-server")]
#[command(about = "laf server - function runtime storage bootstrap", long_about = None)]
struct Cli {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Initialize both stores and verify they answer queries
    Check(commands::check::CheckArgs),
    /// Print the effective settings (connection URIs redacted)
    Settings,
}

fn main() {
    let cli = Cli::parse();

    let result = load_env(cli.env_file.as_deref()).and_then(|()| match cli.command {
        Commands::Check(args) => commands::check::execute(args),
        Commands::Settings => commands::settings::execute(),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_env(env_file: Option<&std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
    match env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        // A missing ./.env is normal outside development
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}
