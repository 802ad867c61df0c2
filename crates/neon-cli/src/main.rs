// SPDX-License-Identifier: AGPL-3.0-only
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// NEON CLI - quote transfers, manage deployment config, replay scenarios
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "neon-cli")]
#[command(about = "NEON token toolkit - tax quotes, config and scenario simulation", long_about = None)]
#[command(version)]
struct Cli {
    /// Deployment config (TOML). Without it, defaults plus NEON_* env vars apply.
    #[arg(short, long, global = true, env = "NEON_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a transfer of AMOUNT would be split
    Quote {
        /// Amount in atomic units
        #[arg(short, long)]
        amount: u128,

        /// Print the split as JSON
        #[arg(long)]
        json: bool,
    },

    /// Deployment config management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Deploy the contracts in memory and replay a JSON scenario
    Simulate {
        /// Scenario file: { "steps": [ { "caller": "0x..", "action": "...", ... } ] }
        scenario: PathBuf,

        /// Print every event emitted by each step
        #[arg(long)]
        events: bool,

        /// Print responses as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print addresses derived from seed labels, or a deployer's contract addresses
    Address {
        /// Seed labels such as "alice"
        seeds: Vec<String>,

        /// Also print the NEON contract addresses deployed by this address
        #[arg(short, long)]
        deployer: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write the default config
    Init {
        #[arg(short, long, default_value = "neon.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective config
    Show,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Quote { amount, json } => commands::quote::handle(amount, json, config_path)?,
        Commands::Config { action } => commands::config::handle(action, config_path)?,
        Commands::Simulate {
            scenario,
            events,
            json,
        } => {
            let passed = commands::simulate::handle(&scenario, config_path, events, json)?;
            if !passed {
                print_error("scenario expectations not met");
                std::process::exit(1);
            }
        }
        Commands::Address { seeds, deployer } => {
            commands::address::handle(&seeds, deployer.as_deref())?
        }
    }

    Ok(())
}

fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
