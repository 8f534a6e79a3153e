//! Cavern CLI - Command-line interface for simulating and calibrating battles.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Cavern - A deterministic elves-versus-goblins combat simulator
#[derive(Parser, Debug)]
#[command(name = "cavern")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log battle events to stderr (sets the filter to `cavern=debug`)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single battle and print its outcome
    Simulate {
        /// Battlefield map file
        #[arg(required = true)]
        map: PathBuf,

        /// Attack power of every elf (default: 3)
        #[arg(long)]
        elf_attack: Option<i32>,

        /// Attack power of every goblin (default: 3)
        #[arg(long)]
        goblin_attack: Option<i32>,

        /// JSON config file with `battle` and `calibration` sections
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Find the smallest attack power that wins without losses
    Calibrate {
        /// Battlefield map file
        #[arg(required = true)]
        map: PathBuf,

        /// Faction to calibrate (default: elf)
        #[arg(long)]
        faction: Option<cli::FactionArg>,

        /// First attack power to try (default: 4)
        #[arg(long)]
        floor: Option<i32>,

        /// Last attack power to try, inclusive (default: 200)
        #[arg(long)]
        ceiling: Option<i32>,

        /// Candidates evaluated in parallel per batch (default: 1)
        #[arg(short, long)]
        batch: Option<usize>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,

        /// JSON config file with `battle` and `calibration` sections
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::CalibrateFormat,
    },

    /// Parse a battlefield and summarise it
    Validate {
        /// Battlefield map file
        #[arg(required = true)]
        map: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("cavern=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Simulate {
            map,
            elf_attack,
            goblin_attack,
            config,
            format,
        } => cli::simulate::execute(&cli::simulate::SimulateArgs {
            map,
            elf_attack,
            goblin_attack,
            config,
            format,
        }),

        Commands::Calibrate {
            map,
            faction,
            floor,
            ceiling,
            batch,
            threads,
            progress,
            config,
            format,
        } => cli::calibrate::execute(&cli::calibrate::CalibrateArgs {
            map,
            faction,
            floor,
            ceiling,
            batch,
            threads,
            progress,
            config,
            format,
        }),

        Commands::Validate { map } => cli::validate::execute(&map),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
