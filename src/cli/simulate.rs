//! Simulate command implementation.

use super::output::JsonOutcome;
use super::{CliError, FileConfig, OutputFormat, load_battlefield};
use cavern::format_outcome;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments of the simulate command.
#[derive(Debug)]
pub(crate) struct SimulateArgs {
    /// Battlefield map file.
    pub(crate) map: PathBuf,
    /// Elf attack power override.
    pub(crate) elf_attack: Option<i32>,
    /// Goblin attack power override.
    pub(crate) goblin_attack: Option<i32>,
    /// Optional config file.
    pub(crate) config: Option<PathBuf>,
    /// Output format.
    pub(crate) format: OutputFormat,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the map or config cannot be loaded or the battle
/// fails.
pub(crate) fn execute(args: &SimulateArgs) -> Result<(), CliError> {
    let mut config = FileConfig::load(args.config.as_deref())?.battle;
    if let Some(power) = args.elf_attack {
        config.elf_attack = power;
    }
    if let Some(power) = args.goblin_attack {
        config.goblin_attack = power;
    }
    config
        .validate()
        .map_err(|e| CliError::new(format!("Invalid config: {e}")))?;

    let battlefield = load_battlefield(&args.map)?;
    let mut battle = battlefield.battle(config);

    let start = Instant::now();
    let outcome = battle.run()?;
    tracing::debug!(elapsed = ?start.elapsed(), "battle finished");

    match args.format {
        OutputFormat::Text => {
            println!("{battle}");
            println!();
            println!("{}", format_outcome(&outcome));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonOutcome::new(&outcome, *battle.stats()))?;
            println!("{json}");
        }
    }

    Ok(())
}
