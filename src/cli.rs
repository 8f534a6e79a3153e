//! CLI command implementations for Cavern.

pub(crate) mod calibrate;
pub(crate) mod simulate;
pub(crate) mod validate;

mod output;

use cavern::battle::{BattleConfig, Battlefield, Faction, parse_battlefield};
use cavern::calibrate::CalibrationConfig;
use cavern::{BattleError, CalibrationError};
use clap::ValueEnum;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `calibrate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CalibrateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// One CSV row per attempt.
    Csv,
}

/// Faction selector on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FactionArg {
    /// Elves.
    Elf,
    /// Goblins.
    Goblin,
}

impl From<FactionArg> for Faction {
    fn from(arg: FactionArg) -> Self {
        match arg {
            FactionArg::Elf => Faction::Elf,
            FactionArg::Goblin => Faction::Goblin,
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {e}"))
    }
}

impl From<BattleError> for CliError {
    fn from(e: BattleError) -> Self {
        Self::new(format!("Battle failed: {e}"))
    }
}

impl From<CalibrationError> for CliError {
    fn from(e: CalibrationError) -> Self {
        Self::new(format!("Calibration failed: {e}"))
    }
}

/// Settings loaded from a `--config` file.
///
/// Missing sections and fields keep their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    /// Battle parameters.
    pub(crate) battle: BattleConfig,
    /// Attack-power search parameters.
    pub(crate) calibration: CalibrationConfig,
}

impl FileConfig {
    /// Load a config file, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|e| {
            CliError::new(format!("Failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            CliError::new(format!("Invalid config {}: {e}", path.display()))
        })
    }
}

/// Read and parse a battlefield map file.
pub(crate) fn load_battlefield(path: &Path) -> Result<Battlefield, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
    parse_battlefield(&text)
        .map_err(|e| CliError::new(format!("Invalid battlefield {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_config_is_default() {
        assert_eq!(FileConfig::load(None).unwrap(), FileConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "battle": {{ "elf_attack": 12 }}, "calibration": {{ "faction": "goblin", "ceiling": 50 }} }}"#
        )
        .unwrap();

        let config = FileConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.battle.elf_attack, 12);
        assert_eq!(config.battle.goblin_attack, 3);
        assert_eq!(config.battle.hit_points, 200);
        assert_eq!(config.calibration.faction, Faction::Goblin);
        assert_eq!(config.calibration.floor, 4);
        assert_eq!(config.calibration.ceiling, 50);
    }

    #[test]
    fn test_unknown_section_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "combat": {{}} }}"#).unwrap();
        assert!(FileConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_load_battlefield_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#E#\n#x#\n").unwrap();
        let err = load_battlefield(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid battlefield"));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_load_battlefield() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#######\n#E..G.#\n#######\n").unwrap();
        let battlefield = load_battlefield(file.path()).unwrap();
        assert_eq!(battlefield.width(), 7);
        assert_eq!(battlefield.headcount(Faction::Goblin), 1);
    }
}
