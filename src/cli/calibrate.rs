//! Calibrate command implementation.

use super::output::{JsonCalibration, format_calibration_csv, format_calibration_text};
use super::{CalibrateFormat, CliError, FactionArg, FileConfig, load_battlefield};
use cavern::calibrate::calibrate_with;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments of the calibrate command.
#[derive(Debug)]
pub(crate) struct CalibrateArgs {
    /// Battlefield map file.
    pub(crate) map: PathBuf,
    /// Faction override.
    pub(crate) faction: Option<FactionArg>,
    /// Floor override.
    pub(crate) floor: Option<i32>,
    /// Ceiling override.
    pub(crate) ceiling: Option<i32>,
    /// Batch size override.
    pub(crate) batch: Option<usize>,
    /// Rayon pool size.
    pub(crate) threads: Option<usize>,
    /// Show a progress bar.
    pub(crate) progress: bool,
    /// Optional config file.
    pub(crate) config: Option<PathBuf>,
    /// Output format.
    pub(crate) format: CalibrateFormat,
}

/// Execute the calibrate command.
///
/// # Errors
///
/// Returns an error if the map or config cannot be loaded, a candidate
/// battle fails, or no candidate is accepted.
pub(crate) fn execute(args: &CalibrateArgs) -> Result<(), CliError> {
    let FileConfig {
        battle,
        mut calibration,
    } = FileConfig::load(args.config.as_deref())?;
    if let Some(faction) = args.faction {
        calibration.faction = faction.into();
    }
    if let Some(floor) = args.floor {
        calibration.floor = floor;
    }
    if let Some(ceiling) = args.ceiling {
        calibration.ceiling = ceiling;
    }
    if let Some(batch) = args.batch {
        calibration.batch_size = batch;
    }
    calibration
        .validate()
        .map_err(|e| CliError::new(format!("Invalid config: {e}")))?;
    battle
        .with_attack_power(calibration.faction, calibration.floor)
        .validate()
        .map_err(|e| CliError::new(format!("Invalid config: {e}")))?;

    let battlefield = load_battlefield(&args.map)?;

    // Set thread pool size if specified
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // Progress bar over the whole candidate range
    let pb = if args.progress {
        let span = i64::from(calibration.ceiling) - i64::from(calibration.floor) + 1;
        let pb = ProgressBar::new(u64::try_from(span).unwrap_or(0));
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} candidates ({msg})")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let result = calibrate_with(&battlefield, battle, calibration, |attempt| {
        if let Some(pb) = &pb {
            pb.set_message(format!("attack {}", attempt.attack_power));
            pb.inc(1);
        }
    });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let result = result?;
    let duration = start.elapsed();

    match args.format {
        CalibrateFormat::Text => {
            print!("{}", format_calibration_text(&result));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        CalibrateFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonCalibration::from_calibration(&result))?;
            println!("{json}");
        }
        CalibrateFormat::Csv => {
            print!("{}", format_calibration_csv(&result));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn args(floor: Option<i32>) -> CalibrateArgs {
        CalibrateArgs {
            map: PathBuf::from("does-not-exist.txt"),
            faction: None,
            floor,
            ceiling: None,
            batch: None,
            threads: None,
            progress: false,
            config: None,
            format: CalibrateFormat::Text,
        }
    }

    #[test]
    fn test_floor_below_one_rejected_before_loading_map() {
        let err = execute(&args(Some(0))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid config: calibration floor must be at least 1, got 0"
        );
    }

    #[test]
    fn test_file_battle_config_validated() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "battle": {{ "goblin_attack": 0 }} }}"#).unwrap();
        let mut args = args(None);
        args.config = Some(file.path().to_path_buf());

        let err = execute(&args).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid config: goblin_attack must be at least 1, got 0"
        );
    }
}
