//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use cavern::battle::{BattleStats, Ending, Faction, Outcome};
use cavern::calibrate::{Attempt, Calibration, Verdict};
use serde::Serialize;

/// JSON-serializable battle result.
#[derive(Debug, Serialize)]
pub(super) struct JsonOutcome {
    /// Winning faction (null on stalemate).
    pub(super) winner: Option<Faction>,
    /// Whether the battle ended with nobody able to act.
    pub(super) stalemate: bool,
    /// Fully completed rounds.
    pub(super) rounds: u32,
    /// Remaining hit points of all survivors.
    pub(super) hit_points: u64,
    /// Rounds times hit points.
    pub(super) score: u64,
    /// Elves killed.
    pub(super) elf_losses: u32,
    /// Goblins killed.
    pub(super) goblin_losses: u32,
    /// Engine counters.
    pub(super) stats: BattleStats,
}

impl JsonOutcome {
    /// Create from an outcome and the battle's counters.
    pub(super) fn new(outcome: &Outcome, stats: BattleStats) -> Self {
        Self {
            winner: outcome.ending.winner(),
            stalemate: outcome.ending == Ending::Stalemate,
            rounds: outcome.rounds,
            hit_points: outcome.hit_points,
            score: outcome.score(),
            elf_losses: outcome.elf_losses,
            goblin_losses: outcome.goblin_losses,
            stats,
        }
    }
}

/// JSON-serializable calibration result.
#[derive(Debug, Serialize)]
pub(super) struct JsonCalibration<'a> {
    /// Calibrated faction.
    pub(super) faction: Faction,
    /// Smallest accepted attack power.
    pub(super) attack_power: i32,
    /// Rounds times hit points of the accepted battle.
    pub(super) score: u64,
    /// Outcome of the accepted battle.
    pub(super) outcome: &'a Outcome,
    /// Every candidate tried.
    pub(super) attempts: &'a [Attempt],
}

impl<'a> JsonCalibration<'a> {
    /// Create from a calibration.
    pub(super) fn from_calibration(calibration: &'a Calibration) -> Self {
        Self {
            faction: calibration.faction,
            attack_power: calibration.attack_power,
            score: calibration.outcome.score(),
            outcome: &calibration.outcome,
            attempts: &calibration.attempts,
        }
    }
}

/// Format a calibration as human-readable text.
pub(super) fn format_calibration_text(calibration: &Calibration) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Calibration ({}, {} attempts)",
        calibration.faction,
        calibration.attempts.len()
    );
    for attempt in &calibration.attempts {
        match attempt.verdict {
            Verdict::Accepted => {
                let _ = writeln!(output, "  attack {:>3}: accepted", attempt.attack_power);
            }
            Verdict::Rejected { round } => {
                let _ = writeln!(
                    output,
                    "  attack {:>3}: rejected (first loss in round {round})",
                    attempt.attack_power
                );
            }
        }
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Minimum attack power: {}", calibration.attack_power);
    output.push_str(&cavern::format_outcome(&calibration.outcome));
    output.push('\n');

    output
}

/// Format a calibration as CSV, one row per attempt.
pub(super) fn format_calibration_csv(calibration: &Calibration) -> String {
    let mut output = String::from("attack_power,verdict,first_loss_round,score\n");

    for attempt in &calibration.attempts {
        match attempt.verdict {
            Verdict::Accepted => {
                let _ = writeln!(
                    output,
                    "{},accepted,,{}",
                    attempt.attack_power,
                    calibration.outcome.score()
                );
            }
            Verdict::Rejected { round } => {
                let _ = writeln!(output, "{},rejected,{round},", attempt.attack_power);
            }
        }
    }

    output
}
