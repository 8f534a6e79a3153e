//! Attack-power calibration.
//!
//! Searches upward from a floor for the smallest attack power that lets one
//! faction win without a single casualty. Every candidate runs on a fresh
//! battle built from the same battlefield, so attempts share nothing mutable
//! and can be evaluated in parallel batches.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::battle::{BattleConfig, Battlefield, Faction, Outcome};
use crate::error::{BattleError, CalibrationError};

/// Default first candidate.
pub const DEFAULT_FLOOR: i32 = 4;

/// Default last candidate, inclusive.
pub const DEFAULT_CEILING: i32 = 200;

/// Parameters of the attack-power search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Faction whose attack power is raised and whose losses are forbidden.
    pub faction: Faction,
    /// First candidate.
    pub floor: i32,
    /// Last candidate, inclusive.
    pub ceiling: i32,
    /// Candidates evaluated together on the rayon pool. `0` and `1` both mean
    /// sequential search with early rejection.
    pub batch_size: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            faction: Faction::Elf,
            floor: DEFAULT_FLOOR,
            ceiling: DEFAULT_CEILING,
            batch_size: 1,
        }
    }
}

impl CalibrationConfig {
    /// Check the candidate range.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::InvalidFloor`] if the floor is below 1, or
    /// [`CalibrationError::InvalidRange`] if it lies above the ceiling.
    pub const fn validate(&self) -> Result<(), CalibrationError> {
        if self.floor < 1 {
            return Err(CalibrationError::InvalidFloor { floor: self.floor });
        }
        if self.floor > self.ceiling {
            return Err(CalibrationError::InvalidRange {
                floor: self.floor,
                ceiling: self.ceiling,
            });
        }
        Ok(())
    }
}

/// Result of trying one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "verdict")]
pub enum Verdict {
    /// The faction finished the battle intact.
    Accepted,
    /// A unit of the faction died.
    Rejected {
        /// One-based round of the first death.
        round: u32,
    },
}

/// One candidate and its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attempt {
    /// Candidate attack power.
    pub attack_power: i32,
    /// What happened.
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Successful search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calibration {
    /// Faction that was calibrated.
    pub faction: Faction,
    /// Smallest accepted attack power.
    pub attack_power: i32,
    /// Outcome of the accepted battle.
    pub outcome: Outcome,
    /// Every candidate tried, in ascending order, ending with the accepted one.
    pub attempts: Vec<Attempt>,
}

/// Find the smallest attack power for `calibration.faction` that wins
/// without losses.
///
/// # Errors
///
/// Returns [`CalibrationError::InvalidFloor`] or
/// [`CalibrationError::InvalidRange`] for a bad candidate range,
/// [`CalibrationError::SearchExhausted`] if no candidate is accepted, or
/// [`CalibrationError::Battle`] if the battle parameters are invalid or a
/// candidate battle fails.
pub fn calibrate(
    battlefield: &Battlefield,
    battle: BattleConfig,
    calibration: CalibrationConfig,
) -> Result<Calibration, CalibrationError> {
    calibrate_with(battlefield, battle, calibration, |_| {})
}

/// Like [`calibrate`], but reports every recorded attempt to `on_attempt`
/// in ascending order as the search proceeds.
///
/// # Errors
///
/// See [`calibrate`].
pub fn calibrate_with<F>(
    battlefield: &Battlefield,
    battle: BattleConfig,
    calibration: CalibrationConfig,
    mut on_attempt: F,
) -> Result<Calibration, CalibrationError>
where
    F: FnMut(&Attempt),
{
    calibration.validate()?;
    let CalibrationConfig {
        faction,
        floor,
        ceiling,
        batch_size,
    } = calibration;
    battle.with_attack_power(faction, floor).validate()?;

    let batch_size = batch_size.max(1);
    let mut attempts = Vec::new();
    let mut next = floor;

    while next <= ceiling {
        let last = next.saturating_add(i32::try_from(batch_size - 1).unwrap_or(i32::MAX));
        let last = last.min(ceiling);

        let results: Vec<Result<Trial, BattleError>> = if batch_size == 1 {
            vec![run_trial(battlefield, battle, faction, next)]
        } else {
            (next..=last)
                .into_par_iter()
                .map(|power| run_trial(battlefield, battle, faction, power))
                .collect()
        };

        // Results are consumed in ascending order, so the first acceptance
        // and the attempt log match the sequential search.
        for result in results {
            let trial = result?;
            tracing::info!(
                %faction,
                attack_power = trial.attempt.attack_power,
                verdict = ?trial.attempt.verdict,
                "calibration attempt"
            );
            on_attempt(&trial.attempt);
            attempts.push(trial.attempt);

            if let Some(outcome) = trial.outcome {
                return Ok(Calibration {
                    faction,
                    attack_power: trial.attempt.attack_power,
                    outcome,
                    attempts,
                });
            }
        }

        if last == i32::MAX {
            break;
        }
        next = last + 1;
    }

    tracing::warn!(%faction, floor, ceiling, "calibration search exhausted");
    Err(CalibrationError::SearchExhausted {
        faction,
        floor,
        ceiling,
    })
}

/// A finished candidate battle.
#[derive(Debug, Clone, Copy)]
struct Trial {
    attempt: Attempt,
    /// Present only when the candidate was accepted.
    outcome: Option<Outcome>,
}

/// Run one candidate round by round, stopping at the first casualty of
/// `faction`.
fn run_trial(
    battlefield: &Battlefield,
    config: BattleConfig,
    faction: Faction,
    attack_power: i32,
) -> Result<Trial, BattleError> {
    let mut battle = battlefield.battle(config.with_attack_power(faction, attack_power));

    loop {
        if let Some(outcome) = battle.outcome() {
            return Ok(Trial {
                attempt: Attempt {
                    attack_power,
                    verdict: Verdict::Accepted,
                },
                outcome: Some(outcome),
            });
        }

        let report = battle.run_round()?;
        if let Some(casualty) = report.casualties.iter().find(|c| c.faction == faction) {
            return Ok(Trial {
                attempt: Attempt {
                    attack_power,
                    verdict: Verdict::Rejected {
                        round: casualty.round,
                    },
                },
                outcome: None,
            });
        }
    }
}
