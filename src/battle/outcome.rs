//! Battle results and their text form.

use std::fmt::Write as _;

use serde::Serialize;

use crate::battle::Faction;

/// How combat ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ending {
    /// A unit of this faction found no enemies left.
    Victory(Faction),
    /// Both sides survive but nobody can move or attack.
    Stalemate,
}

impl Ending {
    /// The winning faction, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Faction> {
        match self {
            Ending::Victory(faction) => Some(faction),
            Ending::Stalemate => None,
        }
    }
}

/// Final state of a finished battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Fully completed rounds; the round in which combat ended is excluded.
    pub rounds: u32,
    /// Sum of hit points of all surviving units.
    pub hit_points: u64,
    /// How combat ended.
    pub ending: Ending,
    /// Elves killed.
    pub elf_losses: u32,
    /// Goblins killed.
    pub goblin_losses: u32,
}

impl Outcome {
    /// Completed rounds multiplied by remaining hit points.
    #[must_use]
    pub fn score(&self) -> u64 {
        u64::from(self.rounds) * self.hit_points
    }

    /// Units of `faction` killed.
    #[must_use]
    pub const fn losses(&self, faction: Faction) -> u32 {
        match faction {
            Faction::Elf => self.elf_losses,
            Faction::Goblin => self.goblin_losses,
        }
    }
}

/// Human-readable summary of an outcome.
#[must_use]
pub fn format_outcome(outcome: &Outcome) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Combat ends after {} full rounds",
        outcome.rounds
    );
    match outcome.ending {
        Ending::Victory(Faction::Elf) => {
            let _ = writeln!(
                output,
                "Elves win with {} total hit points left",
                outcome.hit_points
            );
        }
        Ending::Victory(Faction::Goblin) => {
            let _ = writeln!(
                output,
                "Goblins win with {} total hit points left",
                outcome.hit_points
            );
        }
        Ending::Stalemate => {
            let _ = writeln!(
                output,
                "Stalemate with {} total hit points left",
                outcome.hit_points
            );
        }
    }
    let _ = write!(
        output,
        "Outcome: {} * {} = {}",
        outcome.rounds,
        outcome.hit_points,
        outcome.score()
    );

    output
}
