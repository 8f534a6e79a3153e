//! Units and factions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::Coord;

/// Hit points every unit starts with.
pub const STARTING_HIT_POINTS: i32 = 200;

/// Attack power every unit starts with.
pub const BASE_ATTACK_POWER: i32 = 3;

/// One of the two opposing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    /// Marked `E` on the map.
    Elf,
    /// Marked `G` on the map.
    Goblin,
}

impl Faction {
    /// Both factions.
    pub const ALL: [Faction; 2] = [Faction::Elf, Faction::Goblin];

    /// The opposing faction.
    #[must_use]
    pub const fn enemy(self) -> Self {
        match self {
            Faction::Elf => Faction::Goblin,
            Faction::Goblin => Faction::Elf,
        }
    }

    /// Map marker for this faction.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Faction::Elf => 'E',
            Faction::Goblin => 'G',
        }
    }

    /// Faction for a map marker.
    #[must_use]
    pub const fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'E' => Some(Faction::Elf),
            'G' => Some(Faction::Goblin),
            _ => None,
        }
    }

    /// Array slot for per-faction tallies.
    #[must_use]
    pub(crate) const fn slot(self) -> usize {
        match self {
            Faction::Elf => 0,
            Faction::Goblin => 1,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Elf => write!(f, "elf"),
            Faction::Goblin => write!(f, "goblin"),
        }
    }
}

/// Stable index of a unit within its battle.
///
/// Ids are assigned in reading order of the starting positions and never
/// reused, so a dead unit's id stays valid for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub(crate) usize);

impl UnitId {
    /// Create an id from an arena index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Arena index of this id.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A single combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    /// Arena id.
    pub id: UnitId,
    /// Side this unit fights for.
    pub faction: Faction,
    /// Current square.
    pub position: Coord,
    /// Remaining hit points; the unit dies at zero or below.
    pub hit_points: i32,
    /// Damage dealt per attack.
    pub attack_power: i32,
}

impl Unit {
    /// Create a unit.
    #[must_use]
    pub const fn new(
        id: UnitId,
        faction: Faction,
        position: Coord,
        hit_points: i32,
        attack_power: i32,
    ) -> Self {
        Self {
            id,
            faction,
            position,
            hit_points,
            attack_power,
        }
    }

    /// Whether the unit still has hit points.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    /// Apply `damage` and report whether the unit died from it.
    pub fn take_hit(&mut self, damage: i32) -> bool {
        self.hit_points = self.hit_points.saturating_sub(damage);
        !self.is_alive()
    }
}
