//! Battle invariants - sanity checks that detect bugs.
//!
//! The grid and the unit arena describe the same battle twice. These checks
//! confirm the two descriptions agree; in a correct engine they never fire.

use crate::battle::{Battle, Cell, Faction};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    /// Create a violation with the given description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all battle invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(battle: &Battle) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let grid = battle.grid();
    let mut counted = [0u32; 2];

    // Every living unit sits on a cell that names it
    for &id in battle.living_ids() {
        let Some(unit) = battle.unit(id) else {
            violations.push(InvariantViolation::new(format!(
                "Living list names unknown unit {id:?}"
            )));
            continue;
        };
        counted[unit.faction.slot()] += 1;

        if !unit.is_alive() {
            violations.push(InvariantViolation::new(format!(
                "Living unit {id:?} has {} hit points",
                unit.hit_points
            )));
        }

        match grid.get(unit.position) {
            Ok(Cell::Occupied(occupant))
                if occupant.unit == id && occupant.faction == unit.faction => {}
            Ok(cell) => violations.push(InvariantViolation::new(format!(
                "Unit {id:?} at {:?} but cell holds {cell:?}",
                unit.position
            ))),
            Err(_) => violations.push(InvariantViolation::new(format!(
                "Unit {id:?} is off the grid at {:?}",
                unit.position
            ))),
        }
    }

    // Every occupied cell names a living unit standing there
    for (index, cell) in grid.cells().iter().enumerate() {
        let Some(occupant) = cell.occupant() else {
            continue;
        };
        let coord = grid.coord_of(index);
        match battle.unit(occupant.unit) {
            Some(unit) if unit.is_alive() && unit.position == coord => {}
            Some(unit) => violations.push(InvariantViolation::new(format!(
                "Cell {coord:?} holds unit {:?} which is at {:?} with {} hit points",
                occupant.unit, unit.position, unit.hit_points
            ))),
            None => violations.push(InvariantViolation::new(format!(
                "Cell {coord:?} holds unknown unit {:?}",
                occupant.unit
            ))),
        }
    }

    // Headcounts match the living list
    for faction in Faction::ALL {
        let expected = counted[faction.slot()];
        let recorded = battle.headcount(faction);
        if recorded != expected {
            violations.push(InvariantViolation::new(format!(
                "Headcount for {faction} is {recorded} but {expected} are alive"
            )));
        }
    }

    // Units only leave the living list by dying
    for unit in battle.units() {
        if unit.is_alive() && !battle.living_ids().contains(&unit.id) {
            violations.push(InvariantViolation::new(format!(
                "Unit {:?} has {} hit points but is not in the living list",
                unit.id, unit.hit_points
            )));
        }
    }

    violations
}

/// Assert all battle invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(battle: &Battle) {
    let violations = check_invariants(battle);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Battle invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_battle: &Battle) {}
