//! Combat layer.
//!
//! Implements the cavern battle rules:
//! - Grid of walls, open floor and occupied squares
//! - Units with hit points and attack power, one of two factions
//! - Breadth-first movement toward the nearest reachable enemy
//! - Rounds of turns in reading order until one side is gone

mod engine;
mod grid;
mod invariants;
mod outcome;
mod parse;
mod pathfind;
mod unit;

pub use engine::{Battle, BattleConfig, BattleStats, Casualty, DEFAULT_MAX_ROUNDS, RoundReport};
pub use grid::{Cell, Coord, Direction, Grid, Occupant};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use outcome::{Ending, Outcome, format_outcome};
pub use parse::{Battlefield, Spawn, parse_battlefield};
pub use pathfind::{PathFinder, Step};
pub use unit::{BASE_ATTACK_POWER, Faction, STARTING_HIT_POINTS, Unit, UnitId};
