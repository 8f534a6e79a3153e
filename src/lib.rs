// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Cavern: a deterministic elves-versus-goblins combat simulator.
//!
//! Two factions fight on a rectangular grid of walls and open floor. Every
//! round each living unit, in reading order, moves one square toward the
//! nearest reachable enemy and attacks the weakest adjacent one. A battle
//! ends when one side is gone or nobody can act any more.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Calibrator (attack-power search)  │
//! ├─────────────────────────────────────┤
//! │   Combat engine (rounds & turns)    │
//! ├─────────────────────────────────────┤
//! │   Pathfinder (breadth-first)        │
//! ├─────────────────────────────────────┤
//! │   Grid + unit arena                 │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use cavern::{BattleConfig, parse_battlefield};
//!
//! let battlefield = parse_battlefield("EG").unwrap();
//! let outcome = battlefield.battle(BattleConfig::default()).run().unwrap();
//! assert_eq!(outcome.rounds, 67);
//! ```

pub mod battle;
pub mod calibrate;
pub mod error;

pub use error::{BattleError, BattleResult, CalibrationError, ParseError};

// Re-export key battle types at crate root for convenience
pub use battle::{
    Battle, BattleConfig, Battlefield, Coord, Ending, Faction, Grid, Outcome, PathFinder,
    format_outcome, parse_battlefield,
};
pub use calibrate::{Attempt, Calibration, CalibrationConfig, Verdict, calibrate};
