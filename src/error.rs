//! Error types for the combat simulator.

use thiserror::Error;

use crate::battle::{Coord, Faction, InvariantViolation, UnitId};

/// Fatal conditions raised while a battle is running.
///
/// Any of these aborts the current battle; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// A grid access fell outside the configured dimensions.
    #[error("coordinate ({}, {}) is outside the grid", coord.x, coord.y)]
    OutOfBounds {
        /// The offending coordinate.
        coord: Coord,
    },
    /// The grid and the unit collection disagree.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    /// The battle ran past the configured round ceiling.
    #[error("battle exceeded the round limit of {limit}")]
    RoundLimitExceeded {
        /// The configured ceiling.
        limit: u32,
    },
    /// A battle parameter is out of range.
    #[error("{field} must be at least 1, got {value}")]
    InvalidConfig {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: i32,
    },
    /// A unit id does not refer to any unit of this battle.
    #[error("unknown unit {id:?}")]
    UnknownUnit {
        /// The unknown id.
        id: UnitId,
    },
}

/// Failures of the attack-power search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalibrationError {
    /// Every candidate up to the ceiling lost at least one unit.
    #[error("no attack power in {floor}..={ceiling} keeps every {faction} alive")]
    SearchExhausted {
        /// Faction being calibrated.
        faction: Faction,
        /// First candidate tried.
        floor: i32,
        /// Last candidate tried.
        ceiling: i32,
    },
    /// The configured floor is below the smallest usable attack power.
    #[error("calibration floor must be at least 1, got {floor}")]
    InvalidFloor {
        /// Configured floor.
        floor: i32,
    },
    /// The configured floor lies above the ceiling.
    #[error("calibration floor {floor} is above ceiling {ceiling}")]
    InvalidRange {
        /// Configured floor.
        floor: i32,
        /// Configured ceiling.
        ceiling: i32,
    },
    /// A candidate battle failed fatally.
    #[error("battle failed during calibration: {0}")]
    Battle(#[from] BattleError),
}

/// Malformed battlefield text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input contains no rows.
    #[error("battlefield is empty")]
    Empty,
    /// A row is wider or narrower than the first row.
    #[error("line {line} has width {found}, expected {expected}")]
    RaggedRow {
        /// One-based line number.
        line: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },
    /// A character that is not `#`, `.`, `E` or `G`.
    #[error("unexpected {found:?} at line {line}, column {column}")]
    InvalidCharacter {
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
        /// The character found.
        found: char,
    },
    /// The grid does not fit in 16-bit coordinates.
    #[error("battlefield exceeds {max}x{max} cells")]
    TooLarge {
        /// Largest supported side length.
        max: usize,
    },
}

/// Result alias for battle operations.
pub type BattleResult<T> = Result<T, BattleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_copy() {
        let err = ParseError::InvalidCharacter {
            line: 3,
            column: 7,
            found: 'x',
        };
        let copy = err;
        assert_eq!(err, copy);
        assert_eq!(err.to_string(), "unexpected 'x' at line 3, column 7");
    }

    #[test]
    fn test_invalid_config_message() {
        let err = BattleError::InvalidConfig {
            field: "hit_points",
            value: 0,
        };
        assert_eq!(err.to_string(), "hit_points must be at least 1, got 0");
    }
}
