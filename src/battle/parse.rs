//! Battlefield parsing and rendering.
//!
//! A map is rows of `#` (wall), `.` (open floor), `E` (elf) and `G`
//! (goblin). Every row must have the same width. Trailing blank lines and
//! carriage returns are ignored.

use std::fmt;
use std::str::FromStr;

use crate::battle::{
    Battle, BattleConfig, Cell, Coord, Faction, Grid, InvariantViolation, Occupant, UnitId,
};
use crate::error::{BattleResult, ParseError};

/// Starting position of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    /// Side of the unit.
    pub faction: Faction,
    /// Square it starts on.
    pub position: Coord,
}

/// An initial layout: the grid plus every unit's starting square.
///
/// The grid already holds an occupant for each spawn, with ids equal to the
/// spawn's index, so starting a battle never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battlefield {
    grid: Grid,
    spawns: Vec<Spawn>,
}

impl Battlefield {
    /// Build a battlefield from bare terrain and a spawn list.
    ///
    /// Spawns are sorted into reading order before ids are assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if a spawn lies off the grid or on a square that is
    /// not open floor, including another spawn's square.
    pub fn new(mut grid: Grid, mut spawns: Vec<Spawn>) -> BattleResult<Self> {
        spawns.sort_by_key(|spawn| spawn.position);

        for (index, spawn) in spawns.iter().enumerate() {
            let cell = grid.get(spawn.position)?;
            if !cell.is_open() {
                return Err(InvariantViolation::new(format!(
                    "spawn {index} at {:?} lands on {cell:?}",
                    spawn.position
                ))
                .into());
            }
            grid.set(
                spawn.position,
                Cell::Occupied(Occupant {
                    unit: UnitId::new(index),
                    faction: spawn.faction,
                }),
            )?;
        }

        Ok(Self { grid, spawns })
    }

    /// The starting grid, units included.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Starting positions in reading order; index equals unit id.
    #[must_use]
    pub fn spawns(&self) -> &[Spawn] {
        &self.spawns
    }

    /// Grid width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.grid.width()
    }

    /// Grid height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.grid.height()
    }

    /// Number of units of `faction` at the start.
    #[must_use]
    pub fn headcount(&self, faction: Faction) -> usize {
        self.spawns
            .iter()
            .filter(|spawn| spawn.faction == faction)
            .count()
    }

    /// Start a fresh battle on this layout.
    #[must_use]
    pub fn battle(&self, config: BattleConfig) -> Battle {
        Battle::new(self, config)
    }
}

impl FromStr for Battlefield {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_battlefield(s)
    }
}

impl fmt::Display for Battlefield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_grid(&self.grid, f)
    }
}

impl fmt::Display for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_grid(self.grid(), f)
    }
}

fn render_grid(grid: &Grid, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let width = usize::from(grid.width());
    for (row, cells) in grid.cells().chunks(width).enumerate() {
        if row > 0 {
            writeln!(f)?;
        }
        for cell in cells {
            let marker = match cell {
                Cell::Wall => '#',
                Cell::Open => '.',
                Cell::Occupied(occupant) => occupant.faction.marker(),
            };
            write!(f, "{marker}")?;
        }
    }
    Ok(())
}

/// Parse a textual map.
///
/// # Errors
///
/// Returns a [`ParseError`] for an empty map, rows of unequal width, an
/// unknown character, or a map with a side longer than `u16::MAX`.
pub fn parse_battlefield(input: &str) -> Result<Battlefield, ParseError> {
    let mut rows: Vec<&str> = input
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while rows.last().is_some_and(|row| row.trim().is_empty()) {
        rows.pop();
    }

    let Some(first) = rows.first() else {
        return Err(ParseError::Empty);
    };
    let expected = first.chars().count();
    if expected == 0 {
        return Err(ParseError::Empty);
    }

    let max = usize::from(u16::MAX);
    if expected > max || rows.len() > max {
        return Err(ParseError::TooLarge { max });
    }
    #[allow(clippy::cast_possible_truncation)]
    let (width, height) = (expected as u16, rows.len() as u16);
    let mut cells = Vec::with_capacity(expected * rows.len());
    let mut spawns = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != expected {
            return Err(ParseError::RaggedRow {
                line: y + 1,
                expected,
                found,
            });
        }

        for (x, ch) in row.chars().enumerate() {
            let cell = match ch {
                '#' => Cell::Wall,
                '.' => Cell::Open,
                _ => {
                    let faction = Faction::from_marker(ch).ok_or(ParseError::InvalidCharacter {
                        line: y + 1,
                        column: x + 1,
                        found: ch,
                    })?;
                    // Row-major scan visits squares in reading order, so
                    // spawn index doubles as unit id.
                    let unit = UnitId::new(spawns.len());
                    #[allow(clippy::cast_possible_truncation)]
                    let position = Coord::new(x as u16, y as u16);
                    spawns.push(Spawn { faction, position });
                    Cell::Occupied(Occupant { unit, faction })
                }
            };
            cells.push(cell);
        }
    }

    let grid = Grid::from_cells(width, height, cells).ok_or(ParseError::Empty)?;
    Ok(Battlefield { grid, spawns })
}
