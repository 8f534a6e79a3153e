//! Grid, cell and coordinate types.

use std::cmp::Ordering;

use crate::battle::{Faction, InvariantViolation, Unit, UnitId};
use crate::error::{BattleError, BattleResult};

/// A square on the grid.
///
/// Coordinates compare in reading order: top-to-bottom, then left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// The neighbouring coordinate one step in `direction`, if it does not
    /// underflow. Upper bounds are the grid's business.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::North => self.y.checked_sub(1).map(|y| Self::new(self.x, y)),
            Direction::West => self.x.checked_sub(1).map(|x| Self::new(x, self.y)),
            Direction::East => self.x.checked_add(1).map(|x| Self::new(x, self.y)),
            Direction::South => self.y.checked_add(1).map(|y| Self::new(self.x, y)),
        }
    }

    /// Direction of a single orthogonal step from `self` to `other`.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| self.step(direction) == Some(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cardinal step directions.
///
/// Declaration order is the tie-break precedence for first steps, which is
/// also the reading order of a square's neighbours.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Direction {
    /// Toward decreasing `y`.
    North,
    /// Toward decreasing `x`.
    West,
    /// Toward increasing `x`.
    East,
    /// Toward increasing `y`.
    South,
}

impl Direction {
    /// All directions in precedence order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::East,
        Direction::South,
    ];

    /// The opposite direction.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
        }
    }

    /// Bit used for this direction in direction sets.
    #[must_use]
    pub(crate) const fn bit(self) -> u8 {
        match self {
            Direction::North => 0b0001,
            Direction::West => 0b0010,
            Direction::East => 0b0100,
            Direction::South => 0b1000,
        }
    }
}

/// Unit reference stored in an occupied cell.
///
/// The faction is cached beside the id; a unit never changes side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    /// The occupying unit.
    pub unit: UnitId,
    /// Side of the occupying unit.
    pub faction: Faction,
}

/// Contents of a single grid square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Impassable rock.
    Wall,
    /// Free cavern floor.
    Open,
    /// Floor currently held by a living unit.
    Occupied(Occupant),
}

impl Cell {
    /// Whether a unit may step onto this cell.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Cell::Open)
    }

    /// The occupant, if any.
    #[must_use]
    pub const fn occupant(self) -> Option<Occupant> {
        match self {
            Cell::Occupied(occupant) => Some(occupant),
            Cell::Wall | Cell::Open => None,
        }
    }
}

/// The battle grid.
///
/// Cells are stored in row-major order, so iterating the slice walks the grid
/// in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Width in cells.
    width: u16,
    /// Height in cells.
    height: u16,
    /// Cells in row-major order.
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of open floor.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let size = usize::from(width) * usize::from(height);
        Some(Self {
            width,
            height,
            cells: vec![Cell::Open; size],
        })
    }

    /// Create a grid from row-major cells.
    ///
    /// Returns `None` if either dimension is zero or `cells` does not hold
    /// exactly `width * height` entries.
    #[must_use]
    pub fn from_cells(width: u16, height: u16, cells: Vec<Cell>) -> Option<Self> {
        let size = usize::from(width) * usize::from(height);
        if size == 0 || cells.len() != size {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Width of the grid.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the grid.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check if a coordinate is within the grid.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Row-major index of an in-bounds coordinate.
    #[must_use]
    #[inline]
    pub fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Coordinate of a row-major index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn coord_of(&self, index: usize) -> Coord {
        let width = usize::from(self.width);
        Coord::new((index % width) as u16, (index / width) as u16)
    }

    /// Read a cell.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::OutOfBounds`] outside the grid.
    pub fn get(&self, coord: Coord) -> BattleResult<Cell> {
        self.index(coord)
            .map(|idx| self.cells[idx])
            .ok_or(BattleError::OutOfBounds { coord })
    }

    /// Overwrite a cell. No validation beyond bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::OutOfBounds`] outside the grid.
    pub fn set(&mut self, coord: Coord, cell: Cell) -> BattleResult<()> {
        let idx = self.index(coord).ok_or(BattleError::OutOfBounds { coord })?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// In-bounds neighbour of `coord` in `direction`.
    #[must_use]
    #[inline]
    pub fn neighbour(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        coord.step(direction).filter(|&next| self.in_bounds(next))
    }

    /// In-bounds orthogonal neighbours in reading order.
    ///
    /// Squares beyond the edge do not exist: they are neither walls nor
    /// enemies.
    pub fn neighbours(&self, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            self.neighbour(coord, direction)
                .map(|next| (direction, next))
        })
    }

    /// Whether any orthogonal neighbour holds a unit of `enemy`.
    #[must_use]
    pub fn borders(&self, coord: Coord, enemy: Faction) -> bool {
        self.neighbours(coord).any(|(_, next)| {
            self.get(next)
                .ok()
                .and_then(Cell::occupant)
                .is_some_and(|occupant| occupant.faction == enemy)
        })
    }

    /// Mark the unit's square as occupied by it.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::OutOfBounds`] outside the grid, or an invariant
    /// violation if the square is not open floor.
    pub fn place_unit(&mut self, unit: &Unit) -> BattleResult<()> {
        let cell = self.get(unit.position)?;
        if !cell.is_open() {
            return Err(InvariantViolation::new(format!(
                "cannot place unit {:?} on {:?} at {:?}",
                unit.id, cell, unit.position
            ))
            .into());
        }
        self.set(
            unit.position,
            Cell::Occupied(Occupant {
                unit: unit.id,
                faction: unit.faction,
            }),
        )
    }

    /// Clear the unit's square.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation unless the square holds exactly this
    /// unit.
    pub fn remove_unit(&mut self, unit: &Unit) -> BattleResult<()> {
        let cell = self.get(unit.position)?;
        match cell.occupant() {
            Some(occupant) if occupant.unit == unit.id => self.set(unit.position, Cell::Open),
            _ => Err(InvariantViolation::new(format!(
                "unit {:?} expected at {:?} but cell holds {:?}",
                unit.id, unit.position, cell
            ))
            .into()),
        }
    }

    /// Move a unit one square, updating its position and both cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit is not where it claims to be, or the
    /// destination is off the grid or not open floor. The grid is left
    /// unchanged on error.
    pub fn move_unit(&mut self, unit: &mut Unit, direction: Direction) -> BattleResult<()> {
        let from = unit.position;
        let Some(to) = self.neighbour(from, direction) else {
            return Err(InvariantViolation::new(format!(
                "unit {:?} cannot step {direction:?} off the grid from {from:?}",
                unit.id
            ))
            .into());
        };
        let destination = self.get(to)?;
        if !destination.is_open() {
            return Err(InvariantViolation::new(format!(
                "unit {:?} cannot step {direction:?} from {from:?} into {destination:?}",
                unit.id
            ))
            .into());
        }

        self.remove_unit(unit)?;
        unit.position = to;
        self.place_unit(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_at(id: usize, faction: Faction, x: u16, y: u16) -> Unit {
        Unit::new(UnitId(id), faction, Coord::new(x, y), 200, 3)
    }

    #[test]
    fn test_reading_order() {
        let mut coords = vec![
            Coord::new(3, 1),
            Coord::new(0, 2),
            Coord::new(5, 0),
            Coord::new(1, 1),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                Coord::new(5, 0),
                Coord::new(1, 1),
                Coord::new(3, 1),
                Coord::new(0, 2),
            ]
        );
    }

    #[test]
    fn test_direction_precedence_is_reading_order() {
        let centre = Coord::new(5, 5);
        let steps: Vec<_> = Direction::ALL
            .iter()
            .filter_map(|&d| centre.step(d))
            .collect();
        let mut sorted = steps.clone();
        sorted.sort();
        assert_eq!(steps, sorted);
    }

    #[test]
    fn test_direction_to() {
        let origin = Coord::new(3, 3);
        assert_eq!(origin.direction_to(Coord::new(3, 2)), Some(Direction::North));
        assert_eq!(origin.direction_to(Coord::new(2, 3)), Some(Direction::West));
        assert_eq!(origin.direction_to(Coord::new(4, 3)), Some(Direction::East));
        assert_eq!(origin.direction_to(Coord::new(3, 4)), Some(Direction::South));
        assert_eq!(origin.direction_to(origin), None);
        assert_eq!(origin.direction_to(Coord::new(4, 4)), None);
    }

    #[test]
    fn test_grid_zero_size() {
        assert!(Grid::new(0, 4).is_none());
        assert!(Grid::new(4, 0).is_none());
    }

    #[test]
    fn test_from_cells_checks_size() {
        let grid = Grid::from_cells(2, 1, vec![Cell::Wall, Cell::Open]).unwrap();
        assert!(!grid.is_empty());
        assert_eq!(grid.len(), 2);
        assert!(Grid::from_cells(2, 2, vec![Cell::Open]).is_none());
        assert!(Grid::from_cells(0, 1, Vec::new()).is_none());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::new(3, 2).unwrap();
        assert_eq!(grid.get(Coord::new(2, 1)), Ok(Cell::Open));
        assert_eq!(
            grid.get(Coord::new(3, 0)),
            Err(BattleError::OutOfBounds {
                coord: Coord::new(3, 0)
            })
        );
    }

    #[test]
    fn test_neighbours_at_corner() {
        let grid = Grid::new(4, 4).unwrap();
        let around: Vec<_> = grid.neighbours(Coord::new(0, 0)).collect();
        assert_eq!(
            around,
            vec![
                (Direction::East, Coord::new(1, 0)),
                (Direction::South, Coord::new(0, 1)),
            ]
        );
    }

    #[test]
    fn test_place_and_remove_unit() {
        let mut grid = Grid::new(4, 4).unwrap();
        let unit = unit_at(0, Faction::Elf, 1, 1);

        grid.place_unit(&unit).unwrap();
        assert_eq!(
            grid.get(unit.position).unwrap().occupant().map(|o| o.unit),
            Some(UnitId(0))
        );

        grid.remove_unit(&unit).unwrap();
        assert_eq!(grid.get(unit.position), Ok(Cell::Open));
    }

    #[test]
    fn test_remove_wrong_unit_is_invariant_violation() {
        let mut grid = Grid::new(4, 4).unwrap();
        let resident = unit_at(0, Faction::Elf, 1, 1);
        let impostor = unit_at(1, Faction::Goblin, 1, 1);
        grid.place_unit(&resident).unwrap();

        let err = grid.remove_unit(&impostor).unwrap_err();
        assert!(matches!(err, BattleError::Invariant(_)));
        // Resident untouched
        assert!(grid.get(resident.position).unwrap().occupant().is_some());
    }

    #[test]
    fn test_move_unit_updates_both_sides() {
        let mut grid = Grid::new(4, 4).unwrap();
        let mut unit = unit_at(0, Faction::Goblin, 1, 1);
        grid.place_unit(&unit).unwrap();

        grid.move_unit(&mut unit, Direction::East).unwrap();

        assert_eq!(unit.position, Coord::new(2, 1));
        assert_eq!(grid.get(Coord::new(1, 1)), Ok(Cell::Open));
        assert!(grid.get(Coord::new(2, 1)).unwrap().occupant().is_some());
    }

    #[test]
    fn test_move_into_wall_rejected() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set(Coord::new(1, 0), Cell::Wall).unwrap();
        let mut unit = unit_at(0, Faction::Goblin, 1, 1);
        grid.place_unit(&unit).unwrap();

        assert!(grid.move_unit(&mut unit, Direction::North).is_err());
        assert_eq!(unit.position, Coord::new(1, 1));
    }

    #[test]
    fn test_borders_enemy() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.place_unit(&unit_at(0, Faction::Goblin, 2, 1)).unwrap();

        assert!(grid.borders(Coord::new(1, 1), Faction::Goblin));
        assert!(!grid.borders(Coord::new(1, 1), Faction::Elf));
        assert!(!grid.borders(Coord::new(0, 0), Faction::Goblin));
    }
}
