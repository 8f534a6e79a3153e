//! Movement selection.
//!
//! Breadth-first search from a unit's square toward the nearest open square
//! that borders an enemy. Every step costs one, so the first layer that
//! contains a target is the minimum distance. Ties are broken in reading
//! order twice: once to pick the target square, once to pick the first step.

use std::collections::VecDeque;

use crate::battle::{Coord, Direction, Faction, Grid};

/// Distance marker for squares the search has not reached.
const UNVISITED: u32 = u32::MAX;

/// The chosen move for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Direction of the single square to move this turn.
    pub direction: Direction,
    /// Target square the step leads toward.
    pub target: Coord,
    /// Path length from the unit to the target.
    pub distance: u32,
}

/// Reusable breadth-first search workspace.
///
/// Buffers are sized to the grid on first use and reused afterwards, so a
/// battle allocates once rather than once per turn.
#[derive(Debug, Clone, Default)]
pub struct PathFinder {
    /// Shortest distance from the start, per cell.
    distances: Vec<u32>,
    /// Direction bits pointing from each cell to every predecessor that
    /// reaches it at its shortest distance.
    came_from: Vec<u8>,
    /// Breadth-first frontier.
    queue: VecDeque<Coord>,
    /// Backward walk stack.
    stack: Vec<Coord>,
    /// Cells already pushed during the backward walk.
    walked: Vec<bool>,
}

impl PathFinder {
    /// Create an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the best single step for a unit of `faction` standing on `from`.
    ///
    /// Walls and every occupied square are impassable. Returns `None` when no
    /// square bordering an enemy can be reached, which is a normal "stand
    /// still" outcome.
    pub fn next_step(&mut self, grid: &Grid, from: Coord, faction: Faction) -> Option<Step> {
        let (target, distance) = self.search(grid, from, faction.enemy())?;
        let direction = self.first_step(grid, from, target)?;
        Some(Step {
            direction,
            target,
            distance,
        })
    }

    fn reset(&mut self, cells: usize) {
        self.distances.clear();
        self.distances.resize(cells, UNVISITED);
        self.came_from.clear();
        self.came_from.resize(cells, 0);
        self.walked.clear();
        self.walked.resize(cells, false);
        self.queue.clear();
        self.stack.clear();
    }

    /// Forward pass: distances, predecessor sets and the chosen target.
    fn search(&mut self, grid: &Grid, from: Coord, enemy: Faction) -> Option<(Coord, u32)> {
        let start = grid.index(from)?;
        self.reset(grid.len());
        self.distances[start] = 0;
        self.queue.push_back(from);

        let mut best: Option<(Coord, u32)> = None;

        while let Some(cell) = self.queue.pop_front() {
            let Some(idx) = grid.index(cell) else {
                continue;
            };
            let distance = self.distances[idx];

            // Every target at the minimum distance is discovered while the
            // previous layer is expanded.
            if best.is_some_and(|(_, limit)| distance >= limit) {
                break;
            }

            let next_distance = distance + 1;
            for (direction, next) in grid.neighbours(cell) {
                let Some(next_idx) = grid.index(next) else {
                    continue;
                };
                if !grid.cells()[next_idx].is_open() {
                    continue;
                }

                let back = direction.reverse().bit();
                if self.distances[next_idx] == UNVISITED {
                    self.distances[next_idx] = next_distance;
                    self.came_from[next_idx] = back;
                    self.queue.push_back(next);

                    if grid.borders(next, enemy) {
                        best = match best {
                            Some((chosen, limit)) if limit < next_distance || chosen < next => {
                                Some((chosen, limit))
                            }
                            _ => Some((next, next_distance)),
                        };
                    }
                } else if self.distances[next_idx] == next_distance {
                    self.came_from[next_idx] |= back;
                }
            }
        }

        best
    }

    /// Backward pass: every first step lying on some shortest path to
    /// `target`, reduced to the one earliest in precedence order.
    fn first_step(&mut self, grid: &Grid, from: Coord, target: Coord) -> Option<Direction> {
        let mut first_steps = 0u8;

        self.walked[grid.index(target)?] = true;
        self.stack.push(target);

        while let Some(cell) = self.stack.pop() {
            let Some(idx) = grid.index(cell) else {
                continue;
            };
            let predecessors = self.came_from[idx];

            for direction in Direction::ALL {
                if predecessors & direction.bit() == 0 {
                    continue;
                }
                let Some(previous) = grid.neighbour(cell, direction) else {
                    continue;
                };

                if previous == from {
                    if let Some(first) = from.direction_to(cell) {
                        first_steps |= first.bit();
                    }
                    continue;
                }

                let Some(previous_idx) = grid.index(previous) else {
                    continue;
                };
                if !self.walked[previous_idx] {
                    self.walked[previous_idx] = true;
                    self.stack.push(previous);
                }
            }
        }

        Direction::ALL
            .into_iter()
            .find(|direction| first_steps & direction.bit() != 0)
    }
}
