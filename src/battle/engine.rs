//! Round and turn state machine.

use serde::{Deserialize, Serialize};

use crate::battle::invariants::assert_invariants;
use crate::battle::{
    BASE_ATTACK_POWER, Battlefield, Coord, Direction, Ending, Faction, Grid, Outcome, PathFinder,
    STARTING_HIT_POINTS, Unit, UnitId,
};
use crate::error::{BattleError, BattleResult};

/// Default ceiling on completed rounds before a battle is aborted.
pub const DEFAULT_MAX_ROUNDS: u32 = 100_000;

/// Per-battle parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Starting hit points of every unit.
    pub hit_points: i32,
    /// Attack power of every elf.
    pub elf_attack: i32,
    /// Attack power of every goblin.
    pub goblin_attack: i32,
    /// Round ceiling; exceeding it is fatal for the battle.
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            hit_points: STARTING_HIT_POINTS,
            elf_attack: BASE_ATTACK_POWER,
            goblin_attack: BASE_ATTACK_POWER,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl BattleConfig {
    /// Attack power configured for `faction`.
    #[must_use]
    pub const fn attack_power(&self, faction: Faction) -> i32 {
        match faction {
            Faction::Elf => self.elf_attack,
            Faction::Goblin => self.goblin_attack,
        }
    }

    /// Check that every unit starts alive and every attack does damage.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] naming the first parameter
    /// below 1.
    pub fn validate(&self) -> BattleResult<()> {
        for (field, value) in [
            ("hit_points", self.hit_points),
            ("elf_attack", self.elf_attack),
            ("goblin_attack", self.goblin_attack),
        ] {
            if value < 1 {
                return Err(BattleError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }

    /// Copy of this config with `faction`'s attack power replaced.
    #[must_use]
    pub fn with_attack_power(mut self, faction: Faction, power: i32) -> Self {
        match faction {
            Faction::Elf => self.elf_attack = power,
            Faction::Goblin => self.goblin_attack = power,
        }
        self
    }
}

/// A unit killed during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Casualty {
    /// The dead unit.
    pub unit: UnitId,
    /// Its faction.
    pub faction: Faction,
    /// Square it died on.
    pub position: Coord,
    /// One-based round it died in.
    pub round: u32,
}

/// What happened during one call to [`Battle::run_round`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// Whether every unit got its turn. `false` means combat ended mid-round.
    pub completed: bool,
    /// Number of single-square moves made.
    pub moves: u32,
    /// Number of attacks made.
    pub attacks: u32,
    /// Units killed this round, in order of death.
    pub casualties: Vec<Casualty>,
}

impl RoundReport {
    /// Whether any unit of `faction` died this round.
    #[must_use]
    pub fn lost(&self, faction: Faction) -> bool {
        self.casualties.iter().any(|c| c.faction == faction)
    }
}

/// Running counters over a whole battle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BattleStats {
    /// Times a unit consulted the pathfinder.
    pub path_queries: u64,
    /// Single-square moves made.
    pub moves: u64,
    /// Attacks made.
    pub attacks: u64,
}

/// Lifecycle of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Rounds are still being played.
    InProgress,
    /// No further round will change anything.
    Over(Ending),
}

/// A single running battle.
///
/// Owns the grid and the unit arena. Dead units stay in the arena so their
/// ids remain meaningful, but leave the grid and the living list for good.
#[derive(Debug, Clone)]
pub struct Battle {
    /// The battle grid.
    pub(super) grid: Grid,
    /// Every unit, indexed by [`UnitId`].
    pub(super) units: Vec<Unit>,
    /// Ids of the living units.
    living: Vec<UnitId>,
    /// Living units per faction.
    pub(super) headcount: [u32; 2],
    /// Every casualty so far.
    casualties: Vec<Casualty>,
    /// Fully completed rounds.
    rounds: u32,
    phase: Phase,
    config: BattleConfig,
    stats: BattleStats,
    pathfinder: PathFinder,
}

impl Battle {
    /// Start a battle from a parsed battlefield.
    #[must_use]
    pub fn new(battlefield: &Battlefield, config: BattleConfig) -> Self {
        let mut units = Vec::with_capacity(battlefield.spawns().len());
        let mut headcount = [0u32; 2];

        for (index, spawn) in battlefield.spawns().iter().enumerate() {
            units.push(Unit::new(
                UnitId::new(index),
                spawn.faction,
                spawn.position,
                config.hit_points,
                config.attack_power(spawn.faction),
            ));
            headcount[spawn.faction.slot()] += 1;
        }

        let living = units.iter().map(|unit| unit.id).collect();

        Self {
            grid: battlefield.grid().clone(),
            units,
            living,
            headcount,
            casualties: Vec::new(),
            rounds: 0,
            phase: Phase::InProgress,
            config,
            stats: BattleStats::default(),
            pathfinder: PathFinder::new(),
        }
    }

    /// The battle grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Every unit ever spawned, living or dead.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index())
    }

    /// Living units in no particular order.
    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.living.iter().filter_map(|&id| self.unit(id))
    }

    /// Ids of the living units.
    #[must_use]
    pub fn living_ids(&self) -> &[UnitId] {
        &self.living
    }

    /// Number of living units of `faction`.
    #[must_use]
    pub const fn headcount(&self, faction: Faction) -> u32 {
        self.headcount[faction.slot()]
    }

    /// Every casualty so far, in order of death.
    #[must_use]
    pub fn casualties(&self) -> &[Casualty] {
        &self.casualties
    }

    /// Number of fully completed rounds.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// The configuration this battle was started with.
    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Running counters.
    #[must_use]
    pub const fn stats(&self) -> &BattleStats {
        &self.stats
    }

    /// Whether combat has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Over(_))
    }

    /// Sum of hit points of every living unit.
    #[must_use]
    pub fn total_hit_points(&self) -> u64 {
        self.living_units()
            .map(|unit| u64::from(unit.hit_points.unsigned_abs()))
            .sum()
    }

    /// Final result, once combat is over.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        let Phase::Over(ending) = self.phase else {
            return None;
        };
        Some(Outcome {
            rounds: self.rounds,
            hit_points: self.total_hit_points(),
            ending,
            elf_losses: self.losses(Faction::Elf),
            goblin_losses: self.losses(Faction::Goblin),
        })
    }

    fn losses(&self, faction: Faction) -> u32 {
        let dead = self
            .casualties
            .iter()
            .filter(|casualty| casualty.faction == faction)
            .count();
        u32::try_from(dead).unwrap_or(u32::MAX)
    }

    /// Play rounds until combat ends.
    ///
    /// # Errors
    ///
    /// Returns an error on a grid/unit desync or when the round ceiling is
    /// exceeded.
    pub fn run(&mut self) -> BattleResult<Outcome> {
        loop {
            if let Some(outcome) = self.outcome() {
                return Ok(outcome);
            }
            self.run_round()?;
        }
    }

    /// Play one round: every living unit, in reading order of its position
    /// at the start of the round, takes a turn.
    ///
    /// The round is abandoned, uncounted, as soon as a unit finds no enemy
    /// left. A completed round in which nobody moved or attacked is a
    /// stalemate and is not counted either. Calling this after combat ended
    /// returns an empty, incomplete report.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] before any turn is taken if the
    /// configuration is out of range, and an error on a grid/unit desync or
    /// when the round ceiling is exceeded.
    pub fn run_round(&mut self) -> BattleResult<RoundReport> {
        let mut report = RoundReport::default();
        if self.is_over() {
            return Ok(report);
        }
        self.config.validate()?;
        if self.rounds >= self.config.max_rounds {
            return Err(BattleError::RoundLimitExceeded {
                limit: self.config.max_rounds,
            });
        }

        let mut order = self.living.clone();
        order.sort_by_key(|&id| self.units[id.index()].position);

        for id in order {
            let unit = *self.unit(id).ok_or(BattleError::UnknownUnit { id })?;
            if !unit.is_alive() {
                continue;
            }

            if self.headcount(unit.faction.enemy()) == 0 {
                tracing::debug!(
                    rounds = self.rounds,
                    winner = %unit.faction,
                    "no enemies left, combat over"
                );
                self.phase = Phase::Over(Ending::Victory(unit.faction));
                self.finish_round(&report);
                return Ok(report);
            }

            self.take_turn(id, &mut report)?;
        }

        report.completed = true;
        if report.moves == 0 && report.attacks == 0 {
            tracing::debug!(rounds = self.rounds, "idle round, stalemate");
            self.phase = Phase::Over(Ending::Stalemate);
        } else {
            self.rounds += 1;
            tracing::debug!(
                round = self.rounds,
                moves = report.moves,
                attacks = report.attacks,
                "round complete"
            );
        }
        self.finish_round(&report);
        Ok(report)
    }

    fn finish_round(&mut self, report: &RoundReport) {
        self.stats.moves += u64::from(report.moves);
        self.stats.attacks += u64::from(report.attacks);
        assert_invariants(self);
    }

    /// One unit's turn: move if not already engaged, then attack if able.
    fn take_turn(&mut self, id: UnitId, report: &mut RoundReport) -> BattleResult<()> {
        let unit = *self.unit(id).ok_or(BattleError::UnknownUnit { id })?;
        let enemy = unit.faction.enemy();

        if !self.grid.borders(unit.position, enemy) {
            self.stats.path_queries += 1;
            let Some(step) = self
                .pathfinder
                .next_step(&self.grid, unit.position, unit.faction)
            else {
                return Ok(());
            };
            self.move_unit(id, step.direction)?;
            report.moves += 1;
        }

        self.attack(id, report)
    }

    fn move_unit(&mut self, id: UnitId, direction: Direction) -> BattleResult<()> {
        let unit = self
            .units
            .get_mut(id.index())
            .ok_or(BattleError::UnknownUnit { id })?;
        let from = unit.position;
        self.grid.move_unit(unit, direction)?;
        tracing::trace!(unit = ?id, ?from, to = ?unit.position, "moved");
        Ok(())
    }

    /// Hit the weakest adjacent enemy, ties broken in reading order.
    fn attack(&mut self, id: UnitId, report: &mut RoundReport) -> BattleResult<()> {
        let attacker = *self.unit(id).ok_or(BattleError::UnknownUnit { id })?;
        let enemy = attacker.faction.enemy();

        let target = self
            .grid
            .neighbours(attacker.position)
            .filter_map(|(_, square)| self.grid.get(square).ok()?.occupant())
            .filter(|occupant| occupant.faction == enemy)
            .filter_map(|occupant| self.unit(occupant.unit))
            .min_by_key(|unit| (unit.hit_points, unit.position))
            .map(|unit| unit.id);

        let Some(target) = target else {
            return Ok(());
        };

        report.attacks += 1;
        let died = self
            .units
            .get_mut(target.index())
            .ok_or(BattleError::UnknownUnit { id: target })?
            .take_hit(attacker.attack_power);

        if died {
            self.kill(target, report)?;
        }
        Ok(())
    }

    fn kill(&mut self, id: UnitId, report: &mut RoundReport) -> BattleResult<()> {
        let unit = *self.unit(id).ok_or(BattleError::UnknownUnit { id })?;
        self.grid.remove_unit(&unit)?;
        self.living.retain(|&living| living != id);
        self.headcount[unit.faction.slot()] -= 1;

        let casualty = Casualty {
            unit: id,
            faction: unit.faction,
            position: unit.position,
            round: self.rounds + 1,
        };
        tracing::debug!(
            round = casualty.round,
            unit = ?id,
            faction = %unit.faction,
            position = ?unit.position,
            "unit died"
        );
        self.casualties.push(casualty);
        report.casualties.push(casualty);
        Ok(())
    }
}
