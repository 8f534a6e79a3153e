#![no_main]

use arbitrary::Arbitrary;
use cavern::battle::{BattleConfig, Cell, Coord, Faction, Grid, check_invariants};
use cavern::battle::{Battlefield, Spawn};
use libfuzzer_sys::fuzz_target;

/// Structured input for battle fuzzing.
#[derive(Arbitrary, Debug)]
struct BattleInput {
    /// Grid width (capped).
    width: u8,
    /// Grid height (capped).
    height: u8,
    /// Wall bitmap, consumed row-major.
    walls: Vec<bool>,
    /// Unit placements as (x, y, is_elf).
    units: Vec<(u8, u8, bool)>,
    /// Elf attack power.
    elf_attack: u8,
    /// Goblin attack power.
    goblin_attack: u8,
    /// Starting hit points.
    hit_points: u8,
}

fuzz_target!(|input: BattleInput| {
    // Cap inputs to keep each run short
    let width = u16::from(input.width % 16) + 1;
    let height = u16::from(input.height % 16) + 1;

    let Some(mut grid) = Grid::new(width, height) else {
        return;
    };
    for (index, &wall) in input.walls.iter().take(grid.len()).enumerate() {
        if wall {
            let coord = grid.coord_of(index);
            let _ = grid.set(coord, Cell::Wall);
        }
    }

    let mut spawns = Vec::new();
    for &(x, y, is_elf) in input.units.iter().take(32) {
        let position = Coord::new(u16::from(x) % width, u16::from(y) % height);
        if spawns.iter().any(|s: &Spawn| s.position == position) {
            continue;
        }
        if !grid.get(position).is_ok_and(Cell::is_open) {
            continue;
        }
        let faction = if is_elf { Faction::Elf } else { Faction::Goblin };
        spawns.push(Spawn { faction, position });
    }

    let battlefield = Battlefield::new(grid, spawns).expect("spawns were filtered onto open floor");
    let config = BattleConfig {
        hit_points: i32::from(input.hit_points.max(1)),
        elf_attack: i32::from(input.elf_attack.max(1)),
        goblin_attack: i32::from(input.goblin_attack.max(1)),
        max_rounds: 2_000,
    };

    let mut battle = battlefield.battle(config);
    while !battle.is_over() {
        if battle.run_round().is_err() {
            break;
        }
        let violations = check_invariants(&battle);
        assert!(violations.is_empty(), "{violations:?}");
    }
});
