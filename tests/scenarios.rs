//! Full-battle scenario tests.
//!
//! Reference battlefields with known outcomes, plus end-to-end checks of
//! movement order, round counting and determinism.
//!
//! Run with: cargo test --release scenarios

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use cavern::battle::{
    Battle, BattleConfig, Coord, Direction, Ending, Faction, PathFinder, UnitId, check_invariants,
    format_outcome, parse_battlefield,
};

fn run(map: &str) -> (Battle, cavern::Outcome) {
    let mut battle = parse_battlefield(map)
        .unwrap()
        .battle(BattleConfig::default());
    let outcome = battle.run().unwrap();
    (battle, outcome)
}

fn assert_outcome(map: &str, rounds: u32, hit_points: u64, winner: Faction) {
    let (battle, outcome) = run(map);
    assert_eq!(outcome.rounds, rounds, "rounds for\n{map}");
    assert_eq!(outcome.hit_points, hit_points, "hit points for\n{map}");
    assert_eq!(outcome.ending, Ending::Victory(winner), "winner for\n{map}");
    assert!(check_invariants(&battle).is_empty());
}

#[test]
fn test_reference_battle_27730() {
    let map = "\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######";
    assert_outcome(map, 47, 590, Faction::Goblin);
}

#[test]
fn test_reference_battle_36334() {
    let map = "\
#######
#G..#E#
#E#E.E#
#G.##.#
#...#E#
#...E.#
#######";
    assert_outcome(map, 37, 982, Faction::Elf);
}

#[test]
fn test_reference_battle_39514() {
    let map = "\
#######
#E..EG#
#.#G.E#
#E.##E#
#G..#.#
#..E#.#
#######";
    assert_outcome(map, 46, 859, Faction::Elf);
}

#[test]
fn test_reference_battle_27755() {
    let map = "\
#######
#E.G#.#
#.#G..#
#G.#.G#
#G..#.#
#...E.#
#######";
    assert_outcome(map, 35, 793, Faction::Goblin);
}

#[test]
fn test_reference_battle_28944() {
    let map = "\
#######
#.E...#
#.#..G#
#.###.#
#E#G#G#
#...#G#
#######";
    assert_outcome(map, 54, 536, Faction::Goblin);
}

#[test]
fn test_reference_battle_18740() {
    let map = "\
#########
#G......#
#.E.#...#
#..##..G#
#...##..#
#...#...#
#.G...G.#
#.....G.#
#########";
    assert_outcome(map, 20, 937, Faction::Goblin);
}

#[test]
fn test_reference_battle_text_output() {
    let (_, outcome) = run("\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######");
    assert_eq!(
        format_outcome(&outcome),
        "Combat ends after 47 full rounds\n\
         Goblins win with 590 total hit points left\n\
         Outcome: 47 * 590 = 27730"
    );
}

#[test]
fn test_elf_paths_around_wall() {
    let map = "\
#######
#.E#G.#
#..#..#
#..#..#
#.....#
#...G.#
#######";
    let battlefield = parse_battlefield(map).unwrap();
    let battle = battlefield.battle(BattleConfig::default());

    // Squares beside the lower goblin are five steps away; the ones beside
    // the upper goblin need seven. (4, 4) comes before (3, 5) in reading order.
    let step = PathFinder::new()
        .next_step(battle.grid(), Coord::new(2, 1), Faction::Elf)
        .unwrap();
    assert_eq!(step.target, Coord::new(4, 4));
    assert_eq!(step.distance, 5);
    assert_eq!(step.direction, Direction::South);

    // The elf is first in reading order, so it takes that step in round one.
    let mut battle = battle;
    battle.run_round().unwrap();
    assert_eq!(battle.unit(UnitId::new(0)).unwrap().position, Coord::new(2, 2));
}

#[test]
fn test_movement_sample_positions() {
    let map = "\
#########
#G..G..G#
#.......#
#.......#
#G..E..G#
#.......#
#.......#
#G..G..G#
#########";
    let mut battle = parse_battlefield(map)
        .unwrap()
        .battle(BattleConfig::default());
    for _ in 0..3 {
        battle.run_round().unwrap();
    }
    assert_eq!(
        battle.to_string(),
        "\
#########
#.......#
#..GGG..#
#..GEG..#
#G..G...#
#......G#
#.......#
#.......#
#########"
    );
}

#[test]
fn test_adjacent_duel_either_order() {
    // The unit first in reading order strikes first and wins with 2 hit points.
    let (_, outcome) = run("EG");
    assert_eq!(outcome.ending, Ending::Victory(Faction::Elf));
    assert_eq!((outcome.rounds, outcome.hit_points), (67, 2));

    let (_, outcome) = run("GE");
    assert_eq!(outcome.ending, Ending::Victory(Faction::Goblin));
    assert_eq!((outcome.rounds, outcome.hit_points), (67, 2));

    let (battle, _) = run("E\nG");
    assert_eq!(battle.stats().path_queries, 0);
}

#[test]
fn test_determinism() {
    let map = "\
#########
#G......#
#.E.#...#
#..##..G#
#...##..#
#...#...#
#.G...G.#
#.....G.#
#########";
    let (first, first_outcome) = run(map);
    let (second, second_outcome) = run(map);

    assert_eq!(first_outcome, second_outcome);
    assert_eq!(first.casualties(), second.casualties());
    assert_eq!(first.grid(), second.grid());
    assert_eq!(first.stats(), second.stats());
}

#[test]
fn test_sealed_armies_stalemate() {
    let map = "\
#######
#E.#.G#
#..#..#
#######";
    let (battle, outcome) = run(map);
    assert_eq!(outcome.ending, Ending::Stalemate);
    assert_eq!(outcome.rounds, 0);
    assert_eq!(outcome.hit_points, 400);
    assert_eq!(battle.headcount(Faction::Elf), 1);
    assert_eq!(battle.headcount(Faction::Goblin), 1);
}

#[test]
fn test_casualty_rounds_are_one_based_and_ordered() {
    let (battle, outcome) = run("\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######");
    let rounds: Vec<_> = battle.casualties().iter().map(|c| c.round).collect();
    assert!(rounds.iter().all(|&r| r >= 1 && r <= outcome.rounds + 1));
    assert!(rounds.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(outcome.elf_losses, 2);
    assert_eq!(outcome.goblin_losses, 0);
}
