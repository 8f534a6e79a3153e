//! Attack-power calibration against reference battlefields.
//!
//! Run with: cargo test --release calibration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use cavern::battle::{BattleConfig, Ending, Faction, parse_battlefield};
use cavern::calibrate::{CalibrationConfig, Verdict, calibrate};

fn assert_calibration(map: &str, attack_power: i32, score: u64) {
    let battlefield = parse_battlefield(map).unwrap();
    let result = calibrate(
        &battlefield,
        BattleConfig::default(),
        CalibrationConfig::default(),
    )
    .unwrap();

    assert_eq!(result.attack_power, attack_power, "attack power for\n{map}");
    assert_eq!(result.outcome.score(), score, "score for\n{map}");
    assert_eq!(result.outcome.ending, Ending::Victory(Faction::Elf));
    assert_eq!(result.outcome.elf_losses, 0);

    // Every weaker candidate lost an elf.
    for attempt in &result.attempts[..result.attempts.len() - 1] {
        assert!(attempt.attack_power < attack_power);
        assert!(matches!(attempt.verdict, Verdict::Rejected { .. }));
    }
}

#[test]
fn test_calibration_4988() {
    assert_calibration(
        "\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######",
        15,
        4988,
    );
}

#[test]
fn test_calibration_31284() {
    assert_calibration(
        "\
#######
#E..EG#
#.#G.E#
#E.##E#
#G..#.#
#..E#.#
#######",
        4,
        31284,
    );
}

#[test]
fn test_calibration_3478() {
    assert_calibration(
        "\
#######
#E.G#.#
#.#G..#
#G.#.G#
#G..#.#
#...E.#
#######",
        15,
        3478,
    );
}

#[test]
fn test_calibration_6474() {
    assert_calibration(
        "\
#######
#.E...#
#.#..G#
#.###.#
#E#G#G#
#...#G#
#######",
        12,
        6474,
    );
}

#[test]
fn test_calibration_1140() {
    assert_calibration(
        "\
#########
#G......#
#.E.#...#
#..##..G#
#...##..#
#...#...#
#.G...G.#
#.....G.#
#########",
        34,
        1140,
    );
}

#[test]
fn test_calibration_is_deterministic_across_batch_sizes() {
    let battlefield = parse_battlefield(
        "\
#########
#G......#
#.E.#...#
#..##..G#
#...##..#
#...#...#
#.G...G.#
#.....G.#
#########",
    )
    .unwrap();

    let sequential = calibrate(
        &battlefield,
        BattleConfig::default(),
        CalibrationConfig::default(),
    )
    .unwrap();

    for batch_size in [2, 7, 64] {
        let batched = calibrate(
            &battlefield,
            BattleConfig::default(),
            CalibrationConfig {
                batch_size,
                ..CalibrationConfig::default()
            },
        )
        .unwrap();
        assert_eq!(batched, sequential, "batch size {batch_size}");
    }
}

#[test]
fn test_rejection_round_matches_first_elf_death() {
    let map = "\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######";
    let battlefield = parse_battlefield(map).unwrap();
    let result = calibrate(
        &battlefield,
        BattleConfig::default(),
        CalibrationConfig {
            floor: 4,
            ceiling: 4,
            ..CalibrationConfig::default()
        },
    );
    assert!(result.is_err());

    let mut battle = battlefield.battle(BattleConfig::default().with_attack_power(Faction::Elf, 4));
    battle.run().unwrap();
    let first_death = battle
        .casualties()
        .iter()
        .find(|c| c.faction == Faction::Elf)
        .unwrap()
        .round;

    let result = calibrate(
        &battlefield,
        BattleConfig::default(),
        CalibrationConfig {
            floor: 4,
            ceiling: 15,
            ..CalibrationConfig::default()
        },
    )
    .unwrap();
    assert_eq!(
        result.attempts[0].verdict,
        Verdict::Rejected { round: first_death }
    );
}
