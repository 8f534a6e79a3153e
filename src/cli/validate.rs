//! Battlefield validation command implementation.

use super::{CliError, load_battlefield};
use cavern::battle::{Cell, Faction};
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the map file cannot be read or is malformed.
pub(crate) fn execute(map: &Path) -> Result<(), CliError> {
    println!("Validating: {}", map.display());
    println!();

    let battlefield = load_battlefield(map)?;
    print_check("Rectangular grid", true);

    let grid = battlefield.grid();
    let walls = grid.cells().iter().filter(|c| matches!(c, Cell::Wall)).count();
    let open = grid.len() - walls;

    let armies = Faction::ALL.map(|faction| battlefield.headcount(faction) > 0);
    print_check("Elves present", armies[0]);
    print_check("Goblins present", armies[1]);

    println!();
    println!("Summary:");
    println!("  Size:         {}x{}", battlefield.width(), battlefield.height());
    println!("  Walls:        {walls}");
    println!("  Floor:        {open} (including occupied squares)");
    println!("  Elves:        {}", battlefield.headcount(Faction::Elf));
    println!("  Goblins:      {}", battlefield.headcount(Faction::Goblin));

    println!();
    if armies.iter().all(|&present| present) {
        println!("Validation successful!");
    } else {
        println!("Validation successful (one side is missing; combat ends immediately).");
    }

    Ok(())
}

/// Print a check result.
fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "MISSING" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
