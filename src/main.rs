//! Headless demo driver for the Zonefall engine.
//!
//! Runs a seeded random walk for a number of turns and prints the resulting
//! zone and statistics, or replays from a save file. Useful for smoke
//! testing generation and the turn pipeline without a renderer.

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use zonefall::{GameEvent, GameState, ZonefallResult};

#[derive(Parser, Debug)]
#[command(name = "zonefall", version, about = "Grid roguelike engine demo")]
struct Args {
    /// World seed for a new game.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of random-walk turns to simulate.
    #[arg(long, default_value_t = 40)]
    turns: u32,

    /// Load a previous save instead of starting fresh.
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the final state to this save file.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the zone grid after every turn.
    #[arg(long)]
    trace: bool,
}

fn main() -> ZonefallResult<()> {
    env_logger::init();
    let args = Args::parse();

    let mut state = match &args.load {
        Some(path) => {
            info!("loading save from {}", path.display());
            GameState::load_from_file(path)?
        }
        None => GameState::new(args.seed),
    };

    let keys = ["w", "a", "s", "d", " "];
    let mut rng = StdRng::seed_from_u64(args.seed ^ 0x5eed);
    for turn in 0..args.turns {
        if state.game_over {
            println!("game over after {turn} turns");
            break;
        }
        let key = keys[rng.gen_range(0..keys.len())];
        state.handle_key(key);
        for event in state.events.drain() {
            if let GameEvent::Message { text, .. } = event {
                println!("  {text}");
            }
        }
        if args.trace {
            println!("turn {}:\n{}\n", turn + 1, state.grid.to_ascii());
        }
    }

    println!("{}", state.grid.to_ascii());
    println!(
        "zone {} | hp {}/{} | points {} | best combo {}",
        state.player.current_zone.key(),
        state.player.health,
        state.player.max_health,
        state.player.points,
        state.player.best_combo,
    );
    println!(
        "turns {} | zones visited {} | enemies defeated {} | bombs {}",
        state.statistics.turns_taken,
        state.statistics.zones_visited,
        state.statistics.enemies_defeated,
        state.statistics.bombs_detonated,
    );

    if let Some(path) = &args.save {
        state.save_to_file(path)?;
        info!("saved to {}", path.display());
    }
    Ok(())
}
