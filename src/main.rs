use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use oriental_dungeon::engine::game_loop::GameLoop;
use oriental_dungeon::engine::input::{Action, PlayerInput};
use oriental_dungeon::game::respawn::{JsonFileStore, MemoryStore, SaveStore};
use oriental_dungeon::game::{GameConfig, GameWorld, LevelDesc};

#[derive(Parser, Debug)]
#[command(name = "oriental-dungeon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a scripted headless session of a level", long_about = None)]
struct Args {
    /// Game tuning file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level layout file (JSON); the built-in demo level when omitted
    #[arg(long)]
    level: Option<PathBuf>,

    /// Checkpoint save file; an existing save point is the starting position
    #[arg(long)]
    save: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 20.0)]
    seconds: f32,
}

/// Actions held at `time` seconds into the demo run: walk to the dummy and
/// hit it, charge a heavy attack, grab the dash, save at the checkpoint,
/// then run right.
fn scripted_actions(time: f32) -> Vec<Action> {
    match time {
        t if t < 0.5 => vec![],
        t if t < 0.8 => vec![Action::MoveRight],
        t if t < 0.85 => vec![Action::Attack],
        t if t < 1.5 => vec![],
        t if t < 2.2 => vec![Action::Attack],
        t if t < 3.0 => vec![],
        t if t < 4.6 => vec![Action::MoveRight],
        t if t < 4.7 => vec![Action::MoveRight, Action::Dash],
        t if t < 5.2 => vec![Action::MoveRight],
        t if t < 5.3 => vec![Action::Interact],
        t if t < 6.0 => vec![Action::MoveRight, Action::Jump],
        _ => vec![Action::MoveRight],
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Oriental Dungeon (headless)...");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let level = match &args.level {
        Some(path) => LevelDesc::load(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => LevelDesc::demo(),
    };
    let store: Box<dyn SaveStore> = match &args.save {
        Some(path) => Box::new(
            JsonFileStore::open(path)
                .with_context(|| format!("opening save file {}", path.display()))?,
        ),
        None => Box::new(MemoryStore::new()),
    };

    let mut world = GameWorld::new(config, &level, store).context("building the world")?;
    let mut input = PlayerInput::new();
    let mut game_loop = GameLoop::new();

    // Pretend the host renders at a steady ~60 fps
    let frame = Duration::from_micros(16_667);
    while game_loop.simulated_secs() < args.seconds {
        let ticks = game_loop.advance(frame);
        for _ in 0..ticks {
            input.set_held(&scripted_actions(game_loop.simulated_secs()));
            for event in world.tick(&mut input) {
                log::debug!("{}: {:?}", event.name(), event);
            }
            input.update();
        }
    }

    let player = world.player();
    let position = world.player_position().unwrap_or_default();
    info!(
        "finished after {} ticks: player {:?} at {:.2}, {:.2}, health {}/{}, {} enemies left",
        world.tick_count(),
        player.state(),
        position.x,
        position.y,
        player.health().current(),
        player.health().max(),
        world.enemies().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["oriental-dungeon"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.level.is_none());
        assert!(args.save.is_none());
        assert_eq!(args.seconds, 20.0);
    }

    #[test]
    fn test_args_paths_and_seconds() {
        let args = Args::try_parse_from([
            "oriental-dungeon",
            "--level",
            "levels/cave.json",
            "--seconds",
            "5",
        ])
        .unwrap();
        assert_eq!(args.level, Some(PathBuf::from("levels/cave.json")));
        assert_eq!(args.seconds, 5.0);
    }

    #[test]
    fn test_args_reject_unknown_flag() {
        assert!(Args::try_parse_from(["oriental-dungeon", "--fps", "30"]).is_err());
    }

    #[test]
    fn test_script_starts_idle() {
        assert!(scripted_actions(0.0).is_empty());
        assert_eq!(scripted_actions(30.0), vec![Action::MoveRight]);
    }
}
