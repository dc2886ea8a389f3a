#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Venue Maze headlessly.
//!
//! An autopilot stands in for the keyboard, the world is driven one frame at
//! a time, and a short summary of every game is printed when it ends.

mod autopilot;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use venue_maze_core::{Command, Event, GamePhase};
use venue_maze_world::{apply, query, World};

use crate::{autopilot::Autopilot, config::TICKS_PER_SECOND};

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless Venue Maze runner", long_about = None)]
struct Args {
    /// TOML file with `[world]` and `[run]` tables.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for maze generation and every other random decision.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of rooms per maze.
    #[arg(long)]
    rooms: Option<usize>,

    /// Frames simulated per game before giving up.
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Number of consecutive mazes to play.
    #[arg(long)]
    games: Option<u32>,

    /// Tracing filter; falls back to `RUST_LOG`, then `info`.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Default)]
struct GameTally {
    catches: u32,
    hints: u32,
    populated: u32,
    commuters: u32,
}

impl GameTally {
    fn record(&mut self, event: &Event) {
        match event {
            Event::PlayerCaught { .. } => self.catches += 1,
            Event::HintShown { room, text, .. } => {
                self.hints += 1;
                debug!(%room, %text, "staff member replied");
            }
            Event::RoomPopulated { .. } => self.populated += 1,
            Event::ObstacleEnteredTraffic { .. } => self.commuters += 1,
            _ => {}
        }
    }
}

/// Entry point for the Venue Maze command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        settings.world.seed = Some(seed);
    }
    if let Some(rooms) = args.rooms {
        settings.world.room_count = rooms;
    }
    if let Some(max_ticks) = args.max_ticks {
        settings.run.max_ticks = max_ticks;
    }
    if let Some(games) = args.games {
        settings.run.games = games;
    }
    if args.log_level.is_some() {
        settings.run.log_level = args.log_level;
    }

    init_tracing(settings.run.log_level.as_deref());

    let mut world = World::new(settings.world).context("failed to generate the maze")?;
    println!("{}", query::welcome_banner(&world));
    info!(seed = query::seed(&world), rooms = query::room_count(&world), "venue ready");

    let mut pilot = Autopilot::new(query::seed(&world));
    let mut events = Vec::new();

    for game in 1..=settings.run.games {
        if game > 1 {
            events.clear();
            apply(&mut world, Command::Restart, &mut events);
            for event in &events {
                pilot.observe(event);
                if let Event::RestartRejected { reason } = event {
                    warn!(%reason, "could not start another game");
                    return Ok(());
                }
            }
        }

        let tally = play(&mut world, &mut pilot, settings.run.max_ticks, &mut events);
        report(game, &world, &tally);
        if query::phase(&world) != GamePhase::Won {
            break;
        }
    }

    Ok(())
}

fn play(
    world: &mut World,
    pilot: &mut Autopilot,
    max_ticks: u64,
    events: &mut Vec<Event>,
) -> GameTally {
    let mut tally = GameTally::default();
    for _ in 0..max_ticks {
        if query::phase(world) == GamePhase::Won {
            break;
        }
        let command = pilot.next_command(world);
        events.clear();
        apply(world, command, events);
        for event in events.iter() {
            pilot.observe(event);
            tally.record(event);
        }
    }
    tally
}

fn report(game: u32, world: &World, tally: &GameTally) {
    let hud = query::hud(world);
    let seconds = hud.elapsed_ticks / TICKS_PER_SECOND;
    let clock = format!("{}:{:02}", seconds / 60, seconds % 60);
    let outcome = if hud.phase == GamePhase::Won {
        "found the keynote"
    } else {
        "gave up"
    };

    info!(
        game,
        outcome,
        steps = hud.steps,
        explored = hud.explored,
        catches = tally.catches,
        hints = tally.hints,
        rooms_populated = tally.populated,
        commuters = tally.commuters,
        "game finished"
    );
    println!(
        "game {game}: {outcome} in {clock} | rooms walked: {} | explored: {} of {} | caught: {} | hints: {}",
        hud.steps,
        hud.explored,
        query::room_count(world),
        tally.catches,
        tally.hints,
    );
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
