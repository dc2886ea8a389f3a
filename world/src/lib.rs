#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Venue Maze.
//!
//! The world owns the generated room graph, the player avatar, every room's
//! lazily created contents, and the counters driving the game state machine.
//! It is mutated exclusively through [`apply`], which reports what happened
//! as [`Event`] values; adapters read state through the [`query`] module.

mod npc;
mod obstacle;
mod player;
mod room;

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use venue_maze_core::{
    Command, Direction, Event, GenerationError, MoveIntent, PlayfieldConfig, RestartError, RoomId,
    WELCOME_BANNER,
};
use venue_maze_system_generation::{Config as GenerationConfig, MazeGenerator, MazeLayout};
use venue_maze_system_traffic::{Config as TrafficConfig, Traffic};

use crate::{player::Player, room::Room};

const ENTRANCE_COOLDOWN_TICKS: u32 = 180;
const ENTRY_INVINCIBILITY_TICKS: u32 = 60;
const RESPAWN_INVINCIBILITY_TICKS: u32 = 120;
const FADE_STEP: u32 = 15;
const FADE_OPAQUE: u32 = 255;

/// Tunable parameters used to build a world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Geometry shared by every room.
    pub playfield: PlayfieldConfig,
    /// Number of rooms in each generated maze.
    pub room_count: usize,
    /// Optional bound on how far rooms may be placed from the start cell.
    pub max_grid_extent: Option<u32>,
    /// Generation passes attempted before giving up on a bounded grid.
    pub generation_attempts: u32,
    /// Seed for every random decision; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Through-traffic tuning.
    pub traffic: TrafficConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            playfield: PlayfieldConfig::default(),
            room_count: 30,
            max_grid_extent: None,
            generation_attempts: 8,
            seed: None,
            traffic: TrafficConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Progress {
    visited: BTreeSet<RoomId>,
    steps: u32,
    elapsed_ticks: u64,
}

impl Progress {
    fn starting_in(room: RoomId) -> Self {
        Self {
            visited: BTreeSet::from([room]),
            ..Self::default()
        }
    }
}

/// Represents the authoritative Venue Maze world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    seed: u64,
    rng: ChaCha8Rng,
    traffic: Traffic,
    rooms: Vec<Room>,
    start: RoomId,
    goal: RoomId,
    current: RoomId,
    player: Player,
    invincibility_ticks: u32,
    fade: Option<u32>,
    won: bool,
    progress: Progress,
}

impl World {
    /// Builds a world with a freshly generated maze.
    pub fn new(config: WorldConfig) -> Result<Self, GenerationError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let layout = generate_layout(&config, &mut rng)?;
        let (rooms, start, goal) = build_rooms(layout, &mut rng);
        info!(seed, rooms = rooms.len(), %start, %goal, "maze generated");

        Ok(Self {
            banner: WELCOME_BANNER,
            seed,
            traffic: Traffic::new(config.traffic),
            player: Player::spawn(&config.playfield),
            invincibility_ticks: 0,
            fade: None,
            won: start == goal,
            progress: Progress::starting_in(start),
            current: start,
            rooms,
            start,
            goal,
            rng,
            config,
        })
    }

    fn tick(&mut self, intent: MoveIntent, interact: bool, out_events: &mut Vec<Event>) {
        self.fade = self
            .fade
            .map(|alpha| alpha + FADE_STEP)
            .filter(|alpha| *alpha < FADE_OPAQUE);
        self.invincibility_ticks = self.invincibility_ticks.saturating_sub(1);

        if self.won {
            return;
        }

        self.progress.elapsed_ticks += 1;
        out_events.push(Event::TimeAdvanced {
            tick: self.progress.elapsed_ticks,
        });

        let current = self.current;
        self.populate(current, out_events);

        let playfield = self.config.playfield;
        let Some(room) = self.rooms.get_mut(current.index()) else {
            return;
        };
        self.player.steer(intent, &playfield, room);
        room.update(&playfield, &self.traffic, &mut self.rng, out_events);

        let bounds = self.player.bounds();
        if self.invincibility_ticks == 0 && room.touches_moving_obstacle(&bounds) {
            self.catch_player(out_events);
            return;
        }

        if interact {
            if let Some((npc, staff)) = room.npc_within_reach_mut(&bounds) {
                let text = staff.interact();
                debug!(room = %current, npc, %text, "hint shown");
                out_events.push(Event::HintShown {
                    room: current,
                    npc,
                    text,
                });
            }
        }

        if let Some(direction) = room.exit_direction(&bounds, &playfield) {
            self.enter_room(direction, out_events);
        }
    }

    fn populate(&mut self, room: RoomId, out_events: &mut Vec<Event>) {
        let goal = match self.rooms.get(self.goal.index()) {
            Some(goal) => goal.grid(),
            None => return,
        };
        if let Some(room) = self.rooms.get_mut(room.index()) {
            room.populate(goal, &self.config.playfield, &mut self.rng, out_events);
        }
    }

    fn catch_player(&mut self, out_events: &mut Vec<Event>) {
        info!(room = %self.current, start = %self.start, "player caught");
        out_events.push(Event::PlayerCaught { room: self.current });
        self.current = self.start;
        self.player = Player::spawn(&self.config.playfield);
        self.fade = Some(0);
        self.invincibility_ticks = RESPAWN_INVINCIBILITY_TICKS;
    }

    fn enter_room(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let from = self.current;
        let Some(to) = self
            .rooms
            .get(from.index())
            .and_then(|room| room.exits().get(direction))
        else {
            return;
        };

        self.current = to;
        let _ = self.progress.visited.insert(to);
        self.progress.steps += 1;
        if let Some(room) = self.rooms.get_mut(to.index()) {
            room.guard_entrance(direction.opposite(), ENTRANCE_COOLDOWN_TICKS);
        }
        self.player.arrive(direction, &self.config.playfield);
        self.invincibility_ticks = ENTRY_INVINCIBILITY_TICKS;

        info!(%from, %to, %direction, steps = self.progress.steps, "room entered");
        out_events.push(Event::RoomEntered {
            from,
            to,
            direction,
        });
        self.populate(to, out_events);

        if to == self.goal {
            self.won = true;
            info!(
                steps = self.progress.steps,
                ticks = self.progress.elapsed_ticks,
                explored = self.progress.visited.len(),
                "goal reached"
            );
            out_events.push(Event::GoalReached {
                room: to,
                steps: self.progress.steps,
                elapsed_ticks: self.progress.elapsed_ticks,
                explored: self.progress.visited.len(),
            });
        }
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        if !self.won {
            out_events.push(Event::RestartRejected {
                reason: RestartError::NotFinished,
            });
            return;
        }

        let layout = match generate_layout(&self.config, &mut self.rng) {
            Ok(layout) => layout,
            Err(error) => {
                warn!(%error, "restart failed");
                out_events.push(Event::RestartRejected {
                    reason: RestartError::Generation(error),
                });
                return;
            }
        };

        let (rooms, start, goal) = build_rooms(layout, &mut self.rng);
        info!(rooms = rooms.len(), %start, %goal, "maze rebuilt");
        out_events.push(Event::GameRestarted { rooms: rooms.len() });
        self.rooms = rooms;
        self.start = start;
        self.goal = goal;
        self.current = start;
        self.player = Player::spawn(&self.config.playfield);
        self.invincibility_ticks = RESPAWN_INVINCIBILITY_TICKS;
        self.fade = None;
        self.won = start == goal;
        self.progress = Progress::starting_in(start);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { intent, interact } => world.tick(intent, interact, out_events),
        Command::Restart => world.restart(out_events),
    }
}

fn generate_layout(
    config: &WorldConfig,
    rng: &mut ChaCha8Rng,
) -> Result<MazeLayout, GenerationError> {
    let generator = MazeGenerator::new(
        GenerationConfig::new(config.room_count).with_max_extent(config.max_grid_extent),
    );
    generator.generate_with_retries(config.generation_attempts, rng)
}

fn build_rooms(layout: MazeLayout, rng: &mut ChaCha8Rng) -> (Vec<Room>, RoomId, RoomId) {
    let start = layout.start();
    let goal = layout.goal();
    let rooms = layout
        .into_rooms()
        .into_iter()
        .map(|node| Room::new(&node, node.id() == goal, rng))
        .collect();
    (rooms, start, goal)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use venue_maze_core::{
        Exits, GamePhase, GridPos, HudSnapshot, PlayfieldConfig, Rect, RoomId, RoomSnapshot,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Seed driving every random decision, useful to replay a run.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }

    /// Geometry shared by every room.
    #[must_use]
    pub fn playfield(world: &World) -> &PlayfieldConfig {
        &world.config.playfield
    }

    /// Coarse state of the game loop.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        if world.won {
            GamePhase::Won
        } else if world.fade.is_some() {
            GamePhase::Transitioning
        } else {
            GamePhase::Exploring
        }
    }

    /// Counters shown on the heads-up display.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot {
            phase: phase(world),
            elapsed_ticks: world.progress.elapsed_ticks,
            steps: world.progress.steps,
            explored: world.progress.visited.len(),
            invincibility_ticks: world.invincibility_ticks,
            fade: world.fade,
        }
    }

    /// Number of rooms in the current maze.
    #[must_use]
    pub fn room_count(world: &World) -> usize {
        world.rooms.len()
    }

    /// Room the player currently occupies.
    #[must_use]
    pub fn current_room(world: &World) -> RoomId {
        world.current
    }

    /// Room the player starts in and respawns at.
    #[must_use]
    pub fn start_room(world: &World) -> RoomId {
        world.start
    }

    /// Room that ends the game when entered.
    #[must_use]
    pub fn goal_room(world: &World) -> RoomId {
        world.goal
    }

    /// Reports whether the player has set foot in the room.
    #[must_use]
    pub fn is_visited(world: &World, room: RoomId) -> bool {
        world.progress.visited.contains(&room)
    }

    /// Connections leaving the room, if it exists.
    #[must_use]
    pub fn exits(world: &World, room: RoomId) -> Option<Exits> {
        world.rooms.get(room.index()).map(|room| *room.exits())
    }

    /// Grid cell the room occupies, if it exists.
    #[must_use]
    pub fn grid_position(world: &World, room: RoomId) -> Option<GridPos> {
        world.rooms.get(room.index()).map(|room| room.grid())
    }

    /// Reports whether `point` lies in an exit clearance zone of the room.
    #[must_use]
    pub fn is_in_safe_zone(world: &World, room: RoomId, point: Vec2) -> bool {
        world
            .rooms
            .get(room.index())
            .is_some_and(|room| room.is_in_safe_zone(&world.config.playfield, point))
    }

    /// Bounding box of the player avatar.
    #[must_use]
    pub fn player_bounds(world: &World) -> Rect {
        world.player.bounds()
    }

    /// Snapshot of the requested room, if it exists.
    #[must_use]
    pub fn room(world: &World, room: RoomId) -> Option<RoomSnapshot> {
        world.rooms.get(room.index()).map(|room| room.snapshot())
    }

    /// Snapshot of the room the player currently occupies.
    #[must_use]
    pub fn current_room_snapshot(world: &World) -> Option<RoomSnapshot> {
        room(world, world.current)
    }
}
