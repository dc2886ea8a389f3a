use std::collections::HashMap;

use glam::Vec2;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use venue_maze_core::{Command, Direction, Event, MoveIntent, RoomId};
use venue_maze_world::{query, World};

const STALL_TICKS: u32 = 20;
const DETOUR_TICKS: u32 = 30;
const TALK_INTERVAL: u64 = 15;

/// Scripted player that explores the maze by walking from exit to exit.
///
/// Unvisited neighbours are preferred; otherwise the least visited one wins.
/// When the avatar stops making progress it takes a short random detour.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    visits: HashMap<RoomId, u32>,
    heading: Option<(RoomId, Direction)>,
    last_origin: Option<Vec2>,
    stalled: u32,
    detour: Option<(MoveIntent, u32)>,
    ticks: u64,
}

impl Autopilot {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            visits: HashMap::new(),
            heading: None,
            last_origin: None,
            stalled: 0,
            detour: None,
            ticks: 0,
        }
    }

    /// Updates the route plan from an event reported by the world.
    pub(crate) fn observe(&mut self, event: &Event) {
        match event {
            Event::RoomEntered { to, .. } => {
                *self.visits.entry(*to).or_insert(0) += 1;
                self.heading = None;
                self.detour = None;
            }
            Event::PlayerCaught { .. } => {
                self.heading = None;
                self.detour = None;
            }
            Event::GameRestarted { .. } => {
                self.visits.clear();
                self.heading = None;
                self.detour = None;
            }
            _ => {}
        }
    }

    /// Chooses the command for the next frame.
    pub(crate) fn next_command(&mut self, world: &World) -> Command {
        self.ticks += 1;
        let interact = self.ticks % TALK_INTERVAL == 0;
        Command::Tick {
            intent: self.steer(world),
            interact,
        }
    }

    fn steer(&mut self, world: &World) -> MoveIntent {
        let origin = query::player_bounds(world).origin();
        let moved = self
            .last_origin
            .map_or(true, |last| last.distance(origin) > 0.5);
        self.last_origin = Some(origin);
        self.stalled = if moved { 0 } else { self.stalled + 1 };

        if let Some((intent, remaining)) = self.detour.as_mut() {
            *remaining = remaining.saturating_sub(1);
            let intent = *intent;
            if *remaining == 0 {
                self.detour = None;
            }
            return intent;
        }

        if self.stalled >= STALL_TICKS {
            self.stalled = 0;
            self.heading = None;
            let (dx, dy) = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())].grid_delta();
            let intent = MoveIntent::new(dx, dy);
            self.detour = Some((intent, DETOUR_TICKS));
            return intent;
        }

        let room = query::current_room(world);
        let Some(direction) = self.pick_exit(world, room) else {
            return MoveIntent::IDLE;
        };
        toward_exit(world, direction)
    }

    fn pick_exit(&mut self, world: &World, room: RoomId) -> Option<Direction> {
        if let Some((planned_room, direction)) = self.heading {
            if planned_room == room {
                return Some(direction);
            }
        }

        let exits = query::exits(world, room)?;
        let fresh: Vec<Direction> = exits
            .iter()
            .filter(|(_, neighbour)| !query::is_visited(world, *neighbour))
            .map(|(direction, _)| direction)
            .collect();

        let direction = if fresh.is_empty() {
            let fewest = exits
                .iter()
                .map(|(_, neighbour)| self.visit_count(neighbour))
                .min()?;
            let quiet: Vec<Direction> = exits
                .iter()
                .filter(|(_, neighbour)| self.visit_count(*neighbour) == fewest)
                .map(|(direction, _)| direction)
                .collect();
            *quiet.choose(&mut self.rng)?
        } else {
            *fresh.choose(&mut self.rng)?
        };

        self.heading = Some((room, direction));
        Some(direction)
    }

    fn visit_count(&self, room: RoomId) -> u32 {
        self.visits.get(&room).copied().unwrap_or(0)
    }
}

/// Walks along the wall axis while lining up with the exit gap.
fn toward_exit(world: &World, direction: Direction) -> MoveIntent {
    let playfield = query::playfield(world);
    let center = query::player_bounds(world).center();
    let gap_center = playfield.center();
    let tolerance = playfield.player_speed;
    let align = |offset: f32| {
        if offset > tolerance {
            1
        } else if offset < -tolerance {
            -1
        } else {
            0
        }
    };

    let (dx, dy) = direction.grid_delta();
    match direction {
        Direction::North | Direction::South => MoveIntent::new(align(gap_center.x - center.x), dy),
        Direction::East | Direction::West => MoveIntent::new(dx, align(gap_center.y - center.y)),
    }
}
