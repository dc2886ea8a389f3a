#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Maze topology generator that grows a connected room graph on an integer grid.
//!
//! Rooms are attached one at a time to a randomly chosen frontier room, so the
//! graph stays connected by construction. A fraction of new rooms also open a
//! second door into an already built neighbour, which introduces loops.

use std::collections::HashMap;

use rand::{seq::SliceRandom, Rng};
use venue_maze_core::{Direction, Exits, GenerationError, GridPos, RoomId};

const LOOP_CHANCE: f64 = 0.2;

/// Configuration parameters required to construct the generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    room_count: usize,
    max_extent: Option<u32>,
    loop_chance: f64,
}

impl Config {
    /// Creates a configuration for an unbounded grid holding `room_count` rooms.
    #[must_use]
    pub const fn new(room_count: usize) -> Self {
        Self {
            room_count,
            max_extent: None,
            loop_chance: LOOP_CHANCE,
        }
    }

    /// Restricts rooms to cells whose coordinates stay within `extent` of the origin.
    #[must_use]
    pub const fn with_max_extent(mut self, extent: Option<u32>) -> Self {
        self.max_extent = extent;
        self
    }

    /// Overrides the probability that a new room opens an extra loop door.
    #[must_use]
    pub fn with_loop_chance(mut self, chance: f64) -> Self {
        self.loop_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Number of rooms requested.
    #[must_use]
    pub const fn room_count(&self) -> usize {
        self.room_count
    }
}

/// Single node of a generated layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomNode {
    id: RoomId,
    grid: GridPos,
    exits: Exits,
}

impl RoomNode {
    fn new(id: RoomId, grid: GridPos) -> Self {
        Self {
            id,
            grid,
            exits: Exits::default(),
        }
    }

    /// Identifier assigned to the room.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Grid cell the room occupies.
    #[must_use]
    pub const fn grid(&self) -> GridPos {
        self.grid
    }

    /// Connections leaving the room.
    #[must_use]
    pub const fn exits(&self) -> &Exits {
        &self.exits
    }
}

/// Connected room graph produced by [`MazeGenerator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeLayout {
    rooms: Vec<RoomNode>,
    start: RoomId,
    goal: RoomId,
}

impl MazeLayout {
    /// Rooms ordered by identifier.
    #[must_use]
    pub fn rooms(&self) -> &[RoomNode] {
        &self.rooms
    }

    /// Looks up a room by identifier.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&RoomNode> {
        self.rooms.get(id.index())
    }

    /// Room the player starts in.
    #[must_use]
    pub const fn start(&self) -> RoomId {
        self.start
    }

    /// Room the player searches for.
    #[must_use]
    pub const fn goal(&self) -> RoomId {
        self.goal
    }

    /// Number of rooms in the layout.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Reports whether the layout holds no rooms. Generated layouts never do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Consumes the layout, yielding its rooms.
    #[must_use]
    pub fn into_rooms(self) -> Vec<RoomNode> {
        self.rooms
    }
}

/// Pure system that grows maze layouts from a caller-provided random source.
#[derive(Clone, Copy, Debug)]
pub struct MazeGenerator {
    config: Config,
}

impl MazeGenerator {
    /// Creates a new generator using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs a single growth pass.
    ///
    /// Fails with [`GenerationError::FrontierExhausted`] when a bounded grid
    /// fills up before the goal room is created. Unbounded grids always
    /// succeed because the outermost room keeps a free neighbour.
    pub fn generate<R>(&self, rng: &mut R) -> Result<MazeLayout, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let requested = self.config.room_count;
        if requested == 0 {
            return Err(GenerationError::NoRooms);
        }

        let mut growth = Growth::new(self.config.max_extent);
        let mut frontier = vec![RoomId::new(0)];

        while growth.rooms.len() < requested && !frontier.is_empty() {
            let pick = rng.gen_range(0..frontier.len());
            let from = frontier[pick];
            let free = growth.free_directions(from);
            let Some(&direction) = free.choose(rng) else {
                let _ = frontier.remove(pick);
                continue;
            };

            let created = growth.attach(from, direction);
            frontier.push(created);

            if rng.gen_bool(self.config.loop_chance) {
                growth.open_loop(created);
            }
        }

        let built = growth.rooms.len();
        if built < requested {
            return Err(GenerationError::FrontierExhausted { requested, built });
        }

        Ok(MazeLayout {
            rooms: growth.rooms,
            start: RoomId::new(0),
            goal: RoomId::new((requested - 1) as u32),
        })
    }

    /// Repeats [`MazeGenerator::generate`] until a complete layout is produced.
    ///
    /// `attempts` is treated as at least one. The error of the final attempt
    /// is returned when every pass stalls.
    pub fn generate_with_retries<R>(
        &self,
        attempts: u32,
        rng: &mut R,
    ) -> Result<MazeLayout, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let mut outcome = self.generate(rng);
        for _ in 1..attempts {
            if !matches!(outcome, Err(GenerationError::FrontierExhausted { .. })) {
                break;
            }
            outcome = self.generate(rng);
        }
        outcome
    }
}

#[derive(Debug)]
struct Growth {
    rooms: Vec<RoomNode>,
    occupancy: HashMap<GridPos, RoomId>,
    max_extent: Option<u32>,
}

impl Growth {
    fn new(max_extent: Option<u32>) -> Self {
        let origin = RoomNode::new(RoomId::new(0), GridPos::ORIGIN);
        let mut occupancy = HashMap::new();
        let _ = occupancy.insert(GridPos::ORIGIN, origin.id);
        Self {
            rooms: vec![origin],
            occupancy,
            max_extent,
        }
    }

    fn free_directions(&self, room: RoomId) -> Vec<Direction> {
        let origin = self.rooms[room.index()].grid;
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_free(origin.step(*direction)))
            .collect()
    }

    fn is_free(&self, cell: GridPos) -> bool {
        let in_bounds = self.max_extent.map_or(true, |extent| cell.extent() <= extent);
        in_bounds && !self.occupancy.contains_key(&cell)
    }

    fn attach(&mut self, from: RoomId, direction: Direction) -> RoomId {
        let id = RoomId::new(self.rooms.len() as u32);
        let cell = self.rooms[from.index()].grid.step(direction);
        self.rooms.push(RoomNode::new(id, cell));
        let _ = self.occupancy.insert(cell, id);
        self.connect(from, direction, id);
        id
    }

    fn open_loop(&mut self, room: RoomId) {
        let origin = self.rooms[room.index()].grid;
        for direction in Direction::ALL {
            let Some(&neighbour) = self.occupancy.get(&origin.step(direction)) else {
                continue;
            };
            if neighbour != room && !self.rooms[room.index()].exits.contains(direction) {
                self.connect(room, direction, neighbour);
                break;
            }
        }
    }

    fn connect(&mut self, from: RoomId, direction: Direction, to: RoomId) {
        let previous = self.rooms[from.index()].exits.insert(direction, to);
        debug_assert!(previous.is_none(), "door already open toward {direction}");
        let previous = self.rooms[to.index()]
            .exits
            .insert(direction.opposite(), from);
        debug_assert!(previous.is_none(), "door already open toward {direction}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_rooms_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let generator = MazeGenerator::new(Config::new(0));
        assert_eq!(generator.generate(&mut rng), Err(GenerationError::NoRooms));
    }

    #[test]
    fn single_room_is_both_start_and_goal() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let layout = MazeGenerator::new(Config::new(1))
            .generate(&mut rng)
            .expect("single room layout");
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.start(), layout.goal());
        assert!(layout.rooms()[0].exits().is_empty());
    }

    #[test]
    fn saturated_grid_reports_exhaustion() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        // Extent 1 leaves room for a 3x3 block only.
        let generator = MazeGenerator::new(Config::new(10).with_max_extent(Some(1)));
        assert_eq!(
            generator.generate_with_retries(3, &mut rng),
            Err(GenerationError::FrontierExhausted {
                requested: 10,
                built: 9
            })
        );
    }

    #[test]
    fn loop_doors_only_join_adjacent_cells() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let layout = MazeGenerator::new(Config::new(40).with_loop_chance(1.0))
            .generate(&mut rng)
            .expect("layout");
        for room in layout.rooms() {
            for (direction, neighbour) in room.exits().iter() {
                let other = layout.room(neighbour).expect("neighbour exists");
                assert_eq!(room.grid().step(direction), other.grid());
            }
        }
    }
}
