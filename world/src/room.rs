use glam::Vec2;
use rand::Rng;
use tracing::debug;
use venue_maze_core::{
    Direction, Event, Exits, FixtureKind, FixtureSnapshot, GridPos, ObstacleKind,
    PlayfieldConfig, Rect, RoomId, RoomSnapshot, Theme,
};
use venue_maze_system_generation::RoomNode;
use venue_maze_system_hints::Hint;
use venue_maze_system_traffic::{EntranceGuard, Traffic};

use crate::{npc::Npc, obstacle::Obstacle};

/// Distance around an exit kept clear of spawned and wandering entities.
pub(crate) const SAFE_ZONE_RADIUS: f32 = 95.0;

const GOAL_NAME: &str = "KEYNOTE HALL!";
const ROOM_NAMES: [&str; 30] = [
    "Grand Ballroom A",
    "Grand Ballroom B",
    "Grand Ballroom C",
    "Exhibit Hall 1",
    "Exhibit Hall 2",
    "Exhibit Hall 3",
    "Past the Fountain",
    "Beside the Indoor River",
    "Overpriced Steakhouse",
    "Slot Row",
    "Main Lobby, Probably",
    "Badge Pickup",
    "Escalator Landing",
    "Tower Corridor 7C",
    "Food Court",
    "Deep Inside the Resort",
    "Behind the Boutiques",
    "Registration Overflow",
    "The Endless Hallway",
    "Patterned Carpet Zone",
    "Convention Wing?",
    "The Neon Atrium",
    "The Coffee Line",
    "Lost and Found",
    "Exhibit Floor East",
    "Exhibit Floor West",
    "The Confusing Junction",
    "Near the Restrooms",
    "Sponsor Alley",
    "Swag Counter",
];

const DECOY_EXIT_CHANCE: f64 = 0.15;
const JACKPOT_CHANCE: f64 = 0.002;
const JACKPOT_TICKS: u32 = 180;

const FIXTURE_ATTEMPTS: usize = 30;
const FIXTURE_SEPARATION: f32 = 80.0;
const OBSTACLE_ATTEMPTS: usize = 20;
const NPC_ATTEMPTS: usize = 20;
const NPC_SEPARATION: f32 = 80.0;
const NPC_CHANCE: f64 = 0.6;

/// Reports whether `point` lies in the clearance zone of any exit in `exits`.
pub(crate) fn is_in_safe_zone(playfield: &PlayfieldConfig, exits: &Exits, point: Vec2) -> bool {
    let center = playfield.center();
    let reach = playfield.room_padding + SAFE_ZONE_RADIUS;
    exits.iter().any(|(direction, _)| match direction {
        Direction::North => {
            (point.x - center.x).abs() < SAFE_ZONE_RADIUS && point.y < reach
        }
        Direction::South => {
            (point.x - center.x).abs() < SAFE_ZONE_RADIUS
                && point.y > playfield.screen_height - reach
        }
        Direction::East => {
            point.x > playfield.screen_width - reach && (point.y - center.y).abs() < SAFE_ZONE_RADIUS
        }
        Direction::West => point.x < reach && (point.y - center.y).abs() < SAFE_ZONE_RADIUS,
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Fixture {
    kind: FixtureKind,
    bounds: Rect,
}

/// Lazily materialised room contents.
#[derive(Clone, Debug, PartialEq)]
enum Contents {
    Created,
    Populated {
        fixtures: Vec<Fixture>,
        obstacles: Vec<Obstacle>,
        npcs: Vec<Npc>,
    },
}

/// Single room of the venue together with everything inside it.
#[derive(Clone, Debug)]
pub(crate) struct Room {
    id: RoomId,
    grid: GridPos,
    exits: Exits,
    is_goal: bool,
    name: &'static str,
    theme: Theme,
    decoy_exit: Option<Direction>,
    jackpot_ticks: u32,
    guard: EntranceGuard,
    contents: Contents,
}

impl Room {
    /// Wraps a generated node, rolling its name, theme and decor.
    pub(crate) fn new<R>(node: &RoomNode, is_goal: bool, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let name = if is_goal {
            GOAL_NAME
        } else {
            ROOM_NAMES[rng.gen_range(0..ROOM_NAMES.len())]
        };
        let theme = Theme::ALL[rng.gen_range(0..Theme::ALL.len())];
        let has_decoy = rng.gen_bool(DECOY_EXIT_CHANCE);
        let decoy = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];

        Self {
            id: node.id(),
            grid: node.grid(),
            exits: *node.exits(),
            is_goal,
            name,
            theme,
            decoy_exit: has_decoy.then_some(decoy),
            jackpot_ticks: 0,
            guard: EntranceGuard::default(),
            contents: Contents::Created,
        }
    }

    pub(crate) fn exits(&self) -> &Exits {
        &self.exits
    }

    pub(crate) fn grid(&self) -> GridPos {
        self.grid
    }

    /// Records the exit the player just arrived through.
    pub(crate) fn guard_entrance(&mut self, direction: Direction, cooldown_ticks: u32) {
        self.guard = EntranceGuard::new(direction, cooldown_ticks);
    }

    pub(crate) fn is_in_safe_zone(&self, playfield: &PlayfieldConfig, point: Vec2) -> bool {
        is_in_safe_zone(playfield, &self.exits, point)
    }

    /// Exit whose wall band the center of `player` has crossed.
    ///
    /// Walls without a connection never report an exit.
    pub(crate) fn exit_direction(
        &self,
        player: &Rect,
        playfield: &PlayfieldConfig,
    ) -> Option<Direction> {
        let center = player.center();
        let padding = playfield.room_padding;
        Direction::ALL.into_iter().find(|direction| {
            self.exits.contains(*direction)
                && match direction {
                    Direction::North => center.y < padding,
                    Direction::South => center.y > playfield.screen_height - padding,
                    Direction::East => center.x > playfield.screen_width - padding,
                    Direction::West => center.x < padding,
                }
        })
    }

    /// Reports whether `bounds` overlaps an immovable fixture.
    pub(crate) fn blocks(&self, bounds: &Rect) -> bool {
        match &self.contents {
            Contents::Created => false,
            Contents::Populated { fixtures, .. } => {
                fixtures.iter().any(|fixture| fixture.bounds.intersects(bounds))
            }
        }
    }

    /// Reports whether `bounds` overlaps a moving obstacle.
    pub(crate) fn touches_moving_obstacle(&self, bounds: &Rect) -> bool {
        match &self.contents {
            Contents::Created => false,
            Contents::Populated { obstacles, .. } => obstacles
                .iter()
                .any(|obstacle| obstacle.bounds().intersects(bounds)),
        }
    }

    /// Materialises fixtures, wandering obstacles and staff the first time it runs.
    ///
    /// Later calls do nothing. The goal room is populated with nothing at all.
    pub(crate) fn populate<R>(
        &mut self,
        goal: GridPos,
        playfield: &PlayfieldConfig,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        if !matches!(self.contents, Contents::Created) {
            return;
        }

        let (fixtures, obstacles, npcs) = if self.is_goal {
            (Vec::new(), Vec::new(), Vec::new())
        } else {
            let fixtures = self.place_fixtures(playfield, rng);
            let obstacles = self.place_obstacles(playfield, rng);
            let npcs = self.place_npcs(goal, playfield, rng);
            (fixtures, obstacles, npcs)
        };

        debug!(
            room = %self.id,
            theme = ?self.theme,
            statics = fixtures.len(),
            obstacles = obstacles.len(),
            npcs = npcs.len(),
            "room populated"
        );
        out_events.push(Event::RoomPopulated {
            room: self.id,
            statics: fixtures.len(),
            obstacles: obstacles.len(),
            npcs: npcs.len(),
        });
        self.contents = Contents::Populated {
            fixtures,
            obstacles,
            npcs,
        };
    }

    fn place_fixtures<R>(&self, playfield: &PlayfieldConfig, rng: &mut R) -> Vec<Fixture>
    where
        R: Rng + ?Sized,
    {
        if self.theme != Theme::Casino {
            return Vec::new();
        }

        let kind = FixtureKind::SlotMachine;
        let (width, height) = kind.size();
        let size = Vec2::new(width, height);
        let spawn = spawn_area(playfield);
        let count = rng.gen_range(3..=6);
        let mut fixtures: Vec<Fixture> = Vec::with_capacity(count);

        for _ in 0..count {
            for _ in 0..FIXTURE_ATTEMPTS {
                let origin = sample_origin(playfield, 60.0, 100.0, rng);
                let bounds = Rect::from_origin(origin, size);
                let crowded = fixtures
                    .iter()
                    .any(|fixture| fixture.bounds.origin().distance(origin) < FIXTURE_SEPARATION);
                if !crowded && !self.is_in_safe_zone(playfield, origin) && !bounds.intersects(&spawn)
                {
                    fixtures.push(Fixture { kind, bounds });
                    break;
                }
            }
        }
        fixtures
    }

    fn place_obstacles<R>(&self, playfield: &PlayfieldConfig, rng: &mut R) -> Vec<Obstacle>
    where
        R: Rng + ?Sized,
    {
        let count = match self.theme {
            Theme::Casino => rng.gen_range(1..=3),
            Theme::Expo | Theme::Corridor => rng.gen_range(2..=4),
        };

        (0..count)
            .map(|_| {
                let mut origin = sample_origin(playfield, 50.0, 80.0, rng);
                for _ in 1..OBSTACLE_ATTEMPTS {
                    if !self.is_in_safe_zone(playfield, origin) {
                        break;
                    }
                    origin = sample_origin(playfield, 50.0, 80.0, rng);
                }
                let kind = ObstacleKind::ALL[rng.gen_range(0..ObstacleKind::ALL.len())];
                Obstacle::wandering(kind, self.id, origin, rng)
            })
            .collect()
    }

    fn place_npcs<R>(&self, goal: GridPos, playfield: &PlayfieldConfig, rng: &mut R) -> Vec<Npc>
    where
        R: Rng + ?Sized,
    {
        let openings = match self.theme {
            Theme::Expo => 4,
            Theme::Casino | Theme::Corridor => 2,
        };
        let mut npcs: Vec<Npc> = Vec::new();

        for _ in 0..openings {
            if !rng.gen_bool(NPC_CHANCE) {
                continue;
            }

            let mut origin = sample_origin(playfield, 100.0, 100.0, rng);
            for _ in 1..NPC_ATTEMPTS {
                let crowded = npcs
                    .iter()
                    .any(|npc| npc.origin().distance(origin) < NPC_SEPARATION);
                if !crowded && !self.is_in_safe_zone(playfield, origin) {
                    break;
                }
                origin = sample_origin(playfield, 100.0, 100.0, rng);
            }

            let hint = Hint::compose(self.grid.offset_to(goal), rng);
            npcs.push(Npc::new(origin, hint));
        }
        npcs
    }

    /// Advances everything inside the room by one frame.
    pub(crate) fn update<R>(
        &mut self,
        playfield: &PlayfieldConfig,
        traffic: &Traffic,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        let Contents::Populated {
            obstacles, npcs, ..
        } = &mut self.contents
        else {
            return;
        };

        for obstacle in obstacles.iter_mut() {
            obstacle.advance(playfield, &self.exits, rng);
        }
        obstacles.retain(|obstacle| match obstacle.departure() {
            Some(exit) => {
                debug!(room = %obstacle.home(), kind = ?obstacle.kind(), %exit, "commuter left");
                out_events.push(Event::ObstacleDeparted {
                    room: obstacle.home(),
                    kind: obstacle.kind(),
                    exit,
                });
                false
            }
            None => true,
        });

        self.guard.tick();
        if let Some(plan) = traffic.maybe_plan(&self.exits, obstacles.len(), &self.guard, rng) {
            debug!(room = %self.id, kind = ?plan.kind, from = %plan.from, to = %plan.to, "commuter entered");
            obstacles.push(Obstacle::commuting(&plan, self.id, playfield, rng));
            out_events.push(Event::ObstacleEnteredTraffic {
                room: self.id,
                kind: plan.kind,
                from: plan.from,
                to: plan.to,
            });
        }

        for npc in npcs.iter_mut() {
            npc.tick();
        }

        if self.theme == Theme::Casino {
            if self.jackpot_ticks > 0 {
                self.jackpot_ticks -= 1;
            } else if rng.gen_bool(JACKPOT_CHANCE) {
                self.jackpot_ticks = JACKPOT_TICKS;
            }
        }
    }

    /// First staff member close enough to `player` to talk to.
    pub(crate) fn npc_within_reach_mut(&mut self, player: &Rect) -> Option<(usize, &mut Npc)> {
        let Contents::Populated { npcs, .. } = &mut self.contents else {
            return None;
        };
        npcs.iter_mut()
            .enumerate()
            .find(|(_, npc)| npc.within_reach(player))
    }

    pub(crate) fn snapshot(&self) -> RoomSnapshot {
        let (fixtures, obstacles, npcs) = match &self.contents {
            Contents::Created => (Vec::new(), Vec::new(), Vec::new()),
            Contents::Populated {
                fixtures,
                obstacles,
                npcs,
            } => (
                fixtures
                    .iter()
                    .map(|fixture| FixtureSnapshot {
                        kind: fixture.kind,
                        bounds: fixture.bounds,
                    })
                    .collect(),
                obstacles.iter().map(Obstacle::snapshot).collect(),
                npcs.iter().map(Npc::snapshot).collect(),
            ),
        };

        RoomSnapshot {
            id: self.id,
            name: self.name,
            theme: self.theme,
            is_goal: self.is_goal,
            exits: self.exits,
            decoy_exit: self
                .decoy_exit
                .filter(|direction| !self.exits.contains(*direction)),
            jackpot_lit: self.jackpot_ticks > 0,
            fixtures,
            obstacles,
            npcs,
        }
    }

    #[cfg(test)]
    pub(crate) fn push_obstacle(&mut self, obstacle: Obstacle) {
        if let Contents::Populated { obstacles, .. } = &mut self.contents {
            obstacles.push(obstacle);
        }
    }

    #[cfg(test)]
    pub(crate) fn guard(&self) -> EntranceGuard {
        self.guard
    }

    #[cfg(test)]
    pub(crate) fn push_npc(&mut self, npc: Npc) {
        if let Contents::Populated { npcs, .. } = &mut self.contents {
            npcs.push(npc);
        }
    }

    #[cfg(test)]
    pub(crate) fn vacate(&mut self) {
        self.contents = Contents::Populated {
            fixtures: Vec::new(),
            obstacles: Vec::new(),
            npcs: Vec::new(),
        };
    }

    #[cfg(test)]
    pub(crate) fn obstacle_count(&self) -> usize {
        match &self.contents {
            Contents::Created => 0,
            Contents::Populated { obstacles, .. } => obstacles.len(),
        }
    }
}

/// Box the player occupies when spawning at the center of the playfield.
fn spawn_area(playfield: &PlayfieldConfig) -> Rect {
    Rect::from_origin(playfield.center(), Vec2::splat(playfield.player_size))
}

/// Random top-left corner inset from the walls by `near` and `far` on each axis.
fn sample_origin<R>(playfield: &PlayfieldConfig, near: f32, far: f32, rng: &mut R) -> Vec2
where
    R: Rng + ?Sized,
{
    let low = playfield.room_padding + near;
    let high_x = playfield.screen_width - playfield.room_padding - far;
    let high_y = playfield.screen_height - playfield.room_padding - far;
    Vec2::new(span(low, high_x, rng), span(low, high_y, rng))
}

fn span<R>(low: f32, high: f32, rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    if low < high {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use venue_maze_system_traffic::{Config as TrafficConfig, TransitPlan};

    fn bare_room(directions: &[Direction], theme: Theme) -> Room {
        let mut exits = Exits::default();
        for (index, direction) in directions.iter().enumerate() {
            let _ = exits.insert(*direction, RoomId::new(index as u32 + 1));
        }
        Room {
            id: RoomId::new(0),
            grid: GridPos::ORIGIN,
            exits,
            is_goal: false,
            name: "Test Hall",
            theme,
            decoy_exit: None,
            jackpot_ticks: 0,
            guard: EntranceGuard::default(),
            contents: Contents::Created,
        }
    }

    fn player_centered_at(center: Vec2) -> Rect {
        Rect::from_origin(center - Vec2::splat(15.0), Vec2::splat(30.0))
    }

    fn quiet_traffic() -> Traffic {
        Traffic::new(TrafficConfig {
            spawn_chance: 0.0,
            obstacle_cap: 10,
        })
    }

    #[test]
    fn crossing_the_north_wall_needs_a_north_exit() {
        let playfield = PlayfieldConfig::default();
        let player = player_centered_at(Vec2::new(512.0, 40.0));

        let open = bare_room(&[Direction::North, Direction::East], Theme::Corridor);
        assert_eq!(open.exit_direction(&player, &playfield), Some(Direction::North));

        let closed = bare_room(&[Direction::South, Direction::East], Theme::Corridor);
        assert_eq!(closed.exit_direction(&player, &playfield), None);

        let inside = player_centered_at(Vec2::new(512.0, 384.0));
        assert_eq!(open.exit_direction(&inside, &playfield), None);
    }

    #[test]
    fn safe_zones_hug_exits_and_leave_the_center_free() {
        let playfield = PlayfieldConfig::default();
        let room = bare_room(&Direction::ALL, Theme::Expo);
        let center = playfield.center();
        let padding = playfield.room_padding;

        assert!(room.is_in_safe_zone(&playfield, Vec2::new(center.x, padding + 1.0)));
        assert!(room.is_in_safe_zone(
            &playfield,
            Vec2::new(center.x, playfield.screen_height - padding - 1.0)
        ));
        assert!(room.is_in_safe_zone(
            &playfield,
            Vec2::new(playfield.screen_width - padding - 1.0, center.y)
        ));
        assert!(room.is_in_safe_zone(&playfield, Vec2::new(padding + 1.0, center.y)));
        assert!(!room.is_in_safe_zone(&playfield, center));

        let walled = bare_room(&[Direction::East], Theme::Expo);
        assert!(!walled.is_in_safe_zone(&playfield, Vec2::new(center.x, padding + 1.0)));
    }

    #[test]
    fn population_happens_once() {
        let playfield = PlayfieldConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut events = Vec::new();
        for theme in Theme::ALL {
            let mut room = bare_room(&[Direction::North, Direction::West], theme);
            room.populate(GridPos::new(3, -2), &playfield, &mut rng, &mut events);
            let first = room.snapshot();
            room.populate(GridPos::new(3, -2), &playfield, &mut rng, &mut events);
            assert_eq!(room.snapshot(), first);
        }
        assert_eq!(events.len(), Theme::ALL.len());
    }

    #[test]
    fn theme_controls_population_sizes() {
        let playfield = PlayfieldConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(34);
        for _ in 0..200 {
            for theme in Theme::ALL {
                let mut room = bare_room(&[Direction::South], theme);
                let mut events = Vec::new();
                room.populate(GridPos::new(0, 4), &playfield, &mut rng, &mut events);
                let snapshot = room.snapshot();
                let (obstacles, npcs) = match theme {
                    Theme::Casino => (1..=3, 0..=2),
                    Theme::Expo => (2..=4, 0..=4),
                    Theme::Corridor => (2..=4, 0..=2),
                };
                assert!(obstacles.contains(&snapshot.obstacles.len()));
                assert!(npcs.contains(&snapshot.npcs.len()));
                if theme == Theme::Casino {
                    assert!(snapshot.fixtures.len() <= 6);
                } else {
                    assert!(snapshot.fixtures.is_empty());
                }
                let spawn = spawn_area(&playfield);
                for fixture in &snapshot.fixtures {
                    assert!(!fixture.bounds.intersects(&spawn));
                    assert!(!room.is_in_safe_zone(&playfield, fixture.bounds.origin()));
                }
            }
        }
    }

    #[test]
    fn goal_room_stays_empty() {
        let playfield = PlayfieldConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(55);
        let mut room = bare_room(&[Direction::West], Theme::Expo);
        room.is_goal = true;
        let mut events = Vec::new();
        room.populate(GridPos::ORIGIN, &playfield, &mut rng, &mut events);
        let snapshot = room.snapshot();
        assert!(snapshot.fixtures.is_empty());
        assert!(snapshot.obstacles.is_empty());
        assert!(snapshot.npcs.is_empty());
    }

    #[test]
    fn commuter_crosses_from_west_to_east_and_is_removed() {
        let playfield = PlayfieldConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(89);
        let mut room = bare_room(&[Direction::West, Direction::East], Theme::Corridor);
        room.vacate();
        let plan = TransitPlan {
            from: Direction::West,
            to: Direction::East,
            kind: ObstacleKind::Janitor,
        };
        room.push_obstacle(Obstacle::commuting(&plan, room.id, &playfield, &mut rng));
        let traffic = quiet_traffic();

        let mut last_x = room.snapshot().obstacles[0].bounds.x;
        assert!(last_x < playfield.room_padding + 20.0);
        let mut events = Vec::new();
        let mut ticks = 0;
        while room.obstacle_count() == 1 {
            room.update(&playfield, &traffic, &mut rng, &mut events);
            if let Some(obstacle) = room.snapshot().obstacles.first() {
                assert!(obstacle.bounds.x > last_x, "x must grow every tick");
                last_x = obstacle.bounds.x;
            }
            ticks += 1;
            assert!(ticks < 2_000, "commuter never left");
        }

        assert!(last_x > playfield.screen_width - playfield.room_padding);
        assert_eq!(
            events,
            vec![Event::ObstacleDeparted {
                room: RoomId::new(0),
                kind: ObstacleKind::Janitor,
                exit: Direction::East,
            }]
        );
    }

    #[test]
    fn fixtures_block_and_obstacles_hurt() {
        let mut room = bare_room(&[Direction::North], Theme::Casino);
        let slot = Rect::new(200.0, 200.0, 40.0, 50.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let walker = Obstacle::wandering(
            ObstacleKind::Influencer,
            room.id,
            Vec2::new(600.0, 500.0),
            &mut rng,
        );
        room.contents = Contents::Populated {
            fixtures: vec![Fixture {
                kind: FixtureKind::SlotMachine,
                bounds: slot,
            }],
            obstacles: vec![walker],
            npcs: Vec::new(),
        };

        assert!(room.blocks(&Rect::new(220.0, 230.0, 30.0, 30.0)));
        assert!(!room.blocks(&Rect::new(240.0, 200.0, 30.0, 30.0)));
        assert!(!room.touches_moving_obstacle(&Rect::new(220.0, 230.0, 30.0, 30.0)));
        assert!(room.touches_moving_obstacle(&Rect::new(610.0, 510.0, 30.0, 30.0)));
    }

    #[test]
    fn decoy_exit_hides_behind_real_doors() {
        let mut room = bare_room(&[Direction::North], Theme::Corridor);
        room.decoy_exit = Some(Direction::North);
        assert_eq!(room.snapshot().decoy_exit, None);
        room.decoy_exit = Some(Direction::South);
        assert_eq!(room.snapshot().decoy_exit, Some(Direction::South));
    }
}
