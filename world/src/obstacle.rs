use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::{seq::SliceRandom, Rng};
use venue_maze_core::{
    Direction, Exits, MovementMode, ObstacleKind, ObstacleSnapshot, PlayfieldConfig, Rect, RoomId,
};
use venue_maze_system_traffic::TransitPlan;

use crate::room::is_in_safe_zone;

/// Side length of every moving obstacle.
pub(crate) const OBSTACLE_SIZE: f32 = 30.0;

const ARRIVAL_DISTANCE: f32 = 5.0;
const WALL_MARGIN: f32 = 10.0;
const EXIT_OVERSHOOT: f32 = 20.0;
const SPEECH_DISPLAY_TICKS: u32 = 180;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Wander {
        heading: f32,
        elapsed: u32,
        interval: u32,
    },
    Transit {
        target: Vec2,
        exit: Direction,
        arrived: bool,
    },
}

impl Motion {
    fn mode(&self) -> MovementMode {
        match self {
            Self::Wander { .. } => MovementMode::Wander,
            Self::Transit { .. } => MovementMode::Transit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Speech {
    line: Option<&'static str>,
    display_ticks: u32,
    cooldown_ticks: u32,
}

impl Speech {
    fn new<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            line: None,
            display_ticks: 0,
            cooldown_ticks: rng.gen_range(10..=60),
        }
    }

    fn advance<R>(&mut self, quotes: &'static [&'static str], rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if self.display_ticks > 0 {
            self.display_ticks -= 1;
            if self.display_ticks == 0 {
                self.line = None;
            }
            return;
        }

        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
        if self.cooldown_ticks == 0 {
            self.line = quotes.choose(rng).copied();
            self.display_ticks = SPEECH_DISPLAY_TICKS;
            self.cooldown_ticks = rng.gen_range(120..=240);
        }
    }
}

/// Moving obstacle owned by a single room.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Obstacle {
    kind: ObstacleKind,
    home: RoomId,
    origin: Vec2,
    motion: Motion,
    speech: Speech,
}

impl Obstacle {
    /// Creates an obstacle that roams its room with a random heading.
    pub(crate) fn wandering<R>(kind: ObstacleKind, home: RoomId, origin: Vec2, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let heading = rng.gen_range(0.0..TAU);
        let interval = rng.gen_range(60..=180);
        Self {
            kind,
            home,
            origin,
            motion: Motion::Wander {
                heading,
                elapsed: 0,
                interval,
            },
            speech: Speech::new(rng),
        }
    }

    /// Creates an obstacle standing at the entry exit of `plan`, headed for its leaving exit.
    pub(crate) fn commuting<R>(
        plan: &TransitPlan,
        home: RoomId,
        playfield: &PlayfieldConfig,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            kind: plan.kind,
            home,
            origin: entry_point(plan.from, playfield),
            motion: Motion::Transit {
                target: exit_point(plan.to, playfield),
                exit: plan.to,
                arrived: false,
            },
            speech: Speech::new(rng),
        }
    }

    pub(crate) fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub(crate) fn home(&self) -> RoomId {
        self.home
    }

    pub(crate) fn bounds(&self) -> Rect {
        Rect::from_origin(self.origin, Vec2::splat(OBSTACLE_SIZE))
    }

    /// Exit a transit obstacle has just reached, which marks it for removal.
    pub(crate) fn departure(&self) -> Option<Direction> {
        match self.motion {
            Motion::Transit {
                exit, arrived: true, ..
            } => Some(exit),
            _ => None,
        }
    }

    /// Advances movement and then speech by one frame.
    pub(crate) fn advance<R>(&mut self, playfield: &PlayfieldConfig, exits: &Exits, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let profile = self.kind.profile();
        let speed = profile.speed;

        match &mut self.motion {
            Motion::Wander {
                heading,
                elapsed,
                interval,
            } => {
                *elapsed += 1;
                if *elapsed >= *interval {
                    *heading = rng.gen_range(0.0..TAU);
                    *elapsed = 0;
                    *interval = rng.gen_range(60..=180);
                }

                let proposed = self.origin + Vec2::new(heading.cos(), heading.sin()) * speed;
                let interior = playfield.interior();
                let high_x = interior.right() - OBSTACLE_SIZE - WALL_MARGIN;
                let high_y = interior.bottom() - OBSTACLE_SIZE - WALL_MARGIN;

                if is_in_safe_zone(playfield, exits, proposed + Vec2::splat(OBSTACLE_SIZE / 2.0)) {
                    *heading = rng.gen_range(0.0..TAU);
                } else if proposed.x < interior.x + WALL_MARGIN || proposed.x > high_x {
                    *heading = PI - *heading;
                } else if proposed.y < interior.y + WALL_MARGIN || proposed.y > high_y {
                    *heading = -*heading;
                } else {
                    self.origin = proposed;
                }
            }
            Motion::Transit {
                target, arrived, ..
            } => {
                if !*arrived {
                    let delta = *target - self.origin;
                    let distance = delta.length();
                    if distance < ARRIVAL_DISTANCE {
                        *arrived = true;
                    } else {
                        self.origin += delta / distance * speed;
                    }
                }
            }
        }

        self.speech.advance(profile.quotes, rng);
    }

    pub(crate) fn snapshot(&self) -> ObstacleSnapshot {
        ObstacleSnapshot {
            kind: self.kind,
            mode: self.motion.mode(),
            bounds: self.bounds(),
            speech: self.speech.line,
        }
    }
}

/// Top-left corner of an obstacle standing just inside the exit.
fn entry_point(direction: Direction, playfield: &PlayfieldConfig) -> Vec2 {
    let center = playfield.center();
    let half = OBSTACLE_SIZE / 2.0;
    let padding = playfield.room_padding;
    match direction {
        Direction::North => Vec2::new(center.x - half, padding + WALL_MARGIN),
        Direction::South => Vec2::new(
            center.x - half,
            playfield.screen_height - padding - OBSTACLE_SIZE - WALL_MARGIN,
        ),
        Direction::East => Vec2::new(
            playfield.screen_width - padding - OBSTACLE_SIZE - WALL_MARGIN,
            center.y - half,
        ),
        Direction::West => Vec2::new(padding + WALL_MARGIN, center.y - half),
    }
}

/// Top-left corner of an obstacle that has walked out through the exit.
fn exit_point(direction: Direction, playfield: &PlayfieldConfig) -> Vec2 {
    let center = playfield.center();
    let half = OBSTACLE_SIZE / 2.0;
    let padding = playfield.room_padding;
    match direction {
        Direction::North => Vec2::new(center.x - half, padding - EXIT_OVERSHOOT),
        Direction::South => Vec2::new(
            center.x - half,
            playfield.screen_height - padding + EXIT_OVERSHOOT,
        ),
        Direction::East => Vec2::new(
            playfield.screen_width - padding + EXIT_OVERSHOOT,
            center.y - half,
        ),
        Direction::West => Vec2::new(padding - EXIT_OVERSHOOT, center.y - half),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn plan(from: Direction, to: Direction) -> TransitPlan {
        TransitPlan {
            from,
            to,
            kind: ObstacleKind::CasinoGoer,
        }
    }

    #[test]
    fn commuters_walk_straight_to_the_far_exit() {
        let playfield = PlayfieldConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut exits = Exits::default();
        let _ = exits.insert(Direction::North, RoomId::new(1));
        let _ = exits.insert(Direction::South, RoomId::new(2));
        let mut obstacle = Obstacle::commuting(
            &plan(Direction::North, Direction::South),
            RoomId::new(0),
            &playfield,
            &mut rng,
        );
        let start_x = obstacle.bounds().x;

        let mut ticks = 0;
        while obstacle.departure().is_none() {
            obstacle.advance(&playfield, &exits, &mut rng);
            assert!((obstacle.bounds().x - start_x).abs() < 1e-3);
            ticks += 1;
            assert!(ticks < 1_000, "commuter never arrived");
        }
        assert_eq!(obstacle.departure(), Some(Direction::South));
        assert!(obstacle.bounds().y > playfield.screen_height - playfield.room_padding);
    }

    #[test]
    fn wanderers_stay_inside_the_walls() {
        let playfield = PlayfieldConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let exits = Exits::default();
        let mut obstacle = Obstacle::wandering(
            ObstacleKind::CasinoGoer,
            RoomId::new(0),
            Vec2::new(400.0, 300.0),
            &mut rng,
        );
        for _ in 0..5_000 {
            obstacle.advance(&playfield, &exits, &mut rng);
            let bounds = obstacle.bounds();
            assert!(bounds.x >= playfield.room_padding + WALL_MARGIN);
            assert!(bounds.y >= playfield.room_padding + WALL_MARGIN);
            assert!(bounds.right() <= playfield.screen_width - playfield.room_padding);
            assert!(bounds.bottom() <= playfield.screen_height - playfield.room_padding);
            assert!(obstacle.departure().is_none());
        }
    }

    #[test]
    fn speech_alternates_between_lines_and_silence() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let quotes = ObstacleKind::Janitor.profile().quotes;
        let mut speech = Speech::new(&mut rng);
        let silence = speech.cooldown_ticks;
        for _ in 0..silence {
            assert_eq!(speech.line, None);
            speech.advance(quotes, &mut rng);
        }
        let line = speech.line.expect("cooldown elapsed");
        assert!(quotes.contains(&line));
        for _ in 0..SPEECH_DISPLAY_TICKS {
            speech.advance(quotes, &mut rng);
        }
        assert_eq!(speech.line, None);
        assert!((120..=240).contains(&speech.cooldown_ticks));
    }
}
