#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Through-traffic policy deciding when and where commuters cross a room.
//!
//! The world asks this system once per frame whether the current room should
//! receive a new commuter. A commuter enters through one exit and walks to a
//! different one. The exit the player just came through is kept clear while
//! its entrance cooldown runs, so nobody appears right behind the player.

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use venue_maze_core::{Direction, Exits, ObstacleKind};

/// Tuning knobs for through traffic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-frame probability of a commuter appearing in an eligible room.
    pub spawn_chance: f64,
    /// Rooms already holding this many obstacles receive no more commuters.
    pub obstacle_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spawn_chance: 0.015,
            obstacle_cap: 10,
        }
    }
}

/// Exit the player most recently used to enter a room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntranceGuard {
    direction: Option<Direction>,
    cooldown_ticks: u32,
}

impl EntranceGuard {
    /// Guards `direction` for `cooldown_ticks` frames.
    #[must_use]
    pub const fn new(direction: Direction, cooldown_ticks: u32) -> Self {
        Self {
            direction: Some(direction),
            cooldown_ticks,
        }
    }

    /// Exit last used by the player, if any.
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Frames left before the entrance may host commuters again.
    #[must_use]
    pub const fn cooldown_ticks(&self) -> u32 {
        self.cooldown_ticks
    }

    /// Exit that must not host commuters right now.
    #[must_use]
    pub const fn blocked(&self) -> Option<Direction> {
        if self.cooldown_ticks > 0 {
            self.direction
        } else {
            None
        }
    }

    /// Advances the cooldown by a single frame.
    pub fn tick(&mut self) {
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
    }
}

/// Commuter chosen to cross a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitPlan {
    /// Exit the commuter appears at.
    pub from: Direction,
    /// Exit the commuter leaves through.
    pub to: Direction,
    /// Kind of commuter.
    pub kind: ObstacleKind,
}

/// Pure system that schedules through traffic.
#[derive(Clone, Copy, Debug, Default)]
pub struct Traffic {
    config: Config,
}

impl Traffic {
    /// Creates a new traffic system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Rolls for a commuter this frame and plans its route when one appears.
    ///
    /// The random roll only happens for rooms with at least two exits and
    /// fewer obstacles than the cap.
    pub fn maybe_plan<R>(
        &self,
        exits: &Exits,
        obstacle_count: usize,
        guard: &EntranceGuard,
        rng: &mut R,
    ) -> Option<TransitPlan>
    where
        R: Rng + ?Sized,
    {
        let eligible = exits.len() >= 2 && obstacle_count < self.config.obstacle_cap;
        if !eligible || !rng.gen_bool(self.config.spawn_chance.clamp(0.0, 1.0)) {
            return None;
        }
        plan_route(exits, guard, rng)
    }
}

/// Picks an entry exit, a distinct leaving exit, and a commuter kind.
///
/// Returns `None` when the room has fewer than two exits or when every usable
/// entry is guarded.
pub fn plan_route<R>(exits: &Exits, guard: &EntranceGuard, rng: &mut R) -> Option<TransitPlan>
where
    R: Rng + ?Sized,
{
    let directions = exits.directions();
    if directions.len() < 2 {
        return None;
    }

    let entries: Vec<Direction> = directions
        .iter()
        .copied()
        .filter(|direction| Some(*direction) != guard.blocked())
        .collect();
    let from = *entries.choose(rng)?;

    let leaves: Vec<Direction> = directions
        .iter()
        .copied()
        .filter(|direction| *direction != from)
        .collect();
    let to = *leaves.choose(rng)?;

    let kind = *ObstacleKind::COMMUTERS.choose(rng)?;
    Some(TransitPlan { from, to, kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use venue_maze_core::RoomId;

    fn exits(directions: &[Direction]) -> Exits {
        let mut exits = Exits::default();
        for (index, direction) in directions.iter().enumerate() {
            let _ = exits.insert(*direction, RoomId::new(index as u32 + 1));
        }
        exits
    }

    #[test]
    fn single_exit_rooms_never_get_traffic() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let traffic = Traffic::new(Config {
            spawn_chance: 1.0,
            obstacle_cap: 10,
        });
        let room = exits(&[Direction::North]);
        for _ in 0..100 {
            assert!(traffic
                .maybe_plan(&room, 0, &EntranceGuard::default(), &mut rng)
                .is_none());
        }
    }

    #[test]
    fn crowded_rooms_never_get_traffic() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let traffic = Traffic::new(Config {
            spawn_chance: 1.0,
            obstacle_cap: 3,
        });
        let room = exits(&[Direction::North, Direction::South]);
        assert!(traffic
            .maybe_plan(&room, 3, &EntranceGuard::default(), &mut rng)
            .is_none());
        assert!(traffic
            .maybe_plan(&room, 2, &EntranceGuard::default(), &mut rng)
            .is_some());
    }

    #[test]
    fn guarded_entrance_never_hosts_arrivals() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let room = exits(&[Direction::West, Direction::East, Direction::South]);
        let guard = EntranceGuard::new(Direction::West, 180);
        for _ in 0..500 {
            let plan = plan_route(&room, &guard, &mut rng).expect("route");
            assert_ne!(plan.from, Direction::West);
            assert_ne!(plan.from, plan.to);
            assert_ne!(plan.kind, ObstacleKind::Influencer);
        }
    }

    #[test]
    fn two_exit_room_with_guarded_entrance_starts_at_the_other_exit() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let room = exits(&[Direction::North, Direction::South]);
        let guard = EntranceGuard::new(Direction::South, 1);
        let plan = plan_route(&room, &guard, &mut rng).expect("route");
        assert_eq!((plan.from, plan.to), (Direction::North, Direction::South));
    }

    #[test]
    fn expired_guard_releases_the_entrance() {
        let mut guard = EntranceGuard::new(Direction::East, 2);
        assert_eq!(guard.blocked(), Some(Direction::East));
        guard.tick();
        guard.tick();
        assert_eq!(guard.blocked(), None);
        guard.tick();
        assert_eq!(guard.cooldown_ticks(), 0);
        assert_eq!(guard.direction(), Some(Direction::East));
    }
}
