use glam::Vec2;
use venue_maze_core::{NpcSnapshot, Rect};
use venue_maze_system_hints::Hint;

const NPC_SIZE: f32 = 35.0;
const INTERACTION_RADIUS: f32 = 60.0;
const DIALOGUE_TICKS: u32 = 180;

/// Stationary staff member carrying a single hint about the goal room.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Npc {
    origin: Vec2,
    hint: Hint,
    dialogue_ticks: u32,
}

impl Npc {
    pub(crate) fn new(origin: Vec2, hint: Hint) -> Self {
        Self {
            origin,
            hint,
            dialogue_ticks: 0,
        }
    }

    pub(crate) fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Measured between the top-left corners of both boxes.
    pub(crate) fn within_reach(&self, player: &Rect) -> bool {
        self.origin.distance(player.origin()) < INTERACTION_RADIUS
    }

    /// Opens (or re-opens) the dialogue box and returns the spoken line.
    pub(crate) fn interact(&mut self) -> String {
        self.dialogue_ticks = DIALOGUE_TICKS;
        self.hint.spoken_text()
    }

    pub(crate) fn tick(&mut self) {
        self.dialogue_ticks = self.dialogue_ticks.saturating_sub(1);
    }

    pub(crate) fn snapshot(&self) -> NpcSnapshot {
        NpcSnapshot {
            bounds: Rect::from_origin(self.origin, Vec2::splat(NPC_SIZE)),
            dialogue: (self.dialogue_ticks > 0).then(|| self.hint.spoken_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use venue_maze_core::Direction;
    use venue_maze_system_hints::Phrasing;

    #[test]
    fn dialogue_shows_for_a_fixed_window_and_resets_on_repeat() {
        let mut npc = Npc::new(
            Vec2::new(300.0, 300.0),
            Hint::new(Direction::West, Phrasing::Heading, true),
        );
        assert_eq!(npc.snapshot().dialogue, None);

        let spoken = npc.interact();
        assert_eq!(spoken, "Go west and you'll find the keynote.");
        for _ in 0..100 {
            npc.tick();
        }
        let _ = npc.interact();
        for _ in 0..DIALOGUE_TICKS - 1 {
            npc.tick();
        }
        assert_eq!(npc.snapshot().dialogue.as_deref(), Some(spoken.as_str()));
        npc.tick();
        assert_eq!(npc.snapshot().dialogue, None);
    }

    #[test]
    fn reach_is_measured_between_corners() {
        let npc = Npc::new(
            Vec2::new(300.0, 300.0),
            Hint::new(Direction::North, Phrasing::Guess, false),
        );
        assert!(npc.within_reach(&Rect::new(340.0, 340.0, 30.0, 30.0)));
        assert!(!npc.within_reach(&Rect::new(360.0, 300.0, 30.0, 30.0)));
    }
}
