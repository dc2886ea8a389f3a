use glam::Vec2;
use venue_maze_core::{Direction, MoveIntent, PlayfieldConfig, Rect};

use crate::room::Room;

const ENTRANCE_MARGIN: f32 = 10.0;

/// Player avatar: a square box moved by per-frame intents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Player {
    origin: Vec2,
    size: f32,
}

impl Player {
    /// Places the player's top-left corner on the center of the playfield.
    pub(crate) fn spawn(playfield: &PlayfieldConfig) -> Self {
        Self {
            origin: playfield.center(),
            size: playfield.player_size,
        }
    }

    pub(crate) fn bounds(&self) -> Rect {
        Rect::from_origin(self.origin, Vec2::splat(self.size))
    }

    /// Moves the player, resolving each axis independently.
    ///
    /// The wall band may only be entered through an exit gap, and fixtures
    /// block movement along the axis that would overlap them.
    pub(crate) fn steer(&mut self, intent: MoveIntent, playfield: &PlayfieldConfig, room: &Room) {
        let proposed = self.origin + intent.as_vec2() * playfield.player_speed;
        let half = self.size / 2.0;
        let center = playfield.center();
        let gap = playfield.exit_size / 2.0;
        let padding = playfield.room_padding;
        let exits = room.exits();

        let in_vertical_gap = (proposed.y + half - center.y).abs() <= gap;
        let in_horizontal_gap = (proposed.x + half - center.x).abs() <= gap;

        let mut move_x = if proposed.x < padding {
            exits.contains(Direction::West) && in_vertical_gap
        } else if proposed.x > playfield.screen_width - padding - self.size {
            exits.contains(Direction::East) && in_vertical_gap
        } else {
            true
        };
        let mut move_y = if proposed.y < padding {
            exits.contains(Direction::North) && in_horizontal_gap
        } else if proposed.y > playfield.screen_height - padding - self.size {
            exits.contains(Direction::South) && in_horizontal_gap
        } else {
            true
        };

        let footprint = Vec2::splat(self.size);
        if move_x && room.blocks(&Rect::from_origin(Vec2::new(proposed.x, self.origin.y), footprint)) {
            move_x = false;
        }
        if move_y && room.blocks(&Rect::from_origin(Vec2::new(self.origin.x, proposed.y), footprint)) {
            move_y = false;
        }

        if move_x {
            self.origin.x = proposed.x;
        }
        if move_y {
            self.origin.y = proposed.y;
        }
    }

    /// Repositions the player just inside the entrance after leaving through `travelled`.
    pub(crate) fn arrive(&mut self, travelled: Direction, playfield: &PlayfieldConfig) {
        let padding = playfield.room_padding;
        match travelled {
            Direction::North => {
                self.origin.y = playfield.screen_height - padding - self.size - ENTRANCE_MARGIN;
            }
            Direction::South => self.origin.y = padding + ENTRANCE_MARGIN,
            Direction::East => self.origin.x = padding + ENTRANCE_MARGIN,
            Direction::West => {
                self.origin.x = playfield.screen_width - padding - self.size - ENTRANCE_MARGIN;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_lands_just_inside_the_opposite_wall() {
        let playfield = PlayfieldConfig::default();
        let spawn = Player::spawn(&playfield);
        let size = playfield.player_size;
        let padding = playfield.room_padding;
        let far_y = playfield.screen_height - padding - size - ENTRANCE_MARGIN;
        let far_x = playfield.screen_width - padding - size - ENTRANCE_MARGIN;
        let near = padding + ENTRANCE_MARGIN;

        let cases = [
            (Direction::North, Vec2::new(spawn.origin.x, far_y)),
            (Direction::South, Vec2::new(spawn.origin.x, near)),
            (Direction::East, Vec2::new(near, spawn.origin.y)),
            (Direction::West, Vec2::new(far_x, spawn.origin.y)),
        ];
        for (travelled, expected) in cases {
            let mut player = spawn;
            player.arrive(travelled, &playfield);
            assert_eq!(player.bounds().origin(), expected, "{travelled}");
        }
        assert_eq!(far_y, 678.0);
    }

    #[test]
    fn spawn_puts_the_corner_on_the_center() {
        let playfield = PlayfieldConfig::default();
        let player = Player::spawn(&playfield);
        assert_eq!(player.bounds().origin(), playfield.center());
        assert_eq!(player.bounds().width, playfield.player_size);
    }
}
