#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Directional hints handed out by venue staff.
//!
//! A hint is derived once from the grid offset between a staff member's room
//! and the goal room. Some staff members are unreliable: they phrase the same
//! sentence but swap the direction for its opposite.

use rand::{seq::SliceRandom, Rng};
use venue_maze_core::Direction;

/// Probability that a freshly hired staff member misleads the player.
pub const LIE_CHANCE: f64 = 0.4;

/// Sentence shapes a hint may take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phrasing {
    /// States where the goal lies.
    Location,
    /// Tells the player where to head.
    Heading,
    /// Friendly suggestion.
    Suggestion,
    /// Hedged guess.
    Guess,
}

impl Phrasing {
    /// Every phrasing, in selection order.
    pub const ALL: [Phrasing; 4] = [
        Phrasing::Location,
        Phrasing::Heading,
        Phrasing::Suggestion,
        Phrasing::Guess,
    ];

    /// Renders the sentence around the provided direction word.
    #[must_use]
    pub fn render(self, direction: Direction) -> String {
        match self {
            Self::Location => format!("The keynote hall is off to the {direction}!"),
            Self::Heading => format!("Go {direction} and you'll find the keynote."),
            Self::Suggestion => format!("Try heading {direction}, friend!"),
            Self::Guess => format!("Pretty sure it's {direction} of here."),
        }
    }
}

/// Hint carried by a single staff member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hint {
    direction: Direction,
    phrasing: Phrasing,
    honest: bool,
}

impl Hint {
    /// Creates a hint with explicit field values.
    #[must_use]
    pub const fn new(direction: Direction, phrasing: Phrasing, honest: bool) -> Self {
        Self {
            direction,
            phrasing,
            honest,
        }
    }

    /// Draws a hint for a room that sits `offset` grid cells away from the goal.
    ///
    /// `offset` is `goal - room`. The phrasing is drawn before the honesty coin.
    pub fn compose<R>(offset: (i32, i32), rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let direction = dominant_direction(offset);
        let phrasing = Phrasing::ALL
            .choose(rng)
            .copied()
            .unwrap_or(Phrasing::Location);
        let honest = !rng.gen_bool(LIE_CHANCE);
        Self::new(direction, phrasing, honest)
    }

    /// True direction toward the goal.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the staff member tells the truth.
    #[must_use]
    pub const fn is_honest(&self) -> bool {
        self.honest
    }

    /// Sentence naming the true direction.
    #[must_use]
    pub fn truthful_text(&self) -> String {
        self.phrasing.render(self.direction)
    }

    /// Same sentence with the direction swapped for its opposite.
    #[must_use]
    pub fn misleading_text(&self) -> String {
        self.phrasing.render(self.direction.opposite())
    }

    /// Sentence the staff member actually says.
    #[must_use]
    pub fn spoken_text(&self) -> String {
        if self.honest {
            self.truthful_text()
        } else {
            self.misleading_text()
        }
    }
}

/// Cardinal direction along the axis with the larger absolute offset.
///
/// Ties, including a zero offset, resolve to the vertical axis; a
/// non-positive vertical offset points north.
#[must_use]
pub fn dominant_direction((dx, dy): (i32, i32)) -> Direction {
    if dx.unsigned_abs() > dy.unsigned_abs() {
        if dx > 0 {
            Direction::East
        } else {
            Direction::West
        }
    } else if dy > 0 {
        Direction::South
    } else {
        Direction::North
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_resolve_vertically() {
        assert_eq!(dominant_direction((3, 3)), Direction::South);
        assert_eq!(dominant_direction((-2, -2)), Direction::North);
        assert_eq!(dominant_direction((0, 0)), Direction::North);
    }

    #[test]
    fn misleading_text_names_the_opposite_direction() {
        let hint = Hint::new(Direction::East, Phrasing::Suggestion, false);
        assert_eq!(hint.truthful_text(), "Try heading east, friend!");
        assert_eq!(hint.misleading_text(), "Try heading west, friend!");
        assert_eq!(hint.spoken_text(), hint.misleading_text());
    }
}
