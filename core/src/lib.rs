#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Venue Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! once per frame, the world executes those commands via its `apply` entry
//! point, and then reports [`Event`] values describing what happened. Adapters
//! never reach into world state directly; they read the snapshot types defined
//! here through the world's query functions.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Venue Maze. Find the keynote hall!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation by a single fixed frame.
    Tick {
        /// Movement requested by the player during this frame.
        intent: MoveIntent,
        /// Whether the player asked to talk to a nearby staff member.
        interact: bool,
    },
    /// Requests a brand new maze once the current one has been solved.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Number of frames simulated since the maze was built.
        tick: u64,
    },
    /// Confirms that a room materialised its lazily created contents.
    RoomPopulated {
        /// Room that was populated.
        room: RoomId,
        /// Number of immovable fixtures placed.
        statics: usize,
        /// Number of wandering obstacles placed.
        obstacles: usize,
        /// Number of staff members placed.
        npcs: usize,
    },
    /// Announces that a through-traffic obstacle stepped into a room.
    ObstacleEnteredTraffic {
        /// Room hosting the obstacle.
        room: RoomId,
        /// Kind of obstacle spawned.
        kind: ObstacleKind,
        /// Exit the obstacle appeared from.
        from: Direction,
        /// Exit the obstacle walks toward.
        to: Direction,
    },
    /// Reports that a through-traffic obstacle left through its destination exit.
    ObstacleDeparted {
        /// Room the obstacle left.
        room: RoomId,
        /// Kind of obstacle that departed.
        kind: ObstacleKind,
        /// Exit the obstacle walked through.
        exit: Direction,
    },
    /// Reports that the player bumped into a moving obstacle and was sent back.
    PlayerCaught {
        /// Room in which the collision happened.
        room: RoomId,
    },
    /// Confirms that the player walked through an exit into a neighbouring room.
    RoomEntered {
        /// Room the player left.
        from: RoomId,
        /// Room the player now occupies.
        to: RoomId,
        /// Direction of travel through the exit.
        direction: Direction,
    },
    /// Reports the hint a staff member shared with the player.
    HintShown {
        /// Room hosting the staff member.
        room: RoomId,
        /// Index of the staff member within the room.
        npc: usize,
        /// Text displayed to the player.
        text: String,
    },
    /// Announces that the player found the goal room.
    GoalReached {
        /// Identifier of the goal room.
        room: RoomId,
        /// Number of room transitions performed.
        steps: u32,
        /// Number of frames simulated before arriving.
        elapsed_ticks: u64,
        /// Number of distinct rooms visited.
        explored: usize,
    },
    /// Confirms that a fresh maze replaced the solved one.
    GameRestarted {
        /// Number of rooms contained in the new maze.
        rooms: usize,
    },
    /// Reports that a restart request was rejected.
    RestartRejected {
        /// Specific reason the restart failed.
        reason: RestartError,
    },
}

/// Cardinal directions that connect neighbouring rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward decreasing grid rows; the top wall of a room.
    North,
    /// Toward increasing grid rows; the bottom wall of a room.
    South,
    /// Toward increasing grid columns; the right wall of a room.
    East,
    /// Toward decreasing grid columns; the left wall of a room.
    West,
}

impl Direction {
    /// Every direction in canonical scan order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Returns the direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Grid offset travelled when stepping once in this direction.
    #[must_use]
    pub const fn grid_delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// Lowercase English name used in dialogue.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::North => 0,
            Self::South => 1,
            Self::East => 2,
            Self::West => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unique identifier assigned to a room, allocated sequentially at generation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new room identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the room inside dense, id-ordered storage.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Location of a room on the unbounded integer layout grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    x: i32,
    y: i32,
}

impl GridPos {
    /// Grid cell holding the first generated room.
    pub const ORIGIN: GridPos = GridPos::new(0, 0);

    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell; grows eastward.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell; grows southward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighbouring cell in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.grid_delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Signed offset that leads from this cell to `other`.
    #[must_use]
    pub const fn offset_to(self, other: GridPos) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }

    /// Largest absolute coordinate, i.e. the Chebyshev distance from the origin.
    #[must_use]
    pub fn extent(self) -> u32 {
        self.x.unsigned_abs().max(self.y.unsigned_abs())
    }
}

/// Directional connections of a single room; at most one neighbour per direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Exits {
    slots: [Option<RoomId>; 4],
}

impl Exits {
    /// Neighbour reachable through the provided direction, if any.
    #[must_use]
    pub const fn get(&self, direction: Direction) -> Option<RoomId> {
        self.slots[direction.slot()]
    }

    /// Reports whether a connection leaves through the provided direction.
    #[must_use]
    pub const fn contains(&self, direction: Direction) -> bool {
        self.slots[direction.slot()].is_some()
    }

    /// Connects the provided direction, returning the neighbour it replaced.
    pub fn insert(&mut self, direction: Direction, room: RoomId) -> Option<RoomId> {
        self.slots[direction.slot()].replace(room)
    }

    /// Iterates over the existing connections in canonical direction order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, RoomId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.get(direction).map(|room| (direction, room)))
    }

    /// Directions that carry a connection, in canonical order.
    #[must_use]
    pub fn directions(&self) -> Vec<Direction> {
        self.iter().map(|(direction, _)| direction).collect()
    }

    /// Number of connections leaving the room.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Reports whether the room is isolated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Axis-aligned rectangle expressed in playfield units with the origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle anchored at `origin` with the provided size.
    #[must_use]
    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Geometric center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Reports whether the two rectangles overlap. Touching edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Visual appearance applied to an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tint {
    red: u8,
    green: u8,
    blue: u8,
}

impl Tint {
    /// Creates a new tint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the tint.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the tint.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the tint.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Decor style of a room; drives how crowded it gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Gaming floor furnished with slot machines.
    Casino,
    /// Exhibition hall staffed by extra helpers.
    Expo,
    /// Plain hotel corridor.
    Corridor,
}

impl Theme {
    /// Every theme, in selection order.
    pub const ALL: [Theme; 3] = [Theme::Casino, Theme::Expo, Theme::Corridor];
}

/// Kinds of moving obstacles that roam the venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Attendee hunting for the right session.
    ConferenceGoer,
    /// Gambler on a lucky streak.
    CasinoGoer,
    /// Cleaning crew member.
    Janitor,
    /// Content creator who stops for every photo.
    Influencer,
    /// Someone glued to a phone call.
    PhonePerson,
}

impl ObstacleKind {
    /// Every kind, in selection order.
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::ConferenceGoer,
        ObstacleKind::CasinoGoer,
        ObstacleKind::Janitor,
        ObstacleKind::Influencer,
        ObstacleKind::PhonePerson,
    ];

    /// Kinds that walk between exits as through traffic.
    pub const COMMUTERS: [ObstacleKind; 4] = [
        ObstacleKind::ConferenceGoer,
        ObstacleKind::CasinoGoer,
        ObstacleKind::Janitor,
        ObstacleKind::PhonePerson,
    ];

    /// Constant tuning data associated with the kind.
    #[must_use]
    pub const fn profile(self) -> &'static ObstacleProfile {
        match self {
            Self::ConferenceGoer => &CONFERENCE_GOER,
            Self::CasinoGoer => &CASINO_GOER,
            Self::Janitor => &JANITOR,
            Self::Influencer => &INFLUENCER,
            Self::PhonePerson => &PHONE_PERSON,
        }
    }
}

/// Per-kind constant table entry.
#[derive(Debug)]
pub struct ObstacleProfile {
    /// Distance travelled per frame.
    pub speed: f32,
    /// Single-letter badge shown on the sprite.
    pub label: char,
    /// Body colour.
    pub tint: Tint,
    /// Lines the obstacle mutters while walking around.
    pub quotes: &'static [&'static str],
}

const CONFERENCE_GOER: ObstacleProfile = ObstacleProfile {
    speed: 1.5,
    label: 'C',
    tint: Tint::from_rgb(100, 150, 200),
    quotes: &[
        "Was that the keynote or the warm-up act?",
        "They promised hoodies at this booth.",
        "Room 4B? Or was it 4D?",
        "Third espresso and still sleepy...",
        "Everything is a microservice now.",
        "My badge scanner beeps at me.",
        "Is this the advanced track?",
        "I heard there are free stickers!",
        "The map app gave up on me.",
        "Do they serve lunch after this?",
    ],
};

const CASINO_GOER: ObstacleProfile = ObstacleProfile {
    speed: 2.5,
    label: 'G',
    tint: Tint::from_rgb(200, 50, 50),
    quotes: &[
        "Tonight is my night!",
        "Just one more pull...",
        "Which way to the buffet?",
        "I'm only here for the view.",
        "Let it ride!",
        "Red, definitely red.",
        "Dealer's been cold all evening.",
        "I'm up twelve dollars!",
        "Lights! Bells! Money!",
        "Feels like a jackpot day.",
    ],
};

const JANITOR: ObstacleProfile = ObstacleProfile {
    speed: 1.0,
    label: 'J',
    tint: Tint::from_rgb(150, 150, 50),
    quotes: &[
        "Careful, floor's still damp.",
        "I mopped that five minutes ago.",
        "Here we go again...",
        "Anyone seen my bucket?",
        "This carpet never ends.",
        "Another latte on the carpet...",
        "Nearly finished this wing.",
        "Mind your step, coming through.",
        "Double shift, double fun.",
        "Spill reported near the escalators!",
    ],
};

const INFLUENCER: ObstacleProfile = ObstacleProfile {
    speed: 0.5,
    label: 'I',
    tint: Tint::from_rgb(255, 105, 180),
    quotes: &[
        "Hold still, golden hour lighting!",
        "One more take, I blinked.",
        "Smile for the story!",
        "Would this get likes?",
        "My audience needs to see this.",
        "Could you snap one of me?",
        "Work that angle!",
        "Posting this immediately.",
        "This is going everywhere!",
        "Remember to tag me!",
    ],
};

const PHONE_PERSON: ObstacleProfile = ObstacleProfile {
    speed: 1.2,
    label: 'P',
    tint: Tint::from_rgb(100, 200, 100),
    quotes: &[
        "Yeah, I'm somewhere near the thing.",
        "You're breaking up...",
        "Zero bars in here.",
        "Let me ring you back.",
        "Sorry, say that again?",
        "No idea where I am.",
        "Hang on, opening the map.",
        "Which entrance are you at?",
        "This building is enormous!",
        "I still can't find the hall...",
    ],
};

/// Kinds of immovable fixtures that block movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKind {
    /// Casino slot machine.
    SlotMachine,
}

impl FixtureKind {
    /// Footprint of the fixture in playfield units.
    #[must_use]
    pub const fn size(self) -> (f32, f32) {
        match self {
            Self::SlotMachine => (40.0, 50.0),
        }
    }
}

/// Movement behaviour assigned to an obstacle when it is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementMode {
    /// Bounces around the room at random, shying away from exits.
    Wander,
    /// Walks from one exit to another and leaves the room.
    Transit,
}

/// Coarse state of the game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Regular exploration.
    Exploring,
    /// A respawn fade is playing; simulation keeps running underneath.
    Transitioning,
    /// The goal room was reached; simulation is frozen until restart.
    Won,
}

/// Per-frame movement request, each axis clamped to `-1..=1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    x: i8,
    y: i8,
}

impl MoveIntent {
    /// Intent that keeps the player still.
    pub const IDLE: MoveIntent = MoveIntent { x: 0, y: 0 };

    /// Creates an intent from raw axis values, clamping each to `-1..=1`.
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: x.clamp(-1, 1) as i8,
            y: y.clamp(-1, 1) as i8,
        }
    }

    /// Adds two bindings together, e.g. arrow keys and letter keys.
    #[must_use]
    pub fn combine(self, other: MoveIntent) -> Self {
        Self::new(
            i32::from(self.x) + i32::from(other.x),
            i32::from(self.y) + i32::from(other.y),
        )
    }

    /// Horizontal component; positive points east.
    #[must_use]
    pub const fn x(&self) -> i8 {
        self.x
    }

    /// Vertical component; positive points south.
    #[must_use]
    pub const fn y(&self) -> i8 {
        self.y
    }

    /// Intent as a vector suitable for scaling by a speed.
    #[must_use]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(f32::from(self.x), f32::from(self.y))
    }
}

/// Fixed geometry of the playfield shared by every room.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    /// Width of the visible playfield.
    pub screen_width: f32,
    /// Height of the visible playfield.
    pub screen_height: f32,
    /// Thickness of the wall band surrounding the walkable interior.
    pub room_padding: f32,
    /// Width of the gap carved into a wall by an exit.
    pub exit_size: f32,
    /// Side length of the player's square bounding box.
    pub player_size: f32,
    /// Distance the player travels per frame along each axis.
    pub player_speed: f32,
}

impl PlayfieldConfig {
    /// Center of the playfield.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.screen_width / 2.0, self.screen_height / 2.0)
    }

    /// Walkable interior enclosed by the walls.
    #[must_use]
    pub fn interior(&self) -> Rect {
        Rect::new(
            self.room_padding,
            self.room_padding,
            self.screen_width - 2.0 * self.room_padding,
            self.screen_height - 2.0 * self.room_padding,
        )
    }
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            screen_width: 1024.0,
            screen_height: 768.0,
            room_padding: 50.0,
            exit_size: 120.0,
            player_size: 30.0,
            player_speed: 4.0,
        }
    }
}

/// Immutable representation of a fixture used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixtureSnapshot {
    /// Kind of fixture.
    pub kind: FixtureKind,
    /// Area blocked by the fixture.
    pub bounds: Rect,
}

/// Immutable representation of a moving obstacle used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleSnapshot {
    /// Kind of obstacle.
    pub kind: ObstacleKind,
    /// Movement behaviour of the obstacle.
    pub mode: MovementMode,
    /// Area occupied by the obstacle.
    pub bounds: Rect,
    /// Speech bubble currently displayed, if any.
    pub speech: Option<&'static str>,
}

/// Immutable representation of a staff member used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct NpcSnapshot {
    /// Area occupied by the staff member.
    pub bounds: Rect,
    /// Dialogue box currently displayed, if any.
    pub dialogue: Option<String>,
}

/// Read-only snapshot of a single room for presentation purposes.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomSnapshot {
    /// Identifier of the room.
    pub id: RoomId,
    /// Display name of the room.
    pub name: &'static str,
    /// Decor style of the room.
    pub theme: Theme,
    /// Whether this is the goal room.
    pub is_goal: bool,
    /// Connections leaving the room.
    pub exits: Exits,
    /// Painted-on exit that leads nowhere, drawn only where no real exit exists.
    pub decoy_exit: Option<Direction>,
    /// Whether the casino jackpot banner is lit.
    pub jackpot_lit: bool,
    /// Immovable fixtures in placement order.
    pub fixtures: Vec<FixtureSnapshot>,
    /// Moving obstacles in spawn order.
    pub obstacles: Vec<ObstacleSnapshot>,
    /// Staff members in placement order.
    pub npcs: Vec<NpcSnapshot>,
}

/// Counters displayed by the heads-up display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudSnapshot {
    /// Coarse state of the game loop.
    pub phase: GamePhase,
    /// Frames simulated since the maze was built.
    pub elapsed_ticks: u64,
    /// Room transitions performed.
    pub steps: u32,
    /// Distinct rooms visited, including the start room.
    pub explored: usize,
    /// Frames of invulnerability remaining.
    pub invincibility_ticks: u32,
    /// Progress of the respawn fade in the range `0..=255`, if playing.
    pub fade: Option<u32>,
}

/// Reasons maze generation can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GenerationError {
    /// A maze needs at least one room.
    #[error("a maze needs at least one room")]
    NoRooms,
    /// The bounded layout grid ran out of free cells before the goal was placed.
    #[error("layout grid saturated after {built} of {requested} rooms")]
    FrontierExhausted {
        /// Number of rooms requested.
        requested: usize,
        /// Number of rooms built before growth stalled.
        built: usize,
    },
}

/// Reasons a restart request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum RestartError {
    /// The goal has not been reached yet.
    #[error("the current maze has not been solved")]
    NotFinished,
    /// A replacement maze could not be generated.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
