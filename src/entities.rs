/// All game entity types — pure data, no logic.
///
/// Coordinates are terminal cells stored as `f32` so sub-cell speeds stay
/// smooth.  Origin is the top-left corner of the playground, y grows down.

use std::time::Duration;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned rectangle: top-left corner plus extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub position: Position,
    pub size: Size,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }
}

/// The playground area inside the border.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

// ── Falling / crossing objects ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Falls down; +1 score on pickup.
    Star,
    /// Falls down; refuels the plane on pickup.
    Parachute,
    /// Flies left; ends the run on contact.
    Bird,
    /// Drifts left; decorative only.
    Cloud,
}

/// Direction of travel, implied by the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Travel {
    /// Moves towards +y.
    Falling,
    /// Moves towards −x.
    Crossing,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Star,
        EntityKind::Parachute,
        EntityKind::Bird,
        EntityKind::Cloud,
    ];

    pub fn travel(self) -> Travel {
        match self {
            EntityKind::Star | EntityKind::Parachute => Travel::Falling,
            EntityKind::Bird | EntityKind::Cloud => Travel::Crossing,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub position: Position,
    /// Cells per frame along the kind's axis of travel.
    pub speed: f32,
    pub size: Size,
    pub kind: EntityKind,
}

impl Entity {
    pub fn rect(&self) -> Rect {
        Rect {
            position: self.position,
            size: self.size,
        }
    }
}

// ── Plane ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Intent flags: set while a movement key is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub position: Position,
    pub size: Size,
    pub speed: f32,
    pub directions: Directions,
}

impl Plane {
    pub fn rect(&self) -> Rect {
        Rect {
            position: self.position,
            size: self.size,
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Start screen; nothing moves.
    Idle,
    Running,
    Paused,
    /// Results are on screen until the player restarts.
    Over,
}

/// Score and play time of one finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub score: u32,
    pub time: Duration,
}
