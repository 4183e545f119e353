/// Held-key tracking for the movement intents.
///
/// Terminals with keyboard enhancement report `Release`, so a key stays held
/// from its `Press` until then.  Classic terminals only ever send `Press`
/// (OS auto-repeat shows up as more presses), so there a key counts as held
/// while presses keep arriving.  The OS waits up to ~600 ms before the first
/// auto-repeat and then repeats at ≥ 15 Hz, hence two windows.

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::KeyCode;
use plane_dodge::entities::{Direction, Directions};

/// Longest silence between auto-repeats once they have started.
const REPEAT_WINDOW: Duration = Duration::from_millis(133);

/// Longest silence between the first press and the first auto-repeat.
const FIRST_REPEAT_WINDOW: Duration = Duration::from_millis(600);

/// W/A/S/D (either case) and the arrow keys map onto the same four intents.
pub fn direction_for(code: &KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

fn frames_in(window: Duration, frame_time: Duration) -> u64 {
    let frame = frame_time.as_nanos().max(1);
    let frames = (window.as_nanos() + frame - 1) / frame;
    u64::try_from(frames).unwrap_or(u64::MAX).max(1)
}

#[derive(Clone, Copy, Debug)]
struct KeyState {
    last_seen: u64,
    /// Auto-repeat has started, so the short window applies.
    repeating: bool,
}

#[derive(Debug)]
pub struct HeldKeys {
    keys: HashMap<KeyCode, KeyState>,
    releases_reported: bool,
    repeat_frames: u64,
    first_repeat_frames: u64,
}

impl HeldKeys {
    pub fn new(releases_reported: bool, frame_time: Duration) -> Self {
        HeldKeys {
            keys: HashMap::new(),
            releases_reported,
            repeat_frames: frames_in(REPEAT_WINDOW, frame_time),
            first_repeat_frames: frames_in(FIRST_REPEAT_WINDOW, frame_time),
        }
    }

    pub fn press(&mut self, code: KeyCode, frame: u64) {
        // Without release events a press on a key that is still held is the
        // OS auto-repeat.
        let repeating = !self.releases_reported && self.is_held(&code, frame);
        self.keys.insert(code, KeyState { last_seen: frame, repeating });
    }

    pub fn repeat(&mut self, code: KeyCode, frame: u64) {
        self.keys.insert(code, KeyState { last_seen: frame, repeating: true });
    }

    pub fn release(&mut self, code: &KeyCode) {
        self.keys.remove(code);
    }

    pub fn is_held(&self, code: &KeyCode, frame: u64) -> bool {
        let Some(state) = self.keys.get(code) else {
            return false;
        };
        if self.releases_reported {
            return true;
        }
        let window = if state.repeating {
            self.repeat_frames
        } else {
            self.first_repeat_frames
        };
        frame.saturating_sub(state.last_seen) <= window
    }

    /// Intent flags for `frame`: a direction is set while any of its keys is
    /// held.
    pub fn directions(&self, frame: u64) -> Directions {
        let mut directions = Directions::default();
        for code in self.keys.keys() {
            if let Some(direction) = direction_for(code) {
                if self.is_held(code, frame) {
                    directions.set(direction, true);
                }
            }
        }
        directions
    }
}
