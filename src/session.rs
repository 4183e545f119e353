/// Game session orchestrator.
///
/// Owns every piece of mutable game state (playfield, clock, score, fuel,
/// results) and the explicit session state machine.  The frontend drives it
/// with input calls and one `update` per frame, and reacts to the returned
/// [`GameEvent`]s (sounds, overlays).

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::clock::GameClock;
use crate::compute::{self, Playfield};
use crate::config::Settings;
use crate::entities::{
    Direction, Directions, EntityKind, GameResult, Plane, SessionState, Viewport,
};

// ── State machine ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Finish,
    Reset,
}

impl SessionState {
    /// Transition table.  `None` means the command does not apply in this
    /// state and is ignored.
    pub fn next(self, command: Command) -> Option<SessionState> {
        use Command::*;
        use SessionState::*;
        match (self, command) {
            (Idle, Start) => Some(Running),
            (Running, Pause) => Some(Paused),
            (Paused, Resume) => Some(Running),
            (Running, Finish) => Some(Over),
            (Over, Reset) => Some(Idle),
            _ => None,
        }
    }
}

/// Things the frontend should react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Run began; background music on.
    Started,
    Paused,
    Resumed,
    StarCollected,
    ParachuteCollected,
    BirdHit,
    FuelExhausted,
    /// Run ended; show results, background music off.
    Finished(GameResult),
}

// ── Session ──────────────────────────────────────────────────────────────────

pub struct GameSession {
    settings: Settings,
    state: SessionState,
    viewport: Viewport,
    /// Present from start until restart.  Pools are emptied on finish.
    field: Option<Playfield>,
    clock: Option<GameClock>,
    /// Held movement keys, tracked in every state.
    directions: Directions,
    score: u32,
    fuel: u32,
    /// Whole seconds of play already charged against fuel.
    fuel_seconds: u64,
    current_result: Option<GameResult>,
    previous_result: Option<GameResult>,
}

impl GameSession {
    pub fn new(settings: Settings) -> Self {
        GameSession {
            viewport: settings.viewport,
            fuel: settings.initial_fuel,
            settings,
            state: SessionState::Idle,
            field: None,
            clock: None,
            directions: Directions::default(),
            score: 0,
            fuel_seconds: 0,
            current_result: None,
            previous_result: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn fuel(&self) -> u32 {
        self.fuel
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn playfield(&self) -> Option<&Playfield> {
        self.field.as_ref()
    }

    /// Direct access for tools and tests that need to stage a scene.
    pub fn playfield_mut(&mut self) -> Option<&mut Playfield> {
        self.field.as_mut()
    }

    pub fn plane(&self) -> Option<&Plane> {
        self.field.as_ref().map(|f| &f.plane)
    }

    pub fn current_result(&self) -> Option<GameResult> {
        self.current_result
    }

    pub fn previous_result(&self) -> Option<GameResult> {
        self.previous_result
    }

    /// Play time of the current run; frozen at the final time once over.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.state {
            SessionState::Idle => Duration::ZERO,
            SessionState::Over => self
                .current_result
                .map(|r| r.time)
                .unwrap_or(Duration::ZERO),
            SessionState::Running | SessionState::Paused => self
                .clock
                .map(|c| c.elapsed(now))
                .unwrap_or(Duration::ZERO),
        }
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn set_direction(&mut self, direction: Direction, held: bool) {
        self.directions.set(direction, held);
    }

    /// Replace all four intent flags at once.
    pub fn set_directions(&mut self, directions: Directions) {
        self.directions = directions;
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// Idle → Running.  Spawns all pools and starts the clock.
    pub fn start(&mut self, now: Instant, rng: &mut impl Rng) -> Vec<GameEvent> {
        let Some(next) = self.state.next(Command::Start) else {
            return Vec::new();
        };

        self.field = Some(compute::init_playfield(
            self.viewport,
            self.settings.plane_speed,
            rng,
        ));
        self.clock = Some(GameClock::start(now));
        self.score = 0;
        self.fuel = self.settings.initial_fuel;
        self.fuel_seconds = 0;
        self.current_result = None;
        self.state = next;

        info!(fuel = self.fuel, "run started");
        vec![GameEvent::Started]
    }

    /// Running ⇄ Paused.
    pub fn toggle_pause(&mut self, now: Instant) -> Vec<GameEvent> {
        let Some(clock) = self.clock.as_mut() else {
            return Vec::new();
        };

        if let Some(next) = self.state.next(Command::Pause) {
            clock.pause(now);
            self.state = next;
            info!("paused");
            vec![GameEvent::Paused]
        } else if let Some(next) = self.state.next(Command::Resume) {
            clock.resume(now);
            self.state = next;
            info!("resumed");
            vec![GameEvent::Resumed]
        } else {
            Vec::new()
        }
    }

    /// Running → Over.  Records the result and tears down every pool.
    /// Calling it again, or outside a run, does nothing.
    pub fn finish(&mut self, now: Instant) -> Vec<GameEvent> {
        let Some(next) = self.state.next(Command::Finish) else {
            return Vec::new();
        };

        let result = GameResult {
            score: self.score,
            time: self.elapsed(now),
        };
        if let Some(field) = self.field.as_mut() {
            for pool in &mut field.pools {
                pool.clear();
            }
        }
        self.current_result = Some(result);
        self.state = next;

        info!(score = result.score, secs = result.time.as_secs(), "run finished");
        vec![GameEvent::Finished(result)]
    }

    /// Over → Idle → Running.  The finished run becomes the previous result.
    pub fn restart(&mut self, now: Instant, rng: &mut impl Rng) -> Vec<GameEvent> {
        let Some(next) = self.state.next(Command::Reset) else {
            return Vec::new();
        };

        self.previous_result = self.current_result.take();
        self.field = None;
        self.clock = None;
        self.score = 0;
        self.fuel = self.settings.initial_fuel;
        self.fuel_seconds = 0;
        self.state = next;
        debug!(previous = ?self.previous_result, "session reset");

        self.start(now, rng)
    }

    /// Terminal resized: move spawn regions and keep the plane inside.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(field) = self.field.as_mut() {
            field.viewport = viewport;
            field.plane = compute::clamp_plane(&field.plane, &viewport);
            for pool in &mut field.pools {
                pool.retarget(&viewport);
            }
        }
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
    }

    // ── Frame step ───────────────────────────────────────────────────────────

    /// Advance one frame.  Does nothing unless the run is active and not
    /// paused.
    pub fn update(&mut self, now: Instant, rng: &mut impl Rng) -> Vec<GameEvent> {
        if self.state != SessionState::Running {
            return Vec::new();
        }
        let Some(field) = self.field.as_mut() else {
            return Vec::new();
        };

        field.plane.directions = self.directions;
        let (next, pickups) = compute::tick(field, rng);
        *field = next;

        let mut events = Vec::new();
        let mut bird_hit = false;
        for pickup in pickups {
            match pickup.kind {
                EntityKind::Star => {
                    self.score += 1;
                    events.push(GameEvent::StarCollected);
                }
                EntityKind::Parachute => {
                    self.fuel = self.fuel.saturating_add(self.settings.fuel_step);
                    events.push(GameEvent::ParachuteCollected);
                }
                EntityKind::Bird => {
                    bird_hit = true;
                    events.push(GameEvent::BirdHit);
                }
                EntityKind::Cloud => {}
            }
            debug!(kind = ?pickup.kind, score = self.score, fuel = self.fuel, "pickup");
        }

        let secs = self.elapsed(now).as_secs();
        if secs > self.fuel_seconds {
            let burned = u32::try_from(secs - self.fuel_seconds).unwrap_or(u32::MAX);
            self.fuel_seconds = secs;
            self.fuel = self.fuel.saturating_sub(burned);
        }

        if bird_hit {
            events.extend(self.finish(now));
        } else if self.fuel == 0 {
            events.push(GameEvent::FuelExhausted);
            events.extend(self.finish(now));
        }
        events
    }
}
