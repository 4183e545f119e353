/// Pause-aware run clock.
///
/// All methods take the current instant explicitly so the frame loop reads
/// the wall clock once per frame and tests can drive time by hand.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub struct GameClock {
    /// Start instant, pushed forward by every completed pause.
    effective_start: Instant,
    paused_at: Option<Instant>,
}

impl GameClock {
    pub fn start(now: Instant) -> Self {
        GameClock {
            effective_start: now,
            paused_at: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// No-op when already paused.
    pub fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Adds the pause duration back onto the start.  No-op when running.
    pub fn resume(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            self.effective_start += now.saturating_duration_since(paused_at);
        }
    }

    /// Play time so far, frozen while paused.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let until = self.paused_at.unwrap_or(now);
        until.saturating_duration_since(self.effective_start)
    }
}

/// `MM:SS`, minutes uncapped.
pub fn format_time(time: Duration) -> String {
    let secs = time.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
