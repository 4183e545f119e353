/// Sound collaborator.
///
/// Built with the `sound` feature, effects and a looping background tune play
/// through rodio.  Without it, or when no output device opens, every effect
/// rings the terminal bell and the music is only a flag shown in the HUD.

use std::io::Write;

use crossterm::{style::Print, QueueableCommand};
use plane_dodge::session::GameEvent;
use tracing::debug;

const BELL: &str = "\x07";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Pickup,
    Refuel,
    Hit,
    Finish,
}

/// One-shot sound for an event, if it has one.
pub fn effect_for(event: &GameEvent) -> Option<Effect> {
    match event {
        GameEvent::StarCollected => Some(Effect::Pickup),
        GameEvent::ParachuteCollected => Some(Effect::Refuel),
        GameEvent::BirdHit => Some(Effect::Hit),
        GameEvent::Finished(_) => Some(Effect::Finish),
        GameEvent::Started | GameEvent::Paused | GameEvent::Resumed | GameEvent::FuelExhausted => {
            None
        }
    }
}

pub struct Audio {
    muted: bool,
    music_playing: bool,
    #[cfg(feature = "sound")]
    output: Option<tone::Output>,
}

impl Audio {
    #[cfg(feature = "sound")]
    pub fn new(muted: bool) -> Self {
        let output = match tone::Output::open() {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::warn!(error = %e, "no audio output, falling back to the bell");
                None
            }
        };
        Audio {
            output,
            ..Self::bell_only(muted)
        }
    }

    #[cfg(not(feature = "sound"))]
    pub fn new(muted: bool) -> Self {
        Self::bell_only(muted)
    }

    fn bell_only(muted: bool) -> Self {
        Audio {
            muted,
            music_playing: false,
            #[cfg(feature = "sound")]
            output: None,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing && !self.muted
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.sync_music();
        debug!(muted = self.muted, "sound toggled");
    }

    pub fn handle<W: Write>(&mut self, out: &mut W, event: &GameEvent) -> std::io::Result<()> {
        match event {
            GameEvent::Started | GameEvent::Resumed => self.music_playing = true,
            GameEvent::Paused | GameEvent::Finished(_) => self.music_playing = false,
            _ => {}
        }
        self.sync_music();

        if let Some(effect) = effect_for(event) {
            self.play(out, effect)?;
        }
        Ok(())
    }

    fn play<W: Write>(&self, out: &mut W, effect: Effect) -> std::io::Result<()> {
        if self.muted {
            return Ok(());
        }
        #[cfg(feature = "sound")]
        if let Some(output) = &self.output {
            output.play(effect);
            return Ok(());
        }
        debug!(?effect, "bell");
        out.queue(Print(BELL))?;
        Ok(())
    }

    fn sync_music(&self) {
        #[cfg(feature = "sound")]
        if let Some(output) = &self.output {
            output.set_music(self.is_music_playing());
        }
    }
}

#[cfg(feature = "sound")]
mod tone {
    use rodio::{buffer::SamplesBuffer, OutputStream, OutputStreamHandle, Sink, Source};

    use super::Effect;

    const SAMPLE_RATE: u32 = 44_100;
    const MUSIC_VOLUME: f32 = 0.25;

    /// (frequency in Hz, duration in seconds); 0 Hz is a rest.
    type Note = (f32, f32);

    const TUNE: &[Note] = &[
        (392.0, 0.25), (440.0, 0.25), (523.3, 0.5), (440.0, 0.25), (392.0, 0.25),
        (329.6, 0.5), (0.0, 0.25), (293.7, 0.25), (329.6, 0.25), (392.0, 0.75),
    ];

    const PICKUP: &[Note] = &[(880.0, 0.06), (1318.5, 0.08)];
    const REFUEL: &[Note] = &[(523.3, 0.08), (659.3, 0.08), (784.0, 0.12)];
    const HIT: &[Note] = &[(220.0, 0.1), (110.0, 0.25)];
    const FINISH: &[Note] = &[(392.0, 0.15), (329.6, 0.15), (261.6, 0.35)];

    fn notes_for(effect: Effect) -> &'static [Note] {
        match effect {
            Effect::Pickup => PICKUP,
            Effect::Refuel => REFUEL,
            Effect::Hit => HIT,
            Effect::Finish => FINISH,
        }
    }

    /// Sine notes with a short linear fade at both ends to avoid clicks.
    pub(super) fn render_notes(notes: &[Note], amplitude: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, secs) in notes {
            let len = (secs * SAMPLE_RATE as f32) as usize;
            let fade = (len / 10).max(1);
            samples.extend((0..len).map(|i| {
                if freq <= 0.0 {
                    return 0.0;
                }
                let t = i as f32 / SAMPLE_RATE as f32;
                let edge = i.min(len - 1 - i).min(fade) as f32 / fade as f32;
                (t * freq * std::f32::consts::TAU).sin() * amplitude * edge
            }));
        }
        samples
    }

    pub(super) struct Output {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        music: Sink,
    }

    impl Output {
        pub(super) fn open() -> anyhow::Result<Self> {
            let (stream, handle) = OutputStream::try_default()?;
            let music = Sink::try_new(&handle)?;
            let tune = SamplesBuffer::new(1, SAMPLE_RATE, render_notes(TUNE, 0.2));
            music.append(tune.repeat_infinite());
            music.set_volume(MUSIC_VOLUME);
            music.pause();
            Ok(Output {
                _stream: stream,
                handle,
                music,
            })
        }

        pub(super) fn set_music(&self, on: bool) {
            if on {
                self.music.play();
            } else {
                self.music.pause();
            }
        }

        pub(super) fn play(&self, effect: Effect) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let notes = render_notes(notes_for(effect), 0.3);
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, notes));
                sink.detach();
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use plane_dodge::entities::GameResult;
    use std::time::Duration;

    fn finished() -> GameEvent {
        GameEvent::Finished(GameResult {
            score: 3,
            time: Duration::from_secs(12),
        })
    }

    #[test]
    fn every_scoring_event_has_an_effect() {
        assert_eq!(effect_for(&GameEvent::StarCollected), Some(Effect::Pickup));
        assert_eq!(effect_for(&GameEvent::ParachuteCollected), Some(Effect::Refuel));
        assert_eq!(effect_for(&GameEvent::BirdHit), Some(Effect::Hit));
        assert_eq!(effect_for(&finished()), Some(Effect::Finish));
        assert_eq!(effect_for(&GameEvent::Paused), None);
        assert_eq!(effect_for(&GameEvent::FuelExhausted), None);
    }

    #[test]
    fn music_follows_run_state() {
        let mut audio = Audio::bell_only(false);
        let mut out = Vec::new();
        assert!(!audio.is_music_playing());

        audio.handle(&mut out, &GameEvent::Started).unwrap();
        assert!(audio.is_music_playing());
        audio.handle(&mut out, &GameEvent::Paused).unwrap();
        assert!(!audio.is_music_playing());
        audio.handle(&mut out, &GameEvent::Resumed).unwrap();
        assert!(audio.is_music_playing());
        audio.handle(&mut out, &finished()).unwrap();
        assert!(!audio.is_music_playing());
    }

    #[test]
    fn mute_silences_music_and_effects() {
        let mut audio = Audio::bell_only(false);
        let mut out = Vec::new();
        audio.handle(&mut out, &GameEvent::Started).unwrap();
        audio.toggle_mute();
        assert!(audio.is_muted());
        assert!(!audio.is_music_playing());

        audio.handle(&mut out, &GameEvent::StarCollected).unwrap();
        audio.handle(&mut out, &GameEvent::BirdHit).unwrap();
        assert!(out.is_empty());

        audio.toggle_mute();
        assert!(audio.is_music_playing());
    }

    #[test]
    fn without_output_effects_ring_the_bell() {
        let mut audio = Audio::bell_only(false);
        let mut out = Vec::new();
        audio.handle(&mut out, &GameEvent::Started).unwrap();
        assert!(out.is_empty());
        audio.handle(&mut out, &GameEvent::StarCollected).unwrap();
        audio.handle(&mut out, &GameEvent::ParachuteCollected).unwrap();
        assert_eq!(out, b"\x07\x07");
    }
}
