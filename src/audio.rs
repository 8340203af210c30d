//! Sound cues
//!
//! Every sound is a single tone handed to an external [`ToneSink`]; this
//! module only decides which tone goes with which game event.

use crate::sim::ability::{Activation, Defense};
use crate::sim::state::{GameEvent, RunOutcome};

/// Something that can play a tone of `frequency` Hz for `duration` seconds
pub trait ToneSink {
    fn play_tone(&mut self, frequency: f32, duration: f32);

    /// Master volume changed (0.0 - 1.0)
    fn set_volume(&mut self, _volume: f32) {}
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl ToneSink for LogSink {
    fn play_tone(&mut self, frequency: f32, duration: f32) {
        log::trace!("tone {frequency} Hz for {duration}s");
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Flap,
    Score,
    Coin,
    PowerUp,
    /// A shield absorbed a hit
    Shield,
    LifeLost,
    Crash,
    CloneRevival,
    FinalFlight,
    Invisibility,
    SlowTime,
    Jetpack,
}

impl SoundEffect {
    /// `(frequency Hz, duration s)`
    pub fn tone(&self) -> (f32, f32) {
        match self {
            SoundEffect::Flap => (400.0, 0.1),
            SoundEffect::Score => (600.0, 0.2),
            SoundEffect::Coin => (800.0, 0.15),
            SoundEffect::PowerUp => (1200.0, 0.3),
            SoundEffect::Shield => (800.0, 0.3),
            SoundEffect::LifeLost => (200.0, 0.3),
            SoundEffect::Crash => (150.0, 0.5),
            SoundEffect::CloneRevival => (1600.0, 0.4),
            SoundEffect::FinalFlight => (1600.0, 0.5),
            SoundEffect::Invisibility => (1000.0, 0.2),
            SoundEffect::SlowTime => (1400.0, 0.3),
            SoundEffect::Jetpack => (1800.0, 0.4),
        }
    }

    /// Cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let effect = match event {
            GameEvent::Flap => SoundEffect::Flap,
            GameEvent::Scored { .. } => SoundEffect::Score,
            GameEvent::CoinCollected { .. } => SoundEffect::Coin,
            GameEvent::PowerUpCollected { .. } => SoundEffect::PowerUp,
            GameEvent::Defended(Defense::ConsumableShield | Defense::InnateShield) => {
                SoundEffect::Shield
            }
            GameEvent::Defended(Defense::SpareLife) => SoundEffect::LifeLost,
            GameEvent::Defended(Defense::CloneRevival) => SoundEffect::CloneRevival,
            GameEvent::Defended(Defense::FinalFlight) => SoundEffect::FinalFlight,
            GameEvent::Activated(Activation::Invisibility) => SoundEffect::Invisibility,
            GameEvent::Activated(Activation::SlowTime) => SoundEffect::SlowTime,
            GameEvent::Activated(Activation::Jetpack) => SoundEffect::Jetpack,
            GameEvent::RunEnded(summary) => match summary.outcome {
                RunOutcome::Crashed => SoundEffect::Crash,
                RunOutcome::LevelComplete => SoundEffect::Score,
            },
            GameEvent::RunStarted | GameEvent::PowerUpExpired | GameEvent::Expired(_) => {
                return None;
            }
        };
        Some(effect)
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn ToneSink>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogSink))
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn ToneSink>) -> Self {
        let mut audio = Self {
            sink,
            master_volume: 0.8,
            muted: false,
        };
        audio.sink.set_volume(audio.effective_volume());
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.sink.set_volume(self.effective_volume());
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.sink.set_volume(self.effective_volume());
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    pub fn play(&mut self, effect: SoundEffect) {
        if self.effective_volume() <= 0.0 {
            return;
        }
        let (frequency, duration) = effect.tone();
        self.sink.play_tone(frequency, duration);
    }

    /// Play the cue for every event that has one
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}
