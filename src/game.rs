//! Frame driver
//!
//! One [`Game::frame`] call per frame callback: advance the clock, run the
//! fixed-size simulation steps it asks for, play sounds for what happened,
//! and hand back what to draw.

use crate::audio::{AudioManager, ToneSink};
use crate::consts::SIM_DT;
use crate::input::FlapGate;
use crate::render::{PlayerView, RenderFrame, RenderOptimizer};
use crate::settings::{ConfigError, RunConfig, Settings};
use crate::sim::ability::AbilityStatus;
use crate::sim::clock::SimClock;
use crate::sim::state::{GameEvent, GamePhase, RunSummary, WorldState};
use crate::sim::tick::{TickInput, tick};

/// Raw input for one frame callback
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Monotonic timestamp of the callback
    pub timestamp_ms: f64,
    pub flap: bool,
    pub ability: bool,
    pub slow_time: bool,
    pub autopilot: bool,
}

/// Everything the presentation layer needs after a frame
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// Simulation steps run this frame
    pub steps: u32,
    pub phase: GamePhase,
    pub player: Option<PlayerView>,
    pub render: RenderFrame,
    pub score: u32,
    /// Coins collected this run
    pub coins: u32,
    /// Wallet total including coins owned before the run
    pub total_coins: u32,
    pub lives: u32,
    pub abilities: AbilityStatus,
    /// Seconds left in the power-up window (0 when inactive)
    pub power_up_secs: u32,
    /// `None` when the FPS counter is hidden
    pub fps: Option<u32>,
    /// Mean of recent [`Game::track_render_time`] samples, in ms
    pub avg_render_ms: f64,
    /// Whether drawing fits the frame budget
    pub performance_good: bool,
    pub events: Vec<GameEvent>,
    /// Set on the one frame where the run ended
    pub terminal: Option<RunSummary>,
}

#[derive(Debug)]
pub struct Game {
    config: RunConfig,
    settings: Settings,
    clock: SimClock,
    world: WorldState,
    gate: FlapGate,
    optimizer: RenderOptimizer,
    audio: AudioManager,
    /// Inputs latched since the last step
    pending: TickInput,
    last_step_ms: Option<f64>,
}

impl Game {
    pub fn new(
        config: RunConfig,
        settings: Settings,
        sink: Box<dyn ToneSink>,
        start_ms: f64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut audio = AudioManager::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_muted(settings.muted);
        Ok(Self {
            world: WorldState::new(&config, &settings),
            clock: SimClock::new(start_ms),
            gate: FlapGate::new(settings.flap_debounce_ms),
            optimizer: RenderOptimizer::new(settings.viewport()),
            audio,
            pending: TickInput::default(),
            last_step_ms: None,
            config,
            settings,
        })
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Record how long drawing the previous frame took
    pub fn track_render_time(&mut self, render_ms: f64) {
        self.clock.track_render_time(render_ms);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.optimizer.resize(width, height);
        self.world.viewport.resize(width, height);
    }

    /// Throw the current run away and start a fresh one
    pub fn reset(&mut self) {
        log::info!("Resetting run");
        self.world = WorldState::new(&self.config, &self.settings);
        self.world.viewport = *self.optimizer.viewport();
        self.gate.reset();
        self.optimizer = RenderOptimizer::new(*self.optimizer.viewport());
        self.pending = TickInput::default();
        self.last_step_ms = None;
    }

    /// Start a fresh run with a different configuration
    pub fn restart_with(&mut self, config: RunConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Handle one frame callback
    pub fn frame(&mut self, input: &FrameInput) -> FrameOutput {
        let timing = self.clock.advance(input.timestamp_ms);

        if input.flap && self.gate.accept(input.timestamp_ms) {
            self.pending.flap = true;
        }
        self.pending.ability |= input.ability;
        self.pending.slow_time |= input.slow_time;
        self.pending.autopilot = input.autopilot;

        let mut events = Vec::new();
        if timing.should_step() {
            // Wall time since the last stepping frame, shared by this frame's steps
            let real_elapsed = self.last_step_ms.map(|last| {
                ((input.timestamp_ms - last) / 1000.0) as f32 / timing.steps as f32
            });
            self.last_step_ms = Some(input.timestamp_ms);

            // Latched presses go to the first step only
            let mut step_input = std::mem::take(&mut self.pending);
            for _ in 0..timing.steps {
                step_input.real_elapsed = real_elapsed;
                tick(&mut self.world, &step_input, SIM_DT);
                step_input = TickInput {
                    autopilot: input.autopilot,
                    ..Default::default()
                };
            }
            events = self.world.drain_events();
            self.audio.play_events(&events);
        }

        let terminal = events.iter().find_map(|e| match e {
            GameEvent::RunEnded(summary) => Some(*summary),
            _ => None,
        });
        let render = self.optimizer.frame(&self.world);

        FrameOutput {
            steps: timing.steps,
            phase: self.world.phase,
            player: render.player,
            render,
            score: self.world.score,
            coins: self.world.coins_collected,
            total_coins: self.config.starting_coins + self.world.coins_collected,
            lives: self.world.player.lives,
            abilities: self.world.abilities.status(),
            power_up_secs: self.world.physics.power_up_seconds_left(),
            fps: self.settings.show_fps.then_some(timing.fps),
            avg_render_ms: self.clock.average_render_time(),
            performance_good: self.clock.is_performance_good(),
            events,
            terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::audio::LogSink;
    use crate::sim::ability::{Ability, Character};
    use crate::sim::physics::Difficulty;

    const FRAME_MS: f64 = 17.0;

    fn game(config: RunConfig) -> Game {
        Game::new(config, Settings::default(), Box::new(LogSink), 0.0).unwrap()
    }

    fn at(frame: u32) -> FrameInput {
        FrameInput {
            timestamp_ms: frame as f64 * FRAME_MS,
            ..Default::default()
        }
    }

    fn flap_at(frame: u32) -> FrameInput {
        FrameInput {
            flap: true,
            ..at(frame)
        }
    }

    #[test]
    fn test_first_flap_starts_run() {
        let mut game = game(RunConfig::default());
        let out = game.frame(&at(1));
        assert_eq!(out.steps, 1);
        assert_eq!(out.phase, GamePhase::Ready);

        let out = game.frame(&flap_at(2));
        assert_eq!(out.phase, GamePhase::Playing);
        assert!(out.events.contains(&GameEvent::RunStarted));
    }

    #[test]
    fn test_flaps_are_debounced() {
        let mut game = game(RunConfig::default());
        let mut flaps = 0;
        // A flap every frame for 10 frames (170 ms) gets through twice
        for frame in 1..=10 {
            let out = game.frame(&flap_at(frame));
            flaps += out.events.iter().filter(|e| **e == GameEvent::Flap).count();
        }
        assert_eq!(flaps, 2);
    }

    #[test]
    fn test_terminal_reported_once() {
        let config = RunConfig {
            difficulty: Difficulty::Easy,
            starting_coins: 40,
            ..Default::default()
        };
        let mut game = game(config);
        game.frame(&flap_at(1));

        let mut terminals = Vec::new();
        for frame in 2..1000 {
            let out = game.frame(&at(frame));
            assert_eq!(out.total_coins, 40 + out.coins);
            if let Some(summary) = out.terminal {
                terminals.push(summary);
            }
        }
        assert_eq!(terminals.len(), 1);
        assert_eq!(game.world().phase, GamePhase::GameOver);
    }

    #[test]
    fn test_reset_starts_fresh_world() {
        let mut game = game(RunConfig::default());
        for frame in 1..30 {
            game.frame(&flap_at(frame));
        }
        assert!(game.world().time_ticks > 0);

        game.reset();
        assert_eq!(game.world().phase, GamePhase::Ready);
        assert_eq!(game.world().time_ticks, 0);
        assert!(game.world().abilities.windows().is_empty());
        // A flap right after a reset is not swallowed by the debounce
        let out = game.frame(&flap_at(30));
        assert_eq!(out.phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_with_new_character() {
        let mut game = game(RunConfig::default());
        game.frame(&flap_at(1));
        let config = RunConfig {
            character: Character::new("Rudra", Ability::ExtraLives),
            ..Default::default()
        };
        game.restart_with(config).unwrap();
        assert_eq!(game.world().player.lives, 3);
        assert_eq!(game.world().phase, GamePhase::Ready);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RunConfig {
            target_score: Some(0),
            ..Default::default()
        };
        let result = Game::new(config, Settings::default(), Box::new(LogSink), 0.0);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_flap_plays_tone() {
        struct Recorder(Rc<RefCell<Vec<f32>>>);
        impl ToneSink for Recorder {
            fn play_tone(&mut self, frequency: f32, _duration: f32) {
                self.0.borrow_mut().push(frequency);
            }
        }

        let played = Rc::new(RefCell::new(Vec::new()));
        let mut game = Game::new(
            RunConfig::default(),
            Settings::default(),
            Box::new(Recorder(played.clone())),
            0.0,
        )
        .unwrap();
        game.frame(&flap_at(1));
        assert_eq!(*played.borrow(), vec![400.0]);
    }

    /// Simulated seconds after two wall-clock seconds at `hz`
    fn simulated_secs(hz: f64) -> (f32, u64) {
        let config = RunConfig {
            character: Character::new("Jet", Ability::Jetpack),
            ..Default::default()
        };
        let mut game = game(config);
        let frame_ms = 1000.0 / hz;
        game.frame(&FrameInput {
            timestamp_ms: frame_ms,
            flap: true,
            ability: true,
            ..Default::default()
        });
        for frame in 2..=(2.0 * hz) as u32 {
            game.frame(&FrameInput {
                timestamp_ms: frame as f64 * frame_ms,
                ..Default::default()
            });
        }
        assert!(game.world().abilities.jetpack_active());
        (game.world().sim_time, game.world().time_ticks)
    }

    #[test]
    fn test_simulation_rate_ignores_refresh_rate() {
        let (baseline, baseline_ticks) = simulated_secs(60.0);
        assert!((baseline - 2.0).abs() < 2.0 * SIM_DT + 1e-4);
        for hz in [30.0, 120.0, 144.0] {
            let (secs, ticks) = simulated_secs(hz);
            assert!(
                (secs - baseline).abs() <= 2.0 * SIM_DT + 1e-4,
                "{hz} Hz simulated {secs}s, 60 Hz simulated {baseline}s"
            );
            assert!(ticks.abs_diff(baseline_ticks) <= 2);
        }
    }

    #[test]
    fn test_render_time_reported() {
        let mut game = game(RunConfig::default());
        for _ in 0..10 {
            game.track_render_time(40.0);
        }
        let out = game.frame(&at(1));
        assert_eq!(out.avg_render_ms, 40.0);
        assert!(!out.performance_good);
    }

    #[test]
    fn test_hidden_fps() {
        let settings = Settings {
            show_fps: false,
            ..Default::default()
        };
        let mut game = Game::new(RunConfig::default(), settings, Box::new(LogSink), 0.0).unwrap();
        assert_eq!(game.frame(&at(1)).fps, None);
    }
}
