//! World state and entity types
//!
//! Everything one run needs lives in [`WorldState`]; the step function is the
//! only thing that mutates it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ability::{AbilityState, Activation, Consumables, Defense, Expiry};
use super::entities::EntityPools;
use super::interp::Damped;
use super::physics::{PhysicsIntegrator, RotationRange};
use crate::consts::*;
use crate::render::Viewport;
use crate::settings::{RunConfig, Settings, WindowClock};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first flap
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// No defense absorbed a collision
    Crashed,
    /// The configured target score was reached
    LevelComplete,
}

/// Emitted exactly once when a run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub final_score: u32,
    pub coins_collected: u32,
    pub outcome: RunOutcome,
}

/// Power-up varieties (all open the same global window)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerUpKind {
    #[default]
    Speed,
    Gravity,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Gravity, PowerUpKind::Shield];
}

/// Things that happened during a step, drained by the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    RunStarted,
    Flap,
    Scored { points: u32 },
    CoinCollected { value: u32 },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired,
    Defended(Defense),
    Activated(Activation),
    Expired(Expiry),
    RunEnded(RunSummary),
}

/// The player-controlled body
#[derive(Debug, Clone)]
pub struct PlayerBody {
    /// Vertical position of the body center (y grows downward)
    pub y: f32,
    pub velocity_y: f32,
    /// Target tilt in degrees
    pub rotation: f32,
    pub hitbox_size: f32,
    pub lives: u32,
    /// Smoothed position for drawing
    pub visual_y: Damped,
    /// Smoothed tilt for drawing
    pub visual_rotation: Damped,
}

impl PlayerBody {
    pub fn new(hitbox_size: f32, lives: u32) -> Self {
        Self {
            y: PLAYER_SPAWN_Y,
            velocity_y: 0.0,
            rotation: 0.0,
            hitbox_size,
            lives,
            visual_y: Damped::new(PLAYER_SPAWN_Y),
            visual_rotation: Damped::new(0.0),
        }
    }

    /// Back to the spawn point at rest
    pub fn respawn(&mut self) {
        self.y = PLAYER_SPAWN_Y;
        self.velocity_y = 0.0;
        self.visual_y.snap(PLAYER_SPAWN_Y);
    }
}

/// A pipe pair with a gap
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pipe {
    pub id: u32,
    pub x: f32,
    pub top_height: f32,
    pub bottom_height: f32,
    pub gap_center_y: f32,
    pub passed: bool,
    pub velocity: f32,
}

impl Pipe {
    pub fn new(id: u32, x: f32, gap_center_y: f32, velocity: f32) -> Self {
        let mut pipe = Self::default();
        pipe.reset(id, x, gap_center_y, velocity);
        pipe
    }

    /// Reinitialize in place (pooled pipes are reused)
    pub fn reset(&mut self, id: u32, x: f32, gap_center_y: f32, velocity: f32) {
        self.id = id;
        self.x = x;
        self.gap_center_y = gap_center_y;
        self.top_height = (gap_center_y - PIPE_GAP / 2.0).max(PIPE_MIN_SEGMENT);
        self.bottom_height = (VIEWPORT_HEIGHT - (gap_center_y + PIPE_GAP / 2.0) - GROUND_HEIGHT)
            .max(PIPE_MIN_SEGMENT);
        self.passed = false;
        self.velocity = velocity;
    }
}

/// A coin
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coin {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub collected: bool,
    /// Spin in degrees
    pub rotation: f32,
    /// Pop-in / shrink-out scale
    pub scale: f32,
    pub target_scale: f32,
}

impl Coin {
    pub fn reset(&mut self, id: u32, x: f32, y: f32) {
        self.id = id;
        self.x = x;
        self.y = y;
        self.collected = false;
        self.rotation = 0.0;
        self.scale = 0.0;
        self.target_scale = 1.0;
    }

    /// Collected and shrunk out of sight
    pub fn vanished(&self) -> bool {
        self.collected && self.scale < 0.05
    }
}

/// A power-up pickup
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PowerUp {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub collected: bool,
    pub kind: PowerUpKind,
    pub pulse_phase: f32,
    /// Spin in degrees
    pub rotation: f32,
}

impl PowerUp {
    pub fn reset(&mut self, id: u32, x: f32, y: f32, kind: PowerUpKind) {
        self.id = id;
        self.x = x;
        self.y = y;
        self.collected = false;
        self.kind = kind;
        self.pulse_phase = 0.0;
        self.rotation = 0.0;
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct WorldState {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    /// Coins collected this run
    pub coins_collected: u32,
    /// Pipes scored this run (drives the bonus-points cadence)
    pub pipes_passed: u32,
    /// Ends the run once reached
    pub target_score: Option<u32>,
    /// Simulation steps taken
    pub time_ticks: u64,
    /// Simulated seconds (after slow-time scaling)
    pub sim_time: f32,
    pub player: PlayerBody,
    pub rotation_range: RotationRange,
    pub physics: PhysicsIntegrator,
    pub abilities: AbilityState,
    pub pipes: Vec<Pipe>,
    pub coins: Vec<Coin>,
    pub power_ups: Vec<PowerUp>,
    pub pools: EntityPools,
    pub viewport: Viewport,
    pub window_clock: WindowClock,
    pub events: Vec<GameEvent>,
    pub summary: Option<RunSummary>,
    next_id: u32,
}

impl WorldState {
    /// Fresh run for `config`
    pub fn new(config: &RunConfig, settings: &Settings) -> Self {
        let ability = config.character.ability;
        let physics = PhysicsIntegrator::new(config.difficulty.profile())
            .with_scales(ability.gravity_scale(), ability.jump_scale());
        Self {
            seed: config.seed,
            rng: Pcg32::seed_from_u64(config.seed),
            phase: GamePhase::Ready,
            score: config.starting_score,
            coins_collected: 0,
            pipes_passed: 0,
            target_score: config.target_score,
            time_ticks: 0,
            sim_time: 0.0,
            player: PlayerBody::new(config.character.hitbox_size, ability.starting_lives()),
            rotation_range: ability.rotation_range(),
            physics,
            abilities: AbilityState::new(ability, Consumables::from_selection(&config.consumables)),
            pipes: Vec::new(),
            coins: Vec::new(),
            power_ups: Vec::new(),
            pools: EntityPools::default(),
            viewport: settings.viewport(),
            window_clock: settings.window_clock,
            events: Vec::new(),
            summary: None,
            next_id: 0,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// End the run (no-op if it already ended)
    pub fn end_run(&mut self, outcome: RunOutcome) {
        if self.summary.is_some() {
            return;
        }
        let summary = RunSummary {
            final_score: self.score,
            coins_collected: self.coins_collected,
            outcome,
        };
        log::info!(
            "Run ended ({:?}): score {}, coins {}",
            outcome,
            summary.final_score,
            summary.coins_collected
        );
        self.phase = GamePhase::GameOver;
        self.summary = Some(summary);
        self.events.push(GameEvent::RunEnded(summary));
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
