//! Flappy Human - simulation core for a side-scrolling arcade flyer
//!
//! Core modules:
//! - `sim`: Simulation (clock, physics, entities, abilities, collisions)
//! - `render`: Viewport culling, change detection and object pooling
//! - `game`: Frame driver tying clock, input, simulation and audio together
//! - `input`: Flap debouncing
//! - `audio`: Tone cues for the opaque tone collaborator
//! - `settings`: Settings and per-run configuration

pub mod audio;
pub mod game;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use game::{FrameInput, FrameOutput, Game};
pub use settings::{ConfigError, RunConfig, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the baseline all per-tick constants are tuned at)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame gap fed to the simulation, in milliseconds
    pub const MAX_FRAME_MS: f64 = 33.33;
    /// Ticks per second at the baseline rate
    pub const TICKS_PER_SEC: f32 = 60.0;

    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    /// Height of the ground strip at the bottom of the viewport
    pub const GROUND_HEIGHT: f32 = 64.0;
    /// Lowest allowed player y (top of the ground strip, minus the body)
    pub const GROUND_LIMIT: f32 = 536.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SPAWN_Y: f32 = 300.0;
    pub const DEFAULT_HITBOX: f32 = 30.0;

    /// Pipe geometry
    pub const PIPE_WIDTH: f32 = 80.0;
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_MIN_SEGMENT: f32 = 50.0;
    /// A new pipe spawns once the newest one has moved left of this x
    pub const PIPE_SPAWN_THRESHOLD: f32 = 600.0;
    pub const PIPE_DESPAWN_X: f32 = -100.0;
    /// Gap centers are drawn uniformly from [GAP_MIN, GAP_MIN + GAP_RANGE)
    pub const GAP_MIN: f32 = 100.0;
    pub const GAP_RANGE: f32 = 300.0;

    /// All entities enter at the right edge of the viewport
    pub const SPAWN_X: f32 = 800.0;
    /// Coins and power-ups spawn in [PICKUP_Y_MIN, PICKUP_Y_MIN + PICKUP_Y_RANGE)
    pub const PICKUP_Y_MIN: f32 = 100.0;
    pub const PICKUP_Y_RANGE: f32 = 400.0;
    pub const PICKUP_DESPAWN_X: f32 = -50.0;

    /// Per-tick spawn chances at the 60 Hz baseline
    pub const COIN_SPAWN_CHANCE: f32 = 0.015;
    pub const POWER_UP_SPAWN_CHANCE: f32 = 0.005;

    /// Pickup radii
    pub const COIN_RADIUS: f32 = 30.0;
    pub const MAGNET_COIN_RADIUS: f32 = 50.0;
    pub const POWER_UP_RADIUS: f32 = 35.0;

    /// Only pipes this close to the player (horizontally) are collision-checked
    pub const COLLISION_BAND: f32 = 150.0;
    /// Culling margin around the viewport
    pub const CULL_MARGIN: f32 = 100.0;
}

