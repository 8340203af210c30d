//! Vertical-motion physics for the player body
//!
//! All per-tick constants are tuned at a 60 Hz baseline; the `dt * 60` terms
//! rescale them to the time that actually elapsed.

use serde::{Deserialize, Serialize};

use crate::consts::{GROUND_LIMIT, TICKS_PER_SEC};

/// Velocity decay applied on every integration
pub const AIR_RESISTANCE: f32 = 0.98;
/// Velocity range mapped onto the body tilt
pub const ROTATION_VELOCITY_RANGE: f32 = 15.0;
/// Power-up window length in ticks (5 seconds at 60 Hz)
pub const POWER_UP_TICKS: u32 = 300;
/// Score points per obstacle-speed increment
pub const SPEED_STEP_SCORE: u32 = 10;
pub const SPEED_STEP: f32 = 0.3;

const POWER_UP_GRAVITY_SCALE: f32 = 0.7;
const POWER_UP_FALL_SCALE: f32 = 0.8;
const POWER_UP_JUMP_SCALE: f32 = 1.2;
const POWER_UP_PIPE_SCALE: f32 = 0.8;
const POWER_UP_SPEED_MULTIPLIER: f32 = 1.5;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                gravity: 0.5,
                jump_force: -9.0,
                max_fall_speed: 8.0,
                pipe_speed: 2.5,
                rotation_speed: 3.0,
            },
            Difficulty::Medium => DifficultyProfile {
                gravity: 0.6,
                jump_force: -10.0,
                max_fall_speed: 10.0,
                pipe_speed: 3.5,
                rotation_speed: 4.0,
            },
            Difficulty::Hard => DifficultyProfile {
                gravity: 0.7,
                jump_force: -11.0,
                max_fall_speed: 12.0,
                pipe_speed: 4.5,
                rotation_speed: 5.0,
            },
        }
    }
}

/// Physics constants for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Jump impulse (negative is up)
    pub jump_force: f32,
    /// Terminal downward velocity
    pub max_fall_speed: f32,
    /// Base obstacle scroll speed per tick
    pub pipe_speed: f32,
    /// How quickly the visual tilt follows the target tilt
    pub rotation_speed: f32,
}

/// Target tilt range for the body, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationRange {
    pub min: f32,
    pub max: f32,
}

impl RotationRange {
    pub const SYMMETRIC: Self = Self { min: -45.0, max: 45.0 };
    /// Shallow climb, steep dive
    pub const NOSE_DIVE: Self = Self { min: -30.0, max: 90.0 };
}

/// Physics integrator: profile plus the global power-up window
#[derive(Debug, Clone)]
pub struct PhysicsIntegrator {
    profile: DifficultyProfile,
    gravity_scale: f32,
    jump_scale: f32,
    power_up_ticks: u32,
    speed_multiplier: f32,
}

impl PhysicsIntegrator {
    pub fn new(profile: DifficultyProfile) -> Self {
        Self {
            profile,
            gravity_scale: 1.0,
            jump_scale: 1.0,
            power_up_ticks: 0,
            speed_multiplier: 1.0,
        }
    }

    /// Apply character modifiers to gravity and jump strength
    pub fn with_scales(mut self, gravity_scale: f32, jump_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self.jump_scale = jump_scale;
        self
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn power_up_active(&self) -> bool {
        self.power_up_ticks > 0
    }

    pub fn power_up_ticks(&self) -> u32 {
        self.power_up_ticks
    }

    /// Whole seconds left in the power-up window, rounded up
    pub fn power_up_seconds_left(&self) -> u32 {
        self.power_up_ticks.div_ceil(TICKS_PER_SEC as u32)
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Gravity after character and power-up scaling
    pub fn effective_gravity(&self) -> f32 {
        let g = self.profile.gravity * self.gravity_scale;
        if self.power_up_active() {
            g * POWER_UP_GRAVITY_SCALE
        } else {
            g
        }
    }

    /// Terminal velocity after power-up scaling
    pub fn effective_max_fall_speed(&self) -> f32 {
        if self.power_up_active() {
            self.profile.max_fall_speed * POWER_UP_FALL_SCALE
        } else {
            self.profile.max_fall_speed
        }
    }

    /// Apply gravity, air resistance and the terminal-velocity clamp
    pub fn integrate_velocity(&self, velocity: f32, dt: f32) -> f32 {
        let v = (velocity + self.effective_gravity() * dt * TICKS_PER_SEC) * AIR_RESISTANCE;
        v.min(self.effective_max_fall_speed())
    }

    /// Move by `velocity`, clamped to the playfield
    pub fn integrate_position(&self, y: f32, velocity: f32, dt: f32) -> f32 {
        (y + velocity * dt * TICKS_PER_SEC).clamp(0.0, GROUND_LIMIT)
    }

    /// Jump impulse (replaces the current velocity)
    pub fn jump(&self) -> f32 {
        let force = self.profile.jump_force * self.jump_scale;
        let force = if self.power_up_active() {
            force * POWER_UP_JUMP_SCALE
        } else {
            force
        };
        force * self.speed_multiplier
    }

    /// Obstacle scroll speed per tick for the given score
    pub fn obstacle_speed(&self, score: u32) -> f32 {
        let base = self.profile.pipe_speed;
        let speed = base + (score / SPEED_STEP_SCORE) as f32 * SPEED_STEP;
        let speed = if self.power_up_active() {
            speed * POWER_UP_PIPE_SCALE
        } else {
            speed
        };
        speed.min(base * 2.0)
    }

    /// Start (or restart) the power-up window
    pub fn activate_power_up(&mut self) {
        self.power_up_ticks = POWER_UP_TICKS;
        self.speed_multiplier = POWER_UP_SPEED_MULTIPLIER;
    }

    /// Count the power-up window down by one tick. Returns true when it expired this tick.
    pub fn tick_power_up(&mut self) -> bool {
        if self.power_up_ticks == 0 {
            return false;
        }
        self.power_up_ticks -= 1;
        if self.power_up_ticks == 0 {
            self.deactivate_power_up();
            return true;
        }
        false
    }

    pub fn deactivate_power_up(&mut self) {
        self.power_up_ticks = 0;
        self.speed_multiplier = 1.0;
    }
}

/// Tilt in degrees for a vertical velocity
pub fn rotation_from_velocity(velocity: f32, range: RotationRange) -> f32 {
    let v = velocity.clamp(-ROTATION_VELOCITY_RANGE, ROTATION_VELOCITY_RANGE);
    let t = (v + ROTATION_VELOCITY_RANGE) / (2.0 * ROTATION_VELOCITY_RANGE);
    range.min + t * (range.max - range.min)
}

/// Idle bobbing offset (visual only)
pub fn vertical_drift(sim_time: f32) -> f32 {
    (sim_time * 0.02).sin() * 0.5
}
