//! Settings and per-run configuration
//!
//! Both are plain JSON documents. Missing fields fall back to defaults, so an
//! empty object is a valid file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CULL_MARGIN, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::render::Viewport;
use crate::sim::ability::{Character, Consumable};
use crate::sim::physics::Difficulty;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read/write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which clock drives timed ability windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowClock {
    /// Wall-clock seconds, unaffected by slow time
    #[default]
    Real,
    /// Simulated seconds, stretched by slow time
    Simulation,
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Extra border kept around the viewport when culling
    pub cull_margin: f32,
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,

    // === Gameplay ===
    pub window_clock: WindowClock,
    /// Minimum wall time between accepted flaps
    pub flap_debounce_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            cull_margin: CULL_MARGIN,
            show_fps: true,

            master_volume: 0.8,
            muted: false,

            window_clock: WindowClock::Real,
            flap_debounce_ms: 100.0,
        }
    }
}

impl Settings {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height, self.cull_margin)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = read(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if self.flap_debounce_ms < 0.0 {
            return Err(ConfigError::Invalid("flap_debounce_ms must not be negative".into()));
        }
        Ok(())
    }
}

/// Everything chosen before a run starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub difficulty: Difficulty,
    pub character: Character,
    pub consumables: Vec<Consumable>,
    /// Score the run starts at
    pub starting_score: u32,
    /// Coins the player already owns (reported as a running total)
    pub starting_coins: u32,
    pub seed: u64,
    /// End the run with a level-complete outcome at this score
    pub target_score: Option<u32>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            character: Character::default(),
            consumables: Vec::new(),
            starting_score: 0,
            starting_coins: 0,
            seed: 0x5eed,
            target_score: None,
        }
    }
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&read(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let hitbox = self.character.hitbox_size;
        if hitbox.is_nan() || hitbox <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "hitbox_size must be positive, got {hitbox}"
            )));
        }
        if self.target_score == Some(0) {
            return Err(ConfigError::Invalid("target_score must be at least 1".into()));
        }
        Ok(())
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
