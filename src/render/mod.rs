//! Render-side optimizations
//!
//! Reads the world after a step and decides what is worth drawing. Never
//! mutates simulation state.

pub mod change;
pub mod cull;
pub mod pool;

pub use change::{ChangeTracker, RenderKey};
pub use cull::Viewport;
pub use pool::{ObjectPool, POOL_CAPACITY};

use serde::Serialize;

use crate::consts::{PIPE_WIDTH, PLAYER_X, VIEWPORT_HEIGHT};
use crate::sim::physics::vertical_drift;
use crate::sim::state::{Coin, Pipe, PowerUp, WorldState};

/// Pickup sprites are drawn in a box this size
const PICKUP_SIZE: f32 = 30.0;

/// Where and how to draw the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    /// 0 = hidden, 1 = opaque (invisibility draws translucent)
    pub opacity: f32,
}

/// HUD numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudView {
    pub score: u32,
    pub coins: u32,
    pub lives: u32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    pub player: Option<PlayerView>,
    pub pipes: Vec<Pipe>,
    pub coins: Vec<Coin>,
    pub power_ups: Vec<PowerUp>,
    /// Keys whose state changed since they were last drawn
    pub dirty: Vec<RenderKey>,
}

/// Culls the world against the viewport and tracks what changed
#[derive(Debug, Clone, Default)]
pub struct RenderOptimizer {
    viewport: Viewport,
    tracker: ChangeTracker<RenderKey>,
}

impl RenderOptimizer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            tracker: ChangeTracker::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
    }

    /// Build the render frame for the current world state
    pub fn frame(&mut self, world: &WorldState) -> RenderFrame {
        let status = world.abilities.status();
        let opacity = if status.invisible {
            0.3
        } else if status.clone_active {
            0.75
        } else {
            1.0
        };
        let player = PlayerView {
            x: PLAYER_X,
            y: world.player.visual_y.value + vertical_drift(world.time_ticks as f32),
            rotation: world.player.visual_rotation.value,
            opacity,
        };
        let hud = HudView {
            score: world.score,
            coins: world.coins_collected,
            lives: world.player.lives,
        };

        let mut frame = RenderFrame {
            player: Some(player),
            ..Default::default()
        };
        self.track(RenderKey::Player, &player, &mut frame.dirty);
        self.track(RenderKey::Hud, &hud, &mut frame.dirty);

        for pipe in &world.pipes {
            if self.viewport.is_visible(pipe.x, 0.0, PIPE_WIDTH, VIEWPORT_HEIGHT) {
                self.track(RenderKey::Pipe(pipe.id), pipe, &mut frame.dirty);
                frame.pipes.push(pipe.clone());
            }
        }
        for coin in &world.coins {
            if self.pickup_visible(coin.x, coin.y) {
                self.track(RenderKey::Coin(coin.id), coin, &mut frame.dirty);
                frame.coins.push(coin.clone());
            }
        }
        for power_up in world.power_ups.iter().filter(|p| !p.collected) {
            if self.pickup_visible(power_up.x, power_up.y) {
                self.track(RenderKey::PowerUp(power_up.id), power_up, &mut frame.dirty);
                frame.power_ups.push(power_up.clone());
            }
        }

        self.tracker.end_frame();
        frame
    }

    fn pickup_visible(&self, x: f32, y: f32) -> bool {
        let half = PICKUP_SIZE / 2.0;
        self.viewport.is_visible(x - half, y - half, PICKUP_SIZE, PICKUP_SIZE)
    }

    fn track<S: Serialize>(&mut self, key: RenderKey, state: &S, dirty: &mut Vec<RenderKey>) {
        if self.tracker.should_render(key, state) {
            dirty.push(key);
            self.tracker.clear_dirty(key);
        }
    }
}
