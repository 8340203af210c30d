//! Simulation step
//!
//! Advances a run by one step: ability timers, input, player physics, entity
//! lifecycle, collisions, then the smoothed visual state.

use super::ability::{Resolution, SLOW_TIME_DT_SCALE, resolve_collision};
use super::collision::{Hit, ground_collision};
use super::entities;
use super::physics::rotation_from_velocity;
use super::state::{GameEvent, GamePhase, RunOutcome, WorldState};
use crate::consts::*;
use crate::settings::WindowClock;

/// Smoothing time for the drawn player position, in seconds
const VISUAL_Y_SMOOTH: f32 = 0.1;
/// Divided by the profile's rotation speed to get the tilt smoothing time
const ROTATION_SMOOTH_BASE: f32 = 0.6;
/// Autopilot flaps once it sinks this far below the gap center
const AUTOPILOT_SLACK: f32 = 15.0;

/// Input commands for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (already debounced)
    pub flap: bool,
    /// Character ability trigger
    pub ability: bool,
    /// Slow-time consumable trigger
    pub slow_time: bool,
    /// Unscaled seconds since the previous step, when known
    pub real_elapsed: Option<f32>,
    /// Demo mode: flap automatically to stay level with the next gap
    pub autopilot: bool,
}

/// Advance the world by one step of `dt` seconds
pub fn tick(world: &mut WorldState, input: &TickInput, dt: f32) {
    let mut input = input.clone();
    if input.autopilot {
        input.flap = autopilot_wants_flap(world);
    }

    match world.phase {
        GamePhase::GameOver => return,
        GamePhase::Ready => {
            if !input.flap {
                return;
            }
            log::info!(
                "Run started: seed {}, ability {:?}",
                world.seed,
                world.abilities.ability()
            );
            world.phase = GamePhase::Playing;
            world.events.push(GameEvent::RunStarted);
        }
        GamePhase::Playing => {}
    }

    // Timers
    if world.physics.tick_power_up() {
        log::debug!("Power-up window over");
        world.events.push(GameEvent::PowerUpExpired);
    }
    let window_dt = match world.window_clock {
        WindowClock::Real => input.real_elapsed.unwrap_or(dt),
        WindowClock::Simulation => scaled_dt(world, dt),
    };
    let (activation, expired) = world.abilities.update(dt, window_dt);
    if let Some(activation) = activation {
        world.events.push(GameEvent::Activated(activation));
    }
    world
        .events
        .extend(expired.into_iter().map(GameEvent::Expired));

    // Triggers
    if input.ability
        && let Some(activation) = world.abilities.trigger()
    {
        world.events.push(GameEvent::Activated(activation));
    }
    if input.slow_time
        && let Some(activation) = world.abilities.trigger_slow_time()
    {
        world.events.push(GameEvent::Activated(activation));
    }

    // Player
    let step_dt = scaled_dt(world, dt);
    let player = &mut world.player;
    if world.abilities.jetpack_active() {
        player.velocity_y = 0.0;
    } else {
        if input.flap {
            player.velocity_y = world.physics.jump();
            world.events.push(GameEvent::Flap);
        }
        player.velocity_y = world.physics.integrate_velocity(player.velocity_y, step_dt);
        player.y = world
            .physics
            .integrate_position(player.y, player.velocity_y, step_dt);
    }
    player.rotation = rotation_from_velocity(player.velocity_y, world.rotation_range);

    // Entities
    entities::spawn(world, dt);
    entities::advance(world, dt);
    entities::score_passed(world);
    entities::collect_pickups(world);
    entities::prune(world);

    // Collisions
    if !world.abilities.collisions_suppressed() {
        let hit = entities::pipe_hit(world)
            .or_else(|| ground_collision(world.player.y).then_some(Hit::Ground));
        if let Some(hit) = hit {
            match resolve_collision(&mut world.abilities, &mut world.player, hit) {
                Resolution::Survived(defense) => world.events.push(GameEvent::Defended(defense)),
                Resolution::Fatal => world.end_run(RunOutcome::Crashed),
            }
        }
    }

    if let Some(target) = world.target_score
        && world.score >= target
    {
        world.end_run(RunOutcome::LevelComplete);
    }

    // Visual state
    let player = &mut world.player;
    player.visual_y.follow(player.y, VISUAL_Y_SMOOTH, dt);
    let rotation_smooth = ROTATION_SMOOTH_BASE / world.physics.profile().rotation_speed;
    player
        .visual_rotation
        .follow(player.rotation, rotation_smooth, dt);

    world.time_ticks += 1;
    world.sim_time += step_dt;
}

/// Step length for player physics (halved during slow time)
fn scaled_dt(world: &WorldState, dt: f32) -> f32 {
    if world.abilities.slow_time_active() {
        dt * SLOW_TIME_DT_SCALE
    } else {
        dt
    }
}

/// Flap when falling below the center of the next gap
fn autopilot_wants_flap(world: &WorldState) -> bool {
    let reach = PLAYER_X - world.player.hitbox_size / 2.0;
    let target = world
        .pipes
        .iter()
        .find(|p| p.x + PIPE_WIDTH >= reach)
        .map_or(PLAYER_SPAWN_Y, |p| p.gap_center_y);
    world.phase == GamePhase::Ready
        || (world.player.y > target + AUTOPILOT_SLACK && world.player.velocity_y >= 0.0)
}
