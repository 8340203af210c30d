//! Entity lifecycle: spawn, advance, score, collect, prune
//!
//! Pipes, coins and power-ups are stored in plain vectors ordered by spawn
//! (and therefore by ID). Retired entities go back to per-kind pools and are
//! reinitialized in place on the next spawn.

use glam::Vec2;
use rand::Rng;

use super::ability::SLOW_TIME_OBSTACLE_SCALE;
use super::collision::{
    Hit, in_collision_band, player_pipe_collision, player_rect, within_pickup_radius,
};
use super::interp::lerp;
use super::state::{Coin, GameEvent, Pipe, PowerUp, PowerUpKind, WorldState};
use crate::consts::*;
use crate::render::ObjectPool;

/// Coin spin in degrees per second
const COIN_SPIN: f32 = 180.0;
/// Rate at which a coin's scale approaches its target
const COIN_SCALE_RATE: f32 = 5.0;
/// Power-up pulse phase per second
const POWER_UP_PULSE: f32 = 4.0;
/// Power-up spin in degrees per second
const POWER_UP_SPIN: f32 = 90.0;

/// Free lists for every entity kind
#[derive(Debug, Clone, Default)]
pub struct EntityPools {
    pub pipes: ObjectPool<Pipe>,
    pub coins: ObjectPool<Coin>,
    pub power_ups: ObjectPool<PowerUp>,
}

/// Current scroll speed per tick, including slow time
pub fn scroll_speed(world: &WorldState) -> f32 {
    let speed = world.physics.obstacle_speed(world.score);
    if world.abilities.slow_time_active() {
        speed * SLOW_TIME_OBSTACLE_SCALE
    } else {
        speed
    }
}

/// Spawn new pipes, coins and power-ups as needed
pub fn spawn(world: &mut WorldState, dt: f32) {
    let needs_pipe = world
        .pipes
        .last()
        .is_none_or(|last| last.x < PIPE_SPAWN_THRESHOLD);
    if needs_pipe {
        let gap = GAP_MIN + world.rng.random::<f32>() * GAP_RANGE;
        let id = world.next_entity_id();
        let velocity = scroll_speed(world);
        let mut pipe = world.pools.pipes.acquire(Pipe::default);
        pipe.reset(id, SPAWN_X, gap, velocity);
        world.pipes.push(pipe);
    }

    let ticks = dt * TICKS_PER_SEC;

    if world.rng.random::<f32>() < COIN_SPAWN_CHANCE * ticks {
        let y = PICKUP_Y_MIN + world.rng.random::<f32>() * PICKUP_Y_RANGE;
        let id = world.next_entity_id();
        let mut coin = world.pools.coins.acquire(Coin::default);
        coin.reset(id, SPAWN_X, y);
        world.coins.push(coin);
    }

    if !world.physics.power_up_active() && world.rng.random::<f32>() < POWER_UP_SPAWN_CHANCE * ticks {
        let y = PICKUP_Y_MIN + world.rng.random::<f32>() * PICKUP_Y_RANGE;
        let kind = PowerUpKind::ALL[world.rng.random_range(0..PowerUpKind::ALL.len())];
        let id = world.next_entity_id();
        let mut power_up = world.pools.power_ups.acquire(PowerUp::default);
        power_up.reset(id, SPAWN_X, y, kind);
        world.power_ups.push(power_up);
    }
}

/// Scroll everything left and step the pickup animations
pub fn advance(world: &mut WorldState, dt: f32) {
    let speed = scroll_speed(world);
    let dx = speed * dt * TICKS_PER_SEC;

    for pipe in &mut world.pipes {
        pipe.velocity = speed;
        pipe.x -= dx;
    }
    for coin in &mut world.coins {
        coin.x -= dx;
        coin.rotation = (coin.rotation + COIN_SPIN * dt) % 360.0;
        coin.scale = lerp(coin.scale, coin.target_scale, (dt * COIN_SCALE_RATE).min(1.0));
    }
    for power_up in &mut world.power_ups {
        power_up.x -= dx;
        power_up.pulse_phase += POWER_UP_PULSE * dt;
        power_up.rotation = (power_up.rotation + POWER_UP_SPIN * dt) % 360.0;
    }
}

/// Mark pipes the player has cleared and award points. Returns points awarded.
pub fn score_passed(world: &mut WorldState) -> u32 {
    let mut awarded = 0;
    for pipe in &mut world.pipes {
        if pipe.passed || pipe.x + PIPE_WIDTH >= PLAYER_X {
            continue;
        }
        pipe.passed = true;
        world.pipes_passed += 1;
        let points = 1 + world.abilities.bonus_points(world.pipes_passed);
        world.score += points;
        awarded += points;
        world.events.push(GameEvent::Scored { points });
    }
    awarded
}

/// Pick up coins and power-ups touching the player
pub fn collect_pickups(world: &mut WorldState) {
    let player_y = world.player.y;
    let radius = if world.abilities.magnet() {
        MAGNET_COIN_RADIUS
    } else {
        COIN_RADIUS
    };
    let value = world.abilities.coin_value();

    for coin in &mut world.coins {
        if coin.collected || !within_pickup_radius(player_y, Vec2::new(coin.x, coin.y), radius) {
            continue;
        }
        coin.collected = true;
        coin.target_scale = 0.0;
        world.coins_collected += value;
        world.events.push(GameEvent::CoinCollected { value });
    }

    for power_up in &mut world.power_ups {
        if power_up.collected
            || !within_pickup_radius(player_y, Vec2::new(power_up.x, power_up.y), POWER_UP_RADIUS)
        {
            continue;
        }
        power_up.collected = true;
        world.physics.activate_power_up();
        log::debug!("Power-up {:?} collected", power_up.kind);
        world
            .events
            .push(GameEvent::PowerUpCollected { kind: power_up.kind });
    }
}

/// Return off-screen and finished entities to their pools
pub fn prune(world: &mut WorldState) {
    world
        .pools
        .pipes
        .reclaim(&mut world.pipes, |p| p.x < PIPE_DESPAWN_X);
    world
        .pools
        .coins
        .reclaim(&mut world.coins, |c| c.x < PICKUP_DESPAWN_X || c.vanished());
    world
        .pools
        .power_ups
        .reclaim(&mut world.power_ups, |p| p.x < PICKUP_DESPAWN_X || p.collected);
}

/// First pipe near the player whose segments overlap its hitbox
pub fn pipe_hit(world: &WorldState) -> Option<Hit> {
    let player = player_rect(world.player.y, world.player.hitbox_size);
    world
        .pipes
        .iter()
        .filter(|p| in_collision_band(p.x))
        .filter(|p| world.viewport.is_visible(p.x, 0.0, PIPE_WIDTH, VIEWPORT_HEIGHT))
        .find(|p| player_pipe_collision(&player, p))
        .map(|p| Hit::Pipe { id: p.id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{RunConfig, Settings};
    use crate::sim::ability::{Ability, Character, Consumable};

    fn world_with(config: RunConfig) -> WorldState {
        WorldState::new(&config, &Settings::default())
    }

    fn world() -> WorldState {
        world_with(RunConfig::default())
    }

    #[test]
    fn test_first_pipe_spawns_at_right_edge() {
        let mut world = world();
        spawn(&mut world, SIM_DT);
        assert_eq!(world.pipes.len(), 1);
        let pipe = &world.pipes[0];
        assert_eq!(pipe.x, SPAWN_X);
        assert!(pipe.gap_center_y >= GAP_MIN && pipe.gap_center_y < GAP_MIN + GAP_RANGE);
        assert!(pipe.top_height >= PIPE_MIN_SEGMENT);
        assert!(pipe.bottom_height >= PIPE_MIN_SEGMENT);
    }

    #[test]
    fn test_next_pipe_waits_for_threshold() {
        let mut world = world();
        spawn(&mut world, SIM_DT);
        world.pipes[0].x = 650.0;
        spawn(&mut world, SIM_DT);
        assert_eq!(world.pipes.len(), 1);
        world.pipes[0].x = 599.0;
        spawn(&mut world, SIM_DT);
        assert_eq!(world.pipes.len(), 2);
        assert!(world.pipes[1].id > world.pipes[0].id);
    }

    #[test]
    fn test_no_power_up_spawns_during_window() {
        let mut world = world();
        world.physics.activate_power_up();
        for _ in 0..2000 {
            spawn(&mut world, SIM_DT);
        }
        assert!(world.power_ups.is_empty());
    }

    #[test]
    fn test_advance_moves_left() {
        let mut world = world();
        world.pipes.push(Pipe::new(1, 500.0, 250.0, 0.0));
        advance(&mut world, SIM_DT);
        let expected = 500.0 - world.physics.obstacle_speed(0);
        assert!((world.pipes[0].x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_slow_time_scales_scroll() {
        let config = RunConfig {
            consumables: vec![Consumable::SlowTime],
            ..Default::default()
        };
        let mut world = world_with(config);
        let normal = scroll_speed(&world);
        world.abilities.trigger_slow_time();
        assert!((scroll_speed(&world) - normal * SLOW_TIME_OBSTACLE_SCALE).abs() < 1e-5);
    }

    #[test]
    fn test_pipe_scores_once() {
        let mut world = world();
        world.pipes.push(Pipe::new(1, 10.0, 250.0, 3.0));
        assert_eq!(score_passed(&mut world), 1);
        assert_eq!(score_passed(&mut world), 0);
        assert_eq!(world.score, 1);
        assert!(world.pipes[0].passed);
    }

    #[test]
    fn test_pipe_not_scored_while_overlapping_player() {
        let mut world = world();
        world.pipes.push(Pipe::new(1, 20.0, 250.0, 3.0));
        assert_eq!(score_passed(&mut world), 0);
    }

    #[test]
    fn test_bonus_every_fifth_pipe() {
        let config = RunConfig {
            character: Character::new("Priya", Ability::BonusPoints),
            ..Default::default()
        };
        let mut world = world_with(config);
        let mut awards = Vec::new();
        for id in 0..10 {
            world.pipes.push(Pipe::new(id, 10.0, 250.0, 3.0));
            awards.push(score_passed(&mut world));
        }
        assert_eq!(awards, vec![1, 1, 1, 1, 3, 1, 1, 1, 1, 3]);
        assert_eq!(world.score, 14);
    }

    #[test]
    fn test_coin_collected_once() {
        let mut world = world();
        let mut coin = Coin::default();
        coin.reset(7, PLAYER_X + 10.0, world.player.y);
        world.coins.push(coin);

        collect_pickups(&mut world);
        collect_pickups(&mut world);
        assert_eq!(world.coins_collected, 1);
        assert!(world.coins[0].collected);
        assert_eq!(world.coins[0].target_scale, 0.0);
    }

    #[test]
    fn test_magnet_and_double_coin() {
        let config = RunConfig {
            consumables: vec![Consumable::Magnet, Consumable::DoubleCoin],
            ..Default::default()
        };
        let mut world = world_with(config);
        let mut coin = Coin::default();
        coin.reset(1, PLAYER_X + 40.0, world.player.y);
        world.coins.push(coin);

        collect_pickups(&mut world);
        assert_eq!(world.coins_collected, 2);
    }

    #[test]
    fn test_coin_out_of_reach_without_magnet() {
        let mut world = world();
        let mut coin = Coin::default();
        coin.reset(1, PLAYER_X + 40.0, world.player.y);
        world.coins.push(coin);

        collect_pickups(&mut world);
        assert_eq!(world.coins_collected, 0);
    }

    #[test]
    fn test_power_up_pickup_opens_window() {
        let mut world = world();
        let mut power_up = PowerUp::default();
        power_up.reset(3, PLAYER_X, world.player.y + 20.0, PowerUpKind::Gravity);
        world.power_ups.push(power_up);

        collect_pickups(&mut world);
        assert!(world.physics.power_up_active());
        prune(&mut world);
        assert!(world.power_ups.is_empty());
        assert_eq!(world.pools.power_ups.len(), 1);
    }

    #[test]
    fn test_prune_recycles_into_pools() {
        let mut world = world();
        world.pipes.push(Pipe::new(1, -101.0, 250.0, 3.0));
        world.pipes.push(Pipe::new(2, 300.0, 250.0, 3.0));
        prune(&mut world);
        assert_eq!(world.pipes.len(), 1);
        assert_eq!(world.pipes[0].id, 2);
        assert_eq!(world.pools.pipes.len(), 1);

        // The pooled pipe is reused for the next spawn
        world.pipes.clear();
        spawn(&mut world, SIM_DT);
        assert!(world.pools.pipes.is_empty());
        assert!(!world.pipes[0].passed);
        assert_eq!(world.pipes[0].x, SPAWN_X);
    }

    #[test]
    fn test_collected_coin_pruned_after_shrinking() {
        let mut world = world();
        let mut coin = Coin::default();
        coin.reset(1, 400.0, 300.0);
        coin.scale = 1.0;
        coin.collected = true;
        coin.target_scale = 0.0;
        world.coins.push(coin);

        for _ in 0..120 {
            advance(&mut world, SIM_DT);
            prune(&mut world);
        }
        assert!(world.coins.is_empty());
    }

    #[test]
    fn test_pipe_hit_filters_distant_pipes() {
        let mut world = world();
        // Gap far from the player, but out of the collision band
        world.pipes.push(Pipe::new(1, 400.0, 100.0, 3.0));
        assert_eq!(pipe_hit(&world), None);

        world.pipes.push(Pipe::new(2, 80.0, 100.0, 3.0));
        assert_eq!(pipe_hit(&world), Some(Hit::Pipe { id: 2 }));
    }
}
