//! Character abilities and run consumables
//!
//! Each character carries exactly one [`Ability`]; consumables bought for a
//! run are independent of it. Collision outcomes go through an ordered chain
//! of defenses (see [`resolve_collision`]), the first one that applies wins.

use serde::{Deserialize, Serialize};

use super::collision::Hit;
use super::physics::RotationRange;
use super::schedule::{Schedule, TimedEffect};
use super::state::PlayerBody;
use crate::consts::{DEFAULT_HITBOX, TICKS_PER_SEC};

/// Grace period after a shield or spare life absorbs a hit (seconds)
pub const HIT_GRACE_SECS: f32 = 1.0;
pub const INVISIBILITY_SECS: f32 = 3.0;
pub const INVISIBILITY_COOLDOWN_TICKS: f32 = 600.0;
pub const SLOW_TIME_SECS: f32 = 3.0;
pub const SLOW_TIME_COOLDOWN_TICKS: f32 = 900.0;
pub const FINAL_FLIGHT_SECS: f32 = 5.0;
pub const CLONE_WINDOW_SECS: f32 = 0.5;
pub const JETPACK_TICKS: f32 = 300.0;
pub const EXTRA_LIVES: u32 = 3;

/// Obstacle speed factor while slow time is active
pub const SLOW_TIME_OBSTACLE_SCALE: f32 = 0.3;
/// Integration dt factor while slow time is active
pub const SLOW_TIME_DT_SCALE: f32 = 0.5;

/// Innate character ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ability {
    #[default]
    Normal,
    /// Starts with three lives
    ExtraLives,
    /// Player-triggered invisibility on a cooldown
    Invisibility,
    /// Weaker gravity
    SlowGravity,
    /// Revives once at the spawn point
    CloneRevival,
    /// Stronger flap
    FastFlap,
    /// +2 on every fifth pipe
    BonusPoints,
    /// Innate shield, periodic slow time and a final-flight revival
    ShieldTimeFlight,
    /// One five-second jetpack flight through everything
    Jetpack,
}

impl Ability {
    pub fn starting_lives(&self) -> u32 {
        match self {
            Ability::ExtraLives => EXTRA_LIVES,
            _ => 1,
        }
    }

    pub fn gravity_scale(&self) -> f32 {
        match self {
            Ability::SlowGravity => 0.6,
            _ => 1.0,
        }
    }

    pub fn jump_scale(&self) -> f32 {
        match self {
            Ability::FastFlap => 4.0 / 3.0,
            _ => 1.0,
        }
    }

    pub fn rotation_range(&self) -> RotationRange {
        match self {
            Ability::Normal => RotationRange::NOSE_DIVE,
            _ => RotationRange::SYMMETRIC,
        }
    }
}

/// A playable character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    pub ability: Ability,
    /// Side of the square hitbox
    pub hitbox_size: f32,
}

impl Default for Character {
    fn default() -> Self {
        Self::new("TT", Ability::Normal)
    }
}

impl Character {
    pub fn new(name: impl Into<String>, ability: Ability) -> Self {
        Self {
            name: name.into(),
            ability,
            hitbox_size: DEFAULT_HITBOX,
        }
    }

    pub fn with_hitbox(mut self, hitbox_size: f32) -> Self {
        self.hitbox_size = hitbox_size;
        self
    }
}

/// Items bought before a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Consumable {
    /// Absorbs one hit
    Shield,
    /// One player-triggered slow-time window
    SlowTime,
    /// Coins are worth two
    DoubleCoin,
    /// Wider coin pickup radius
    Magnet,
}

/// Run-scoped consumable flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Consumables {
    pub shield: bool,
    pub slow_time: bool,
    pub slow_time_used: bool,
    pub double_coin: bool,
    pub magnet: bool,
}

impl Consumables {
    pub fn from_selection(selected: &[Consumable]) -> Self {
        let has = |c| selected.contains(&c);
        Self {
            shield: has(Consumable::Shield),
            slow_time: has(Consumable::SlowTime),
            slow_time_used: false,
            double_coin: has(Consumable::DoubleCoin),
            magnet: has(Consumable::Magnet),
        }
    }
}

/// A defense that turned a collision into something survivable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Defense {
    ConsumableShield,
    InnateShield,
    SpareLife,
    CloneRevival,
    FinalFlight,
}

/// Outcome of a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Survived(Defense),
    Fatal,
}

/// Something the player or a timer switched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activation {
    Invisibility,
    SlowTime,
    Jetpack,
}

/// Something that switched off this step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Expiry {
    Window(TimedEffect),
    Jetpack,
}

/// Per-run ability state: character flags, consumables and timed windows
#[derive(Debug, Clone)]
pub struct AbilityState {
    ability: Ability,
    innate_shield: bool,
    /// Ticks until invisibility can be used again
    invisibility_cooldown: f32,
    /// Ticks until the periodic slow time fires again
    slow_time_cooldown: f32,
    final_flight_used: bool,
    clone_used: bool,
    jetpack_available: bool,
    /// Ticks of jetpack flight left
    jetpack_ticks: f32,
    consumables: Consumables,
    windows: Schedule,
}

impl AbilityState {
    pub fn new(ability: Ability, consumables: Consumables) -> Self {
        Self {
            ability,
            innate_shield: ability == Ability::ShieldTimeFlight,
            invisibility_cooldown: 0.0,
            slow_time_cooldown: 0.0,
            final_flight_used: false,
            clone_used: false,
            jetpack_available: ability == Ability::Jetpack,
            jetpack_ticks: 0.0,
            consumables,
            windows: Schedule::new(),
        }
    }

    pub fn ability(&self) -> Ability {
        self.ability
    }

    pub fn consumables(&self) -> &Consumables {
        &self.consumables
    }

    pub fn windows(&self) -> &Schedule {
        &self.windows
    }

    pub fn jetpack_active(&self) -> bool {
        self.jetpack_ticks > 0.0
    }

    pub fn slow_time_active(&self) -> bool {
        self.windows.is_active(TimedEffect::SlowTime)
    }

    /// Whether every collision check is skipped this step
    pub fn collisions_suppressed(&self) -> bool {
        self.jetpack_active()
            || [
                TimedEffect::Invincibility,
                TimedEffect::Invisibility,
                TimedEffect::FinalFlight,
                TimedEffect::CloneWindow,
            ]
            .iter()
            .any(|&effect| self.windows.is_active(effect))
    }

    /// Coin pickup radius multiplier source
    pub fn magnet(&self) -> bool {
        self.consumables.magnet
    }

    pub fn coin_value(&self) -> u32 {
        if self.consumables.double_coin { 2 } else { 1 }
    }

    /// Extra points awarded when the `passed`-th pipe is scored
    pub fn bonus_points(&self, passed: u32) -> u32 {
        match self.ability {
            Ability::BonusPoints if passed > 0 && passed % 5 == 0 => 2,
            _ => 0,
        }
    }

    /// Player pressed the character ability trigger
    pub fn trigger(&mut self) -> Option<Activation> {
        match self.ability {
            Ability::Invisibility => self.try_invisibility(),
            Ability::Jetpack => self.try_jetpack(),
            Ability::Normal
            | Ability::ExtraLives
            | Ability::SlowGravity
            | Ability::CloneRevival
            | Ability::FastFlap
            | Ability::BonusPoints
            | Ability::ShieldTimeFlight => None,
        }
    }

    fn try_invisibility(&mut self) -> Option<Activation> {
        if self.invisibility_cooldown > 0.0
            || self.windows.is_active(TimedEffect::Invisibility)
            || self.windows.is_active(TimedEffect::Invincibility)
        {
            return None;
        }
        self.windows.start(TimedEffect::Invisibility, INVISIBILITY_SECS);
        self.invisibility_cooldown = INVISIBILITY_COOLDOWN_TICKS;
        log::debug!("Invisibility on");
        Some(Activation::Invisibility)
    }

    fn try_jetpack(&mut self) -> Option<Activation> {
        if !self.jetpack_available || self.jetpack_active() {
            return None;
        }
        self.jetpack_available = false;
        self.jetpack_ticks = JETPACK_TICKS;
        log::debug!("Jetpack ignited");
        Some(Activation::Jetpack)
    }

    /// Player used the slow-time consumable (once per run)
    pub fn trigger_slow_time(&mut self) -> Option<Activation> {
        if !self.consumables.slow_time || self.consumables.slow_time_used || self.slow_time_active() {
            return None;
        }
        self.consumables.slow_time_used = true;
        self.windows.start(TimedEffect::SlowTime, SLOW_TIME_SECS);
        log::debug!("Slow time consumable used");
        Some(Activation::SlowTime)
    }

    /// Advance cooldowns by `dt` (tick-scaled) and the window queue by `window_dt`.
    ///
    /// Returns the periodic activation (if any) and everything that expired.
    pub fn update(&mut self, dt: f32, window_dt: f32) -> (Option<Activation>, Vec<Expiry>) {
        let ticks = dt * TICKS_PER_SEC;
        let mut expired: Vec<Expiry> = self
            .windows
            .advance(window_dt)
            .into_iter()
            .map(Expiry::Window)
            .collect();

        if self.invisibility_cooldown > 0.0 {
            self.invisibility_cooldown = (self.invisibility_cooldown - ticks).max(0.0);
        }

        let mut activation = None;
        if self.ability == Ability::ShieldTimeFlight {
            if self.slow_time_cooldown > 0.0 {
                self.slow_time_cooldown = (self.slow_time_cooldown - ticks).max(0.0);
            } else if !self.slow_time_active() {
                self.slow_time_cooldown = SLOW_TIME_COOLDOWN_TICKS;
                self.windows.start(TimedEffect::SlowTime, SLOW_TIME_SECS);
                log::debug!("Periodic slow time");
                activation = Some(Activation::SlowTime);
            }
        }

        if self.jetpack_active() {
            self.jetpack_ticks = (self.jetpack_ticks - ticks).max(0.0);
            if !self.jetpack_active() {
                expired.push(Expiry::Jetpack);
            }
        }

        (activation, expired)
    }

    /// UI indicators
    pub fn status(&self) -> AbilityStatus {
        AbilityStatus {
            ability: self.ability,
            innate_shield: self.innate_shield,
            consumable_shield: self.consumables.shield,
            invisible: self.windows.is_active(TimedEffect::Invisibility),
            invisibility_cooldown_secs: self.invisibility_cooldown / TICKS_PER_SEC,
            invincible: self.collisions_suppressed(),
            slow_time_active: self.slow_time_active(),
            slow_time_cooldown_secs: self.slow_time_cooldown / TICKS_PER_SEC,
            slow_time_ready: self.consumables.slow_time && !self.consumables.slow_time_used,
            jetpack_available: self.jetpack_available,
            jetpack_secs_left: self.jetpack_ticks / TICKS_PER_SEC,
            final_flight_active: self.windows.is_active(TimedEffect::FinalFlight),
            final_flight_used: self.final_flight_used,
            clone_used: self.clone_used,
            clone_active: self.windows.is_active(TimedEffect::CloneWindow),
        }
    }
}

/// Ability indicators for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbilityStatus {
    pub ability: Ability,
    pub innate_shield: bool,
    pub consumable_shield: bool,
    pub invisible: bool,
    pub invisibility_cooldown_secs: f32,
    pub invincible: bool,
    pub slow_time_active: bool,
    pub slow_time_cooldown_secs: f32,
    pub slow_time_ready: bool,
    pub jetpack_available: bool,
    pub jetpack_secs_left: f32,
    pub final_flight_active: bool,
    pub final_flight_used: bool,
    pub clone_used: bool,
    pub clone_active: bool,
}

type DefenseGuard = fn(&mut AbilityState, &mut PlayerBody, Hit) -> Option<Defense>;

/// Defenses in precedence order
const DEFENSES: [DefenseGuard; 5] = [
    consumable_shield,
    innate_shield,
    spare_life,
    clone_revival,
    final_flight,
];

/// Run a collision through the defense chain.
///
/// The caller is responsible for skipping this while collisions are
/// suppressed. A `Fatal` result leaves the player with zero lives.
pub fn resolve_collision(
    abilities: &mut AbilityState,
    player: &mut PlayerBody,
    hit: Hit,
) -> Resolution {
    for guard in DEFENSES {
        if let Some(defense) = guard(abilities, player, hit) {
            log::debug!("{:?} absorbed {:?}", defense, hit);
            return Resolution::Survived(defense);
        }
    }
    player.lives = 0;
    Resolution::Fatal
}

fn absorb(abilities: &mut AbilityState, player: &mut PlayerBody, hit: Hit) {
    if hit.resets_position() {
        player.respawn();
    }
    abilities
        .windows
        .start(TimedEffect::Invincibility, HIT_GRACE_SECS);
}

fn consumable_shield(abilities: &mut AbilityState, player: &mut PlayerBody, hit: Hit) -> Option<Defense> {
    if !abilities.consumables.shield {
        return None;
    }
    abilities.consumables.shield = false;
    absorb(abilities, player, hit);
    Some(Defense::ConsumableShield)
}

fn innate_shield(abilities: &mut AbilityState, player: &mut PlayerBody, hit: Hit) -> Option<Defense> {
    if !abilities.innate_shield {
        return None;
    }
    abilities.innate_shield = false;
    absorb(abilities, player, hit);
    Some(Defense::InnateShield)
}

fn spare_life(abilities: &mut AbilityState, player: &mut PlayerBody, hit: Hit) -> Option<Defense> {
    if player.lives <= 1 {
        return None;
    }
    player.lives -= 1;
    absorb(abilities, player, hit);
    Some(Defense::SpareLife)
}

fn clone_revival(abilities: &mut AbilityState, player: &mut PlayerBody, _hit: Hit) -> Option<Defense> {
    if abilities.ability != Ability::CloneRevival || abilities.clone_used {
        return None;
    }
    abilities.clone_used = true;
    player.respawn();
    abilities
        .windows
        .start(TimedEffect::CloneWindow, CLONE_WINDOW_SECS);
    Some(Defense::CloneRevival)
}

fn final_flight(abilities: &mut AbilityState, player: &mut PlayerBody, _hit: Hit) -> Option<Defense> {
    if abilities.ability != Ability::ShieldTimeFlight || abilities.final_flight_used {
        return None;
    }
    abilities.final_flight_used = true;
    player.lives = 1;
    player.respawn();
    abilities
        .windows
        .start(TimedEffect::FinalFlight, FINAL_FLIGHT_SECS);
    Some(Defense::FinalFlight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_SPAWN_Y;

    fn setup(ability: Ability, consumables: &[Consumable]) -> (AbilityState, PlayerBody) {
        let abilities = AbilityState::new(ability, Consumables::from_selection(consumables));
        let player = PlayerBody::new(DEFAULT_HITBOX, ability.starting_lives());
        (abilities, player)
    }

    /// Let every timed window run out
    fn expire_windows(abilities: &mut AbilityState) {
        abilities.update(0.0, 10.0);
    }

    #[test]
    fn test_consumable_shield_takes_precedence() {
        let (mut abilities, mut player) = setup(Ability::ShieldTimeFlight, &[Consumable::Shield]);
        let hit = Hit::Pipe { id: 7 };
        let result = resolve_collision(&mut abilities, &mut player, hit);
        assert_eq!(result, Resolution::Survived(Defense::ConsumableShield));
        assert!(!abilities.consumables().shield);
        assert!(abilities.status().innate_shield);
        assert!(abilities.collisions_suppressed());
    }

    #[test]
    fn test_pipe_hit_keeps_position_ground_hit_respawns() {
        let (mut abilities, mut player) = setup(Ability::Normal, &[Consumable::Shield]);
        player.y = 123.0;
        player.velocity_y = 4.0;
        resolve_collision(&mut abilities, &mut player, Hit::Pipe { id: 1 });
        assert_eq!(player.y, 123.0);
        assert_eq!(player.velocity_y, 4.0);

        let (mut abilities, mut player) = setup(Ability::Normal, &[Consumable::Shield]);
        player.y = 536.0;
        resolve_collision(&mut abilities, &mut player, Hit::Ground);
        assert_eq!(player.y, PLAYER_SPAWN_Y);
        assert_eq!(player.velocity_y, 0.0);
    }

    #[test]
    fn test_shield_time_flight_full_chain() {
        let (mut abilities, mut player) = setup(Ability::ShieldTimeFlight, &[]);
        let hit = Hit::Pipe { id: 1 };

        assert_eq!(
            resolve_collision(&mut abilities, &mut player, hit),
            Resolution::Survived(Defense::InnateShield)
        );
        expire_windows(&mut abilities);

        assert_eq!(
            resolve_collision(&mut abilities, &mut player, hit),
            Resolution::Survived(Defense::FinalFlight)
        );
        assert_eq!(player.lives, 1);
        assert!(abilities.status().final_flight_active);
        assert!(abilities.collisions_suppressed());
        expire_windows(&mut abilities);

        // Final flight is one-shot
        assert_eq!(resolve_collision(&mut abilities, &mut player, hit), Resolution::Fatal);
        assert_eq!(player.lives, 0);
    }

    #[test]
    fn test_spare_lives_then_fatal() {
        let (mut abilities, mut player) = setup(Ability::ExtraLives, &[]);
        let hit = Hit::Pipe { id: 1 };
        for expected in [2, 1] {
            assert_eq!(
                resolve_collision(&mut abilities, &mut player, hit),
                Resolution::Survived(Defense::SpareLife)
            );
            assert_eq!(player.lives, expected);
            expire_windows(&mut abilities);
        }
        assert_eq!(resolve_collision(&mut abilities, &mut player, hit), Resolution::Fatal);
        assert_eq!(player.lives, 0);
    }

    #[test]
    fn test_clone_revival_is_one_shot() {
        let (mut abilities, mut player) = setup(Ability::CloneRevival, &[]);
        player.y = 50.0;
        assert_eq!(
            resolve_collision(&mut abilities, &mut player, Hit::Pipe { id: 3 }),
            Resolution::Survived(Defense::CloneRevival)
        );
        assert_eq!(player.y, PLAYER_SPAWN_Y);
        assert!(abilities.status().clone_used);
        expire_windows(&mut abilities);
        assert_eq!(
            resolve_collision(&mut abilities, &mut player, Hit::Pipe { id: 3 }),
            Resolution::Fatal
        );
    }

    #[test]
    fn test_jetpack_is_one_shot() {
        let (mut abilities, _) = setup(Ability::Jetpack, &[]);
        assert_eq!(abilities.trigger(), Some(Activation::Jetpack));
        assert!(abilities.jetpack_active());
        assert!(abilities.collisions_suppressed());

        // 300 ticks at 60 Hz
        let mut ended = false;
        for _ in 0..300 {
            let (_, expired) = abilities.update(1.0 / 60.0, 1.0 / 60.0);
            ended |= expired.contains(&Expiry::Jetpack);
        }
        assert!(ended);
        assert!(!abilities.jetpack_active());
        assert_eq!(abilities.trigger(), None);
        assert!(!abilities.jetpack_active());
    }

    #[test]
    fn test_invisibility_cooldown() {
        let (mut abilities, _) = setup(Ability::Invisibility, &[]);
        assert_eq!(abilities.trigger(), Some(Activation::Invisibility));
        assert!(abilities.collisions_suppressed());
        // Window ends after 3s, cooldown (10s) is still running
        abilities.update(3.0, 3.0);
        assert!(!abilities.collisions_suppressed());
        assert_eq!(abilities.trigger(), None);
        abilities.update(7.0, 7.0);
        assert_eq!(abilities.trigger(), Some(Activation::Invisibility));
    }

    #[test]
    fn test_trigger_is_noop_for_passive_abilities() {
        for ability in [Ability::Normal, Ability::ExtraLives, Ability::BonusPoints] {
            let (mut abilities, _) = setup(ability, &[]);
            assert_eq!(abilities.trigger(), None);
        }
    }

    #[test]
    fn test_periodic_slow_time() {
        let (mut abilities, _) = setup(Ability::ShieldTimeFlight, &[]);
        let (activation, _) = abilities.update(1.0 / 60.0, 1.0 / 60.0);
        assert_eq!(activation, Some(Activation::SlowTime));
        assert!(abilities.slow_time_active());
        // Cooldown runs for 15 seconds before the next one
        let mut fired = 0;
        for _ in 0..(60 * 14) {
            if abilities.update(1.0 / 60.0, 1.0 / 60.0).0.is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);
        assert!(!abilities.slow_time_active());
    }

    #[test]
    fn test_slow_time_consumable_once_per_run() {
        let (mut abilities, _) = setup(Ability::Normal, &[Consumable::SlowTime]);
        assert_eq!(abilities.trigger_slow_time(), Some(Activation::SlowTime));
        abilities.update(5.0, 5.0);
        assert!(!abilities.slow_time_active());
        assert_eq!(abilities.trigger_slow_time(), None);

        let (mut without, _) = setup(Ability::Normal, &[]);
        assert_eq!(without.trigger_slow_time(), None);
    }

    #[test]
    fn test_bonus_points_every_fifth_pipe() {
        let (abilities, _) = setup(Ability::BonusPoints, &[]);
        assert_eq!(abilities.bonus_points(4), 0);
        assert_eq!(abilities.bonus_points(5), 2);
        assert_eq!(abilities.bonus_points(10), 2);
        let (plain, _) = setup(Ability::Normal, &[]);
        assert_eq!(plain.bonus_points(5), 0);
    }

    #[test]
    fn test_consumable_coin_modifiers() {
        let (abilities, _) = setup(Ability::Normal, &[Consumable::DoubleCoin, Consumable::Magnet]);
        assert_eq!(abilities.coin_value(), 2);
        assert!(abilities.magnet());
    }
}
