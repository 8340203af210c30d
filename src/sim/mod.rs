//! Simulation module
//!
//! All gameplay logic lives here:
//! - One step per frame callback, driven by [`clock::SimClock`]
//! - Seeded RNG only
//! - Stable iteration order (entities stay in spawn order)
//! - No rendering or platform dependencies

pub mod ability;
pub mod clock;
pub mod collision;
pub mod entities;
pub mod interp;
pub mod physics;
pub mod schedule;
pub mod state;
pub mod tick;

pub use ability::{
    Ability, AbilityState, AbilityStatus, Activation, Character, Consumable, Consumables, Defense,
    Expiry, Resolution, resolve_collision,
};
pub use clock::{FrameTiming, SimClock};
pub use collision::{Hit, Rect};
pub use entities::EntityPools;
pub use physics::{Difficulty, DifficultyProfile, PhysicsIntegrator, RotationRange};
pub use schedule::{Schedule, TimedEffect};
pub use state::{
    Coin, GameEvent, GamePhase, Pipe, PlayerBody, PowerUp, PowerUpKind, RunOutcome, RunSummary,
    WorldState,
};
pub use tick::{TickInput, tick};
