//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only (60 Hz), timing from a caller-supplied millisecond clock
//! - Seeded RNG only
//! - No rendering or platform dependencies; audio goes through the injected port

pub mod collision;
pub mod entities;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::Rect;
pub use entities::{
    Enemy, Explosion, Gate, Obstacle, PowerUp, PowerUpKind, Tentacle, Ufo, UfoShot,
};
pub use spawn::{gap_half_width, level_for_score};
pub use state::{GamePhase, GameState, Player};
pub use tick::{TickInput, tick};
pub use weapon::{Projectile, Shape, ShotOutcome, Weapon, WeaponKind};
