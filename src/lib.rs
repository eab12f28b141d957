//! Space Flapper - a vertical-flight arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, weapons, collisions, game state)
//! - `audio`: Audio port injected at the simulation boundary
//! - `snapshot`: Per-frame render handoff
//! - `highscores`: In-memory leaderboard

pub mod audio;
pub mod highscores;
pub mod sim;
pub mod snapshot;

pub use audio::{AudioPort, Cue, LoopCue, NullAudio};
pub use highscores::HighScores;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (frames per second)
    pub const TICK_HZ: u32 = 60;
    /// Milliseconds advanced per fixed tick
    pub const TICK_MS: u64 = 1000 / TICK_HZ as u64;

    /// Playfield dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player craft
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const GRAVITY: f32 = 0.5;
    pub const FLAP_VELOCITY: f32 = -8.0;
    pub const MAX_SHIELDS: u8 = 3;
    /// Invincibility window after a hit
    pub const INVINCIBILITY_MS: u64 = 1000;

    /// Collision boxes are shrunk to 80% of visual size for forgiving hits
    pub const HIT_BOX_SCALE: f32 = 0.8;

    /// Scrolling obstacles
    pub const SCROLL_SPEED: f32 = 3.0;
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const INITIAL_GAP: f32 = 220.0;
    pub const MIN_GAP: f32 = 100.0;
    pub const GAP_DECREASE_PER_LEVEL: f32 = 20.0;

    /// Spawn intervals (milliseconds between spawn checks)
    pub const OBSTACLE_INTERVAL_MS: u64 = 1500;
    pub const ENEMY_INTERVAL_MS: u64 = 2000;
    pub const POWERUP_INTERVAL_MS: u64 = 8000;
    pub const GATE_INTERVAL_MS: u64 = 6000;
    pub const UFO_INTERVAL_MS: u64 = 10_000;
    pub const TENTACLE_INTERVAL_MS: u64 = 20_000;
    /// A failed tentacle roll retries on a shorter wait
    pub const TENTACLE_RETRY_MS: u64 = 5000;

    pub const UFO_SPAWN_CHANCE: f64 = 0.3;
    pub const TENTACLE_SPAWN_CHANCE: f64 = 0.2;
    /// Minimum score before UFOs may appear
    pub const UFO_MIN_SCORE: u32 = 5;
    /// Minimum score before tentacle creatures may appear
    pub const TENTACLE_MIN_SCORE: u32 = 50;

    /// Charge weapon
    pub const CHARGE_STEP: u8 = 2;
    pub const CHARGE_MAX: u8 = 100;
    pub const CHARGE_MIN_RELEASE: u8 = 20;
    pub const CHARGE_SUPER_THRESHOLD: u8 = 80;
    pub const CHARGE_TICK_MS: u64 = 100;

    /// Nuke detonation
    pub const NUKE_BLAST_RADIUS: f32 = 400.0;
    pub const SCORE_PER_NUKE_KILL: u32 = 5;
}

/// Convert an angle in degrees to a velocity of the given speed.
#[inline]
pub fn velocity_at_degrees(speed: f32, degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(speed * rad.cos(), speed * rad.sin())
}
