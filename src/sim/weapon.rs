//! Weapon state machine and projectiles
//!
//! Every weapon shares the same gate: a shot is permitted only when the
//! cooldown has elapsed and ammo remains. The charge weapon never fires from
//! `shoot` - it accumulates while held and emits on `release_charge`. The
//! nuke is launch-tracked: at most one nuke projectile exists system-wide,
//! and ammo is spent at launch, not at detonation.

use glam::Vec2;

use super::collision::Rect;
use crate::audio::{AudioPort, Cue};
use crate::consts::*;
use crate::velocity_at_degrees;

/// Player weapon variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeaponKind {
    #[default]
    Default,
    Spread,
    Laser,
    Charge,
    Nuke,
}

impl WeaponKind {
    /// Starting ammo; `None` means unlimited
    pub fn starting_ammo(self) -> Option<u32> {
        match self {
            WeaponKind::Default => None,
            WeaponKind::Spread => Some(30),
            WeaponKind::Laser => Some(50),
            WeaponKind::Charge => Some(20),
            WeaponKind::Nuke => Some(3),
        }
    }

    pub fn cooldown_ms(self) -> u64 {
        match self {
            WeaponKind::Default => 500,
            WeaponKind::Spread => 700,
            WeaponKind::Laser => 100,
            WeaponKind::Charge => 800,
            WeaponKind::Nuke => 1000,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Default => "DEFAULT",
            WeaponKind::Spread => "SPREAD",
            WeaponKind::Laser => "LASER",
            WeaponKind::Charge => "CHARGE",
            WeaponKind::Nuke => "NUKE",
        }
    }
}

/// Projectile collision geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

/// A live projectile fired by the player
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: WeaponKind,
    pub damage: u32,
    pub shape: Shape,
    pub alive: bool,
}

impl Projectile {
    /// Standard projectile for a weapon kind, fired at `angle_deg` off forward
    pub fn new(pos: Vec2, kind: WeaponKind, angle_deg: f32) -> Self {
        let (speed, damage, shape) = match kind {
            WeaponKind::Default => (
                10.0,
                1,
                Shape::Rect {
                    width: 10.0,
                    height: 5.0,
                },
            ),
            WeaponKind::Spread => (8.0, 2, Shape::Circle { radius: 8.0 }),
            WeaponKind::Laser => (
                12.0,
                1,
                Shape::Rect {
                    width: 20.0,
                    height: 4.0,
                },
            ),
            // Charge projectiles scale with level; see `charged`
            WeaponKind::Charge => (8.0, 2, Shape::Circle { radius: 10.0 }),
            WeaponKind::Nuke => (3.0, 100, Shape::Circle { radius: 5.0 }),
        };
        Self {
            pos,
            vel: velocity_at_degrees(speed, angle_deg),
            kind,
            damage,
            shape,
            alive: true,
        }
    }

    /// Charge projectile with level-scaled radius and damage
    pub fn charged(pos: Vec2, charge_level: u8, angle_deg: f32) -> Self {
        let t = charge_level as f32 / CHARGE_MAX as f32;
        let radius = 10.0 + (t * 10.0).round();
        let damage = 2 + (t * 4.0).round() as u32;
        Self {
            pos,
            vel: velocity_at_degrees(8.0, angle_deg),
            kind: WeaponKind::Charge,
            damage,
            shape: Shape::Circle { radius },
            alive: true,
        }
    }

    /// The nuke launches ahead of the craft and crawls forward
    pub fn nuke(origin: Vec2) -> Self {
        Self::new(origin + Vec2::new(PLAYER_RADIUS * 2.0, 0.0), WeaponKind::Nuke, 0.0)
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x < 0.0
            || self.pos.x > SCREEN_WIDTH
            || self.pos.y < 0.0
            || self.pos.y > SCREEN_HEIGHT
    }

    /// Axis-aligned collision box
    pub fn hit_box(&self) -> Rect {
        match self.shape {
            Shape::Circle { radius } => Rect::from_center(self.pos, radius, radius),
            // Rect projectiles anchor at the muzzle point, vertically centered
            Shape::Rect { width, height } => Rect::new(
                self.pos.x,
                self.pos.y - height / 2.0,
                width,
                height,
            ),
        }
    }
}

/// Result of a `shoot`/`release_charge` call
#[derive(Debug, Default)]
pub struct ShotOutcome {
    /// Ordinary projectiles emitted this call
    pub projectiles: Vec<Projectile>,
    /// A launched nuke, tracked separately by the player
    pub nuke: Option<Projectile>,
    /// Ammo exhausted: caller must revert the weapon to Default
    pub revert_to_default: bool,
}

impl ShotOutcome {
    fn none() -> Self {
        Self::default()
    }
}

/// The player's current weapon
#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// `None` = unlimited (Default weapon only)
    pub ammo: Option<u32>,
    pub charge_level: u8,
    pub charging: bool,
    last_shot_ms: Option<u64>,
    last_charge_cue_ms: u64,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new(WeaponKind::Default)
    }
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            ammo: kind.starting_ammo(),
            charge_level: 0,
            charging: false,
            last_shot_ms: None,
            last_charge_cue_ms: 0,
        }
    }

    fn ready(&self, now: u64) -> bool {
        match self.last_shot_ms {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.kind.cooldown_ms(),
        }
    }

    fn has_ammo(&self) -> bool {
        self.ammo.is_none_or(|a| a > 0)
    }

    fn spend_ammo(&mut self) {
        if let Some(ammo) = &mut self.ammo {
            *ammo = ammo.saturating_sub(1);
        }
    }

    /// Fire the weapon. No-op for the charge weapon (fires on release only),
    /// and while the cooldown or ammo gate is unsatisfied. `nuke_outstanding`
    /// rejects a second nuke launch while one is in flight.
    pub fn shoot(
        &mut self,
        origin: Vec2,
        now: u64,
        nuke_outstanding: bool,
        audio: &mut dyn AudioPort,
    ) -> ShotOutcome {
        if self.kind == WeaponKind::Charge {
            return ShotOutcome::none();
        }
        if !self.ready(now) || !self.has_ammo() {
            return ShotOutcome::none();
        }

        if self.kind == WeaponKind::Nuke {
            if nuke_outstanding {
                return ShotOutcome::none();
            }
            self.last_shot_ms = Some(now);
            // Ammo is spent at launch; reversion waits for detonation
            self.spend_ammo();
            return ShotOutcome {
                projectiles: Vec::new(),
                nuke: Some(Projectile::nuke(origin)),
                revert_to_default: false,
            };
        }

        self.last_shot_ms = Some(now);
        let projectiles = match self.kind {
            WeaponKind::Spread => {
                audio.play(Cue::SpreadFire);
                [-30.0, -15.0, 0.0, 15.0, 30.0]
                    .iter()
                    .map(|&a| Projectile::new(origin, WeaponKind::Spread, a))
                    .collect()
            }
            WeaponKind::Laser => {
                audio.play(Cue::Laser);
                vec![Projectile::new(origin, WeaponKind::Laser, 0.0)]
            }
            _ => {
                audio.play(Cue::Shoot);
                vec![Projectile::new(origin, WeaponKind::Default, 0.0)]
            }
        };

        let revert_to_default = if self.kind != WeaponKind::Default {
            self.spend_ammo();
            let exhausted = self.ammo == Some(0);
            if exhausted {
                audio.play(Cue::PowerUp);
            }
            exhausted
        } else {
            false
        };

        ShotOutcome {
            projectiles,
            nuke: None,
            revert_to_default,
        }
    }

    /// Begin accumulating charge (charge weapon only)
    pub fn start_charging(&mut self, now: u64) {
        if self.kind == WeaponKind::Charge && !self.charging {
            self.charging = true;
            self.charge_level = 0;
            self.last_charge_cue_ms = now;
        }
    }

    /// Advance charge by one tick while the fire control is held
    pub fn update_charge(&mut self, now: u64, audio: &mut dyn AudioPort) {
        if self.kind != WeaponKind::Charge || !self.charging {
            return;
        }
        self.charge_level = (self.charge_level + CHARGE_STEP).min(CHARGE_MAX);
        if now.saturating_sub(self.last_charge_cue_ms) >= CHARGE_TICK_MS {
            audio.play(Cue::ChargeTick);
            self.last_charge_cue_ms = now;
        }
    }

    /// Release the accumulated charge. Below the minimum level the charge is
    /// discarded; at or above the super threshold a full radial burst fires.
    pub fn release_charge(
        &mut self,
        origin: Vec2,
        now: u64,
        audio: &mut dyn AudioPort,
    ) -> ShotOutcome {
        if !self.charging {
            return ShotOutcome::none();
        }
        self.charging = false;

        if self.charge_level < CHARGE_MIN_RELEASE {
            self.charge_level = 0;
            return ShotOutcome::none();
        }
        if !self.has_ammo() || !self.ready(now) {
            self.charge_level = 0;
            return ShotOutcome::none();
        }

        self.last_shot_ms = Some(now);
        let projectiles = if self.charge_level >= CHARGE_SUPER_THRESHOLD {
            // Radial blast: 16 projectiles evenly spaced around 360 degrees
            audio.play(Cue::Laser);
            let count = 16;
            (0..count)
                .map(|i| {
                    let angle = 360.0 / count as f32 * i as f32;
                    Projectile::charged(origin, self.charge_level, angle)
                })
                .collect()
        } else {
            audio.play(Cue::Shoot);
            vec![Projectile::charged(origin, self.charge_level, 0.0)]
        };

        // One ammo per release regardless of burst size
        self.spend_ammo();
        self.charge_level = 0;

        ShotOutcome {
            projectiles,
            nuke: None,
            revert_to_default: self.ammo == Some(0),
        }
    }
}
