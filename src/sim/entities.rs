//! Threats, collectibles and transient effects
//!
//! Every spawned entity carries an `alive` flag. Updates and the collision
//! resolver only mark entities dead; the registry compacts once at the end of
//! the frame, so removal never invalidates an in-flight iteration.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::weapon::WeaponKind;
use crate::audio::{AudioPort, Cue};
use crate::consts::*;

/// A scrolling vertical barrier pair with a passable gap
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Vertical center of the gap
    pub gap_y: f32,
    /// Half the gap height; derived from difficulty at spawn time
    pub half_gap: f32,
    /// Set once the player has cleared it (scores exactly once)
    pub passed: bool,
    pub alive: bool,
}

impl Obstacle {
    pub fn spawn(rng: &mut Pcg32, half_gap: f32) -> Self {
        let margin = half_gap + 50.0;
        Self {
            x: SCREEN_WIDTH,
            gap_y: rng.random_range(margin..=(SCREEN_HEIGHT - margin)),
            half_gap,
            passed: false,
            alive: true,
        }
    }

    pub fn update(&mut self) {
        self.x -= SCROLL_SPEED;
        if self.x + OBSTACLE_WIDTH < 0.0 {
            self.alive = false;
        }
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, OBSTACLE_WIDTH, self.gap_y - self.half_gap)
    }

    pub fn bottom_rect(&self) -> Rect {
        let top = self.gap_y + self.half_gap;
        Rect::new(self.x, top, OBSTACLE_WIDTH, SCREEN_HEIGHT - top)
    }
}

/// A slow-crawling ground threat with per-instance speed
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
    pub alive: bool,
}

impl Enemy {
    pub fn spawn(rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(
                SCREEN_WIDTH,
                rng.random_range(50.0..=(SCREEN_HEIGHT - 50.0)),
            ),
            speed: rng.random_range(2..=5) as f32,
            size: 20.0,
            alive: true,
        }
    }

    pub fn update(&mut self) {
        self.pos.x -= self.speed;
        if self.pos.x + self.size < 0.0 {
            self.alive = false;
        }
    }

    pub fn hit_box(&self) -> Rect {
        let half = self.size * HIT_BOX_SCALE;
        Rect::from_center(self.pos, half, half)
    }
}

/// A destructible barrier that soaks multiple hits
#[derive(Debug, Clone)]
pub struct Gate {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub max_health: i32,
    /// Timestamp of the last hit, drives the white flash in the renderer
    pub flash_since: Option<u64>,
    pub alive: bool,
}

impl Gate {
    pub fn spawn(rng: &mut Pcg32) -> Self {
        let height = 100.0;
        Self {
            x: SCREEN_WIDTH,
            y: rng.random_range(height..=(SCREEN_HEIGHT - height)),
            width: 30.0,
            height,
            health: 4,
            max_health: 4,
            flash_since: None,
            alive: true,
        }
    }

    pub fn update(&mut self) {
        self.x -= SCROLL_SPEED;
        if self.x + self.width < 0.0 {
            self.alive = false;
        }
    }

    /// Apply projectile damage. Returns true when the gate is destroyed.
    pub fn hit(&mut self, damage: u32, now: u64, audio: &mut dyn AudioPort) -> bool {
        self.health -= damage as i32;
        self.flash_since = Some(now);
        if self.health <= 0 {
            self.alive = false;
            audio.play(Cue::EnemyDeath);
            true
        } else {
            audio.play(Cue::Hit);
            false
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A shot fired by a UFO
#[derive(Debug, Clone)]
pub struct UfoShot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub alive: bool,
}

pub const UFO_SHOT_RADIUS: f32 = 3.0;
pub const UFO_RADIUS: f32 = 20.0;
/// Frames between UFO shot patterns
const UFO_SHOOT_INTERVAL: u32 = 60;

/// A hovering saucer tracing a bounded Lissajous-style pattern
#[derive(Debug, Clone)]
pub struct Ufo {
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    pub shots: Vec<UfoShot>,
    shoot_timer: u32,
    movement_phase: f32,
    entered: bool,
    pub alive: bool,
}

impl Ufo {
    pub fn spawn(rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(
                SCREEN_WIDTH + UFO_RADIUS,
                rng.random_range(50.0..=(SCREEN_HEIGHT - 50.0)),
            ),
            vel: Vec2::new(-2.0, 0.0),
            health: 3,
            shots: Vec::new(),
            shoot_timer: 0,
            movement_phase: 0.0,
            entered: false,
            alive: true,
        }
    }

    pub fn update(&mut self, audio: &mut dyn AudioPort) {
        if !self.entered {
            self.pos += self.vel;
            if self.pos.x <= SCREEN_WIDTH - UFO_RADIUS * 2.0 {
                self.entered = true;
            }
        }

        if self.entered {
            self.movement_phase += 0.02;
            // Two incommensurate sine frequencies trace the hover pattern,
            // anchored toward the right side of the playfield
            let target = Vec2::new(
                SCREEN_WIDTH * 0.7 + self.movement_phase.sin() * (SCREEN_WIDTH * 0.2),
                SCREEN_HEIGHT * 0.5
                    + (1.5 * self.movement_phase).sin() * (SCREEN_HEIGHT * 0.35),
            );
            self.pos += (target - self.pos) * 0.05;
            self.pos.x = self.pos.x.clamp(UFO_RADIUS, SCREEN_WIDTH - UFO_RADIUS);
            self.pos.y = self.pos.y.clamp(UFO_RADIUS, SCREEN_HEIGHT - UFO_RADIUS);
        } else if self.pos.x + UFO_RADIUS < 0.0 {
            self.alive = false;
        }

        // Shots drift left at half scroll speed on top of their own velocity
        for shot in &mut self.shots {
            shot.pos.x += shot.vel.x - SCROLL_SPEED * 0.5;
            shot.pos.y += shot.vel.y;
            if shot.pos.x < -10.0
                || shot.pos.x > SCREEN_WIDTH + 10.0
                || shot.pos.y < -10.0
                || shot.pos.y > SCREEN_HEIGHT + 10.0
            {
                shot.alive = false;
            }
        }
        self.shots.retain(|s| s.alive);

        self.shoot_timer += 1;
        if self.shoot_timer >= UFO_SHOOT_INTERVAL {
            self.shoot_timer = 0;
            // Two-shot pattern: one straight left, one dropping
            self.shots.push(UfoShot {
                pos: self.pos,
                vel: Vec2::new(-2.0, 0.0),
                alive: true,
            });
            self.shots.push(UfoShot {
                pos: self.pos,
                vel: Vec2::new(-1.0, 3.0),
                alive: true,
            });
            audio.play(Cue::UfoShoot);
        }
    }
}

pub const TENTACLE_BODY_RADIUS: f32 = 25.0;
pub const TENTACLE_ARMS: usize = 4;
pub const TENTACLE_SEGMENTS: usize = 5;

/// A creature whose hit surface includes its animated appendages
#[derive(Debug, Clone)]
pub struct Tentacle {
    pub pos: Vec2,
    pub health: i32,
    /// Phase oscillator driving all arm geometry
    pub phase: f32,
    pub flash_since: Option<u64>,
    pub alive: bool,
}

impl Tentacle {
    pub fn spawn(rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(
                SCREEN_WIDTH - 60.0,
                rng.random_range(100.0..=(SCREEN_HEIGHT - 100.0)),
            ),
            health: 3,
            phase: 0.0,
            flash_since: None,
            alive: true,
        }
    }

    pub fn update(&mut self) {
        self.phase += 0.08;
        // Slow leftward drift keeps the spatial-culling lifetime rule
        self.pos.x -= 0.5;
        if self.pos.x + TENTACLE_BODY_RADIUS < 0.0 {
            self.alive = false;
        }
    }

    /// Recompute arm segment circles from the current phase. Used for both
    /// rendering and hit-testing.
    pub fn segments(&self) -> Vec<(Vec2, f32)> {
        let mut out = Vec::with_capacity(TENTACLE_ARMS * TENTACLE_SEGMENTS);
        for arm in 0..TENTACLE_ARMS {
            let base = std::f32::consts::TAU * arm as f32 / TENTACLE_ARMS as f32;
            for seg in 0..TENTACLE_SEGMENTS {
                let sway =
                    (self.phase + arm as f32 * 0.8 + seg as f32 * 0.5).sin() * 0.4;
                let angle = base + sway;
                let dist = TENTACLE_BODY_RADIUS + 10.0 * (seg + 1) as f32;
                let center = self.pos + Vec2::new(angle.cos(), angle.sin()) * dist;
                let radius = 8.0 - seg as f32;
                out.push((center, radius));
            }
        }
        out
    }

    pub fn body_box(&self) -> Rect {
        let half = TENTACLE_BODY_RADIUS * HIT_BOX_SCALE;
        Rect::from_center(self.pos, half, half)
    }
}

/// Collectible power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Shield,
    Spread,
    Laser,
    Charge,
    Nuke,
}

impl PowerUpKind {
    /// The weapon granted on pickup; `None` for the shield recharge
    pub fn weapon_kind(self) -> Option<WeaponKind> {
        match self {
            PowerUpKind::Shield => None,
            PowerUpKind::Spread => Some(WeaponKind::Spread),
            PowerUpKind::Laser => Some(WeaponKind::Laser),
            PowerUpKind::Charge => Some(WeaponKind::Charge),
            PowerUpKind::Nuke => Some(WeaponKind::Nuke),
        }
    }

    /// Uniform draw over all five kinds
    pub fn random(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..5) {
            0 => PowerUpKind::Shield,
            1 => PowerUpKind::Spread,
            2 => PowerUpKind::Laser,
            3 => PowerUpKind::Charge,
            _ => PowerUpKind::Nuke,
        }
    }

    /// UFO drop table: everything except the nuke
    pub fn random_no_nuke(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..4) {
            0 => PowerUpKind::Shield,
            1 => PowerUpKind::Spread,
            2 => PowerUpKind::Laser,
            _ => PowerUpKind::Charge,
        }
    }
}

pub const POWERUP_SIZE: f32 = 20.0;
const POWERUP_SCROLL_SPEED: f32 = 2.0;

/// A collectible scrolling with the playfield
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub alive: bool,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            pos,
            kind,
            alive: true,
        }
    }

    pub fn spawn(rng: &mut Pcg32) -> Self {
        let kind = PowerUpKind::random(rng);
        let pos = Vec2::new(
            SCREEN_WIDTH,
            rng.random_range(50.0..=(SCREEN_HEIGHT - 50.0)),
        );
        Self::new(kind, pos)
    }

    pub fn update(&mut self) {
        self.pos.x -= POWERUP_SCROLL_SPEED;
        if self.pos.x + POWERUP_SIZE < 0.0 {
            self.alive = false;
        }
    }

    pub fn hit_box(&self) -> Rect {
        let half = POWERUP_SIZE * HIT_BOX_SCALE;
        Rect::from_center(self.pos, half, half)
    }
}

const EXPLOSION_GROWTH_PER_FRAME: f32 = 20.0;
const EXPLOSION_MAX_ALPHA: f32 = 200.0;
const EXPLOSION_FADE_PER_FRAME: f32 = 3.0;

/// Nuke blast visual: grows to the target radius, then fades out
#[derive(Debug, Clone)]
pub struct Explosion {
    pub pos: Vec2,
    pub target_radius: f32,
    pub current_radius: f32,
    pub alpha: f32,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            target_radius: NUKE_BLAST_RADIUS,
            current_radius: 0.0,
            alpha: EXPLOSION_MAX_ALPHA,
        }
    }

    pub fn update(&mut self) {
        if self.current_radius < self.target_radius {
            self.current_radius += EXPLOSION_GROWTH_PER_FRAME;
        } else {
            self.alpha -= EXPLOSION_FADE_PER_FRAME;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.alpha <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_obstacle_scrolls_off_left_edge() {
        let mut obstacle = Obstacle::spawn(&mut rng(), 100.0);
        // Enough frames to cross the whole playfield plus its own width
        for _ in 0..160 {
            obstacle.update();
        }
        assert!(!obstacle.alive);
    }

    #[test]
    fn test_obstacle_gap_stays_inside_margins() {
        let mut r = rng();
        for _ in 0..100 {
            let o = Obstacle::spawn(&mut r, 110.0);
            assert!(o.gap_y - o.half_gap >= 50.0);
            assert!(o.gap_y + o.half_gap <= SCREEN_HEIGHT - 50.0);
        }
    }

    #[test]
    fn test_gate_dies_after_four_default_hits() {
        let mut audio = crate::audio::NullAudio;
        let mut gate = Gate::spawn(&mut rng());
        for i in 0..3 {
            assert!(!gate.hit(1, i * 100, &mut audio));
            assert!(gate.alive);
        }
        assert!(gate.hit(1, 400, &mut audio));
        assert!(!gate.alive);
    }

    #[test]
    fn test_ufo_fires_two_shot_pattern_every_interval() {
        let mut rec = crate::audio::CueRecorder::new();
        let mut ufo = Ufo::spawn(&mut rng());
        for _ in 0..UFO_SHOOT_INTERVAL {
            ufo.update(&mut rec);
        }
        assert_eq!(ufo.shots.len(), 2);
        assert!(rec.played(crate::audio::Cue::UfoShoot));
    }

    #[test]
    fn test_tentacle_segments_move_with_phase() {
        let mut tentacle = Tentacle::spawn(&mut rng());
        let before = tentacle.segments();
        assert_eq!(before.len(), TENTACLE_ARMS * TENTACLE_SEGMENTS);
        tentacle.update();
        let after = tentacle.segments();
        // The oscillator must actually displace segment geometry
        let moved = before
            .iter()
            .zip(&after)
            .any(|((a, _), (b, _))| (*a - *b).length() > 0.1);
        assert!(moved);
    }

    #[test]
    fn test_explosion_grows_then_fades_to_inert() {
        let mut explosion = Explosion::new(Vec2::new(200.0, 300.0));
        while explosion.current_radius < explosion.target_radius {
            explosion.update();
        }
        assert!(explosion.alpha > 0.0);
        while !explosion.is_finished() {
            explosion.update();
        }
        assert!(explosion.current_radius >= explosion.target_radius);
    }
}
