//! Collision geometry and the per-frame resolver
//!
//! Rules run in a fixed order each frame: nuke proximity trigger, player
//! projectiles against threats (gates, then enemies, then UFOs, then
//! tentacles - a projectile hits at most one target), then threats against
//! the player, then power-up pickup. Hits only mark entities dead; the
//! registries compact after the resolver returns.

use glam::Vec2;

use super::entities::{Explosion, PowerUp, PowerUpKind, UFO_RADIUS, UFO_SHOT_RADIUS};
use super::state::GameState;
use super::weapon::{Weapon, WeaponKind};
use crate::audio::{AudioPort, Cue, LoopCue};
use crate::consts::*;

/// Axis-aligned collision rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: Vec2, half_w: f32, half_h: f32) -> Self {
        Self {
            x: center.x - half_w,
            y: center.y - half_h,
            w: half_w * 2.0,
            h: half_h * 2.0,
        }
    }

    /// Strict overlap: rectangles sharing only an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// Distance test against a circle: clamp the center to the rectangle
    /// and compare against the radius
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let nearest = Vec2::new(
            center.x.clamp(self.x, self.x + self.w),
            center.y.clamp(self.y, self.y + self.h),
        );
        center.distance_squared(nearest) < radius * radius
    }
}

/// Nuke body radius for the contact-detonation test
const NUKE_CONTACT_RADIUS: f32 = 5.0;

/// Resolve all collisions for this frame. Returns true when the player died.
pub fn resolve(state: &mut GameState, now: u64, audio: &mut dyn AudioPort) -> bool {
    // Nuke proximity trigger: contact with a threat detonates in place.
    // The nuke is round, so these are circular distance tests.
    if let Some(nuke) = &state.player.nuke {
        let (pos, radius) = (nuke.pos, NUKE_CONTACT_RADIUS);
        let triggered = state
            .enemies
            .iter()
            .filter(|e| e.alive)
            .any(|e| e.hit_box().intersects_circle(pos, radius))
            || state
                .gates
                .iter()
                .filter(|g| g.alive)
                .any(|g| g.rect().intersects_circle(pos, radius));
        if triggered {
            detonate_nuke(state, audio);
        }
    }

    resolve_projectiles(state, now, audio);
    let died = resolve_player_hits(state, now, audio);
    resolve_pickups(state, audio);
    died
}

fn resolve_projectiles(state: &mut GameState, now: u64, audio: &mut dyn AudioPort) {
    let GameState {
        projectiles,
        gates,
        enemies,
        ufos,
        tentacles,
        powerups,
        score,
        rng,
        ..
    } = state;

    let mut killed_ufo = false;
    'projectile: for p in projectiles.iter_mut() {
        if !p.alive {
            continue;
        }
        let p_box = p.hit_box();

        for gate in gates.iter_mut().filter(|g| g.alive) {
            if p_box.intersects(&gate.rect()) {
                if gate.hit(p.damage, now, audio) {
                    *score += 5;
                }
                p.alive = false;
                continue 'projectile;
            }
        }

        for enemy in enemies.iter_mut().filter(|e| e.alive) {
            if p_box.intersects(&enemy.hit_box()) {
                enemy.alive = false;
                *score += p.damage * 2;
                audio.play(Cue::EnemyDeath);
                p.alive = false;
                continue 'projectile;
            }
        }

        for ufo in ufos.iter_mut().filter(|u| u.alive) {
            if p.pos.distance(ufo.pos) < UFO_RADIUS + 5.0 {
                ufo.health -= 1;
                audio.play(Cue::UfoHit);
                p.alive = false;
                if ufo.health <= 0 {
                    ufo.alive = false;
                    killed_ufo = true;
                    *score += 10;
                    audio.play(Cue::UfoDeath);
                    // UFOs never drop the nuke
                    powerups.push(PowerUp::new(PowerUpKind::random_no_nuke(rng), ufo.pos));
                }
                continue 'projectile;
            }
        }

        for tentacle in tentacles.iter_mut().filter(|t| t.alive) {
            let hit = p_box.intersects(&tentacle.body_box())
                || tentacle
                    .segments()
                    .iter()
                    .any(|(c, r)| p_box.intersects(&Rect::from_center(*c, *r, *r)));
            if hit {
                tentacle.health -= p.damage as i32;
                tentacle.flash_since = Some(now);
                audio.play(Cue::Blob);
                p.alive = false;
                if tentacle.health <= 0 {
                    tentacle.alive = false;
                    *score += 10;
                    audio.play(Cue::EnemyDeath);
                    powerups.push(PowerUp::new(PowerUpKind::random(rng), tentacle.pos));
                }
                continue 'projectile;
            }
        }
    }

    if killed_ufo && ufos.iter().all(|u| !u.alive) {
        audio.stop_loop(LoopCue::UfoPresence);
    }
}

fn resolve_player_hits(state: &mut GameState, now: u64, audio: &mut dyn AudioPort) -> bool {
    let player_box = state.player.hit_box();
    let mut struck = false;

    for obstacle in state.obstacles.iter().filter(|o| o.alive) {
        if player_box.intersects(&obstacle.top_rect())
            || player_box.intersects(&obstacle.bottom_rect())
        {
            struck = true;
        }
    }
    for enemy in state.enemies.iter().filter(|e| e.alive) {
        if player_box.intersects(&enemy.hit_box()) {
            struck = true;
        }
    }
    for gate in state.gates.iter().filter(|g| g.alive) {
        if player_box.intersects(&gate.rect()) {
            struck = true;
        }
    }
    for tentacle in state.tentacles.iter().filter(|t| t.alive) {
        if player_box.intersects(&tentacle.body_box())
            || tentacle
                .segments()
                .iter()
                .any(|(c, r)| player_box.intersects(&Rect::from_center(*c, *r, *r)))
        {
            struck = true;
        }
    }
    let player_pos = state.player.pos;
    for ufo in state.ufos.iter_mut() {
        for shot in ufo.shots.iter_mut().filter(|s| s.alive) {
            if shot.pos.distance(player_pos)
                < PLAYER_RADIUS * HIT_BOX_SCALE + UFO_SHOT_RADIUS
            {
                shot.alive = false;
                struck = true;
            }
        }
    }

    // Invincibility absorbs any number of contacts this frame
    if struck {
        state.player.take_hit(now, audio)
    } else {
        false
    }
}

fn resolve_pickups(state: &mut GameState, audio: &mut dyn AudioPort) {
    let player_box = state.player.hit_box();
    for powerup in state.powerups.iter_mut().filter(|p| p.alive) {
        if !player_box.intersects(&powerup.hit_box()) {
            continue;
        }
        powerup.alive = false;
        audio.play(Cue::PowerUp);
        match powerup.kind.weapon_kind() {
            None => {
                if state.player.shields < MAX_SHIELDS {
                    state.player.shields += 1;
                    audio.play(Cue::ShieldRecharge);
                }
            }
            Some(kind) => state.player.weapon = Weapon::new(kind),
        }
    }
}

/// Detonate the in-flight nuke: every live threat on the field dies, each
/// kill worth five points (UFOs and tentacles count double). Reverting the
/// weapon waits until here so the launch itself never downgrades it.
pub fn detonate_nuke(state: &mut GameState, audio: &mut dyn AudioPort) {
    let Some(nuke) = state.player.nuke.take() else {
        return;
    };
    state.player.explosion = Some(Explosion::new(nuke.pos));
    audio.play(Cue::Explosion);

    let mut kills: u32 = 0;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.alive = false;
        kills += 1;
        audio.play(Cue::EnemyDeath);
    }
    let mut had_ufo = false;
    for ufo in state.ufos.iter_mut().filter(|u| u.alive) {
        ufo.alive = false;
        kills += 2;
        had_ufo = true;
        audio.play(Cue::UfoDeath);
    }
    if had_ufo {
        audio.stop_loop(LoopCue::UfoPresence);
    }
    for tentacle in state.tentacles.iter_mut().filter(|t| t.alive) {
        tentacle.alive = false;
        kills += 2;
        audio.play(Cue::EnemyDeath);
    }
    for gate in state.gates.iter_mut().filter(|g| g.alive) {
        gate.alive = false;
        kills += 1;
    }
    state.score += kills * SCORE_PER_NUKE_KILL;

    if state.player.weapon.kind == WeaponKind::Nuke && state.player.weapon.ammo == Some(0) {
        state.player.weapon = Weapon::default();
        audio.play(Cue::PowerUp);
    }
}
