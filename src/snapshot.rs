//! Per-frame render handoff
//!
//! A `FrameSnapshot` is a plain serializable view of everything a renderer
//! or replay tool needs for one frame. Capturing never mutates the sim.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::sim::{GamePhase, GameState, PowerUpKind, Shape};

/// Background palette keyed to difficulty level
pub fn background_color(level: u32) -> [u8; 3] {
    match level {
        0 => [0, 0, 0],
        1 => [0, 100, 0],
        2 => [0, 0, 139],
        3 => [255, 255, 0],
        4 => [128, 0, 128],
        _ => [255, 0, 0],
    }
}

#[derive(Debug, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: [u8; 3],
    pub shields: u8,
    pub invincible: bool,
}

/// HUD line describing the equipped weapon
#[derive(Debug, Serialize)]
pub struct WeaponView {
    pub name: &'static str,
    /// `None` renders as unlimited
    pub ammo: Option<u32>,
    pub charge_level: u8,
    pub charging: bool,
}

#[derive(Debug, Serialize)]
pub struct ObstacleView {
    pub x: f32,
    pub gap_y: f32,
    pub half_gap: f32,
    pub width: f32,
}

#[derive(Debug, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub size: f32,
}

#[derive(Debug, Serialize)]
pub struct GateView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub max_health: i32,
    pub flashing: bool,
}

#[derive(Debug, Serialize)]
pub struct UfoView {
    pub pos: Vec2,
    pub radius: f32,
    pub health: i32,
    pub shots: Vec<Vec2>,
}

#[derive(Debug, Serialize)]
pub struct TentacleView {
    pub pos: Vec2,
    pub body_radius: f32,
    pub health: i32,
    pub flashing: bool,
    /// Arm segment circles as (center, radius)
    pub segments: Vec<(Vec2, f32)>,
}

#[derive(Debug, Serialize)]
pub struct PowerUpView {
    pub pos: Vec2,
    pub kind: &'static str,
    pub size: f32,
}

#[derive(Debug, Serialize)]
#[serde(tag = "shape")]
pub enum ProjectileShapeView {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

#[derive(Debug, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    #[serde(flatten)]
    pub shape: ProjectileShapeView,
}

#[derive(Debug, Serialize)]
pub struct ExplosionView {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Complete render state for one frame
#[derive(Debug, Serialize)]
pub struct FrameSnapshot {
    pub phase: &'static str,
    pub frame: u64,
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub background: [u8; 3],
    pub player: PlayerView,
    pub weapon: WeaponView,
    pub obstacles: Vec<ObstacleView>,
    pub enemies: Vec<EnemyView>,
    pub gates: Vec<GateView>,
    pub ufos: Vec<UfoView>,
    pub tentacles: Vec<TentacleView>,
    pub powerups: Vec<PowerUpView>,
    pub projectiles: Vec<ProjectileView>,
    pub nuke: Option<ProjectileView>,
    pub explosion: Option<ExplosionView>,
}

/// Gate/tentacle hit flash duration for rendering
const FLASH_MS: u64 = 100;

fn flashing(since: Option<u64>, now: u64) -> bool {
    since.is_some_and(|t| now.saturating_sub(t) < FLASH_MS)
}

fn projectile_view(p: &crate::sim::Projectile) -> ProjectileView {
    ProjectileView {
        pos: p.pos,
        shape: match p.shape {
            Shape::Circle { radius } => ProjectileShapeView::Circle { radius },
            Shape::Rect { width, height } => ProjectileShapeView::Rect { width, height },
        },
    }
}

impl FrameSnapshot {
    pub fn capture(state: &GameState, now: u64) -> Self {
        let level = state.level();
        Self {
            phase: match state.phase {
                GamePhase::Menu => "menu",
                GamePhase::Playing => "playing",
                GamePhase::GameOver => "game_over",
            },
            frame: state.frame,
            score: state.score,
            high_score: state.high_score,
            level,
            background: background_color(level),
            player: PlayerView {
                pos: state.player.pos,
                radius: PLAYER_RADIUS,
                color: state.player.color(),
                shields: state.player.shields,
                invincible: state.player.invincible(now),
            },
            weapon: WeaponView {
                name: state.player.weapon.kind.name(),
                ammo: state.player.weapon.ammo,
                charge_level: state.player.weapon.charge_level,
                charging: state.player.weapon.charging,
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    x: o.x,
                    gap_y: o.gap_y,
                    half_gap: o.half_gap,
                    width: OBSTACLE_WIDTH,
                })
                .collect(),
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    pos: e.pos,
                    size: e.size,
                })
                .collect(),
            gates: state
                .gates
                .iter()
                .map(|g| GateView {
                    x: g.x,
                    y: g.y,
                    width: g.width,
                    height: g.height,
                    health: g.health,
                    max_health: g.max_health,
                    flashing: flashing(g.flash_since, now),
                })
                .collect(),
            ufos: state
                .ufos
                .iter()
                .map(|u| UfoView {
                    pos: u.pos,
                    radius: crate::sim::entities::UFO_RADIUS,
                    health: u.health,
                    shots: u.shots.iter().map(|s| s.pos).collect(),
                })
                .collect(),
            tentacles: state
                .tentacles
                .iter()
                .map(|t| TentacleView {
                    pos: t.pos,
                    body_radius: crate::sim::entities::TENTACLE_BODY_RADIUS,
                    health: t.health,
                    flashing: flashing(t.flash_since, now),
                    segments: t.segments(),
                })
                .collect(),
            powerups: state
                .powerups
                .iter()
                .map(|p| PowerUpView {
                    pos: p.pos,
                    kind: match p.kind {
                        PowerUpKind::Shield => "shield",
                        PowerUpKind::Spread => "spread",
                        PowerUpKind::Laser => "laser",
                        PowerUpKind::Charge => "charge",
                        PowerUpKind::Nuke => "nuke",
                    },
                    size: crate::sim::entities::POWERUP_SIZE,
                })
                .collect(),
            projectiles: state.projectiles.iter().map(projectile_view).collect(),
            nuke: state.player.nuke.as_ref().map(projectile_view),
            explosion: state.player.explosion.as_ref().map(|e| ExplosionView {
                pos: e.pos,
                radius: e.current_radius,
                alpha: e.alpha,
            }),
        }
    }
}
