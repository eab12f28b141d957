//! Game state: the player craft, entity registries and session lifecycle

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::entities::{Enemy, Explosion, Gate, Obstacle, PowerUp, Tentacle, Ufo};
use super::spawn::Spawner;
use super::weapon::{Projectile, Weapon};
use crate::audio::{AudioPort, Cue};
use crate::consts::*;

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Menu,
    Playing,
    GameOver,
}

/// The player craft
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel_y: f32,
    pub shields: u8,
    /// Start of the post-hit invincibility window
    pub invincible_since: Option<u64>,
    pub weapon: Weapon,
    /// The single in-flight nuke, tracked outside the projectile registry
    pub nuke: Option<Projectile>,
    /// Active nuke blast visual, if any
    pub explosion: Option<Explosion>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, SCREEN_HEIGHT / 2.0),
            vel_y: 0.0,
            shields: MAX_SHIELDS,
            invincible_since: None,
            weapon: Weapon::default(),
            nuke: None,
            explosion: None,
        }
    }

    pub fn flap(&mut self) {
        self.vel_y = FLAP_VELOCITY;
    }

    /// Integrate one frame of vertical motion
    pub fn update(&mut self) {
        self.vel_y += GRAVITY;
        self.pos.y += self.vel_y;
        if self.pos.y < PLAYER_RADIUS {
            self.pos.y = PLAYER_RADIUS;
            self.vel_y = 0.0;
        } else if self.pos.y > SCREEN_HEIGHT - PLAYER_RADIUS {
            self.pos.y = SCREEN_HEIGHT - PLAYER_RADIUS;
            self.vel_y = 0.0;
        }
    }

    pub fn invincible(&self, now: u64) -> bool {
        self.invincible_since
            .is_some_and(|since| now.saturating_sub(since) < INVINCIBILITY_MS)
    }

    /// Register a hit. Returns true when the player dies; otherwise one
    /// shield is consumed and the invincibility window opens.
    pub fn take_hit(&mut self, now: u64, audio: &mut dyn AudioPort) -> bool {
        if self.invincible(now) {
            return false;
        }
        audio.play(Cue::Hit);
        if self.shields == 0 {
            return true;
        }
        self.shields -= 1;
        self.invincible_since = Some(now);
        false
    }

    /// Craft color keyed to remaining shields
    pub fn color(&self) -> [u8; 3] {
        match self.shields {
            3.. => [0, 255, 0],
            2 => [255, 255, 0],
            1 => [255, 165, 0],
            0 => [255, 0, 0],
        }
    }

    pub fn hit_box(&self) -> Rect {
        let half = PLAYER_RADIUS * HIT_BOX_SCALE;
        Rect::from_center(self.pos, half, half)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// The full simulation state for one game session
#[derive(Debug)]
pub struct GameState {
    pub phase: GamePhase,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub enemies: Vec<Enemy>,
    pub gates: Vec<Gate>,
    pub ufos: Vec<Ufo>,
    pub tentacles: Vec<Tentacle>,
    pub powerups: Vec<PowerUp>,
    pub projectiles: Vec<Projectile>,
    pub spawner: Spawner,
    pub score: u32,
    pub high_score: u32,
    /// Frames simulated in the current session
    pub frame: u64,
    pub seed: u64,
    pub rng: Pcg32,
    /// Set while the menu theme loop is running
    pub(crate) title_playing: bool,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Menu,
            player: Player::new(),
            obstacles: Vec::new(),
            enemies: Vec::new(),
            gates: Vec::new(),
            ufos: Vec::new(),
            tentacles: Vec::new(),
            powerups: Vec::new(),
            projectiles: Vec::new(),
            spawner: Spawner::new(0),
            score: 0,
            high_score: 0,
            frame: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            title_playing: false,
        }
    }

    /// Start a fresh run at `now`. The high score survives; everything else
    /// resets, including all spawn timers.
    pub fn begin_session(&mut self, now: u64) {
        self.phase = GamePhase::Playing;
        self.player = Player::new();
        self.obstacles.clear();
        self.enemies.clear();
        self.gates.clear();
        self.ufos.clear();
        self.tentacles.clear();
        self.powerups.clear();
        self.projectiles.clear();
        self.spawner = Spawner::new(now);
        self.score = 0;
        self.frame = 0;
    }

    /// Current difficulty level
    pub fn level(&self) -> u32 {
        super::spawn::level_for_score(self.score)
    }

    /// Drop everything marked dead this frame
    pub fn compact(&mut self) {
        self.obstacles.retain(|o| o.alive);
        self.enemies.retain(|e| e.alive);
        self.gates.retain(|g| g.alive);
        self.ufos.retain(|u| u.alive);
        self.tentacles.retain(|t| t.alive);
        self.powerups.retain(|p| p.alive);
        self.projectiles.retain(|p| p.alive);
        if self
            .player
            .explosion
            .as_ref()
            .is_some_and(|e| e.is_finished())
        {
            self.player.explosion = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;

    #[test]
    fn test_flap_overrides_accumulated_fall_speed() {
        let mut player = Player::new();
        for _ in 0..30 {
            player.update();
        }
        assert!(player.vel_y > 0.0);
        player.flap();
        assert_eq!(player.vel_y, FLAP_VELOCITY);
        let y = player.pos.y;
        player.update();
        assert!(player.pos.y < y);
    }

    #[test]
    fn test_floor_clamp_zeroes_velocity() {
        let mut player = Player::new();
        for _ in 0..200 {
            player.update();
        }
        assert_eq!(player.pos.y, SCREEN_HEIGHT - PLAYER_RADIUS);
        assert_eq!(player.vel_y, 0.0);
    }

    #[test]
    fn test_three_spaced_hits_then_death() {
        let mut audio = NullAudio;
        let mut player = Player::new();

        // Hits spaced past the invincibility window
        assert!(!player.take_hit(0, &mut audio));
        assert!(!player.take_hit(2000, &mut audio));
        assert!(!player.take_hit(4000, &mut audio));
        assert_eq!(player.shields, 0);
        assert!(player.take_hit(6000, &mut audio));
    }

    #[test]
    fn test_hit_inside_invincibility_window_ignored() {
        let mut audio = NullAudio;
        let mut player = Player::new();
        player.take_hit(1000, &mut audio);
        assert!(!player.take_hit(1999, &mut audio));
        assert_eq!(player.shields, MAX_SHIELDS - 1);
    }

    #[test]
    fn test_begin_session_preserves_high_score_only() {
        let mut state = GameState::new(1);
        state.begin_session(0);
        state.score = 37;
        state.high_score = 37;
        state.player.shields = 0;
        state.enemies.push(Enemy::spawn(&mut state.rng));

        state.begin_session(5000);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 37);
        assert_eq!(state.player.shields, MAX_SHIELDS);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_shield_color_ladder() {
        let mut player = Player::new();
        assert_eq!(player.color(), [0, 255, 0]);
        player.shields = 1;
        assert_eq!(player.color(), [255, 165, 0]);
        player.shields = 0;
        assert_eq!(player.color(), [255, 0, 0]);
    }
}
