//! Spawn scheduling and difficulty scaling
//!
//! Every spawn stream runs on its own millisecond timer against the shared
//! tick clock. UFOs and tentacles are additionally gated on score and are
//! exclusive: at most one of each may be alive at a time.

use rand::Rng;

use crate::audio::{AudioPort, Cue, LoopCue};
use crate::consts::*;

use super::entities::{Enemy, Gate, Obstacle, PowerUp, Tentacle, Ufo};
use super::state::GameState;

/// Difficulty level derived from score
pub fn level_for_score(score: u32) -> u32 {
    score / 100
}

/// Half the obstacle gap height at the given score. The gap narrows per
/// level down to a fixed floor.
pub fn gap_half_width(score: u32) -> f32 {
    let gap = (INITIAL_GAP - level_for_score(score) as f32 * GAP_DECREASE_PER_LEVEL)
        .max(MIN_GAP);
    gap / 2.0
}

/// Per-stream spawn timers, all keyed to the session clock
#[derive(Debug, Clone)]
pub struct Spawner {
    last_obstacle_ms: u64,
    last_enemy_ms: u64,
    last_powerup_ms: u64,
    last_gate_ms: u64,
    last_ufo_ms: u64,
    last_tentacle_ms: u64,
    /// Current tentacle wait; shortened after a failed spawn roll
    tentacle_wait_ms: u64,
}

impl Spawner {
    pub fn new(now: u64) -> Self {
        Self {
            last_obstacle_ms: now,
            last_enemy_ms: now,
            last_powerup_ms: now,
            last_gate_ms: now,
            last_ufo_ms: now,
            last_tentacle_ms: now,
            tentacle_wait_ms: TENTACLE_INTERVAL_MS,
        }
    }
}

/// Run all spawn checks for this frame.
pub fn run(state: &mut GameState, now: u64, audio: &mut dyn AudioPort) {
    if now.saturating_sub(state.spawner.last_obstacle_ms) >= OBSTACLE_INTERVAL_MS {
        state.spawner.last_obstacle_ms = now;
        let half_gap = gap_half_width(state.score);
        let obstacle = Obstacle::spawn(&mut state.rng, half_gap);
        state.obstacles.push(obstacle);
    }

    if now.saturating_sub(state.spawner.last_enemy_ms) >= ENEMY_INTERVAL_MS {
        state.spawner.last_enemy_ms = now;
        let enemy = Enemy::spawn(&mut state.rng);
        state.enemies.push(enemy);
    }

    if now.saturating_sub(state.spawner.last_powerup_ms) >= POWERUP_INTERVAL_MS {
        state.spawner.last_powerup_ms = now;
        let powerup = PowerUp::spawn(&mut state.rng);
        state.powerups.push(powerup);
    }

    if now.saturating_sub(state.spawner.last_gate_ms) >= GATE_INTERVAL_MS {
        state.spawner.last_gate_ms = now;
        let gate = Gate::spawn(&mut state.rng);
        state.gates.push(gate);
    }

    // UFO: score-gated, probabilistic, at most one alive
    if state.score > UFO_MIN_SCORE
        && state.ufos.is_empty()
        && now.saturating_sub(state.spawner.last_ufo_ms) >= UFO_INTERVAL_MS
    {
        state.spawner.last_ufo_ms = now;
        if state.rng.random_bool(UFO_SPAWN_CHANCE) {
            let ufo = Ufo::spawn(&mut state.rng);
            state.ufos.push(ufo);
            audio.start_loop(LoopCue::UfoPresence);
        }
    }

    // Tentacle: a failed roll retries on the short wait
    if state.score > TENTACLE_MIN_SCORE
        && state.tentacles.is_empty()
        && now.saturating_sub(state.spawner.last_tentacle_ms)
            >= state.spawner.tentacle_wait_ms
    {
        state.spawner.last_tentacle_ms = now;
        if state.rng.random_bool(TENTACLE_SPAWN_CHANCE) {
            let tentacle = Tentacle::spawn(&mut state.rng);
            state.tentacles.push(tentacle);
            audio.play(Cue::Blob);
            state.spawner.tentacle_wait_ms = TENTACLE_INTERVAL_MS;
        } else {
            state.spawner.tentacle_wait_ms = TENTACLE_RETRY_MS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;

    fn playing_state() -> GameState {
        let mut state = GameState::new(9);
        state.begin_session(0);
        state
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_score(0), 0);
        assert_eq!(level_for_score(99), 0);
        assert_eq!(level_for_score(100), 1);
        assert_eq!(level_for_score(250), 2);
    }

    #[test]
    fn test_gap_narrows_per_level_to_floor() {
        assert_eq!(gap_half_width(0), 110.0);
        assert_eq!(gap_half_width(100), 100.0);
        // Level 6 would go below the floor
        assert_eq!(gap_half_width(600), 50.0);
        assert_eq!(gap_half_width(10_000), 50.0);
    }

    #[test]
    fn test_gap_is_monotonically_non_increasing() {
        let mut last = gap_half_width(0);
        for score in (0..2000).step_by(50) {
            let gap = gap_half_width(score);
            assert!(gap <= last);
            last = gap;
        }
    }

    #[test]
    fn test_obstacle_timer_gates_spawning() {
        let mut audio = NullAudio;
        let mut state = playing_state();

        run(&mut state, OBSTACLE_INTERVAL_MS - 1, &mut audio);
        assert!(state.obstacles.is_empty());

        run(&mut state, OBSTACLE_INTERVAL_MS, &mut audio);
        assert_eq!(state.obstacles.len(), 1);

        // Timer restarted; the next frame spawns nothing
        run(&mut state, OBSTACLE_INTERVAL_MS + 16, &mut audio);
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_ufo_needs_score_above_threshold() {
        let mut audio = NullAudio;
        let mut state = playing_state();
        state.score = UFO_MIN_SCORE;

        for i in 1..=50 {
            run(&mut state, i * UFO_INTERVAL_MS, &mut audio);
        }
        assert!(state.ufos.is_empty());
    }

    #[test]
    fn test_at_most_one_ufo_alive() {
        let mut audio = NullAudio;
        let mut state = playing_state();
        state.score = UFO_MIN_SCORE + 1;

        // Enough interval checks that the 30% roll certainly lands
        for i in 1..=200 {
            run(&mut state, i * UFO_INTERVAL_MS, &mut audio);
            assert!(state.ufos.len() <= 1);
        }
        assert_eq!(state.ufos.len(), 1);
    }

    #[test]
    fn test_failed_tentacle_roll_retries_sooner() {
        let mut audio = NullAudio;
        let mut state = playing_state();
        state.score = TENTACLE_MIN_SCORE + 1;

        // Walk the clock in retry-sized steps; a success can only happen on
        // a check, and checks after a failure come every TENTACLE_RETRY_MS
        let mut now = TENTACLE_INTERVAL_MS;
        let mut checks = 0;
        while state.tentacles.is_empty() && checks < 500 {
            run(&mut state, now, &mut audio);
            now += TENTACLE_RETRY_MS;
            checks += 1;
        }
        assert_eq!(state.tentacles.len(), 1);
    }
}
