//! Fixed-timestep frame orchestration and the session phase machine
//!
//! One `tick` call advances exactly one 60 Hz frame. The caller owns the
//! clock and passes edge-detected fire input; inside a frame the order is
//! fixed: input, spawning, entity updates, collision resolution, phase
//! transition, registry compaction.

use super::collision;
use super::spawn;
use super::state::{GamePhase, GameState};
use super::weapon::{ShotOutcome, Weapon, WeaponKind};
use crate::audio::{AudioPort, Cue, LoopCue};

/// Edge-detected player input for one frame
#[derive(Debug, Default, Clone, Copy)]
pub struct TickInput {
    pub flap: bool,
    /// Fire control went down this frame
    pub fire_pressed: bool,
    /// Fire control is down
    pub fire_held: bool,
    /// Fire control came up this frame
    pub fire_released: bool,
}

/// Advance the simulation by one frame at time `now` (milliseconds).
pub fn tick(state: &mut GameState, input: &TickInput, now: u64, audio: &mut dyn AudioPort) {
    match state.phase {
        GamePhase::Menu => {
            if !state.title_playing {
                audio.start_loop(LoopCue::TitleTheme);
                state.title_playing = true;
            }
            if input.flap {
                audio.stop_loop(LoopCue::TitleTheme);
                state.title_playing = false;
                state.begin_session(now);
            }
        }
        GamePhase::GameOver => {
            if input.flap {
                state.begin_session(now);
            }
        }
        GamePhase::Playing => playing_frame(state, input, now, audio),
    }
}

fn playing_frame(state: &mut GameState, input: &TickInput, now: u64, audio: &mut dyn AudioPort) {
    state.frame += 1;

    handle_fire(state, input, now, audio);
    if input.flap {
        state.player.flap();
    }

    spawn::run(state, now, audio);

    state.player.update();

    // Scrolling entities; clearing an obstacle scores exactly once
    let player_x = state.player.pos.x;
    let mut cleared = 0;
    for obstacle in &mut state.obstacles {
        obstacle.update();
        if obstacle.alive && !obstacle.passed && obstacle.x < player_x {
            obstacle.passed = true;
            cleared += 1;
        }
    }
    state.score += cleared;

    for enemy in &mut state.enemies {
        enemy.update();
    }
    for gate in &mut state.gates {
        gate.update();
    }
    for powerup in &mut state.powerups {
        powerup.update();
    }
    for tentacle in &mut state.tentacles {
        tentacle.update();
    }
    for ufo in &mut state.ufos {
        ufo.update(audio);
    }
    // Presence loop ends when the last UFO scrolls off before engaging
    if !state.ufos.is_empty() && state.ufos.iter().all(|u| !u.alive) {
        audio.stop_loop(LoopCue::UfoPresence);
    }

    for projectile in &mut state.projectiles {
        projectile.update();
        if projectile.is_off_screen() {
            projectile.alive = false;
        }
    }
    // The nuke is never culled; it flies until detonated
    if let Some(nuke) = &mut state.player.nuke {
        nuke.update();
    }
    if let Some(explosion) = &mut state.player.explosion {
        explosion.update();
    }

    if collision::resolve(state, now, audio) {
        audio.play(Cue::GameOver);
        audio.stop_loop(LoopCue::UfoPresence);
        state.high_score = state.high_score.max(state.score);
        state.phase = GamePhase::GameOver;
    }

    state.compact();
}

fn handle_fire(state: &mut GameState, input: &TickInput, now: u64, audio: &mut dyn AudioPort) {
    let kind = state.player.weapon.kind;

    if input.fire_pressed {
        match kind {
            WeaponKind::Charge => state.player.weapon.start_charging(now),
            // Pressing again while a nuke is in flight detonates it
            WeaponKind::Nuke if state.player.nuke.is_some() => {
                collision::detonate_nuke(state, audio);
            }
            _ => fire(state, now, audio),
        }
    } else if input.fire_held && kind != WeaponKind::Charge && kind != WeaponKind::Nuke {
        // Held autofire; the weapon cooldown does the rate limiting
        fire(state, now, audio);
    }

    if state.player.weapon.charging {
        state.player.weapon.update_charge(now, audio);
    }

    if input.fire_released && state.player.weapon.kind == WeaponKind::Charge {
        let origin = state.player.pos;
        let outcome = state.player.weapon.release_charge(origin, now, audio);
        apply_outcome(state, outcome);
    }
}

fn fire(state: &mut GameState, now: u64, audio: &mut dyn AudioPort) {
    let origin = state.player.pos;
    let outstanding = state.player.nuke.is_some();
    let outcome = state.player.weapon.shoot(origin, now, outstanding, audio);
    apply_outcome(state, outcome);
}

fn apply_outcome(state: &mut GameState, outcome: ShotOutcome) {
    state.projectiles.extend(outcome.projectiles);
    if outcome.nuke.is_some() {
        state.player.nuke = outcome.nuke;
    }
    if outcome.revert_to_default {
        state.player.weapon = Weapon::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{CueRecorder, NullAudio};
    use crate::consts::TICK_MS;
    use crate::sim::entities::{Enemy, Obstacle};

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn flap() -> TickInput {
        TickInput {
            flap: true,
            ..TickInput::default()
        }
    }

    #[test]
    fn test_menu_plays_title_until_flap_starts_run() {
        let mut rec = CueRecorder::new();
        let mut state = GameState::new(1);

        tick(&mut state, &idle(), 0, &mut rec);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(rec.loop_running(LoopCue::TitleTheme));

        tick(&mut state, &flap(), 16, &mut rec);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!rec.loop_running(LoopCue::TitleTheme));
    }

    #[test]
    fn test_death_transitions_to_game_over_and_records_high_score() {
        let mut rec = CueRecorder::new();
        let mut state = GameState::new(1);
        state.begin_session(0);
        state.score = 12;
        state.player.shields = 0;

        let mut enemy = Enemy::spawn(&mut state.rng);
        enemy.pos = state.player.pos;
        enemy.speed = 0.0;
        state.enemies.push(enemy);

        tick(&mut state, &idle(), 16, &mut rec);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, 12);
        assert!(rec.played(Cue::GameOver));
    }

    #[test]
    fn test_game_over_flap_starts_fresh_run() {
        let mut audio = NullAudio;
        let mut state = GameState::new(1);
        state.begin_session(0);
        state.phase = GamePhase::GameOver;
        state.score = 40;
        state.high_score = 40;

        tick(&mut state, &flap(), 5000, &mut audio);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 40);
    }

    #[test]
    fn test_clearing_an_obstacle_scores_once() {
        let mut audio = NullAudio;
        let mut state = GameState::new(1);
        state.begin_session(0);

        // Wide gap centered on the player so nothing collides
        let mut obstacle = Obstacle::spawn(&mut state.rng, 110.0);
        obstacle.x = 60.0;
        obstacle.gap_y = state.player.pos.y;
        state.obstacles.push(obstacle);

        let mut now = 0;
        for _ in 0..8 {
            now += TICK_MS;
            tick(&mut state, &idle(), now, &mut audio);
        }
        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_held_fire_autofires_on_cooldown() {
        let mut audio = NullAudio;
        let mut state = GameState::new(1);
        state.begin_session(0);

        let held = TickInput {
            fire_held: true,
            ..TickInput::default()
        };
        let mut now = 0;
        // 1.2s of holding fire with a 500ms cooldown fires three shots
        // (t=16, t=528, t=1040). The first two travel off the right edge
        // and get culled; only the third is still in flight.
        for _ in 0..75 {
            now += TICK_MS;
            tick(&mut state, &held, now, &mut audio);
        }
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_charge_hold_and_release_emits_scaled_projectile() {
        let mut audio = NullAudio;
        let mut state = GameState::new(1);
        state.begin_session(0);
        state.player.weapon = Weapon::new(WeaponKind::Charge);

        let mut now = TICK_MS;
        tick(
            &mut state,
            &TickInput {
                fire_pressed: true,
                fire_held: true,
                ..TickInput::default()
            },
            now,
            &mut audio,
        );
        // Hold for 20 frames: charge reaches 40
        for _ in 0..20 {
            now += TICK_MS;
            tick(
                &mut state,
                &TickInput {
                    fire_held: true,
                    ..TickInput::default()
                },
                now,
                &mut audio,
            );
        }
        now += TICK_MS;
        tick(
            &mut state,
            &TickInput {
                fire_released: true,
                ..TickInput::default()
            },
            now,
            &mut audio,
        );

        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.player.weapon.ammo, Some(19));
        assert_eq!(state.player.weapon.charge_level, 0);
    }

    #[test]
    fn test_nuke_press_launches_then_press_detonates() {
        let mut rec = CueRecorder::new();
        let mut state = GameState::new(1);
        state.begin_session(0);
        state.player.weapon = Weapon::new(WeaponKind::Nuke);

        let press = TickInput {
            fire_pressed: true,
            ..TickInput::default()
        };
        tick(&mut state, &press, 16, &mut rec);
        assert!(state.player.nuke.is_some());
        assert_eq!(state.player.weapon.ammo, Some(2));

        tick(&mut state, &press, 32, &mut rec);
        assert!(state.player.nuke.is_none());
        assert!(state.player.explosion.is_some());
        assert!(rec.played(Cue::Explosion));
        // Two rounds left: no reversion
        assert_eq!(state.player.weapon.kind, WeaponKind::Nuke);
    }

    #[test]
    fn test_same_seed_same_script_same_outcome() {
        let script = |frame: u64| TickInput {
            flap: frame % 17 == 0,
            fire_held: frame % 3 != 0,
            fire_pressed: frame % 30 == 0,
            fire_released: frame % 30 == 1,
        };

        let run = || {
            let mut audio = NullAudio;
            let mut state = GameState::new(7);
            tick(&mut state, &flap(), 0, &mut audio);
            let mut now = 0;
            for frame in 0..1200 {
                now += TICK_MS;
                tick(&mut state, &script(frame), now, &mut audio);
            }
            state
        };

        let a = run();
        let b = run();
        assert_eq!(a.score, b.score);
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.projectiles.len(), b.projectiles.len());
    }
}
