//! Space Flapper entry point
//!
//! Headless demo: runs a scripted session at the fixed 60 Hz timestep and
//! prints the final frame snapshot as JSON. A renderer would drive the same
//! `tick` loop from its frame clock.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use space_flapper::NullAudio;
use space_flapper::consts::*;
use space_flapper::highscores::HighScores;
use space_flapper::sim::{GamePhase, GameState, TickInput, tick};
use space_flapper::snapshot::FrameSnapshot;

/// Leaderboard file next to the working directory
const SCORES_PATH: &str = "highscores.json";

fn main() {
    env_logger::init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Space Flapper (headless) starting with seed {seed}");

    let mut state = GameState::new(seed);
    let mut audio = NullAudio;
    let mut now: u64 = 0;

    // Leave the menu
    tick(
        &mut state,
        &TickInput {
            flap: true,
            ..TickInput::default()
        },
        now,
        &mut audio,
    );

    // Scripted pilot: hover around mid-screen, hold fire
    let max_frames = TICK_HZ as u64 * 60;
    for frame in 0..max_frames {
        now += TICK_MS;
        let input = TickInput {
            flap: state.player.vel_y > 0.0 && state.player.pos.y > SCREEN_HEIGHT / 2.0,
            fire_held: true,
            ..TickInput::default()
        };
        tick(&mut state, &input, now, &mut audio);

        if frame % (TICK_HZ as u64 * 5) == 0 {
            log::info!(
                "frame {frame}: score {} level {} shields {}",
                state.score,
                state.level(),
                state.player.shields
            );
        }
        if state.phase == GamePhase::GameOver {
            log::info!("run ended at frame {frame} with score {}", state.score);
            break;
        }
    }

    let scores_path = Path::new(SCORES_PATH);
    let mut scores = HighScores::load(scores_path);
    if let Some(rank) = scores.add_score(state.score, state.level(), seed) {
        log::info!("final score {} ranked #{rank}", state.score);
        if let Err(err) = scores.save(scores_path) {
            log::warn!("could not save high scores: {err}");
        }
    }

    let snapshot = FrameSnapshot::capture(&state, now);
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("snapshot serialization failed: {err}"),
    }
}
