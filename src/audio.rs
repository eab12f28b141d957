//! Audio port for the simulation
//!
//! The sim never touches an audio backend directly; it calls through this
//! trait, injected at the tick boundary. A backend that fails to load an
//! asset logs the failure and keeps the cue as a silent no-op - gameplay
//! never halts on audio errors.

/// One-shot sound cues, fire-and-forget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Default weapon fired
    Shoot,
    /// Laser fired
    Laser,
    /// Spread volley fired
    SpreadFire,
    /// Player or gate took a hit
    Hit,
    /// Power-up collected / weapon exhausted back to default
    PowerUp,
    /// Run ended
    GameOver,
    /// Ground enemy or gate destroyed
    EnemyDeath,
    /// Charge weapon accumulating (every 100ms while held)
    ChargeTick,
    /// Shield restored
    ShieldRecharge,
    /// UFO damaged
    UfoHit,
    /// UFO destroyed
    UfoDeath,
    /// UFO fired its shot pattern
    UfoShoot,
    /// Nuke detonation
    Explosion,
    /// Tentacle creature spawned or damaged
    Blob,
}

/// Long-running looped cues with explicit start/stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCue {
    /// Plays on the menu, stops when a run begins
    TitleTheme,
    /// Plays while at least one UFO is alive
    UfoPresence,
}

/// Capability object handed to the simulation each tick.
pub trait AudioPort {
    fn play(&mut self, cue: Cue);
    fn start_loop(&mut self, cue: LoopCue);
    fn stop_loop(&mut self, cue: LoopCue);
}

/// Silent implementation for headless runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioPort for NullAudio {
    fn play(&mut self, _cue: Cue) {}
    fn start_loop(&mut self, _cue: LoopCue) {}
    fn stop_loop(&mut self, _cue: LoopCue) {}
}

/// Records every call for asserting on cue sequences in tests.
#[derive(Debug, Default)]
pub struct CueRecorder {
    pub cues: Vec<Cue>,
    pub loops_started: Vec<LoopCue>,
    pub loops_stopped: Vec<LoopCue>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `cue` was ever played
    pub fn played(&self, cue: Cue) -> bool {
        self.cues.contains(&cue)
    }

    /// True if the loop was started and not stopped since
    pub fn loop_running(&self, cue: LoopCue) -> bool {
        let started = self.loops_started.iter().filter(|c| **c == cue).count();
        let stopped = self.loops_stopped.iter().filter(|c| **c == cue).count();
        started > stopped
    }
}

impl AudioPort for CueRecorder {
    fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    fn start_loop(&mut self, cue: LoopCue) {
        self.loops_started.push(cue);
    }

    fn stop_loop(&mut self, cue: LoopCue) {
        self.loops_stopped.push(cue);
    }
}
