//! Top-level run loop.
//!
//! Opens the gesture input source (keyboard simulation by default, webcam +
//! MoveNet with `--features camera`), the window and the world, then runs
//! one world tick per rendered frame until the window closes.

use std::sync::mpsc::Sender;

use log::info;
use pose_gesture::sim::SimInput;
use pose_gesture::GestureInputSource;

use crate::config::{GameConfig, RunnerError};
use crate::visualizer::{Command, Visualizer};
use crate::world::{TickOutcome, World};

/// Run the game.  The capture thread is always shut down before this
/// returns, on success or error.
pub fn run(cfg: GameConfig) -> Result<(), RunnerError> {
    cfg.validate()?;

    // ── Gesture input (capture thread starts here) ────────────────────────
    let (source, sim_tx) = open_input(&cfg)?;

    let result = play(&cfg, &source, sim_tx);
    source.shutdown();
    result
}

fn play(cfg: &GameConfig, source: &GestureInputSource, sim_tx: Option<Sender<SimInput>>) -> Result<(), RunnerError> {
    let mut vis = Visualizer::new(&cfg.window, sim_tx)?;
    let mut world = World::new(cfg);
    info!("[app] run 1 started");

    while vis.is_open() {
        // 1. Keyboard
        match vis.poll_input() {
            Command::Quit => break,
            Command::Reset if world.is_game_over() => world.reset(source),
            Command::Reset | Command::Continue => {}
        }

        // 2. Simulation
        if world.tick(source) == TickOutcome::Crashed {
            info!(
                "[app] capture: {} frames processed, levels {}",
                source.frames_processed(),
                source.levels().label(),
            );
        }

        // 3. Render
        let preview = source.latest_display_frame();
        vis.render(&world, preview.as_deref());
    }

    info!("[app] window closed");
    Ok(())
}

#[cfg(not(feature = "camera"))]
fn open_input(cfg: &GameConfig) -> Result<(GestureInputSource, Option<Sender<SimInput>>), RunnerError> {
    use pose_gesture::sim::{SimCamera, SimPoseEstimator};
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel();
    let source = GestureInputSource::spawn(
        Box::new(SimCamera::default()),
        SimPoseEstimator::new(rx),
        cfg.capture.clone(),
    )?;
    Ok((source, Some(tx)))
}

#[cfg(feature = "camera")]
fn open_input(cfg: &GameConfig) -> Result<(GestureInputSource, Option<Sender<SimInput>>), RunnerError> {
    use pose_gesture::hw::{MoveNetEstimator, OpenCvCamera};

    let camera = OpenCvCamera::open(cfg.camera.index)?;
    let estimator = MoveNetEstimator::load(&cfg.camera.model, cfg.capture.thresholds.min_confidence)?;
    let source = GestureInputSource::spawn(Box::new(camera), estimator, cfg.capture.clone())?;
    Ok((source, None))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
