//! Crush entry point
//!
//! Runs the default scene headless with scripted pointer presses. Pass a JSON
//! settings file as the first argument to override the defaults.

use std::process::ExitCode;

use crush::pacing::SystemClock;
use crush::physics::RapierWorld;
use crush::platform::{Camera, LogRenderer, ScriptedInput};
use crush::sim::{Simulation, populate};
use crush::{App, Settings, SimError};

/// Frames between scripted pointer presses
const PRESS_EVERY: u64 = 30;
/// Frames between renderer census logs
const CENSUS_EVERY: u64 = 60;

fn run() -> Result<(), SimError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    };
    if settings.pacing.frame_limit.is_none() {
        log::info!("No frame limit set; press Ctrl-C to stop");
    }

    let world = RapierWorld::new(&settings.physics)?;
    let mut sim = Simulation::new(world, settings.physics.clone());
    populate(&mut sim, &settings.scene);

    let input = ScriptedInput::new(Camera::new(&settings.camera), settings.seed, PRESS_EVERY);
    let close = input.close_signal();
    ctrlc::set_handler(move || {
        log::info!("Interrupt received, shutting down");
        close.raise();
    })?;

    let mut app = App::new(
        sim,
        input,
        LogRenderer::new(CENSUS_EVERY),
        SystemClock::new(),
        &settings,
    )?;
    app.run()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Crush starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
