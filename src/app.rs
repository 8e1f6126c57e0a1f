//! Frame loop
//!
//! Each frame: poll input and spawn characters for pointer presses, step the
//! world once, drain deletions, render, then let the pacer sleep. The close
//! signal is checked at the top of every frame; once seen, the simulation is
//! torn down and the app never runs again.

use crate::error::{SimError, SimResult};
use crate::pacing::{Clock, FramePacer, LoopState};
use crate::physics::PhysicsWorld;
use crate::platform::{InputEvent, InputSource, Renderer};
use crate::settings::{Settings, SpawnSettings};
use crate::sim::Simulation;

/// What happened during one frame body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub spawned: usize,
    /// Characters crushed this frame
    pub crushed: usize,
}

/// Totals for a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub spawned: usize,
    pub crushed: usize,
    /// Characters still alive at shutdown
    pub cleared: usize,
    pub fps: f64,
}

pub struct App<W, I, R, C>
where
    W: PhysicsWorld,
    I: InputSource,
    R: Renderer,
    C: Clock,
{
    sim: Option<Simulation<W>>,
    input: I,
    renderer: R,
    pacer: FramePacer<C>,
    spawn: SpawnSettings,
    frame_limit: Option<u64>,
}

impl<W, I, R, C> App<W, I, R, C>
where
    W: PhysicsWorld,
    I: InputSource,
    R: Renderer,
    C: Clock,
{
    pub fn new(
        sim: Simulation<W>,
        input: I,
        renderer: R,
        clock: C,
        settings: &Settings,
    ) -> SimResult<Self> {
        settings.validate()?;
        Ok(Self {
            sim: Some(sim),
            input,
            renderer,
            pacer: FramePacer::new(clock, settings.pacing.target_fps)?,
            spawn: settings.spawn.clone(),
            frame_limit: settings.pacing.frame_limit,
        })
    }

    /// Run until the close signal, then tear down
    pub fn run(&mut self) -> SimResult<RunSummary> {
        if self.pacer.state() == LoopState::ShuttingDown {
            return Err(SimError::AlreadyShutDown);
        }
        log::info!(
            "Running at {:.1} fps target",
            1.0 / self.pacer.target().as_secs_f64()
        );

        let mut summary = RunSummary::default();
        while !self.close_requested() {
            let Self {
                sim,
                input,
                renderer,
                pacer,
                spawn,
                ..
            } = self;
            let sim = sim.as_mut().ok_or(SimError::AlreadyShutDown)?;
            let (report, _) = pacer.run_frame(|| frame(sim, input, renderer, spawn))?;
            summary.spawned += report.spawned;
            summary.crushed += report.crushed;
        }

        summary.frames = self.pacer.stats().frames();
        summary.fps = self.pacer.stats().fps();
        summary.cleared = self.shut_down();
        log::info!(
            "Stopped after {} frame(s): {} spawned, {} crushed, {} cleared, {:.1} fps",
            summary.frames,
            summary.spawned,
            summary.crushed,
            summary.cleared,
            summary.fps
        );
        Ok(summary)
    }

    pub fn state(&self) -> LoopState {
        self.pacer.state()
    }

    /// The live simulation, until shutdown
    pub fn simulation(&self) -> Option<&Simulation<W>> {
        self.sim.as_ref()
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn close_requested(&self) -> bool {
        self.input.should_close()
            || self
                .frame_limit
                .is_some_and(|limit| self.pacer.stats().frames() >= limit)
    }

    /// One-time teardown; returns the number of characters cleared
    fn shut_down(&mut self) -> usize {
        if !self.pacer.shut_down() {
            return 0;
        }
        self.sim.take().map_or(0, Simulation::shutdown)
    }
}

fn frame<W: PhysicsWorld>(
    sim: &mut Simulation<W>,
    input: &mut impl InputSource,
    renderer: &mut impl Renderer,
    spawn: &SpawnSettings,
) -> FrameReport {
    let mut report = FrameReport::default();

    for event in input.poll_events() {
        match event {
            InputEvent::PointerPressed { screen, world } => {
                sim.spawn(spawn.size_for_screen_y(screen.y), world);
                report.spawned += 1;
            }
            InputEvent::PointerMoved { world, .. } => log::trace!("Pointer at {world}"),
            InputEvent::Key { code, pressed } => log::trace!("Key {code} pressed={pressed}"),
        }
    }

    report.crushed = sim.step().characters;
    renderer.render(&sim.bodies());
    report
}
