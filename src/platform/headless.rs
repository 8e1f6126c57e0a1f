//! Headless frontend
//!
//! Scripted pointer presses from a seeded RNG and a renderer that only logs,
//! so the frame loop can run without a window.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Camera, CloseSignal, InputEvent, InputSource, Renderer};
use crate::physics::{BodyKind, BodySnapshot};

/// Presses the pointer at a random screen position every `press_every` frames
pub struct ScriptedInput {
    camera: Camera,
    rng: Pcg32,
    press_every: u64,
    frame: u64,
    close: CloseSignal,
}

impl ScriptedInput {
    pub fn new(camera: Camera, seed: u64, press_every: u64) -> Self {
        Self {
            camera,
            rng: Pcg32::seed_from_u64(seed),
            press_every: press_every.max(1),
            frame: 0,
            close: CloseSignal::new(),
        }
    }

    /// Raise the close signal
    pub fn close(&self) {
        self.close.raise();
    }

    /// Handle for raising the close signal from elsewhere, e.g. an interrupt handler
    pub fn close_signal(&self) -> CloseSignal {
        self.close.clone()
    }

    fn random_screen_point(&mut self) -> Vec2 {
        let (w, h) = self.camera.size();
        Vec2::new(
            self.rng.random_range(0.0..w as f32),
            // Upper half of the viewport, so presses land above the ground
            self.rng.random_range(0.0..h as f32 / 2.0),
        )
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.frame += 1;
        if self.frame % self.press_every != 0 {
            return Vec::new();
        }
        let screen = self.random_screen_point();
        let world = self.camera.screen_to_world(screen);
        vec![
            InputEvent::PointerMoved { screen, world },
            InputEvent::PointerPressed { screen, world },
        ]
    }

    fn should_close(&self) -> bool {
        self.close.is_raised()
    }
}

/// Logs the body census every `every` frames
pub struct LogRenderer {
    every: u64,
    frame: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frame: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, bodies: &[BodySnapshot]) {
        self.frame += 1;
        if self.frame % self.every != 0 {
            return;
        }
        let dynamic = bodies
            .iter()
            .filter(|b| b.kind == BodyKind::Dynamic)
            .count();
        log::debug!(
            "frame {}: {} bodies ({} dynamic, {} static)",
            self.frame,
            bodies.len(),
            dynamic,
            bodies.len() - dynamic
        );
    }
}
