//! Platform seams
//!
//! Windowing, input polling and drawing live outside the crate. A frontend
//! hands the frame loop its input once per frame and receives the body set to
//! draw. Pointer events arrive already mapped into world coordinates.

pub mod camera;
pub mod headless;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec2;

use crate::physics::BodySnapshot;

pub use camera::Camera;
pub use headless::{LogRenderer, ScriptedInput};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerPressed { screen: Vec2, world: Vec2 },
    PointerMoved { screen: Vec2, world: Vec2 },
    /// Raw key code; the simulation ignores keys
    Key { code: u32, pressed: bool },
}

/// Shared flag that asks the frame loop to stop
///
/// Clones share one flag, so a signal handler on another thread can raise it.
#[derive(Debug, Clone, Default)]
pub struct CloseSignal(Arc<AtomicBool>);

impl CloseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-frame input and the close signal
pub trait InputSource {
    /// Events gathered since the previous call
    fn poll_events(&mut self) -> Vec<InputEvent>;

    fn should_close(&self) -> bool;
}

/// Draws the world once per frame
pub trait Renderer {
    fn render(&mut self, bodies: &[BodySnapshot]);
}
