//! 2D camera for mapping pointer positions into the world
//!
//! At zoom 1 the viewport spans 50 world units vertically, with the
//! horizontal extent following the aspect ratio. Screen y grows downward.

use glam::Vec2;

use crate::settings::CameraSettings;

/// Vertical half extent of the view at zoom 1
const HALF_HEIGHT: f32 = 25.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    pub zoom: f32,
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            center: settings.center,
            zoom: settings.zoom,
            width: settings.width.max(1),
            height: settings.height.max(1),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// World-space half extents of the view
    pub fn extents(&self) -> Vec2 {
        let ratio = self.width as f32 / self.height as f32;
        Vec2::new(ratio * HALF_HEIGHT, HALF_HEIGHT) * self.zoom
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let (w, h) = (self.width as f32, self.height as f32);
        let u = screen.x / w;
        let v = (h - screen.y) / h;

        let lower = self.center - self.extents();
        let upper = self.center + self.extents();
        Vec2::new(
            (1.0 - u) * lower.x + u * upper.x,
            (1.0 - v) * lower.y + v * upper.y,
        )
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let (w, h) = (self.width as f32, self.height as f32);
        let lower = self.center - self.extents();
        let upper = self.center + self.extents();

        let u = (world.x - lower.x) / (upper.x - lower.x);
        let v = (world.y - lower.y) / (upper.y - lower.y);
        Vec2::new(u * w, (1.0 - v) * h)
    }
}
