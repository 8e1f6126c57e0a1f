//! Rigid-body world seam
//!
//! The simulation only talks to the solver through [`PhysicsWorld`]. Contact
//! notifications are delivered to a [`ContactListener`] synchronously from
//! inside [`PhysicsWorld::step`], while the solver still holds the bodies, so
//! listeners must never destroy anything.

pub mod rapier;

#[cfg(test)]
pub(crate) mod mock;

use std::fmt;

use glam::Vec2;

pub use rapier::RapierWorld;

/// Opaque identifier for a rigid body
///
/// Ordered by slot index, then generation, so sets of handles iterate in a
/// reproducible order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn into_raw_parts(self) -> (u32, u32) {
        (self.index, self.generation)
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box given by its half extents
    Box { half_extents: Vec2 },
    /// Two-sided line segment in body space
    Edge { a: Vec2, b: Vec2 },
}

/// Everything needed to create one body with a single collider
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub shape: Shape,
    pub density: f32,
    pub friction: f32,
    /// Deliver begin/end contact notifications for this body
    pub report_contacts: bool,
}

impl BodyDef {
    pub fn dynamic_box(position: Vec2, half_extents: Vec2, density: f32, friction: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position,
            shape: Shape::Box { half_extents },
            density,
            friction,
            report_contacts: false,
        }
    }

    pub fn static_edge(a: Vec2, b: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            position: Vec2::ZERO,
            shape: Shape::Edge { a, b },
            density: 0.0,
            friction: 0.2,
            report_contacts: false,
        }
    }

    pub fn with_contact_reports(mut self) -> Self {
        self.report_contacts = true;
        self
    }
}

/// One side of a contact notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactBody {
    pub handle: BodyHandle,
    pub kind: BodyKind,
}

/// Two bodies whose shapes started or stopped touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: ContactBody,
    pub b: ContactBody,
}

impl Contact {
    pub fn both_dynamic(&self) -> bool {
        self.a.kind == BodyKind::Dynamic && self.b.kind == BodyKind::Dynamic
    }
}

/// Receives contact notifications from inside a world step
pub trait ContactListener {
    fn begin_contact(&mut self, contact: Contact);
    fn end_contact(&mut self, contact: Contact);
}

/// Render-side view of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub handle: BodyHandle,
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
    pub shape: Shape,
}

/// The rigid-body simulation context
pub trait PhysicsWorld {
    /// Create a body. Creation cannot fail once the world exists.
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;

    /// Destroy a body. Returns `false` if the handle is not alive.
    fn destroy_body(&mut self, body: BodyHandle) -> bool;

    fn contains(&self, body: BodyHandle) -> bool;

    fn kind_of(&self, body: BodyHandle) -> Option<BodyKind>;

    /// Advance by exactly `dt`, calling `listener` for every contact change
    /// before returning
    fn step(
        &mut self,
        dt: f32,
        velocity_iterations: usize,
        position_iterations: usize,
        listener: &mut (dyn ContactListener + Send),
    );

    fn bodies(&self) -> Vec<BodySnapshot>;

    fn body_count(&self) -> usize;
}
