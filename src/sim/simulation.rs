//! Simulation context
//!
//! Owns the world, the registry and the deletion queue for one run. A step
//! runs the solver with a [`CollisionDispatch`] as contact sink and only
//! drains the queue after the solver has returned.

use glam::Vec2;

use super::deletion::{DeletionQueue, DrainReport};
use super::dispatch::CollisionDispatch;
use super::registry::{EntityId, Registry};
use crate::physics::{BodyDef, BodyHandle, BodySnapshot, PhysicsWorld};
use crate::settings::PhysicsSettings;

pub struct Simulation<W: PhysicsWorld> {
    world: W,
    registry: Registry,
    deletions: DeletionQueue,
    physics: PhysicsSettings,
    steps: u64,
}

impl<W: PhysicsWorld> Simulation<W> {
    pub fn new(world: W, physics: PhysicsSettings) -> Self {
        Self {
            world,
            registry: Registry::new(),
            deletions: DeletionQueue::new(),
            physics,
            steps: 0,
        }
    }

    pub fn spawn(&mut self, size: f32, position: Vec2) -> EntityId {
        let id = self.registry.spawn(&mut self.world, size, position);
        self.registry.log_characters();
        id
    }

    /// Add a world-owned body that never becomes a character
    pub fn add_scenery(&mut self, def: &BodyDef) -> BodyHandle {
        self.world.create_body(def)
    }

    /// Advance one fixed step, then apply the deletions it produced
    pub fn step(&mut self) -> DrainReport {
        debug_assert!(self.deletions.is_empty(), "deletions leaked across steps");
        {
            let mut dispatch = CollisionDispatch::new(&self.registry, &mut self.deletions);
            self.world.step(
                self.physics.timestep,
                self.physics.velocity_iterations,
                self.physics.position_iterations,
                &mut dispatch,
            );
        }
        self.steps += 1;

        let report = self
            .deletions
            .drain_and_apply(&mut self.registry, &mut self.world);
        if report.total() > 0 {
            log::debug!("Step {}: {report:?}", self.steps);
        }
        report
    }

    /// Remove every character, leaving scenery in place
    pub fn teardown(&mut self) -> usize {
        log::info!("Cleaning character list...");
        let removed = self.registry.clear_all(&mut self.world);
        log::info!("Done");
        removed
    }

    /// Tear down and release the world
    pub fn shutdown(mut self) -> usize {
        let removed = self.teardown();
        log::info!("Releasing physics world after {} step(s)", self.steps);
        removed
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn bodies(&self) -> Vec<BodySnapshot> {
        self.world.bodies()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
