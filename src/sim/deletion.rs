//! Deferred deletion queue
//!
//! Contact callbacks run while the solver still references the touching
//! bodies, so they only mark handles here. The queue is drained once the step
//! has returned.

use std::collections::BTreeSet;

use super::registry::Registry;
use crate::physics::{BodyHandle, PhysicsWorld};

/// Outcome of one drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Characters removed through the registry
    pub characters: usize,
    /// Non-character bodies destroyed directly
    pub scenery: usize,
    /// Handles whose body was already gone
    pub stale: usize,
}

impl DrainReport {
    pub fn total(&self) -> usize {
        self.characters + self.scenery
    }
}

/// Body handles marked for removal, drained in ascending handle order
#[derive(Debug, Default)]
pub struct DeletionQueue {
    marked: BTreeSet<BodyHandle>,
}

impl DeletionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a body; returns `false` if it was already marked
    pub fn mark(&mut self, body: BodyHandle) -> bool {
        self.marked.insert(body)
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.marked.contains(&body)
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.marked.iter().copied()
    }

    /// Remove every marked body, leaving the queue empty
    pub fn drain_and_apply(
        &mut self,
        registry: &mut Registry,
        world: &mut impl PhysicsWorld,
    ) -> DrainReport {
        let mut report = DrainReport::default();
        if self.marked.is_empty() {
            return report;
        }
        log::debug!("Deleting {} body(ies) scheduled for removal", self.marked.len());

        for body in std::mem::take(&mut self.marked) {
            // An earlier removal in this drain may have taken this body with it.
            if !world.contains(body) {
                log::debug!("Skipping {body}: already destroyed");
                report.stale += 1;
                continue;
            }
            match registry.find_by_body(body).map(|c| c.id()) {
                Some(id) => {
                    registry.remove(world, id);
                    report.characters += 1;
                }
                None => {
                    world.destroy_body(body);
                    log::debug!("Destroyed scenery body {body}");
                    report.scenery += 1;
                }
            }
        }
        registry.log_characters();
        report
    }
}
