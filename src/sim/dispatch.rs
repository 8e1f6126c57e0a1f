//! Contact sink for the world step
//!
//! Holds the registry by shared reference: while a step is running nothing
//! may change which characters exist, only which ones are marked.

use super::deletion::DeletionQueue;
use super::registry::{Character, Registry};
use super::resolve::resolve;
use crate::physics::{Contact, ContactListener};

pub struct CollisionDispatch<'a> {
    registry: &'a Registry,
    queue: &'a mut DeletionQueue,
}

impl<'a> CollisionDispatch<'a> {
    pub fn new(registry: &'a Registry, queue: &'a mut DeletionQueue) -> Self {
        Self { registry, queue }
    }

    /// Both sides of a dynamic-dynamic contact, if both are characters
    fn characters(&self, contact: &Contact) -> Option<(&'a Character, &'a Character)> {
        if !contact.both_dynamic() {
            return None;
        }
        let registry = self.registry;
        Some((
            registry.find_by_body(contact.a.handle)?,
            registry.find_by_body(contact.b.handle)?,
        ))
    }
}

impl ContactListener for CollisionDispatch<'_> {
    fn begin_contact(&mut self, contact: Contact) {
        let Some((a, b)) = self.characters(&contact) else {
            return;
        };
        let loser = resolve(a, b);
        log::info!("Collision between characters {} and {}", a.id(), b.id());
        log::debug!(
            "  {a}{}\n  {b}{}",
            if loser.id() == a.id() { " (to be deleted)" } else { "" },
            if loser.id() == b.id() { " (to be deleted)" } else { "" },
        );
        if !self.queue.mark(loser.body()) {
            log::debug!("  {} already scheduled", loser.body());
        }
    }

    fn end_contact(&mut self, contact: Contact) {
        if let Some((a, b)) = self.characters(&contact) {
            log::info!("Collision between characters {} and {} ceased", a.id(), b.id());
        }
    }
}
