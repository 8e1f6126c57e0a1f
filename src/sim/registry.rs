//! Character registry
//!
//! Owns every live character and the reverse index from body handle to
//! character. Characters stay sorted by id because ids are allocated in
//! creation order and removal preserves order.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

use crate::consts::*;
use crate::physics::{BodyDef, BodyHandle, PhysicsWorld};

/// Character identity, allocated in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deletable body with a size
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    id: EntityId,
    size: f32,
    body: BodyHandle,
}

impl Character {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Body definition for a character of `size` at `position`
    pub fn body_def(size: f32, position: Vec2) -> BodyDef {
        let half = size / SIZE_PER_HALF_EXTENT;
        BodyDef::dynamic_box(
            position,
            Vec2::splat(half),
            CHARACTER_DENSITY,
            CHARACTER_FRICTION,
        )
        .with_contact_reports()
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Character{{id: {}, size: {}, body: {}}}",
            self.id, self.size, self.body
        )
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    characters: Vec<Character>,
    by_body: HashMap<BodyHandle, EntityId>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a character body in `world` and register it
    pub fn spawn(&mut self, world: &mut impl PhysicsWorld, size: f32, position: Vec2) -> EntityId {
        let body = world.create_body(&Character::body_def(size, position));
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let previous = self.by_body.insert(body, id);
        debug_assert!(previous.is_none(), "body {body} registered twice");

        let character = Character { id, size, body };
        log::info!("Spawned {character} at {position}");
        self.characters.push(character);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Character> {
        self.position(id).map(|i| &self.characters[i])
    }

    /// Reverse lookup; `None` for any body that is not a live character
    pub fn find_by_body(&self, body: BodyHandle) -> Option<&Character> {
        self.by_body.get(&body).and_then(|id| self.get(*id))
    }

    /// Destroy the character's body and forget it
    ///
    /// This is the only place a character body is destroyed.
    pub fn remove(&mut self, world: &mut impl PhysicsWorld, id: EntityId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let character = self.characters.remove(index);
        self.by_body.remove(&character.body);
        if !world.destroy_body(character.body) {
            log::warn!("{character} had no live body when removed");
        }
        log::info!("Removed {character}");
        true
    }

    /// Remove every character; returns how many were removed
    pub fn clear_all(&mut self, world: &mut impl PhysicsWorld) -> usize {
        let count = self.characters.len();
        for character in self.characters.drain(..) {
            world.destroy_body(character.body);
        }
        self.by_body.clear();
        log::info!("Cleared {count} character(s)");
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Dump every character at debug level
    pub fn log_characters(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        log::debug!("{} character(s)", self.characters.len());
        for character in &self.characters {
            log::debug!("  {character}");
        }
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.characters.binary_search_by_key(&id, |c| c.id).ok()
    }
}
