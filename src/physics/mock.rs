//! Scripted world for tests
//!
//! Records every call in order and replays queued contacts during `step`.

use std::collections::BTreeMap;

use super::{
    BodyDef, BodyHandle, BodyKind, BodySnapshot, Contact, ContactBody, ContactListener,
    PhysicsWorld,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    Create(BodyHandle),
    Destroy(BodyHandle),
    StepBegin,
    /// A begin contact was delivered; `alive` is whether both bodies still existed
    BeginContact { alive: bool },
    EndContact,
    StepEnd,
}

#[derive(Default)]
pub struct RecordingWorld {
    bodies: BTreeMap<BodyHandle, BodyDef>,
    next_index: u32,
    /// Contacts to deliver on the next step: (a, b, began)
    pending: Vec<(BodyHandle, BodyHandle, bool)>,
    pub events: Vec<WorldEvent>,
}

impl RecordingWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_begin(&mut self, a: BodyHandle, b: BodyHandle) {
        self.pending.push((a, b, true));
    }

    pub fn queue_end(&mut self, a: BodyHandle, b: BodyHandle) {
        self.pending.push((a, b, false));
    }

    pub fn destroy_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, WorldEvent::Destroy(_)))
            .count()
    }

    pub fn def(&self, body: BodyHandle) -> Option<&BodyDef> {
        self.bodies.get(&body)
    }

    fn contact_body(&self, handle: BodyHandle) -> ContactBody {
        ContactBody {
            handle,
            kind: self.kind_of(handle).unwrap_or(BodyKind::Static),
        }
    }
}

impl PhysicsWorld for RecordingWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let handle = BodyHandle::from_raw_parts(self.next_index, 0);
        self.next_index += 1;
        self.bodies.insert(handle, def.clone());
        self.events.push(WorldEvent::Create(handle));
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) -> bool {
        if self.bodies.remove(&body).is_some() {
            self.events.push(WorldEvent::Destroy(body));
            true
        } else {
            false
        }
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    fn kind_of(&self, body: BodyHandle) -> Option<BodyKind> {
        self.bodies.get(&body).map(|def| def.kind)
    }

    fn step(
        &mut self,
        _dt: f32,
        _velocity_iterations: usize,
        _position_iterations: usize,
        listener: &mut (dyn ContactListener + Send),
    ) {
        self.events.push(WorldEvent::StepBegin);
        for (a, b, began) in std::mem::take(&mut self.pending) {
            let contact = Contact {
                a: self.contact_body(a),
                b: self.contact_body(b),
            };
            if began {
                let alive = self.contains(a) && self.contains(b);
                listener.begin_contact(contact);
                self.events.push(WorldEvent::BeginContact { alive });
            } else {
                listener.end_contact(contact);
                self.events.push(WorldEvent::EndContact);
            }
        }
        self.events.push(WorldEvent::StepEnd);
    }

    fn bodies(&self) -> Vec<BodySnapshot> {
        self.bodies
            .iter()
            .map(|(handle, def)| BodySnapshot {
                handle: *handle,
                kind: def.kind,
                position: def.position,
                angle: 0.0,
                shape: def.shape,
            })
            .collect()
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
