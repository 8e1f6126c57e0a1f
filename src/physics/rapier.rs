//! rapier2d backend for [`PhysicsWorld`]
//!
//! Each body carries exactly one collider. Collision events are forwarded to
//! the listener from inside `PhysicsPipeline::step`.

use std::num::NonZeroUsize;

use glam::Vec2;
use parking_lot::Mutex;
use rapier2d::prelude::*;

use super::{
    BodyDef, BodyHandle, BodyKind, BodySnapshot, Contact, ContactBody, ContactListener,
    PhysicsWorld, Shape,
};
use crate::error::{SimError, SimResult};
use crate::settings::PhysicsSettings;

#[inline]
fn to_handle(handle: RigidBodyHandle) -> BodyHandle {
    let (index, generation) = handle.into_raw_parts();
    BodyHandle::from_raw_parts(index, generation)
}

#[inline]
fn to_rapier(handle: BodyHandle) -> RigidBodyHandle {
    let (index, generation) = handle.into_raw_parts();
    RigidBodyHandle::from_raw_parts(index, generation)
}

fn kind_of_body(body: &RigidBody) -> BodyKind {
    if body.is_dynamic() {
        BodyKind::Dynamic
    } else {
        BodyKind::Static
    }
}

/// Resolve a collider to its parent body, if both still exist
fn contact_body(
    bodies: &RigidBodySet,
    colliders: &ColliderSet,
    collider: ColliderHandle,
) -> Option<ContactBody> {
    let parent = colliders.get(collider)?.parent()?;
    let body = bodies.get(parent)?;
    Some(ContactBody {
        handle: to_handle(parent),
        kind: kind_of_body(body),
    })
}

/// Adapts rapier's event handler to a [`ContactListener`]
///
/// rapier requires handlers to be `Sync`; the lock is only ever taken by the
/// stepping thread.
struct ContactBridge<'a> {
    listener: Mutex<&'a mut (dyn ContactListener + Send)>,
}

impl EventHandler for ContactBridge<'_> {
    fn handle_collision_event(
        &self,
        bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        // Removed colliders report a final stop with no parent left to resolve.
        let (Some(a), Some(b)) = (
            contact_body(bodies, colliders, event.collider1()),
            contact_body(bodies, colliders, event.collider2()),
        ) else {
            return;
        };
        let contact = Contact { a, b };
        let mut listener = self.listener.lock();
        match event {
            CollisionEvent::Started(..) => listener.begin_contact(contact),
            CollisionEvent::Stopped(..) => listener.end_contact(contact),
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// A rapier2d world with gravity
pub struct RapierWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
}

impl RapierWorld {
    pub fn new(settings: &PhysicsSettings) -> SimResult<Self> {
        if !settings.gravity.is_finite() {
            return Err(SimError::WorldInit(format!(
                "gravity {} is not finite",
                settings.gravity
            )));
        }
        log::info!("Creating physics world with gravity {}", settings.gravity);
        Ok(Self {
            gravity: vector![settings.gravity.x, settings.gravity.y],
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
        })
    }

    /// Position of a live body
    pub fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies
            .get(to_rapier(body))
            .map(|b| Vec2::new(b.translation().x, b.translation().y))
    }
}

impl PhysicsWorld for RapierWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let builder = match def.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let handle = self
            .bodies
            .insert(builder.translation(vector![def.position.x, def.position.y]));

        let collider = match def.shape {
            Shape::Box { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y),
            Shape::Edge { a, b } => ColliderBuilder::segment(point![a.x, a.y], point![b.x, b.y]),
        }
        .density(def.density)
        .friction(def.friction);
        let collider = if def.report_contacts {
            collider.active_events(ActiveEvents::COLLISION_EVENTS)
        } else {
            collider
        };
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        to_handle(handle)
    }

    fn destroy_body(&mut self, body: BodyHandle) -> bool {
        self.bodies
            .remove(
                to_rapier(body),
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains(to_rapier(body))
    }

    fn kind_of(&self, body: BodyHandle) -> Option<BodyKind> {
        self.bodies.get(to_rapier(body)).map(kind_of_body)
    }

    fn step(
        &mut self,
        dt: f32,
        velocity_iterations: usize,
        position_iterations: usize,
        listener: &mut (dyn ContactListener + Send),
    ) {
        self.params.dt = dt;
        self.params.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        // Position correction runs as rapier's stabilization pass
        self.params.num_internal_stabilization_iterations = position_iterations.max(1);

        let bridge = ContactBridge {
            listener: Mutex::new(listener),
        };
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &bridge,
        );
    }

    fn bodies(&self) -> Vec<BodySnapshot> {
        let mut snapshots: Vec<BodySnapshot> = self
            .bodies
            .iter()
            .filter_map(|(handle, body)| {
                let collider = self.colliders.get(*body.colliders().first()?)?;
                let shape = if let Some(cuboid) = collider.shape().as_cuboid() {
                    Shape::Box {
                        half_extents: Vec2::new(cuboid.half_extents.x, cuboid.half_extents.y),
                    }
                } else if let Some(segment) = collider.shape().as_segment() {
                    Shape::Edge {
                        a: Vec2::new(segment.a.x, segment.a.y),
                        b: Vec2::new(segment.b.x, segment.b.y),
                    }
                } else {
                    return None;
                };
                Some(BodySnapshot {
                    handle: to_handle(handle),
                    kind: kind_of_body(body),
                    position: Vec2::new(body.translation().x, body.translation().y),
                    angle: body.rotation().angle(),
                    shape,
                })
            })
            .collect();
        snapshots.sort_by_key(|s| s.handle);
        snapshots
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[derive(Default)]
    struct Recorder {
        begins: Vec<Contact>,
        ends: Vec<Contact>,
    }

    impl ContactListener for Recorder {
        fn begin_contact(&mut self, contact: Contact) {
            self.begins.push(contact);
        }

        fn end_contact(&mut self, contact: Contact) {
            self.ends.push(contact);
        }
    }

    fn world() -> RapierWorld {
        RapierWorld::new(&PhysicsSettings::default()).unwrap()
    }

    fn step(world: &mut RapierWorld, recorder: &mut Recorder) {
        world.step(SIM_DT, VELOCITY_ITERATIONS, POSITION_ITERATIONS, recorder);
    }

    #[test]
    fn test_rejects_non_finite_gravity() {
        let settings = PhysicsSettings {
            gravity: Vec2::new(0.0, f32::INFINITY),
            ..Default::default()
        };
        assert!(matches!(
            RapierWorld::new(&settings),
            Err(SimError::WorldInit(_))
        ));
    }

    #[test]
    fn test_create_and_destroy() {
        let mut world = world();
        let body = world.create_body(&BodyDef::dynamic_box(
            Vec2::new(0.0, 5.0),
            Vec2::splat(0.5),
            1.0,
            0.1,
        ));
        assert!(world.contains(body));
        assert_eq!(world.kind_of(body), Some(BodyKind::Dynamic));
        assert_eq!(world.body_count(), 1);

        assert!(world.destroy_body(body));
        assert!(!world.contains(body));
        assert_eq!(world.kind_of(body), None);
        // Second destroy is a no-op
        assert!(!world.destroy_body(body));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = world();
        let body = world.create_body(&BodyDef::dynamic_box(
            Vec2::new(0.0, 10.0),
            Vec2::splat(0.5),
            1.0,
            0.1,
        ));
        let mut recorder = Recorder::default();
        for _ in 0..30 {
            step(&mut world, &mut recorder);
        }
        let y = world.position(body).unwrap().y;
        assert!(y < 10.0, "body should fall, y = {y}");
    }

    #[test]
    fn test_overlapping_bodies_report_begin_contact() {
        let mut world = world();
        let def = |x: f32| {
            BodyDef::dynamic_box(Vec2::new(x, 5.0), Vec2::splat(0.2), 20.0, 0.1)
                .with_contact_reports()
        };
        let a = world.create_body(&def(0.0));
        let b = world.create_body(&def(0.1));

        let mut recorder = Recorder::default();
        step(&mut world, &mut recorder);

        assert_eq!(recorder.begins.len(), 1);
        let contact = recorder.begins[0];
        assert!(contact.both_dynamic());
        let mut pair = [contact.a.handle, contact.b.handle];
        pair.sort();
        let mut expected = [a, b];
        expected.sort();
        assert_eq!(pair, expected);
    }

    #[test]
    fn test_removed_body_does_not_report_end_contact() {
        let mut world = world();
        let def = |x: f32| {
            BodyDef::dynamic_box(Vec2::new(x, 5.0), Vec2::splat(0.2), 20.0, 0.1)
                .with_contact_reports()
        };
        let a = world.create_body(&def(0.0));
        world.create_body(&def(0.1));

        let mut recorder = Recorder::default();
        step(&mut world, &mut recorder);
        assert!(world.destroy_body(a));
        step(&mut world, &mut recorder);

        assert!(recorder.ends.is_empty());
    }

    /// Boxes that start sunk into the ground and into each other
    fn settle_overlapping_stack(position_iterations: usize) -> Vec<BodySnapshot> {
        let mut world = world();
        world.create_body(&BodyDef::static_edge(
            Vec2::new(-40.0, 0.0),
            Vec2::new(40.0, 0.0),
        ));
        for i in 0..3 {
            world.create_body(&BodyDef::dynamic_box(
                Vec2::new(0.05 * i as f32, 0.3 + 0.7 * i as f32),
                Vec2::splat(0.5),
                20.0,
                0.1,
            ));
        }
        let mut recorder = Recorder::default();
        for _ in 0..60 {
            world.step(
                SIM_DT,
                VELOCITY_ITERATIONS,
                position_iterations,
                &mut recorder,
            );
        }
        world.bodies()
    }

    #[test]
    fn test_position_iterations_affect_penetration_recovery() {
        let coarse = settle_overlapping_stack(1);
        let fine = settle_overlapping_stack(50);
        assert_eq!(coarse.len(), fine.len());
        assert_ne!(coarse, fine);
        // Same inputs stay deterministic
        assert_eq!(fine, settle_overlapping_stack(50));
    }

    #[test]
    fn test_snapshot_shapes() {
        let mut world = world();
        let ground = world.create_body(&BodyDef::static_edge(
            Vec2::new(-40.0, 0.0),
            Vec2::new(40.0, 0.0),
        ));
        let piece = world.create_body(&BodyDef::dynamic_box(
            Vec2::new(1.0, 1.0),
            Vec2::new(0.1, 1.0),
            20.0,
            0.1,
        ));

        let snapshots = world.bodies();
        assert_eq!(snapshots.len(), 2);
        let ground_snap = snapshots.iter().find(|s| s.handle == ground).unwrap();
        assert_eq!(ground_snap.kind, BodyKind::Static);
        assert!(matches!(ground_snap.shape, Shape::Edge { .. }));
        let piece_snap = snapshots.iter().find(|s| s.handle == piece).unwrap();
        match piece_snap.shape {
            Shape::Box { half_extents } => {
                assert!((half_extents - Vec2::new(0.1, 1.0)).length() < 1e-6)
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }
}
