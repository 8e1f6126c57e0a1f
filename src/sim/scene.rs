//! Starting scene: ground, one starter character and a row of dominoes

use glam::Vec2;

use super::registry::EntityId;
use super::simulation::Simulation;
use crate::consts::*;
use crate::physics::{BodyDef, BodyHandle, PhysicsWorld};
use crate::settings::SceneSettings;

/// Domino half extents
pub const DOMINO_HALF_EXTENTS: Vec2 = Vec2::new(0.1, 1.0);
/// Gap between the starter and the first domino, and between dominoes
const DOMINO_OFFSET: f32 = 0.7;
const DOMINO_SPACING: f32 = 1.0;

/// Handles of everything the scene created
#[derive(Debug, Clone)]
pub struct SceneLayout {
    pub ground: BodyHandle,
    pub starter: Option<EntityId>,
    pub dominoes: Vec<BodyHandle>,
}

pub fn populate<W: PhysicsWorld>(sim: &mut Simulation<W>, scene: &SceneSettings) -> SceneLayout {
    let ground = sim.add_scenery(&BodyDef::static_edge(
        Vec2::new(-scene.ground_half_length, 0.0),
        Vec2::new(scene.ground_half_length, 0.0),
    ));

    let starter =
        (scene.starter_size > 0.0).then(|| sim.spawn(scene.starter_size, scene.starter_position));

    let fall_x = scene.starter_position.x;
    let dominoes = (0..scene.dominoes)
        .map(|i| {
            let x = fall_x + DOMINO_OFFSET + DOMINO_SPACING * i as f32;
            sim.add_scenery(&BodyDef::dynamic_box(
                Vec2::new(x, DOMINO_HALF_EXTENTS.y),
                DOMINO_HALF_EXTENTS,
                CHARACTER_DENSITY,
                CHARACTER_FRICTION,
            ))
        })
        .collect();

    log::info!(
        "Scene ready: ground, {} starter, {} domino(es)",
        if starter.is_some() { "1" } else { "no" },
        scene.dominoes
    );
    SceneLayout {
        ground,
        starter,
        dominoes,
    }
}
