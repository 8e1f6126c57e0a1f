//! Character simulation
//!
//! Collision callbacks only mark bodies; the registry changes after the world
//! step has returned.

pub mod deletion;
pub mod dispatch;
pub mod registry;
pub mod resolve;
pub mod scene;
pub mod simulation;

pub use deletion::{DeletionQueue, DrainReport};
pub use dispatch::CollisionDispatch;
pub use registry::{Character, EntityId, Registry};
pub use resolve::resolve;
pub use scene::{SceneLayout, populate};
pub use simulation::Simulation;
