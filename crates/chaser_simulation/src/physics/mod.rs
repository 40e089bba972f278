//! Physics simulation module
//!
//! - query: ray cast'ы против статики уровня (перцепция + probes archetype'ов)
//! - movement: kinematic контроллер (gravity, интеграция, коллизии)

pub mod movement;
pub mod query;

// Re-export основных типов
pub use movement::{kinematic_body_bundle, KinematicController, KinematicControllerPlugin};
pub use query::{LevelGeometry, RayHit, RaycastWorld, StaticSurface, StaticSurfaces};
