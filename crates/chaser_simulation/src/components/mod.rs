//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: маркеры и здоровье (Enemy, Target, Health)
//! - movement: тело и target locator (PhysicsBody, ChaseTarget, TargetProximity)
//! - world: поверхности уровня (Surface, CollisionLayers)

pub mod actor;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use world::*;
