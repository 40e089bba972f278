//! AI systems
//!
//! - reactions: target locator, proximity, knockback (события → компоненты)
//! - logic: перцепция + переходы (Update)
//! - physics: движение состояния (FixedUpdate)

pub mod logic;
pub mod physics;
pub mod reactions;

pub use logic::*;
pub use physics::*;
pub use reactions::*;
