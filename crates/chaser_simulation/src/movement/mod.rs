//! Movement archetypes: как агент перемещается в каждом состоянии
//!
//! FSM решает ЧТО делать (patrol/chase/search), archetype решает КАК:
//! - Ground: горизонталь + гравитация, probes на обрыв/стену, проекция trail на пол
//! - Flying: свободное 2D движение, патруль вокруг центра на заданной высоте
//!
//! Все методы движения вызываются только в physics pass (FixedUpdate).
//! `build_search_snapshot` и `on_patrol_setup` — в logic pass (enter hooks).

use bevy::prelude::*;

use crate::components::PhysicsBody;
use crate::config::LocomotionConfig;
use crate::physics::RaycastWorld;
use crate::trail::CheckpointTrail;

pub mod flying;
pub mod ground;

pub use flying::FlyingLocomotion;
pub use ground::GroundLocomotion;

/// Контекст одного physics шага агента
pub struct Motor<'a> {
    /// Время physics clock (для cooldown'ов)
    pub now: f32,
    pub position: Vec2,
    pub body: &'a mut PhysicsBody,
    pub move_speed: f32,
    pub reach_threshold: f32,
    pub world: &'a dyn RaycastWorld,
    /// Позиции остальных врагов (наземный патруль разворачивается перед ними)
    pub crowd: &'a [Vec2],
}

/// Capability interface archetype'а движения
pub trait Locomotion {
    /// Движение к цели (`to_target` = target - position)
    fn move_chase(&mut self, motor: &mut Motor, to_target: Vec2);

    /// Движение к waypoint'у Search
    fn move_search_toward(&mut self, motor: &mut Motor, point: Vec2);

    /// Достигнут ли point (метрика зависит от archetype)
    fn has_reached(&self, position: Vec2, point: Vec2, threshold: f32) -> bool;

    /// Вход в Patrol
    fn on_patrol_setup(&mut self, position: Vec2);

    /// Один шаг патруля
    fn move_patrol(&mut self, motor: &mut Motor);

    /// Snapshot waypoints для Search (newest first, без мутации trail)
    fn build_search_snapshot(
        &self,
        position: Vec2,
        trail: &CheckpointTrail,
        world: &dyn RaycastWorld,
    ) -> Vec<Vec2>;
}

/// Archetype компонент агента (закрытое множество вариантов)
#[derive(Component, Debug, Clone)]
pub enum Archetype {
    Ground(GroundLocomotion),
    Flying(FlyingLocomotion),
}

impl Archetype {
    pub fn from_config(config: LocomotionConfig) -> Self {
        match config {
            LocomotionConfig::Ground(ground) => Archetype::Ground(GroundLocomotion::new(ground)),
            LocomotionConfig::Flying(flying) => Archetype::Flying(FlyingLocomotion::new(flying)),
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self, Archetype::Flying(_))
    }

    pub fn locomotion_mut(&mut self) -> &mut dyn Locomotion {
        match self {
            Archetype::Ground(ground) => ground,
            Archetype::Flying(flying) => flying,
        }
    }
}

/// Направление по знаку (0 → +1)
pub(crate) fn facing(dx: f32) -> f32 {
    if dx < 0.0 {
        -1.0
    } else {
        1.0
    }
}
