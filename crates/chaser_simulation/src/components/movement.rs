//! Movement компоненты: velocity тела, target locator

use bevy::prelude::*;

/// Физическое тело актора (velocity принадлежит телу, не AI)
///
/// AI (archetype) пишет velocity в physics pass, KinematicController интегрирует.
/// Во время knockback velocity принадлежит только импульсу + гравитации.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    /// Скорость (units/sec)
    pub velocity: Vec2,
    /// Множитель гравитации (0.0 для летающих)
    pub gravity_scale: f32,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
        }
    }
}

impl PhysicsBody {
    pub fn flying() -> Self {
        Self {
            gravity_scale: 0.0,
            ..default()
        }
    }

    /// Обнулить горизонтальную скорость (вертикаль остаётся гравитации)
    pub fn stop_horizontal(&mut self) {
        self.velocity.x = 0.0;
    }
}

/// Target locator: за кем охотится агент
///
/// None: цели нет (перцепция отвечает "не видно").
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ChaseTarget(pub Option<Entity>);

/// Proximity сигнал от target locator (trigger volume вокруг цели)
///
/// Обновляется через TargetReachChanged events.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TargetProximity {
    pub in_reach: bool,
}
