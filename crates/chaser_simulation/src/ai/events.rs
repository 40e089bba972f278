//! AI Events
//!
//! Входящие: TargetReachChanged (trigger-зона цели), EnemyDamaged (из combat).
//! Исходящие: AIStateChanged (для анимаций/звука/тестов).

use bevy::prelude::*;

use super::state::StateId;

/// Цель вошла/вышла из proximity зоны агента
#[derive(Event, Debug, Clone, Copy)]
pub struct TargetReachChanged {
    pub agent: Entity,
    pub in_reach: bool,
}

/// Агент сменил состояние
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AIStateChanged {
    pub entity: Entity,
    pub from: StateId,
    pub to: StateId,
}
