//! Базовые компоненты акторов: Enemy, Target, Health

use bevy::prelude::*;

/// Враг под управлением AI (перцепция + FSM + archetype движения)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Enemy;

/// Цель преследования (игрок). Target locator ищет entity с этим маркером.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Target;

/// Здоровье актора (внешний collaborator для AI)
///
/// Инвариант: 0 ≤ current ≤ max
/// AI только читает: current == 0 → все движение приостановлено.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}
