//! Damage pipeline: DamageDealt → Health → EnemyDamaged / EnemyKilled
//!
//! Сам урон рассчитывает внешний код (оружие, ловушки) — здесь только
//! применение к Health и уведомление AI (knockback) и остальных подписчиков.

use bevy::prelude::*;

use crate::components::{Enemy, Health};
use crate::logger;

/// Запрос на урон (входящее событие)
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageDealt {
    pub target: Entity,
    pub amount: u32,
}

/// Враг получил урон и всё ещё жив
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyDamaged {
    pub entity: Entity,
    pub remaining_health: u32,
}

/// Враг умер (публикуется ровно один раз)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyKilled {
    pub entity: Entity,
}

/// Результат применения урона к Health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Цель уже была мертва, урон игнорируется
    Ignored,
    Damaged { remaining: u32 },
    Killed,
}

/// Применить урон к Health (чистая функция, без ECS)
pub fn resolve_damage(health: &mut Health, amount: u32) -> DamageOutcome {
    if !health.is_alive() {
        return DamageOutcome::Ignored;
    }

    health.take_damage(amount);
    if health.is_alive() {
        DamageOutcome::Damaged {
            remaining: health.current,
        }
    } else {
        DamageOutcome::Killed
    }
}

/// Система: обработка DamageDealt для врагов
pub fn apply_damage(
    mut damage_events: EventReader<DamageDealt>,
    mut enemies: Query<&mut Health, With<Enemy>>,
    mut damaged_events: EventWriter<EnemyDamaged>,
    mut killed_events: EventWriter<EnemyKilled>,
) {
    for event in damage_events.read() {
        let Ok(mut health) = enemies.get_mut(event.target) else {
            logger::log_warning(&format!("DamageDealt: {:?} is not a damageable enemy", event.target));
            continue;
        };

        match resolve_damage(&mut health, event.amount) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Damaged { remaining } => {
                damaged_events.write(EnemyDamaged {
                    entity: event.target,
                    remaining_health: remaining,
                });
            }
            DamageOutcome::Killed => {
                logger::log(&format!("💀 Enemy {:?} killed", event.target));
                killed_events.write(EnemyKilled {
                    entity: event.target,
                });
            }
        }
    }
}
