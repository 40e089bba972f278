//! AI reaction systems (target locator, proximity, damage).

use bevy::prelude::*;

use crate::ai::events::TargetReachChanged;
use crate::ai::fsm::StateMachine;
use crate::combat::EnemyDamaged;
use crate::components::{ChaseTarget, Enemy, Health, PhysicsBody, Target, TargetProximity};
use crate::config::AgentConfig;

/// System: target locator, агенты без цели берут первую Target entity
///
/// Цель, которая исчезла (despawn), сбрасывается и ищется заново.
pub fn acquire_targets(
    mut agents: Query<&mut ChaseTarget, With<Enemy>>,
    targets: Query<Entity, With<Target>>,
) {
    for mut chase_target in agents.iter_mut() {
        if chase_target.0.is_some_and(|target| targets.contains(target)) {
            continue;
        }

        let found = targets.iter().next();
        if chase_target.0 != found {
            chase_target.0 = found;
        }
    }
}

/// System: TargetReachChanged → TargetProximity
pub fn apply_reach_signals(
    mut events: EventReader<TargetReachChanged>,
    mut agents: Query<&mut TargetProximity, With<Enemy>>,
) {
    for event in events.read() {
        let Ok(mut proximity) = agents.get_mut(event.agent) else {
            continue;
        };
        proximity.in_reach = event.in_reach;
    }
}

/// System: урон → knockback interrupt
///
/// Мёртвых не откидываем (EnemyDamaged приходит только для живых,
/// но Health проверяем на случай нескольких ударов за шаг).
pub fn apply_knockback_on_damage(
    mut events: EventReader<EnemyDamaged>,
    mut agents: Query<
        (&Transform, &AgentConfig, &Health, &ChaseTarget, &mut StateMachine, &mut PhysicsBody),
        With<Enemy>,
    >,
    targets: Query<&Transform, Without<Enemy>>,
) {
    for event in events.read() {
        let Ok((transform, config, health, chase_target, mut fsm, mut body)) = agents.get_mut(event.entity) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let position = transform.translation.truncate();
        let target = chase_target
            .0
            .and_then(|target| targets.get(target).ok())
            .map(|target_transform| target_transform.translation.truncate());

        let impulse = fsm.begin_knockback(&mut body, position, target, &config.knockback);
        crate::logger::log(&format!("💥 {:?} knocked back: {:?}", event.entity, impulse));
    }
}
