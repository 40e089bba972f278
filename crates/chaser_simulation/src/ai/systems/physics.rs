//! Physics pass (FixedUpdate): FSM state → velocity
//!
//! Только пишет PhysicsBody.velocity; интеграция позиции —
//! KinematicControllerPlugin (после AISet::Physics).

use bevy::prelude::*;

use crate::ai::fsm::StateMachine;
use crate::components::{ChaseTarget, Enemy, Health, PhysicsBody};
use crate::config::AgentConfig;
use crate::movement::{Archetype, Motor};
use crate::physics::LevelGeometry;

/// Система: physics tick всех агентов
pub fn ai_physics_tick(
    time: Res<Time<Fixed>>,
    mut agents: Query<
        (
            Entity,
            &Transform,
            &AgentConfig,
            &Health,
            &ChaseTarget,
            &mut StateMachine,
            &mut Archetype,
            &mut PhysicsBody,
        ),
        With<Enemy>,
    >,
    targets: Query<&Transform>,
    geometry: LevelGeometry,
) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();

    let positions: Vec<(Entity, Vec2)> = agents
        .iter()
        .map(|(entity, transform, ..)| (entity, transform.translation.truncate()))
        .collect();

    for (entity, transform, config, health, chase_target, mut fsm, mut archetype, mut body) in agents.iter_mut() {
        let crowd: Vec<Vec2> = positions
            .iter()
            .filter(|(other, _)| *other != entity)
            .map(|(_, position)| *position)
            .collect();

        let target = chase_target
            .0
            .and_then(|target| targets.get(target).ok())
            .map(|target_transform| target_transform.translation.truncate());

        let mut motor = Motor {
            now,
            position: transform.translation.truncate(),
            body: &mut body,
            move_speed: config.move_speed,
            reach_threshold: config.reach_threshold,
            world: &geometry,
            crowd: &crowd,
        };

        fsm.physics_tick(
            &mut motor,
            archetype.locomotion_mut(),
            target,
            health.is_alive(),
            delta,
        );
    }
}
