//! Logic pass (Update): перцепция → переходы FSM → AIStateChanged

use bevy::prelude::*;

use crate::ai::events::AIStateChanged;
use crate::ai::fsm::{LogicContext, StateMachine};
use crate::ai::perception::Perception;
use crate::components::{ChaseTarget, Enemy, Health, PhysicsBody, TargetProximity};
use crate::config::AgentConfig;
use crate::movement::Archetype;
use crate::physics::LevelGeometry;
use crate::trail::CheckpointTrail;

/// Система: logic tick всех живых агентов
///
/// Мёртвые агенты не думают: перцепция и переходы заморожены.
pub fn ai_logic_tick(
    time: Res<Time>,
    mut agents: Query<
        (
            Entity,
            &Transform,
            &AgentConfig,
            &Health,
            &ChaseTarget,
            &TargetProximity,
            &mut Perception,
            &mut StateMachine,
            &mut Archetype,
            &mut PhysicsBody,
        ),
        With<Enemy>,
    >,
    targets: Query<(&Transform, Option<&CheckpointTrail>)>,
    geometry: LevelGeometry,
    mut state_events: EventWriter<AIStateChanged>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, config, health, chase_target, proximity, mut perception, mut fsm, mut archetype, mut body) in
        agents.iter_mut()
    {
        if !health.is_alive() {
            continue;
        }

        let position = transform.translation.truncate();
        let (target_position, trail) = match chase_target.0.and_then(|target| targets.get(target).ok()) {
            Some((target_transform, trail)) => (Some(target_transform.translation.truncate()), trail),
            None => (None, None),
        };

        let visible = if config.require_reach_signal && !proximity.in_reach {
            perception.mark_out_of_reach();
            false
        } else {
            perception.can_see_target(now, position, target_position, config, &geometry)
        };

        let mut ctx = LogicContext {
            now,
            position,
            target_visible: visible,
            last_seen: perception.last_seen,
            trail,
            search_timeout: config.search_timeout,
            locomotion: archetype.locomotion_mut(),
            world: &geometry,
            body: &mut body,
        };

        if let Some(change) = fsm.tick(&mut ctx) {
            crate::logger::log(&format!(
                "🧠 {:?}: {} → {}",
                entity,
                change.from.as_str(),
                change.to.as_str()
            ));
            state_events.write(AIStateChanged {
                entity,
                from: change.from,
                to: change.to,
            });
        }
    }
}
