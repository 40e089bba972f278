//! CHASER Simulation Core
//!
//! ECS-симуляция преследователей на Bevy 0.16 (2D, headless).
//!
//! - ai: FSM Idle/Patrol/Chase/Search, перцепция, knockback
//! - movement: archetypes (ground / flying)
//! - physics: ray cast'ы по статике + kinematic контроллер
//! - trail: checkpoint trail цели
//! - combat: урон → EnemyDamaged / EnemyKilled

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::Collider;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod movement;
pub mod physics;
pub mod trail;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AISet, AIState, AIStateChanged, Perception, StateId, StateMachine, TargetReachChanged};
pub use combat::{CombatPlugin, DamageDealt, EnemyDamaged, EnemyKilled};
pub use components::*;
pub use config::{AgentConfig, ConfigError, EnemyPreset, FlyingConfig, GroundConfig, KnockbackConfig, LocomotionConfig};
pub use logger::init_logger;
pub use movement::Archetype;
pub use physics::{KinematicController, KinematicControllerPlugin, LevelGeometry, RaycastWorld, StaticSurfaces};
pub use trail::{CheckpointTrail, TrailPlugin, TrailRecorder};

/// Частота physics pass (FixedUpdate)
pub const FIXED_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для physics pass
            .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
            // Детерминистичный RNG (seed по умолчанию)
            .init_resource::<DeterministicRng>()
            .add_plugins((CombatPlugin, AIPlugin, TrailPlugin, KinematicControllerPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время шагает вручную (1/60 сек за update), один fixed шаг на кадр.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / FIXED_HZ)))
        .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ));

    app
}

/// Bundle врага из пресета (конфиг валидируется до спавна)
pub fn enemy_bundle(position: Vec2, preset: &EnemyPreset) -> Result<impl Bundle, ConfigError> {
    preset.validate()?;

    let archetype = Archetype::from_config(preset.locomotion);
    let body = if archetype.is_flying() {
        PhysicsBody::flying()
    } else {
        PhysicsBody::default()
    };

    Ok((
        Enemy,
        preset.agent.clone(),
        StateMachine::new(preset.agent.initial_state),
        archetype,
        Perception::default(),
        ChaseTarget::default(),
        TargetProximity::default(),
        Health::default(),
        physics::kinematic_body_bundle(position, body, KinematicController::default()),
    ))
}

/// Спавн врага. Кривой пресет → ConfigError, entity не создаётся.
pub fn spawn_enemy(commands: &mut Commands, position: Vec2, preset: &EnemyPreset) -> Result<Entity, ConfigError> {
    let bundle = enemy_bundle(position, preset)
        .inspect_err(|err| logger::log_error(&format!("Enemy preset rejected: {}", err)))?;
    let entity = commands.spawn(bundle).id();
    logger::log_info(&format!("Enemy {:?} spawned at {:?}", entity, position));
    Ok(entity)
}

/// Bundle цели с trail producer'ом
pub fn target_bundle(position: Vec2, trail_capacity: usize) -> impl Bundle {
    (
        Target,
        Transform::from_translation(position.extend(0.0)),
        CheckpointTrail::new(trail_capacity),
        TrailRecorder::default(),
    )
}

/// Bundle статической поверхности уровня (прямоугольник)
pub fn surface_bundle(center: Vec2, half_extents: Vec2, surface: Surface) -> impl Bundle {
    (
        Transform::from_translation(center.extend(0.0)),
        Collider::cuboid(half_extents.x, half_extents.y),
        surface,
    )
}

/// Снимок агента для сравнения прогонов
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshot {
    pub index: u32,
    pub state: StateId,
    pub position: Vec2,
}

/// Snapshot всех агентов (сортировка по Entity index)
pub fn agents_snapshot(world: &mut World) -> Vec<AgentSnapshot> {
    let mut query = world.query_filtered::<(Entity, &Transform, &StateMachine), With<Enemy>>();
    let mut agents: Vec<AgentSnapshot> = query
        .iter(world)
        .map(|(entity, transform, fsm)| AgentSnapshot {
            index: entity.index(),
            state: fsm.state_id(),
            position: transform.translation.truncate(),
        })
        .collect();

    agents.sort_by_key(|agent| agent.index);
    agents
}
