//! Integration tests: полный цикл преследования в headless App
//!
//! Patrol → Chase → Search → Chase → Search → Patrol, knockback, смерть,
//! proximity gating, летающий archetype, разворот патруля перед соседом.

use bevy::prelude::*;
use chaser_simulation::config::{FlyingConfig, LocomotionConfig};
use chaser_simulation::{
    create_headless_app, enemy_bundle, surface_bundle, AISet, AIStateChanged, AgentConfig, Archetype, CheckpointTrail,
    DamageDealt, EnemyKilled, EnemyPreset, PhysicsBody, SimulationPlugin, StateId, StateMachine, Surface, Target,
    TargetReachChanged,
};

/// Лог переходов (from, to) в порядке появления
#[derive(Resource, Default)]
struct TransitionLog(Vec<(StateId, StateId)>);

fn record_transitions(mut events: EventReader<AIStateChanged>, mut log: ResMut<TransitionLog>) {
    for event in events.read() {
        log.0.push((event.from, event.to));
    }
}

#[derive(Resource, Default)]
struct KillCount(usize);

fn count_kills(mut events: EventReader<EnemyKilled>, mut kills: ResMut<KillCount>) {
    kills.0 += events.read().count();
}

fn create_app() -> App {
    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin)
        .init_resource::<TransitionLog>()
        .init_resource::<KillCount>()
        .add_systems(Update, (record_transitions, count_kills).after(AISet::Logic));

    // Пол: верх на y = 0
    app.world_mut().spawn(surface_bundle(
        Vec2::new(0.0, -0.5),
        Vec2::new(50.0, 0.5),
        Surface::ground(),
    ));
    app
}

fn spawn_target(app: &mut App, position: Vec2, points: &[Vec2]) -> Entity {
    let mut trail = CheckpointTrail::new(16);
    for point in points {
        trail.push(*point);
    }
    // Без TrailRecorder — trail фиксированный
    app.world_mut()
        .spawn((Target, Transform::from_translation(position.extend(0.0)), trail))
        .id()
}

fn spawn_agent(app: &mut App, position: Vec2, preset: &EnemyPreset) -> Entity {
    let bundle = enemy_bundle(position, preset).expect("valid preset");
    app.world_mut().spawn(bundle).id()
}

/// Стена x = 6..6.5 между агентом и целью (x = 9)
fn spawn_wall(app: &mut App) -> Entity {
    app.world_mut()
        .spawn(surface_bundle(Vec2::new(6.25, 2.0), Vec2::new(0.25, 2.0), Surface::obstacle()))
        .id()
}

fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn fsm(app: &App, agent: Entity) -> &StateMachine {
    app.world().get::<StateMachine>(agent).expect("agent has StateMachine")
}

fn body(app: &App, agent: Entity) -> PhysicsBody {
    *app.world().get::<PhysicsBody>(agent).expect("agent has PhysicsBody")
}

fn position(app: &App, entity: Entity) -> Vec2 {
    app.world()
        .get::<Transform>(entity)
        .expect("entity has Transform")
        .translation
        .truncate()
}

#[test]
fn test_full_chase_search_cycle() {
    let mut app = create_app();
    spawn_target(&mut app, Vec2::new(9.0, 0.5), &[Vec2::new(7.0, 0.5), Vec2::new(8.0, 0.5)]);
    let agent = spawn_agent(&mut app, Vec2::new(0.0, 0.5), &EnemyPreset::default());

    // Цель в радиусе, LOS чистый → Chase
    run(&mut app, 2);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Chase);

    // Стена закрыла цель → Search по trail (newest first, на полу)
    let wall = spawn_wall(&mut app);
    run(&mut app, 20);
    let episode = fsm(&app, agent).search().expect("agent should be searching");
    assert_eq!(episode.len(), 2);
    assert!((episode.waypoints()[0] - Vec2::new(8.0, 0.0)).length() < 1e-3);
    assert!((episode.waypoints()[1] - Vec2::new(7.0, 0.0)).length() < 1e-3);

    // Стена исчезла → снова Chase, snapshot выброшен
    app.world_mut().despawn(wall);
    run(&mut app, 20);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Chase);
    assert!(fsm(&app, agent).search().is_none());

    // Снова стена: waypoints за стеной недостижимы → выход по timeout (8s)
    spawn_wall(&mut app);
    run(&mut app, 20);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Search);
    run(&mut app, 7 * 60);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Search);
    run(&mut app, 2 * 60);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Patrol);

    // Агент упёрся в стену, но не прошёл сквозь неё
    assert!(position(&app, agent).x < 6.0);

    let log = &app.world().resource::<TransitionLog>().0;
    assert_eq!(
        log.as_slice(),
        &[
            (StateId::Patrol, StateId::Chase),
            (StateId::Chase, StateId::Search),
            (StateId::Search, StateId::Chase),
            (StateId::Chase, StateId::Search),
            (StateId::Search, StateId::Patrol),
        ]
    );
}

#[test]
fn test_knockback_interrupts_chase() {
    let mut app = create_app();
    spawn_target(&mut app, Vec2::new(5.0, 0.5), &[]);
    let agent = spawn_agent(&mut app, Vec2::new(0.0, 0.5), &EnemyPreset::default());

    run(&mut app, 5);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Chase);
    assert_eq!(body(&app, agent).velocity.x, 3.0);

    app.world_mut().send_event(DamageDealt {
        target: agent,
        amount: 10,
    });
    run(&mut app, 1);

    // Импульс от цели (цель справа → влево) и вверх
    assert!(fsm(&app, agent).is_knocked_back());
    assert_eq!(body(&app, agent).velocity.x, -5.0);
    assert!(body(&app, agent).velocity.y > 0.0);

    // Chase не перетирает импульс, пока таймер идёт
    run(&mut app, 5);
    assert!(fsm(&app, agent).is_knocked_back());
    assert_eq!(body(&app, agent).velocity.x, -5.0);

    // 0.25s прошло → Chase снова управляет
    run(&mut app, 20);
    assert!(!fsm(&app, agent).is_knocked_back());
    assert_eq!(fsm(&app, agent).state_id(), StateId::Chase);
    assert_eq!(body(&app, agent).velocity.x, 3.0);
}

#[test]
fn test_dead_agent_stops_and_dies_once() {
    let mut app = create_app();
    spawn_target(&mut app, Vec2::new(5.0, 0.5), &[]);
    let agent = spawn_agent(&mut app, Vec2::new(0.0, 0.5), &EnemyPreset::default());

    run(&mut app, 5);
    app.world_mut().send_event(DamageDealt {
        target: agent,
        amount: 1000,
    });
    run(&mut app, 2);
    app.world_mut().send_event(DamageDealt {
        target: agent,
        amount: 10,
    });
    run(&mut app, 10);

    assert_eq!(body(&app, agent).velocity.x, 0.0);
    assert!(!fsm(&app, agent).is_knocked_back());
    assert_eq!(app.world().resource::<KillCount>().0, 1);

    let frozen = position(&app, agent);
    run(&mut app, 30);
    assert!((position(&app, agent).x - frozen.x).abs() < 1e-5);
}

#[test]
fn test_reach_signal_gates_perception() {
    let mut app = create_app();
    spawn_target(&mut app, Vec2::new(5.0, 0.5), &[]);
    let preset = EnemyPreset {
        agent: AgentConfig {
            require_reach_signal: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let agent = spawn_agent(&mut app, Vec2::new(0.0, 0.5), &preset);

    // Цель видна, но не в trigger зоне → патрулируем
    run(&mut app, 10);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Patrol);

    app.world_mut().send_event(TargetReachChanged {
        agent,
        in_reach: true,
    });
    run(&mut app, 10);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Chase);
}

#[test]
fn test_flying_agent_walks_trail_then_patrols() {
    let mut app = create_app();
    let target = spawn_target(
        &mut app,
        Vec2::new(3.0, 3.0),
        &[Vec2::new(1.0, 3.0), Vec2::new(2.0, 3.5)],
    );
    let preset = EnemyPreset {
        locomotion: LocomotionConfig::Flying(FlyingConfig::default()),
        ..Default::default()
    };
    let agent = spawn_agent(&mut app, Vec2::new(0.0, 3.0), &preset);

    run(&mut app, 2);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Chase);

    // Цель улетела за радиус обнаружения
    app.world_mut()
        .get_mut::<Transform>(target)
        .expect("target has Transform")
        .translation = Vec3::new(40.0, 3.0, 0.0);
    run(&mut app, 20);
    let episode = fsm(&app, agent).search().expect("agent should be searching");
    // Летающий — точки как есть
    assert_eq!(episode.waypoints(), &[Vec2::new(2.0, 3.5), Vec2::new(1.0, 3.0)]);

    // Обе точки достижимы → пройдено до timeout
    run(&mut app, 4 * 60);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Patrol);

    let log = &app.world().resource::<TransitionLog>().0;
    assert_eq!(log.last(), Some(&(StateId::Search, StateId::Patrol)));
}

#[test]
fn test_idle_start_falls_through_to_patrol() {
    let mut app = create_app();
    let preset = EnemyPreset {
        agent: AgentConfig {
            initial_state: StateId::Idle,
            ..Default::default()
        },
        ..Default::default()
    };
    let agent = spawn_agent(&mut app, Vec2::new(0.0, 0.5), &preset);

    run(&mut app, 2);
    assert_eq!(fsm(&app, agent).state_id(), StateId::Patrol);
    assert_eq!(
        app.world().resource::<TransitionLog>().0.first(),
        Some(&(StateId::Idle, StateId::Patrol))
    );
}

#[test]
fn test_invalid_preset_rejected_before_spawn() {
    let preset = EnemyPreset {
        agent: AgentConfig {
            raycast_interval: -1.0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(enemy_bundle(Vec2::ZERO, &preset).is_err());
}

fn patrol_direction(app: &App, agent: Entity) -> f32 {
    match app.world().get::<Archetype>(agent).expect("agent has Archetype") {
        Archetype::Ground(ground) => ground.patrol_direction,
        Archetype::Flying(flying) => flying.patrol_direction,
    }
}

#[test]
fn test_ground_patrols_turn_at_each_other() {
    let mut app = create_app();
    let left = spawn_agent(&mut app, Vec2::new(0.0, 0.5), &EnemyPreset::default());
    let right = spawn_agent(&mut app, Vec2::new(2.0, 0.5), &EnemyPreset::default());

    // Идут навстречу друг другу
    let mut archetype = app.world_mut().get_mut::<Archetype>(right).expect("agent has Archetype");
    if let Archetype::Ground(ground) = &mut *archetype {
        ground.patrol_direction = -1.0;
    }

    run(&mut app, 60);

    assert_eq!(patrol_direction(&app, left), -1.0);
    assert_eq!(patrol_direction(&app, right), 1.0);
    assert!(position(&app, left).x < position(&app, right).x);
}
