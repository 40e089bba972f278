//! Headless симуляция CHASER
//!
//! Уровень с платформой и стеной, блуждающая цель (seeded RNG),
//! один наземный и один летающий преследователь. Печатает смены состояний.

use bevy::prelude::*;
use rand::Rng;

use chaser_simulation::config::{EnemyPreset, FlyingConfig, LocomotionConfig};
use chaser_simulation::physics::kinematic_body_bundle;
use chaser_simulation::{
    create_headless_app, spawn_enemy, surface_bundle, AIStateChanged, CheckpointTrail, DamageDealt,
    DeterministicRng, KinematicController, PhysicsBody, SimulationPlugin, Surface, Target, TrailRecorder,
};

const TICKS: usize = 1200;
const DAMAGE_TICK: usize = 600;

/// Блуждание цели: новое направление раз в `interval` секунд
#[derive(Component)]
struct Wander {
    speed: f32,
    interval: f32,
    next_turn: f32,
}

fn wander_target(
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    mut query: Query<(&mut Wander, &mut PhysicsBody)>,
) {
    let now = time.elapsed_secs();

    for (mut wander, mut body) in query.iter_mut() {
        if now < wander.next_turn {
            continue;
        }
        wander.next_turn = now + wander.interval;
        let direction: f32 = rng.rng.gen_range(-1.0..=1.0);
        body.velocity.x = direction * wander.speed;
    }
}

#[derive(Resource, Default)]
struct StateLog {
    changes: usize,
}

fn report_state_changes(mut events: EventReader<AIStateChanged>, mut log: ResMut<StateLog>) {
    for event in events.read() {
        log.changes += 1;
        println!("  {:?}: {:?} → {:?}", event.entity, event.from, event.to);
    }
}

fn spawn_level(commands: &mut Commands) {
    // Пол
    commands.spawn(surface_bundle(Vec2::new(0.0, -0.5), Vec2::new(30.0, 0.5), Surface::solid()));
    // Стены по краям
    commands.spawn(surface_bundle(Vec2::new(-30.5, 5.0), Vec2::new(0.5, 5.0), Surface::solid()));
    commands.spawn(surface_bundle(Vec2::new(30.5, 5.0), Vec2::new(0.5, 5.0), Surface::solid()));
    // Колонна посередине (ломает LOS)
    commands.spawn(surface_bundle(Vec2::new(4.0, 1.5), Vec2::new(0.5, 1.5), Surface::obstacle()));
    // Платформа
    commands.spawn(surface_bundle(Vec2::new(-8.0, 2.25), Vec2::new(3.0, 0.25), Surface::solid()));
}

fn main() {
    let seed = 42;
    println!("Starting CHASER headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(DeterministicRng::new(seed))
        .init_resource::<StateLog>()
        .add_systems(Update, (wander_target, report_state_changes));

    let ground_preset = EnemyPreset::default();
    let flying_preset = EnemyPreset {
        locomotion: LocomotionConfig::Flying(FlyingConfig {
            patrol_altitude: Some(4.0),
            ..Default::default()
        }),
        ..Default::default()
    };

    let spawned = {
        let world = app.world_mut();
        let spawned = {
            let mut commands = world.commands();
            spawn_level(&mut commands);

            commands.spawn((
                Target,
                CheckpointTrail::new(16),
                TrailRecorder::default(),
                Wander {
                    speed: 2.5,
                    interval: 1.5,
                    next_turn: 0.0,
                },
                kinematic_body_bundle(Vec2::new(8.0, 0.5), PhysicsBody::default(), KinematicController::default()),
            ));

            let ground = spawn_enemy(&mut commands, Vec2::new(-2.0, 0.5), &ground_preset);
            let flying = spawn_enemy(&mut commands, Vec2::new(12.0, 4.0), &flying_preset);
            ground.and_then(|ground| flying.map(|flying| (ground, flying)))
        };
        world.flush();
        spawned
    };

    let (ground, _flying) = match spawned {
        Ok(entities) => entities,
        Err(err) => {
            eprintln!("Invalid enemy preset: {}", err);
            std::process::exit(1);
        }
    };

    for tick in 0..TICKS {
        if tick == DAMAGE_TICK {
            app.world_mut().send_event(DamageDealt {
                target: ground,
                amount: 10,
            });
        }

        app.update();

        if tick % 200 == 0 {
            println!("Tick {}:", tick);
            for agent in chaser_simulation::agents_snapshot(app.world_mut()) {
                println!("  #{} {:?} at ({:.2}, {:.2})", agent.index, agent.state, agent.position.x, agent.position.y);
            }
        }
    }

    let changes = app.world().resource::<StateLog>().changes;
    println!("Simulation complete! {} state changes", changes);
}
