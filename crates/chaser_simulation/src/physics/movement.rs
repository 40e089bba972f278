//! Kinematic контроллер для агентов и цели (2D)
//!
//! Архитектура:
//! - Rapier для геометрии (Collider на статике, ray cast через parry)
//! - Custom velocity integration (не используем Rapier forces)
//! - Gravity + ground snap + wall clamp через ray cast'ы
//!
//! Детерминизм: fixed timestep (60Hz), enhanced-determinism parry

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::query::{LevelGeometry, RaycastWorld};
use crate::ai::AISet;
use crate::components::{CollisionLayers, PhysicsBody};

/// Допуск ground check под ногами (чтобы стоящий агент оставался grounded)
const GROUND_SKIN: f32 = 0.05;

/// Kinematic контроллер компонент
///
/// Тело: axis-aligned прямоугольник half_extents вокруг Transform.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct KinematicController {
    /// Полуразмеры тела
    pub half_extents: Vec2,
    /// Ускорение свободного падения (units/s², умножается на gravity_scale)
    pub gravity: f32,
    /// Стоит ли на GROUND поверхности
    pub grounded: bool,
}

impl Default for KinematicController {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(0.25, 0.5),
            gravity: -20.0,
            grounded: false,
        }
    }
}

/// Гравитация для одного тела (grounded и летающие без изменений)
pub fn gravity_step(controller: &KinematicController, body: &mut PhysicsBody, delta: f32) {
    if controller.grounded || body.gravity_scale == 0.0 {
        return;
    }
    body.velocity.y += controller.gravity * body.gravity_scale * delta;
}

/// Перемещение тела на velocity * delta с учётом геометрии.
///
/// Горизонталь: стена (OBSTACLE) обрезает шаг и гасит vx.
/// Вертикаль вниз: пол (GROUND) ставит тело на поверхность, grounded = true.
/// Вертикаль вверх: потолок (SOLID) гасит vy.
pub fn move_and_collide(
    position: Vec2,
    body: &mut PhysicsBody,
    controller: &mut KinematicController,
    delta: f32,
    world: &dyn RaycastWorld,
) -> Vec2 {
    let half = controller.half_extents;
    let mut next = position;

    // Горизонталь
    let dx = body.velocity.x * delta;
    if dx != 0.0 {
        let direction = Vec2::new(dx.signum(), 0.0);
        match world.cast_ray(next, direction, half.x + dx.abs(), CollisionLayers::OBSTACLE) {
            Some(hit) => {
                next.x += direction.x * (hit.distance - half.x).max(0.0);
                body.velocity.x = 0.0;
            }
            None => next.x += dx,
        }
    }

    // Вертикаль
    let dy = body.velocity.y * delta;
    if dy <= 0.0 {
        let reach = half.y + dy.abs() + GROUND_SKIN;
        match world.cast_ray(next, Vec2::NEG_Y, reach, CollisionLayers::GROUND) {
            Some(hit) => {
                next.y = hit.point.y + half.y;
                body.velocity.y = body.velocity.y.max(0.0);
                controller.grounded = true;
            }
            None => {
                next.y += dy;
                controller.grounded = false;
            }
        }
    } else {
        controller.grounded = false;
        match world.cast_ray(next, Vec2::Y, half.y + dy, CollisionLayers::SOLID) {
            Some(hit) => {
                next.y += (hit.distance - half.y).max(0.0);
                body.velocity.y = 0.0;
            }
            None => next.y += dy,
        }
    }

    next
}

/// Система применения gravity к velocity
///
/// Работает в FixedUpdate после AI physics pass.
pub fn apply_gravity(
    mut query: Query<(&KinematicController, &mut PhysicsBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (controller, mut body) in query.iter_mut() {
        gravity_step(controller, &mut body, delta);
    }
}

/// Система интеграции velocity → Transform (с коллизиями по статике)
pub fn integrate_velocity_to_transform(
    mut query: Query<(&mut PhysicsBody, &mut KinematicController, &mut Transform)>,
    geometry: LevelGeometry,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut body, mut controller, mut transform) in query.iter_mut() {
        let position = transform.translation.truncate();
        let next = move_and_collide(position, &mut body, &mut controller, delta, &geometry);
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

/// Plugin для kinematic контроллера
///
/// AI пишет velocity в AISet::Physics, затем gravity + интеграция.
pub struct KinematicControllerPlugin;

impl Plugin for KinematicControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (apply_gravity, integrate_velocity_to_transform)
                .chain()
                .after(AISet::Physics),
        );
    }
}

/// Spawn helper для kinematic тела
///
/// Transform + PhysicsBody + KinematicController + Rapier (RigidBody + Collider)
/// — с RapierPhysicsPlugin тело участвует в коллизиях хоста.
pub fn kinematic_body_bundle(
    position: Vec2,
    body: PhysicsBody,
    controller: KinematicController,
) -> impl Bundle {
    (
        Transform::from_translation(position.extend(0.0)),
        body,
        controller,
        RigidBody::KinematicPositionBased,
        Collider::cuboid(controller.half_extents.x, controller.half_extents.y),
    )
}
