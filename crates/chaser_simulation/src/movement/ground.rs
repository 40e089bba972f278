//! Наземный archetype
//!
//! Горизонталь задаёт AI, вертикаль — гравитация (KinematicController).
//! Патруль: идём вперёд, разворот на обрыве, у стены или перед другим врагом (с cooldown,
//! иначе на краю агент дёргается туда-сюда каждый шаг).

use bevy::prelude::*;

use super::{facing, Locomotion, Motor};
use crate::components::CollisionLayers;
use crate::config::GroundConfig;
use crate::logger;
use crate::physics::RaycastWorld;
use crate::trail::CheckpointTrail;

/// Стартовая высота луча проекции над checkpoint'ом
const PROJECTION_LIFT: f32 = 0.1;

/// Разница высот, при которой другой враг ещё загораживает проход
const CROWD_HEIGHT: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct GroundLocomotion {
    pub config: GroundConfig,
    /// Направление патруля (±1)
    pub patrol_direction: f32,
    /// Время последнего разворота
    pub last_flip: Option<f32>,
}

impl GroundLocomotion {
    pub fn new(config: GroundConfig) -> Self {
        Self {
            config,
            patrol_direction: 1.0,
            last_flip: None,
        }
    }

    fn flip_ready(&self, now: f32) -> bool {
        self.last_flip
            .is_none_or(|last| now - last >= self.config.flip_cooldown)
    }

    fn flip(&mut self, now: f32) {
        self.patrol_direction = -self.patrol_direction;
        self.last_flip = Some(now);
    }

    /// Есть ли пол перед ногами
    fn ground_ahead(&self, position: Vec2, world: &dyn RaycastWorld) -> bool {
        let origin = position
            + Vec2::new(
                self.patrol_direction * self.config.front_offset,
                -self.config.feet_offset,
            );
        world
            .cast_ray(origin, Vec2::NEG_Y, self.config.ground_check_distance, CollisionLayers::GROUND)
            .is_some()
    }

    /// Стена прямо перед агентом
    fn wall_ahead(&self, position: Vec2, world: &dyn RaycastWorld) -> bool {
        let origin = position + Vec2::new(self.patrol_direction * self.config.front_offset, 0.0);
        world
            .cast_ray(
                origin,
                Vec2::new(self.patrol_direction, 0.0),
                self.config.wall_check_distance,
                CollisionLayers::OBSTACLE,
            )
            .is_some()
    }

    /// Другой враг вплотную впереди
    fn enemy_ahead(&self, position: Vec2, crowd: &[Vec2]) -> bool {
        let reach = self.config.front_offset + self.config.wall_check_distance;
        crowd.iter().any(|other| {
            let ahead = (other.x - position.x) * self.patrol_direction;
            ahead > 0.0 && ahead <= reach && (other.y - position.y).abs() < CROWD_HEIGHT
        })
    }
}

impl Locomotion for GroundLocomotion {
    fn move_chase(&mut self, motor: &mut Motor, to_target: Vec2) {
        motor.body.velocity.x = facing(to_target.x) * motor.move_speed;
    }

    fn move_search_toward(&mut self, motor: &mut Motor, point: Vec2) {
        motor.body.velocity.x = facing(point.x - motor.position.x) * motor.move_speed;
    }

    fn has_reached(&self, position: Vec2, point: Vec2, threshold: f32) -> bool {
        (point.x - position.x).abs() <= threshold
    }

    fn on_patrol_setup(&mut self, _position: Vec2) {
        // Продолжаем в текущем направлении
    }

    fn move_patrol(&mut self, motor: &mut Motor) {
        let blocked = !self.ground_ahead(motor.position, motor.world)
            || self.wall_ahead(motor.position, motor.world)
            || self.enemy_ahead(motor.position, motor.crowd);

        if blocked && self.flip_ready(motor.now) {
            self.flip(motor.now);
            return;
        }

        motor.body.velocity.x = self.patrol_direction * motor.move_speed;
    }

    fn build_search_snapshot(
        &self,
        position: Vec2,
        trail: &CheckpointTrail,
        world: &dyn RaycastWorld,
    ) -> Vec<Vec2> {
        let mut waypoints = Vec::with_capacity(trail.len());

        for checkpoint in trail.iter_newest_first() {
            // Слишком высоко, не допрыгнем
            if checkpoint.y - position.y > self.config.step_tolerance {
                continue;
            }

            let start = checkpoint + Vec2::new(0.0, PROJECTION_LIFT);
            let projected = match world.cast_ray(
                start,
                Vec2::NEG_Y,
                self.config.projection_distance,
                CollisionLayers::GROUND,
            ) {
                Some(hit) => hit.point,
                // Пола под точкой нет, идём по X на своей высоте
                None => Vec2::new(checkpoint.x, position.y),
            };
            waypoints.push(projected);
        }

        if waypoints.len() < trail.len() {
            logger::log(&format!(
                "🚶 Ground snapshot: {} of {} checkpoints reachable",
                waypoints.len(),
                trail.len()
            ));
        }

        waypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::PhysicsBody;
    use crate::physics::StaticSurfaces;

    /// Пол (верх y = 0) от x = -5 до x = 5
    fn ledge() -> StaticSurfaces {
        StaticSurfaces::new().with_box(Vec2::new(0.0, -0.5), Vec2::new(5.0, 0.5), CollisionLayers::SOLID)
    }

    fn motor<'a>(now: f32, position: Vec2, body: &'a mut PhysicsBody, world: &'a StaticSurfaces) -> Motor<'a> {
        Motor {
            now,
            position,
            body,
            move_speed: 3.0,
            reach_threshold: 0.25,
            world,
            crowd: &[],
        }
    }

    #[test]
    fn test_patrol_walks_forward_on_floor() {
        let world = ledge();
        let mut body = PhysicsBody::default();
        let mut ground = GroundLocomotion::new(GroundConfig::default());

        ground.move_patrol(&mut motor(0.0, Vec2::new(0.0, 0.5), &mut body, &world));

        assert_eq!(body.velocity.x, 3.0);
        assert_eq!(ground.patrol_direction, 1.0);
    }

    #[test]
    fn test_patrol_flips_at_ledge() {
        let world = ledge();
        let mut body = PhysicsBody::default();
        let mut ground = GroundLocomotion::new(GroundConfig::default());

        // Ground probe на x = 4.9 + 0.4 → за краем пола
        ground.move_patrol(&mut motor(1.0, Vec2::new(4.9, 0.5), &mut body, &world));
        assert_eq!(ground.patrol_direction, -1.0);
        assert_eq!(ground.last_flip, Some(1.0));
    }

    #[test]
    fn test_flip_respects_cooldown() {
        let world = ledge().with_box(Vec2::new(-4.5, 1.0), Vec2::new(0.1, 1.0), CollisionLayers::OBSTACLE);
        let mut body = PhysicsBody::default();
        let mut ground = GroundLocomotion::new(GroundConfig::default());

        // Обрыв справа → разворот
        ground.move_patrol(&mut motor(1.0, Vec2::new(4.9, 0.5), &mut body, &world));
        assert_eq!(ground.patrol_direction, -1.0);

        // Сразу снова "обрыв" (cooldown 0.12 ещё не прошёл) → идём, не дёргаемся
        ground.patrol_direction = 1.0;
        ground.move_patrol(&mut motor(1.05, Vec2::new(4.9, 0.5), &mut body, &world));
        assert_eq!(ground.patrol_direction, 1.0);
        assert_eq!(body.velocity.x, 3.0);

        // После cooldown разворот
        ground.move_patrol(&mut motor(1.2, Vec2::new(4.9, 0.5), &mut body, &world));
        assert_eq!(ground.patrol_direction, -1.0);
    }

    #[test]
    fn test_patrol_flips_at_wall() {
        // Стена x = -4.6..-4.4, агент смотрит влево в 0.5 от неё
        let world = ledge().with_box(Vec2::new(-4.5, 1.0), Vec2::new(0.1, 1.0), CollisionLayers::OBSTACLE);
        let mut body = PhysicsBody::default();
        let mut ground = GroundLocomotion::new(GroundConfig::default());
        ground.patrol_direction = -1.0;

        ground.move_patrol(&mut motor(0.0, Vec2::new(-3.8, 0.5), &mut body, &world));
        assert_eq!(ground.patrol_direction, 1.0);
    }

    #[test]
    fn test_chase_sets_horizontal_only() {
        let world = ledge();
        let mut body = PhysicsBody {
            velocity: Vec2::new(0.0, -2.0),
            ..Default::default()
        };
        let mut ground = GroundLocomotion::new(GroundConfig::default());

        ground.move_chase(&mut motor(0.0, Vec2::ZERO, &mut body, &world), Vec2::new(-4.0, 3.0));
        assert_eq!(body.velocity, Vec2::new(-3.0, -2.0));
    }

    #[test]
    fn test_reach_is_horizontal() {
        let ground = GroundLocomotion::new(GroundConfig::default());
        assert!(ground.has_reached(Vec2::new(1.0, 0.0), Vec2::new(1.2, 5.0), 0.25));
        assert!(!ground.has_reached(Vec2::new(1.0, 0.0), Vec2::new(1.3, 0.0), 0.25));
    }

    #[test]
    fn test_snapshot_skips_high_checkpoints_and_projects() {
        // Платформа x = 2..4, верх y = 2 (над полом)
        let world = ledge().with_box(Vec2::new(3.0, 1.75), Vec2::new(1.0, 0.25), CollisionLayers::SOLID);
        let ground = GroundLocomotion::new(GroundConfig::default());

        let mut trail = CheckpointTrail::new(8);
        trail.push(Vec2::new(-1.0, 0.9)); // oldest: чуть выше пола → проекция на пол
        trail.push(Vec2::new(3.0, 2.5)); // на платформе, 2.0 выше агента → пропуск
        trail.push(Vec2::new(1.0, 0.5)); // newest

        let snapshot = ground.build_search_snapshot(Vec2::new(0.0, 0.5), &trail, &world);

        assert_eq!(snapshot.len(), 2);
        assert!((snapshot[0] - Vec2::new(1.0, 0.0)).length() < 1e-3);
        assert!((snapshot[1] - Vec2::new(-1.0, 0.0)).length() < 1e-3);
        // Trail не тронут
        assert_eq!(trail.len(), 3);
    }

    #[test]
    fn test_snapshot_falls_back_to_agent_height() {
        // Пол кончается на x = 5; точка над пропастью
        let world = ledge();
        let ground = GroundLocomotion::new(GroundConfig::default());
        let mut trail = CheckpointTrail::new(4);
        trail.push(Vec2::new(8.0, 0.5));

        let snapshot = ground.build_search_snapshot(Vec2::new(0.0, 0.5), &trail, &world);
        assert_eq!(snapshot, vec![Vec2::new(8.0, 0.5)]);
    }

    #[test]
    fn test_patrol_flips_before_other_enemy() {
        let world = ledge();
        let mut body = PhysicsBody::default();
        let mut ground = GroundLocomotion::new(GroundConfig::default());

        // Сосед сзади и сосед на другой высоте не мешают
        let crowd = [Vec2::new(-0.6, 0.5), Vec2::new(0.6, 3.0)];
        let mut step = motor(0.0, Vec2::new(0.0, 0.5), &mut body, &world);
        step.crowd = &crowd;
        ground.move_patrol(&mut step);
        assert_eq!(ground.patrol_direction, 1.0);
        assert_eq!(body.velocity.x, 3.0);

        // Сосед вплотную впереди → разворот
        let crowd = [Vec2::new(0.6, 0.5)];
        let mut step = motor(1.0, Vec2::new(0.0, 0.5), &mut body, &world);
        step.crowd = &crowd;
        ground.move_patrol(&mut step);
        assert_eq!(ground.patrol_direction, -1.0);
        assert_eq!(ground.last_flip, Some(1.0));
    }
}
