//! Летающий archetype
//!
//! Гравитации нет (gravity_scale = 0), AI владеет обеими осями velocity.
//! Патруль: челнок по X вокруг центра ± patrol_radius с удержанием высоты.

use bevy::prelude::*;

use super::{facing, Locomotion, Motor};
use crate::components::CollisionLayers;
use crate::config::FlyingConfig;
use crate::physics::RaycastWorld;
use crate::trail::CheckpointTrail;

/// Зазор между краем тела и началом wall probe
const PROBE_SKIN: f32 = 0.02;

#[derive(Debug, Clone)]
pub struct FlyingLocomotion {
    pub config: FlyingConfig,
    /// Центр патруля (фиксируется при входе в Patrol)
    pub center: Vec2,
    /// Направление патруля (±1)
    pub patrol_direction: f32,
}

impl FlyingLocomotion {
    pub fn new(config: FlyingConfig) -> Self {
        Self {
            config,
            center: Vec2::ZERO,
            patrol_direction: 1.0,
        }
    }

    fn fly_toward(&self, motor: &mut Motor, delta: Vec2) {
        let direction = delta.normalize_or_zero();
        motor.body.velocity = Vec2::new(
            direction.x * motor.move_speed,
            direction.y * motor.move_speed * self.config.vertical_speed_multiplier,
        );
    }
}

impl Locomotion for FlyingLocomotion {
    fn move_chase(&mut self, motor: &mut Motor, to_target: Vec2) {
        self.fly_toward(motor, to_target);
    }

    fn move_search_toward(&mut self, motor: &mut Motor, point: Vec2) {
        let delta = point - motor.position;
        self.fly_toward(motor, delta);
    }

    fn has_reached(&self, position: Vec2, point: Vec2, threshold: f32) -> bool {
        position.distance(point) <= threshold
    }

    fn on_patrol_setup(&mut self, position: Vec2) {
        let altitude = self.config.patrol_altitude.unwrap_or(position.y);
        self.center = Vec2::new(position.x, altitude);
    }

    fn move_patrol(&mut self, motor: &mut Motor) {
        let target_x = self.center.x + self.patrol_direction * self.config.patrol_radius;
        let dx = target_x - motor.position.x;

        let probe_origin = motor.position
            + Vec2::new(self.patrol_direction * (self.config.half_width + PROBE_SKIN), 0.0);
        let wall = motor
            .world
            .cast_ray(
                probe_origin,
                Vec2::new(self.patrol_direction, 0.0),
                self.config.wall_check_distance,
                CollisionLayers::OBSTACLE,
            )
            .is_some();

        if wall || dx.abs() <= motor.reach_threshold {
            self.patrol_direction = -self.patrol_direction;
            motor.body.stop_horizontal();
            return;
        }

        let vertical = (self.center.y - motor.position.y) * self.config.vertical_speed_multiplier;
        motor.body.velocity = Vec2::new(facing(dx) * motor.move_speed, vertical);
    }

    fn build_search_snapshot(
        &self,
        _position: Vec2,
        trail: &CheckpointTrail,
        _world: &dyn RaycastWorld,
    ) -> Vec<Vec2> {
        // Летаем куда угодно, trail как есть
        trail.iter_newest_first().collect()
    }
}
