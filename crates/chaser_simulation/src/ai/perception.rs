//! Перцепция: throttled line-of-sight к цели
//!
//! Ray cast дорогой → не чаще одного раза за `raycast_interval`.
//! Между сэмплами отдаём закэшированный результат, но потеря цели
//! (нет цели, вышла из радиуса) видна сразу.

use bevy::prelude::*;

use crate::components::CollisionLayers;
use crate::config::AgentConfig;
use crate::logger;
use crate::physics::RaycastWorld;

/// Состояние перцепции агента
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Perception {
    /// Результат последнего сэмпла
    pub visible: bool,
    /// Последняя позиция, где цель была видна
    pub last_seen: Option<Vec2>,
    /// Время последнего сэмпла (None: ещё не сэмплили)
    pub last_sample_time: Option<f32>,
    /// Сколько LOS лучей выпущено (диагностика throttle)
    pub raycasts: u32,
}

impl Perception {
    /// Видна ли цель.
    ///
    /// Дешёвые проверки идут каждый вызов:
    /// - нет цели или цель дальше detection_range → не видна
    ///
    /// Ray cast из глаз к цели (OBSTACLE) не чаще раза за raycast_interval,
    /// между сэмплами отдаём закэшированный `visible`:
    /// - луч попал в препятствие → не видна
    /// - иначе видна, last_seen = позиция цели
    pub fn can_see_target(
        &mut self,
        now: f32,
        position: Vec2,
        target: Option<Vec2>,
        config: &AgentConfig,
        world: &dyn RaycastWorld,
    ) -> bool {
        let Some(target) = target else {
            self.visible = false;
            return false;
        };

        if position.distance(target) > config.detection_range {
            self.visible = false;
            return false;
        }

        if let Some(last) = self.last_sample_time {
            if now - last < config.raycast_interval {
                return self.visible;
            }
        }
        self.last_sample_time = Some(now);

        let eye = position + config.eye_offset;
        let to_target = target - eye;
        let distance = to_target.length();

        self.raycasts += 1;
        let blocked = world
            .cast_ray(eye, to_target, distance, CollisionLayers::OBSTACLE)
            .is_some();

        if blocked {
            if self.visible {
                logger::log(&format!("👁️ LOS blocked at {:?}", target));
            }
            self.visible = false;
        } else {
            self.visible = true;
            self.last_seen = Some(target);
        }

        self.visible
    }

    /// Цель вне proximity зоны → невидима без ray cast'а
    pub fn mark_out_of_reach(&mut self) {
        self.visible = false;
    }
}
