//! Obstacle/ground query — ray cast против статической геометрии уровня
//!
//! Один примитив для перцепции (LOS) и для ground/wall probes archetype'ов:
//! ближайшая поверхность вдоль направления в пределах дистанции.
//!
//! Реализации:
//! - `LevelGeometry` — SystemParam поверх entity с Collider + Surface (ECS мир)
//! - `StaticSurfaces` — plain-data список (тесты, инструменты, headless прогоны без ECS)
//!
//! Используем ray cast самого Collider (parry внутри bevy_rapier2d),
//! Rapier pipeline для запросов не нужен, работает и в headless App.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::Collider;

use crate::components::{CollisionLayers, PhysicsBody, Surface};

/// Результат ray cast'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Entity поверхности (None для StaticSurfaces)
    pub entity: Option<Entity>,
    /// Точка попадания (world)
    pub point: Vec2,
    /// Дистанция от origin до точки
    pub distance: f32,
}

/// Мир, в котором можно кастовать лучи
pub trait RaycastWorld {
    /// Ближайшее попадание в поверхность из `mask` вдоль `direction` (нормализуется внутри).
    ///
    /// Нулевое направление → None.
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> Option<RayHit>;
}

/// Ray cast одного коллайдера, возвращает дистанцию до попадания
fn cast_collider(
    collider: &Collider,
    position: Vec2,
    rotation: f32,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
) -> Option<f32> {
    collider.cast_ray(position, rotation, origin, direction, max_distance, true)
}

/// Выбираем ближайшее попадание из кандидатов
fn nearest<I>(origin: Vec2, direction: Vec2, hits: I) -> Option<RayHit>
where
    I: Iterator<Item = (Option<Entity>, f32)>,
{
    hits.min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(entity, distance)| RayHit {
            entity,
            point: origin + direction * distance,
            distance,
        })
}

/// Угол поворота вокруг Z (2D)
fn rotation_z(transform: &Transform) -> f32 {
    transform.rotation.to_euler(EulerRot::ZYX).0
}

/// ECS геометрия уровня: все entity с Collider + Surface (кроме физических тел)
#[derive(SystemParam)]
pub struct LevelGeometry<'w, 's> {
    surfaces: Query<
        'w,
        's,
        (Entity, &'static Transform, &'static Collider, &'static Surface),
        Without<PhysicsBody>,
    >,
}

impl RaycastWorld for LevelGeometry<'_, '_> {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO || max_distance <= 0.0 {
            return None;
        }

        let hits = self
            .surfaces
            .iter()
            .filter(|(_, _, _, surface)| surface.layers.intersects(mask))
            .filter_map(|(entity, transform, collider, _)| {
                cast_collider(
                    collider,
                    transform.translation.truncate(),
                    rotation_z(transform),
                    origin,
                    direction,
                    max_distance,
                )
                .map(|distance| (Some(entity), distance))
            });

        nearest(origin, direction, hits)
    }
}

/// Одна статическая поверхность (без ECS)
#[derive(Clone)]
pub struct StaticSurface {
    pub collider: Collider,
    pub position: Vec2,
    pub rotation: f32,
    pub layers: CollisionLayers,
}

/// Список статических поверхностей
#[derive(Clone, Default)]
pub struct StaticSurfaces {
    pub surfaces: Vec<StaticSurface>,
}

impl StaticSurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить axis-aligned прямоугольник (центр + half extents)
    pub fn with_box(mut self, center: Vec2, half_extents: Vec2, layers: CollisionLayers) -> Self {
        self.surfaces.push(StaticSurface {
            collider: Collider::cuboid(half_extents.x, half_extents.y),
            position: center,
            rotation: 0.0,
            layers,
        });
        self
    }
}

impl RaycastWorld for StaticSurfaces {
    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionLayers,
    ) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO || max_distance <= 0.0 {
            return None;
        }

        let hits = self
            .surfaces
            .iter()
            .filter(|surface| surface.layers.intersects(mask))
            .filter_map(|surface| {
                cast_collider(
                    &surface.collider,
                    surface.position,
                    surface.rotation,
                    origin,
                    direction,
                    max_distance,
                )
                .map(|distance| (None, distance))
            });

        nearest(origin, direction, hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_and_wall() -> StaticSurfaces {
        StaticSurfaces::new()
            // Пол: верхняя грань на y = 0
            .with_box(Vec2::new(0.0, -0.5), Vec2::new(50.0, 0.5), CollisionLayers::GROUND)
            // Стена на x = 5..6
            .with_box(Vec2::new(5.5, 2.0), Vec2::new(0.5, 2.0), CollisionLayers::OBSTACLE)
    }

    #[test]
    fn test_ray_hits_floor_below() {
        let world = floor_and_wall();
        let hit = world
            .cast_ray(Vec2::new(0.0, 3.0), Vec2::NEG_Y, 10.0, CollisionLayers::GROUND)
            .expect("floor below");

        assert!((hit.distance - 3.0).abs() < 1e-3, "distance = {}", hit.distance);
        assert!(hit.point.y.abs() < 1e-3);
    }

    #[test]
    fn test_ray_respects_layer_mask() {
        let world = floor_and_wall();

        // Стена только OBSTACLE — ground mask её не видит
        assert!(world
            .cast_ray(Vec2::new(0.0, 1.0), Vec2::X, 10.0, CollisionLayers::GROUND)
            .is_none());

        let hit = world
            .cast_ray(Vec2::new(0.0, 1.0), Vec2::X, 10.0, CollisionLayers::OBSTACLE)
            .expect("wall ahead");
        assert!((hit.distance - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_ray_respects_max_distance() {
        let world = floor_and_wall();
        assert!(world
            .cast_ray(Vec2::new(0.0, 1.0), Vec2::X, 4.0, CollisionLayers::OBSTACLE)
            .is_none());
    }

    #[test]
    fn test_zero_direction_never_hits() {
        let world = floor_and_wall();
        assert!(world
            .cast_ray(Vec2::new(0.0, 1.0), Vec2::ZERO, 10.0, CollisionLayers::SOLID)
            .is_none());
    }
}
