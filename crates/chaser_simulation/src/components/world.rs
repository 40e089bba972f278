//! World компоненты: поверхности уровня и их collision layers

use bevy::prelude::*;
use bitflags::bitflags;

bitflags! {
    /// Collision layers поверхностей уровня
    ///
    /// GROUND — по чему можно ходить (ground probe, проекция checkpoint'ов)
    /// OBSTACLE — что блокирует взгляд и движение (LOS, wall probe)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        const GROUND = 1 << 0;
        const OBSTACLE = 1 << 1;
        const SOLID = Self::GROUND.bits() | Self::OBSTACLE.bits();
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::SOLID
    }
}

/// Статическая поверхность уровня (пол, стена, платформа)
///
/// Геометрия — bevy_rapier2d Collider на том же entity, позиция — Transform.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Surface {
    pub layers: CollisionLayers,
}

impl Surface {
    pub fn ground() -> Self {
        Self { layers: CollisionLayers::GROUND }
    }

    pub fn obstacle() -> Self {
        Self { layers: CollisionLayers::OBSTACLE }
    }

    pub fn solid() -> Self {
        Self { layers: CollisionLayers::SOLID }
    }
}
