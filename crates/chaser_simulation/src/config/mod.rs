//! Конфигурация агентов (tuning + валидация)
//!
//! Defaults подобраны под уровень в метрах (1 unit = 1 м).
//! Пресеты грузятся из RON; кривой конфиг отклоняется при создании агента,
//! а не во время тика.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::StateId;

/// Ошибки конфигурации агента
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be > 0 (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be >= 0 (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("failed to parse preset: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    // `!(value > 0.0)` ловит и NaN
    if !(value > 0.0) {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value >= 0.0) {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

/// Параметры knockback interrupt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct KnockbackConfig {
    /// Горизонтальная скорость импульса (от цели)
    pub horizontal_force: f32,
    /// Вертикальная скорость импульса (вверх)
    pub vertical_force: f32,
    /// Сколько секунд импульс владеет velocity
    pub duration: f32,
}

impl Default for KnockbackConfig {
    fn default() -> Self {
        Self {
            horizontal_force: 5.0,
            vertical_force: 4.0,
            duration: 0.25,
        }
    }
}

/// Общие параметры AI агента (не зависят от archetype)
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct AgentConfig {
    /// Скорость движения (units/sec)
    pub move_speed: f32,
    /// Радиус обнаружения цели
    pub detection_range: f32,
    /// Смещение "глаз" от позиции агента (origin луча LOS)
    pub eye_offset: Vec2,
    /// Минимальный интервал между LOS ray cast'ами (секунды)
    pub raycast_interval: f32,
    /// Порог достижения waypoint'а
    pub reach_threshold: f32,
    /// Максимальная длительность Search эпизода (секунды)
    pub search_timeout: f32,
    /// Стартовое состояние FSM
    pub initial_state: StateId,
    /// Перцепция работает только пока цель в trigger-зоне (TargetProximity)
    pub require_reach_signal: bool,
    pub knockback: KnockbackConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            detection_range: 10.0,
            eye_offset: Vec2::new(0.0, 0.25),
            raycast_interval: 0.12,
            reach_threshold: 0.25,
            search_timeout: 8.0,
            initial_state: StateId::Patrol,
            require_reach_signal: false,
            knockback: KnockbackConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("move_speed", self.move_speed)?;
        require_positive("detection_range", self.detection_range)?;
        require_non_negative("raycast_interval", self.raycast_interval)?;
        require_positive("reach_threshold", self.reach_threshold)?;
        require_positive("search_timeout", self.search_timeout)?;
        require_non_negative("knockback.horizontal_force", self.knockback.horizontal_force)?;
        require_non_negative("knockback.vertical_force", self.knockback.vertical_force)?;
        require_non_negative("knockback.duration", self.knockback.duration)?;
        Ok(())
    }
}

/// Параметры наземного archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct GroundConfig {
    /// Смещение probe'ов вперёд от центра
    pub front_offset: f32,
    /// Высота "ног" под центром (origin ground probe)
    pub feet_offset: f32,
    /// Длина ground probe вниз
    pub ground_check_distance: f32,
    /// Длина wall probe вперёд
    pub wall_check_distance: f32,
    /// Минимальная пауза между разворотами (секунды)
    pub flip_cooldown: f32,
    /// Насколько выше агента checkpoint ещё считается достижимым
    pub step_tolerance: f32,
    /// Длина луча проекции checkpoint'а на пол
    pub projection_distance: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            front_offset: 0.4,
            feet_offset: 0.4,
            ground_check_distance: 0.8,
            wall_check_distance: 0.35,
            flip_cooldown: 0.12,
            step_tolerance: 0.6,
            projection_distance: 6.0,
        }
    }
}

impl GroundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("ground.front_offset", self.front_offset)?;
        require_non_negative("ground.feet_offset", self.feet_offset)?;
        require_positive("ground.ground_check_distance", self.ground_check_distance)?;
        require_positive("ground.wall_check_distance", self.wall_check_distance)?;
        require_non_negative("ground.flip_cooldown", self.flip_cooldown)?;
        require_non_negative("ground.step_tolerance", self.step_tolerance)?;
        require_positive("ground.projection_distance", self.projection_distance)?;
        Ok(())
    }
}

/// Параметры летающего archetype
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct FlyingConfig {
    /// Горизонтальный радиус патруля вокруг центра
    pub patrol_radius: f32,
    /// Множитель вертикальной скорости (chase/search + коррекция высоты)
    pub vertical_speed_multiplier: f32,
    /// Длина wall probe вперёд (от края тела)
    pub wall_check_distance: f32,
    /// Полуширина тела (wall probe стартует от края)
    pub half_width: f32,
    /// Высота патруля; None: высота в момент входа в Patrol
    pub patrol_altitude: Option<f32>,
}

impl Default for FlyingConfig {
    fn default() -> Self {
        Self {
            patrol_radius: 5.0,
            vertical_speed_multiplier: 1.0,
            wall_check_distance: 0.15,
            half_width: 0.25,
            patrol_altitude: None,
        }
    }
}

impl FlyingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("flying.patrol_radius", self.patrol_radius)?;
        require_non_negative("flying.vertical_speed_multiplier", self.vertical_speed_multiplier)?;
        require_positive("flying.wall_check_distance", self.wall_check_distance)?;
        require_non_negative("flying.half_width", self.half_width)?;
        Ok(())
    }
}

/// Конфиг locomotion (какой archetype + его параметры)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LocomotionConfig {
    Ground(GroundConfig),
    Flying(FlyingConfig),
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self::Ground(GroundConfig::default())
    }
}

impl LocomotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            LocomotionConfig::Ground(ground) => ground.validate(),
            LocomotionConfig::Flying(flying) => flying.validate(),
        }
    }
}

/// Полный пресет врага (RON файл)
///
/// ```ron
/// (
///     agent: (move_speed: 4.0, search_timeout: 6.0),
///     locomotion: Flying((patrol_radius: 3.0)),
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyPreset {
    pub agent: AgentConfig,
    pub locomotion: LocomotionConfig,
}

impl EnemyPreset {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agent.validate()?;
        self.locomotion.validate()
    }

    /// Парсинг + валидация RON пресета
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let preset: EnemyPreset = ron::from_str(source)?;
        preset.validate()?;
        Ok(preset)
    }
}
