//! Knockback interrupt
//!
//! Псевдо-состояние поверх FSM: пока таймер > 0, physics pass агента
//! только тикает таймер и не трогает velocity (импульс + гравитация).

use bevy::prelude::*;

use crate::config::KnockbackConfig;

/// Активный knockback (оставшееся время)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Knockback {
    pub remaining: f32,
}

impl Knockback {
    /// Новый knockback; duration == 0 → None (импульс без захвата velocity)
    pub fn start(config: &KnockbackConfig) -> Option<Self> {
        (config.duration > 0.0).then_some(Self {
            remaining: config.duration,
        })
    }

    /// Тик таймера. true: knockback всё ещё активен.
    pub fn tick(&mut self, delta: f32) -> bool {
        self.remaining -= delta;
        self.remaining > 0.0
    }
}

/// Импульс от цели: горизонталь от цели + вверх.
///
/// Без цели только вертикальная составляющая.
/// Агент ровно над целью отлетает вправо (+X).
pub fn knockback_impulse(agent: Vec2, target: Option<Vec2>, config: &KnockbackConfig) -> Vec2 {
    match target {
        Some(target) => {
            let away = if agent.x >= target.x { 1.0 } else { -1.0 };
            Vec2::new(away * config.horizontal_force, config.vertical_force)
        }
        None => Vec2::new(0.0, config.vertical_force),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_away_from_target() {
        let config = KnockbackConfig::default();

        let left = knockback_impulse(Vec2::new(-1.0, 0.0), Some(Vec2::new(2.0, 0.0)), &config);
        assert_eq!(left, Vec2::new(-5.0, 4.0));

        let right = knockback_impulse(Vec2::new(3.0, 0.0), Some(Vec2::new(2.0, 5.0)), &config);
        assert_eq!(right, Vec2::new(5.0, 4.0));
    }

    #[test]
    fn test_impulse_without_target_is_vertical() {
        let config = KnockbackConfig::default();
        assert_eq!(knockback_impulse(Vec2::ZERO, None, &config), Vec2::new(0.0, 4.0));
    }

    #[test]
    fn test_knockback_countdown() {
        let config = KnockbackConfig {
            duration: 0.25,
            ..Default::default()
        };
        let mut knockback = Knockback::start(&config).expect("positive duration");

        assert!(knockback.tick(0.1));
        assert!(knockback.tick(0.1));
        assert!(!knockback.tick(0.1)); // 0.25 - 0.3 < 0 → завершён
    }

    #[test]
    fn test_zero_duration_no_interrupt() {
        let config = KnockbackConfig {
            duration: 0.0,
            ..Default::default()
        };
        assert!(Knockback::start(&config).is_none());
    }
}
