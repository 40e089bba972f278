//! Checkpoint trail — ограниченная история позиций цели
//!
//! Producer: цель (игрок) периодически пишет свою позицию (TrailRecorder).
//! Consumer: AI агенты при входе в Search копируют trail в свой SearchEpisode.
//! Агенты trail не мутируют, только читают snapshot.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::ai::AISet;

/// Bounded trail позиций цели (oldest evicted, newest — последний)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct CheckpointTrail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Default for CheckpointTrail {
    fn default() -> Self {
        Self::new(16)
    }
}

impl CheckpointTrail {
    /// capacity == 0 поднимается до 1 (trail без места бессмысленен)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Последняя записанная позиция
    pub fn latest(&self) -> Option<Vec2> {
        self.points.back().copied()
    }

    /// Добавить позицию; при переполнении выкидываем самую старую
    pub fn push(&mut self, point: Vec2) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Oldest → newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }

    /// Newest → oldest (порядок обхода для Search)
    pub fn iter_newest_first(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().rev().copied()
    }
}

/// Периодическая запись позиции цели в CheckpointTrail
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TrailRecorder {
    /// Интервал записи (секунды)
    pub interval: f32,
    /// Не пишем точку, если цель сдвинулась меньше чем на min_spacing
    pub min_spacing: f32,
    /// Время последней записи
    pub last_record: Option<f32>,
}

impl Default for TrailRecorder {
    fn default() -> Self {
        Self {
            interval: 0.5,
            min_spacing: 0.1,
            last_record: None,
        }
    }
}

impl TrailRecorder {
    /// Записать позицию если прошёл интервал. true — точка добавлена.
    pub fn record(&mut self, now: f32, position: Vec2, trail: &mut CheckpointTrail) -> bool {
        if let Some(last) = self.last_record {
            if now - last < self.interval {
                return false;
            }
        }
        self.last_record = Some(now);

        let too_close = trail
            .latest()
            .is_some_and(|latest| latest.distance(position) < self.min_spacing);
        if too_close {
            return false;
        }

        trail.push(position);
        true
    }
}

/// Система: запись trail для всех целей с TrailRecorder
pub fn record_checkpoint_trail(
    time: Res<Time>,
    mut query: Query<(&Transform, &mut TrailRecorder, &mut CheckpointTrail)>,
) {
    let now = time.elapsed_secs();

    for (transform, mut recorder, mut trail) in query.iter_mut() {
        recorder.record(now, transform.translation.truncate(), &mut trail);
    }
}

/// Trail Plugin: producer работает в logic pass до AI (snapshot видит свежую точку)
pub struct TrailPlugin;

impl Plugin for TrailPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, record_checkpoint_trail.before(AISet::Logic));
    }
}
