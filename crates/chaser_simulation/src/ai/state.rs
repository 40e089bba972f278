//! AI состояния: Idle / Patrol / Chase / Search
//!
//! Tagged enum вместо объектов-состояний: данные Search эпизода живут
//! внутри варианта и исчезают вместе с ним при выходе из Search.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Идентификатор состояния (без данных) для таблицы переходов, событий, конфига
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum StateId {
    /// Стоим на месте
    Idle,
    /// Не знаем о цели, патрулируем
    #[default]
    Patrol,
    /// Видим цель, преследуем
    Chase,
    /// Потеряли цель, идём по её trail
    Search,
}

impl StateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateId::Idle => "Idle",
            StateId::Patrol => "Patrol",
            StateId::Chase => "Chase",
            StateId::Search => "Search",
        }
    }
}

/// Один Search эпизод (snapshot waypoints + прогресс)
///
/// Инвариант: waypoints не меняются после `begin`, меняется только index.
/// Новый эпизод = новый вход в Search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEpisode {
    waypoints: Vec<Vec2>,
    index: usize,
    started_at: f32,
}

impl SearchEpisode {
    /// Начать эпизод. Пустой snapshot засеваем last seen позицией (если есть),
    /// чтобы у Search всегда была хотя бы одна точка.
    pub fn begin(mut waypoints: Vec<Vec2>, last_seen: Option<Vec2>, now: f32) -> Self {
        if waypoints.is_empty() {
            if let Some(point) = last_seen {
                waypoints.push(point);
            }
        }

        Self {
            waypoints,
            index: 0,
            started_at: now,
        }
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn started_at(&self) -> f32 {
        self.started_at
    }

    /// Текущий waypoint (None: пусто или пройдено)
    pub fn current(&self) -> Option<Vec2> {
        self.waypoints.get(self.index).copied()
    }

    pub fn advance(&mut self) {
        if self.index < self.waypoints.len() {
            self.index += 1;
        }
    }

    /// Все точки пройдены. Пустой эпизод не считается пройденным —
    /// он держит позицию до timeout.
    pub fn is_exhausted(&self) -> bool {
        !self.waypoints.is_empty() && self.index >= self.waypoints.len()
    }

    pub fn is_timed_out(&self, now: f32, timeout: f32) -> bool {
        now - self.started_at > timeout
    }
}

/// Текущее состояние FSM (с данными)
#[derive(Debug, Clone, PartialEq)]
pub enum AIState {
    Idle,
    Patrol,
    Chase,
    Search(SearchEpisode),
}

impl AIState {
    pub fn id(&self) -> StateId {
        match self {
            AIState::Idle => StateId::Idle,
            AIState::Patrol => StateId::Patrol,
            AIState::Chase => StateId::Chase,
            AIState::Search(_) => StateId::Search,
        }
    }

    pub fn search(&self) -> Option<&SearchEpisode> {
        match self {
            AIState::Search(episode) => Some(episode),
            _ => None,
        }
    }
}
