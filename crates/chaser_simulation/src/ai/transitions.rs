//! Таблица переходов FSM
//!
//! Декларативно: для каждого состояния упорядоченный список (condition → target).
//! Первое сработавшее условие побеждает. Условия читают только `WorldSnapshot`
//! (значения, не ссылки на агента), поэтому таблица тестируется без ECS.

use super::state::{AIState, StateId};

/// Снимок мира для оценки условий (один тик логики)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldSnapshot {
    /// Результат перцепции в этом тике
    pub target_visible: bool,
    /// Search: все waypoints пройдены
    pub search_exhausted: bool,
    /// Search: эпизод длится дольше timeout
    pub search_timed_out: bool,
}

impl WorldSnapshot {
    /// Снимок для текущего состояния (поля Search заполняются только в Search)
    pub fn capture(state: &AIState, target_visible: bool, now: f32, search_timeout: f32) -> Self {
        let (search_exhausted, search_timed_out) = match state.search() {
            Some(episode) => (
                episode.is_exhausted(),
                episode.is_timed_out(now, search_timeout),
            ),
            None => (false, false),
        };

        Self {
            target_visible,
            search_exhausted,
            search_timed_out,
        }
    }
}

/// Условие перехода (pure predicate над WorldSnapshot)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    TargetVisible,
    TargetNotVisible,
    SearchExhausted,
    SearchTimedOut,
}

impl Condition {
    pub fn holds(self, world: &WorldSnapshot) -> bool {
        match self {
            Condition::TargetVisible => world.target_visible,
            Condition::TargetNotVisible => !world.target_visible,
            Condition::SearchExhausted => world.search_exhausted,
            Condition::SearchTimedOut => world.search_timed_out,
        }
    }
}

/// Одна строка таблицы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub when: Condition,
    pub to: StateId,
}

const fn on(when: Condition, to: StateId) -> Transition {
    Transition { when, to }
}

const IDLE: &[Transition] = &[
    on(Condition::TargetVisible, StateId::Chase),
    on(Condition::TargetNotVisible, StateId::Patrol),
];

const PATROL: &[Transition] = &[on(Condition::TargetVisible, StateId::Chase)];

const CHASE: &[Transition] = &[on(Condition::TargetNotVisible, StateId::Search)];

// Порядок важен: увидели цель → Chase даже если эпизод уже истёк
const SEARCH: &[Transition] = &[
    on(Condition::TargetVisible, StateId::Chase),
    on(Condition::SearchExhausted, StateId::Patrol),
    on(Condition::SearchTimedOut, StateId::Patrol),
];

/// Исходящие переходы состояния (в порядке приоритета)
pub fn transitions_from(state: StateId) -> &'static [Transition] {
    match state {
        StateId::Idle => IDLE,
        StateId::Patrol => PATROL,
        StateId::Chase => CHASE,
        StateId::Search => SEARCH,
    }
}

/// Первый сработавший переход (None: остаёмся)
pub fn next_state(current: StateId, world: &WorldSnapshot) -> Option<StateId> {
    transitions_from(current)
        .iter()
        .find(|transition| transition.when.holds(world))
        .map(|transition| transition.to)
}
