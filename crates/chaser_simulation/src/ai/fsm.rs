//! StateMachine компонент: владелец текущего состояния агента
//!
//! Два прохода на разных частотах:
//! - `tick` (logic pass, Update): оценка таблицы переходов, exit/enter hooks
//! - `physics_tick` (physics pass, FixedUpdate): движение текущего состояния
//!
//! Knockback: прерывание с приоритетом над любым состоянием:
//! пока активен, physics pass не пишет velocity. Переходы при этом
//! продолжают оцениваться.

use bevy::prelude::*;

use super::knockback::{knockback_impulse, Knockback};
use super::state::{AIState, SearchEpisode, StateId};
use super::transitions::{next_state, WorldSnapshot};
use crate::components::PhysicsBody;
use crate::config::KnockbackConfig;
use crate::logger;
use crate::movement::{Locomotion, Motor};
use crate::physics::RaycastWorld;
use crate::trail::CheckpointTrail;

/// Вход logic pass для одного агента
pub struct LogicContext<'a> {
    pub now: f32,
    pub position: Vec2,
    /// Результат перцепции этого тика
    pub target_visible: bool,
    pub last_seen: Option<Vec2>,
    /// Trail цели (None: цели нет или она без trail)
    pub trail: Option<&'a CheckpointTrail>,
    pub search_timeout: f32,
    pub locomotion: &'a mut dyn Locomotion,
    pub world: &'a dyn RaycastWorld,
    /// Тело агента (entry action Idle гасит горизонталь)
    pub body: &'a mut PhysicsBody,
}

/// Смена состояния (для AIStateChanged event)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub from: StateId,
    pub to: StateId,
}

#[derive(Component, Debug, Clone)]
pub struct StateMachine {
    state: AIState,
    /// Enter стартового состояния выполнен
    started: bool,
    knockback: Option<Knockback>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(StateId::default())
    }
}

impl StateMachine {
    /// FSM со стартовым состоянием. Enter выполняется на первом `tick`
    /// (нужна позиция агента и мир).
    pub fn new(initial: StateId) -> Self {
        let state = match initial {
            StateId::Idle => AIState::Idle,
            StateId::Patrol => AIState::Patrol,
            StateId::Chase => AIState::Chase,
            StateId::Search => AIState::Search(SearchEpisode::begin(Vec::new(), None, 0.0)),
        };

        Self {
            state,
            started: false,
            knockback: None,
        }
    }

    pub fn state(&self) -> &AIState {
        &self.state
    }

    pub fn state_id(&self) -> StateId {
        self.state.id()
    }

    pub fn search(&self) -> Option<&SearchEpisode> {
        self.state.search()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn knockback(&self) -> Option<&Knockback> {
        self.knockback.as_ref()
    }

    pub fn is_knocked_back(&self) -> bool {
        self.knockback.is_some()
    }

    /// Logic pass: перейти по первому сработавшему переходу.
    ///
    /// Возвращает смену состояния (если была).
    pub fn tick(&mut self, ctx: &mut LogicContext) -> Option<StateChange> {
        if !self.started {
            self.started = true;
            let initial = self.state.id();
            self.enter(initial, ctx);
        }

        let current = self.state.id();
        let world = WorldSnapshot::capture(&self.state, ctx.target_visible, ctx.now, ctx.search_timeout);
        let next = next_state(current, &world)?;
        if next == current {
            return None;
        }

        self.exit(ctx);
        self.enter(next, ctx);

        Some(StateChange {
            from: current,
            to: next,
        })
    }

    fn exit(&mut self, ctx: &LogicContext) {
        if let AIState::Search(episode) = &self.state {
            logger::log(&format!(
                "🔍 Search ended: {}/{} waypoints in {:.2}s",
                episode.index(),
                episode.len(),
                ctx.now - episode.started_at()
            ));
        }
    }

    /// Enter hooks. Из velocity трогаем только горизонталь при входе в Idle,
    /// остальное пишет physics pass.
    fn enter(&mut self, next: StateId, ctx: &mut LogicContext) {
        self.state = match next {
            StateId::Idle => {
                ctx.body.stop_horizontal();
                AIState::Idle
            }
            StateId::Patrol => {
                ctx.locomotion.on_patrol_setup(ctx.position);
                AIState::Patrol
            }
            StateId::Chase => AIState::Chase,
            StateId::Search => {
                let waypoints = ctx
                    .trail
                    .map(|trail| ctx.locomotion.build_search_snapshot(ctx.position, trail, ctx.world))
                    .unwrap_or_default();
                let episode = SearchEpisode::begin(waypoints, ctx.last_seen, ctx.now);
                logger::log(&format!("🔍 Search started: {} waypoints", episode.len()));
                AIState::Search(episode)
            }
        };
    }

    /// Physics pass: один шаг движения.
    ///
    /// Порядок приоритетов: смерть → knockback → поведение состояния.
    pub fn physics_tick(
        &mut self,
        motor: &mut Motor,
        locomotion: &mut dyn Locomotion,
        target: Option<Vec2>,
        alive: bool,
        delta: f32,
    ) {
        // Труп не летит по инерции от удара
        if !alive {
            self.knockback = None;
            motor.body.stop_horizontal();
            return;
        }

        if let Some(knockback) = self.knockback.as_mut() {
            if !knockback.tick(delta) {
                self.knockback = None;
                logger::log("💫 Knockback finished");
            }
            return;
        }

        if !self.started {
            return;
        }

        match &mut self.state {
            AIState::Idle => motor.body.stop_horizontal(),
            AIState::Patrol => locomotion.move_patrol(motor),
            AIState::Chase => {
                if let Some(target) = target {
                    let to_target = target - motor.position;
                    locomotion.move_chase(motor, to_target);
                }
            }
            AIState::Search(episode) => match episode.current() {
                Some(waypoint) => {
                    if locomotion.has_reached(motor.position, waypoint, motor.reach_threshold) {
                        episode.advance();
                        motor.body.stop_horizontal();
                    } else {
                        locomotion.move_search_toward(motor, waypoint);
                    }
                }
                // Пустой snapshot: стоим до timeout
                None if episode.is_empty() => motor.body.stop_horizontal(),
                // Пройдено: переход в Patrol сделает logic pass
                None => {}
            },
        }
    }

    /// Запустить knockback: velocity = импульс, physics pass отдаёт её импульсу.
    pub fn begin_knockback(
        &mut self,
        body: &mut PhysicsBody,
        position: Vec2,
        target: Option<Vec2>,
        config: &KnockbackConfig,
    ) -> Vec2 {
        let impulse = knockback_impulse(position, target, config);
        body.velocity = impulse;
        self.knockback = Knockback::start(config);
        impulse
    }
}
