//! AI decision-making module
//!
//! FSM преследователя: Idle / Patrol / Chase / Search + knockback interrupt.
//!
//! Два прохода:
//! - Logic (Update, частота кадров): перцепция, переходы, enter/exit
//! - Physics (FixedUpdate, 60 Hz): движение текущего состояния → velocity
//!
//! Состояние видно physics pass'у со следующего fixed шага после смены.

use bevy::prelude::*;

pub mod events;
pub mod fsm;
pub mod knockback;
pub mod perception;
pub mod state;
pub mod systems;
pub mod transitions;


// Re-export основных типов
pub use events::{AIStateChanged, TargetReachChanged};
pub use fsm::{LogicContext, StateChange, StateMachine};
pub use knockback::{knockback_impulse, Knockback};
pub use perception::Perception;
pub use state::{AIState, SearchEpisode, StateId};
pub use transitions::{next_state, Condition, Transition, WorldSnapshot};

/// Фазы AI внутри Update / FixedUpdate
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AISet {
    /// События → компоненты (target locator, proximity, knockback)
    Reactions,
    /// Перцепция + FSM переходы (Update)
    Logic,
    /// FSM state → velocity (FixedUpdate)
    Physics,
}

/// AI Plugin
///
/// Порядок выполнения:
/// - Update: acquire_targets → apply_reach_signals → ai_logic_tick
/// - FixedUpdate: apply_knockback_on_damage → ai_physics_tick
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AIStateChanged>()
            .add_event::<TargetReachChanged>();

        app.configure_sets(Update, (AISet::Reactions, AISet::Logic).chain());
        app.configure_sets(FixedUpdate, (AISet::Reactions, AISet::Physics).chain());

        app.add_systems(
            Update,
            (systems::acquire_targets, systems::apply_reach_signals)
                .chain()
                .in_set(AISet::Reactions),
        );
        app.add_systems(Update, systems::ai_logic_tick.in_set(AISet::Logic));

        app.add_systems(
            FixedUpdate,
            systems::apply_knockback_on_damage.in_set(AISet::Reactions),
        );
        app.add_systems(FixedUpdate, systems::ai_physics_tick.in_set(AISet::Physics));
    }
}
