//! Combat module: урон врагам
//!
//! ECS ответственность:
//! - Health врагов
//! - Events: DamageDealt (вход) → EnemyDamaged / EnemyKilled (выход)
//!
//! AI подписан на EnemyDamaged (knockback interrupt).

use bevy::prelude::*;

pub mod damage;


pub use damage::{apply_damage, resolve_damage, DamageDealt, DamageOutcome, EnemyDamaged, EnemyKilled};

use crate::ai::AISet;

/// Combat Plugin
///
/// apply_damage работает в FixedUpdate до AI reactions:
/// knockback стартует в том же fixed шаге, что и урон.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageDealt>()
            .add_event::<EnemyDamaged>()
            .add_event::<EnemyKilled>();

        app.add_systems(FixedUpdate, apply_damage.before(AISet::Reactions));
    }
}
