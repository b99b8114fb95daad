//! Battle state: combatants, skills, status effects and the roster.
//!
//! The roster is owned exclusively by the combat state machine once the battle
//! starts; everything outside the engine sees it through read-only snapshots.

mod roster;
pub mod types;

pub use roster::Roster;
pub use types::{
    BaseStats, ClashCoins, Combatant, CombatantId, Controller, DerivedStats, EffectKind, Side,
    Skill, SkillId, StatusEffect, StatusEffects, TargetScope, TargetStat,
};
