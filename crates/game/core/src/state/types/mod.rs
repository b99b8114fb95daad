//! Plain data types describing a battle.

mod combatant;
mod common;
mod skill;
mod status;

pub use combatant::{BaseStats, Combatant, DerivedStats};
pub use common::{CombatantId, Controller, Side, SkillId};
pub use skill::{ClashCoins, Skill, TargetScope};
pub use status::{EffectKind, StatusEffect, StatusEffects, TargetStat};
