//! Deterministic clash-combat rules shared by every host.
//!
//! `clash-core` defines the battle data model, the combat rules (turn order,
//! coin clashes, damage, status effects) and the [`engine::CombatStateMachine`]
//! that sequences them. It performs no I/O and never blocks: the two points
//! where a battle waits on the outside world are explicit suspension states,
//! resumed by the host through plain method calls.
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod rng;
pub mod state;

pub use combat::{
    AiPolicy, CleanupReport, ClashOutcome, ClashResolver, ClashTick, ClashWinner, HitReport,
    RandomPolicy, SkillSelection, TurnQueue, TurnScheduler,
};
pub use config::CombatConfig;
pub use engine::{
    BattleSnapshot, CombatBuilder, CombatObserver, CombatState, CombatStateMachine, NoopObserver,
    SkipReason, Step, Suspension, TurnOutcome,
};
pub use error::{ConfigurationError, ErrorSeverity, SelectionError, SignalError, SignalKind};
pub use rng::{PcgRng, RngOracle, ScriptedRng};
pub use state::{
    BaseStats, ClashCoins, Combatant, CombatantId, Controller, DerivedStats, EffectKind, Roster,
    Side, Skill, SkillId, StatusEffect, StatusEffects, TargetScope, TargetStat,
};
