//! The combat state machine and its collaborator seams.
//!
//! [`CombatStateMachine`] is the sole owner of the roster and turn queue once
//! built. It advances through
//! `Setup → StartTurn → [WaitingForInput] → ClashSetup → [ClashResolution] →
//! DamageApplication → AnimationSync → StartTurn …` until one side falls.
//!
//! Hosts drive it with [`CombatStateMachine::advance`] and resume it with the
//! two signals, [`submit_skill_selection`](CombatStateMachine::submit_skill_selection)
//! and [`notify_animation_complete`](CombatStateMachine::notify_animation_complete).
//! Everything the machine wants to tell the outside world goes through the
//! injected [`CombatObserver`].

mod builder;
mod machine;
mod observer;
mod state;

pub use builder::CombatBuilder;
pub use machine::CombatStateMachine;
pub use observer::{CombatObserver, NoopObserver};
pub use state::{BattleSnapshot, CombatState, SkipReason, Step, Suspension, TurnOutcome};
