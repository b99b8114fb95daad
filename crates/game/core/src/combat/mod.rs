//! Combat rules.
//!
//! Everything here is a pure function of its inputs plus the injected
//! [`RngOracle`](crate::rng::RngOracle). The state machine in
//! [`engine`](crate::engine) decides *when* each rule runs.
//!
//! # Core pieces
//!
//! - [`TurnScheduler`]: per-round speed ordering
//! - [`ClashResolver`]: the repeated coin contest between two skills
//! - [`calculate_damage`] / [`apply_hit`]: final damage and effect grants
//! - [`end_of_turn_cleanup`]: DoT ticks, effect expiry and cooldowns
//! - [`AiPolicy`]: skill and target choice for AI-controlled actors

pub mod ai;
pub mod clash;
pub mod damage;
pub mod effects;
pub mod turns;

pub use ai::{AiPolicy, RandomPolicy, SkillSelection};
pub use clash::{ClashOutcome, ClashResolver, ClashTick, ClashWinner, Contestant};
pub use damage::{
    HitReport, apply_damage, apply_hit, apply_support, attack_power, calculate_damage,
    compute_damage,
};
pub use effects::{CleanupReport, end_of_turn_cleanup};
pub use turns::{TurnQueue, TurnScheduler};
