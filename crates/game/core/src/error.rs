//! Error types surfaced by clash-core.
//!
//! Only two families of failures ever reach a caller:
//!
//! - [`ConfigurationError`]: malformed roster content, raised while registering
//!   combatants and before the battle starts. These are unrecoverable for the
//!   battle being set up.
//! - [`SignalError`]: a resume signal that does not match the machine's current
//!   suspension point, or a player selection that cannot be honored. The
//!   machine state is left untouched.
//!
//! Everything else that can go wrong mid-battle (missing targets, empty skill
//! lists, drawn clashes, HP writes outside bounds) is absorbed by the rules
//! themselves and never produces an error value.

use crate::engine::CombatState;
use crate::state::{CombatantId, SkillId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller may retry with a different input.
    ///
    /// Examples: skill on cooldown, target already defeated
    Recoverable,

    /// Validation error - input arrived at the wrong time or is malformed,
    /// retrying the same input will never succeed.
    ///
    /// Examples: selection submitted outside `WaitingForInput`, bad content
    Validation,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Malformed combatant or skill content detected at roster registration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("combatant id must not be empty")]
    EmptyCombatantId,

    #[error("combatant '{0}' is registered more than once")]
    DuplicateCombatant(CombatantId),

    #[error("combatant '{0}' must have a max HP above zero")]
    ZeroMaxHp(CombatantId),

    #[error("combatant '{0}' has no skills")]
    NoSkills(CombatantId),

    #[error("combatant '{combatant}' has a skill with an empty id")]
    EmptySkillId { combatant: CombatantId },

    #[error("combatant '{combatant}' lists skill '{skill}' more than once")]
    DuplicateSkill {
        combatant: CombatantId,
        skill: SkillId,
    },

    #[error("skill '{skill}' on combatant '{combatant}' must throw at least one coin")]
    ZeroCoinCount {
        combatant: CombatantId,
        skill: SkillId,
    },

    #[error("effect '{effect}' of skill '{skill}' must last at least one turn")]
    ZeroEffectDuration { skill: SkillId, effect: String },

    #[error("combatant '{combatant}' references unknown skill '{skill}'")]
    UnknownSkill {
        combatant: CombatantId,
        skill: SkillId,
    },

    #[error("roster is full ({max} combatants)")]
    RosterFull { max: usize },

    #[error("the party has no members")]
    EmptyParty,

    #[error("the enemy side has no members")]
    NoEnemies,
}

impl ConfigurationError {
    pub const fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

/// Identifies which external resume signal was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SignalKind {
    SkillSelected,
    AnimationFinished,
}

/// Why a player selection was refused while waiting for input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionError {
    #[error("actor does not know skill '{0}'")]
    UnknownSkill(SkillId),

    #[error("skill '{skill}' is on cooldown for {remaining} more turn(s)")]
    OnCooldown { skill: SkillId, remaining: u32 },

    #[error("target '{0}' is not in the roster")]
    UnknownTarget(CombatantId),

    #[error("target '{0}' is already defeated")]
    TargetDefeated(CombatantId),

    #[error("target '{target}' is outside the scope of skill '{skill}'")]
    TargetOutOfScope { skill: SkillId, target: CombatantId },
}

/// Errors returned by the resume signals of the combat state machine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    #[error("{signal} signal rejected while in state {state}")]
    InvalidTransition {
        signal: SignalKind,
        state: CombatState,
    },

    #[error("skill selection rejected: {0}")]
    InvalidSelection(#[from] SelectionError),
}

impl SignalError {
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidTransition { .. } => ErrorSeverity::Validation,
            Self::InvalidSelection(_) => ErrorSeverity::Recoverable,
        }
    }
}
