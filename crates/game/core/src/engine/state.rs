use std::fmt;

use crate::combat::{ClashOutcome, HitReport};
use crate::state::{CombatantId, Roster, SkillId};

/// Phase of the combat state machine.
///
/// Exactly one state is current at any time. `WaitingForInput` and
/// `AnimationSync` are the only suspension points; `CombatEnd` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatState {
    Setup,
    StartTurn,
    WaitingForInput,
    ClashSetup,
    ClashResolution,
    DamageApplication,
    AnimationSync,
    CombatEnd { victory: bool },
}

impl CombatState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::StartTurn => "start_turn",
            Self::WaitingForInput => "waiting_for_input",
            Self::ClashSetup => "clash_setup",
            Self::ClashResolution => "clash_resolution",
            Self::DamageApplication => "damage_application",
            Self::AnimationSync => "animation_sync",
            Self::CombatEnd { .. } => "combat_end",
        }
    }

    /// True for the two states that wait on an external signal.
    pub const fn is_suspended(&self) -> bool {
        matches!(self, Self::WaitingForInput | Self::AnimationSync)
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::CombatEnd { .. })
    }
}

impl fmt::Display for CombatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CombatEnd { victory } => write!(f, "combat_end(victory={victory})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Which external signal the machine is waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Suspension {
    /// `submit_skill_selection` for the current player-controlled actor.
    AwaitingSelection,
    /// `notify_animation_complete` for the current turn's outcome.
    AwaitingAnimation,
}

/// Result of a single [`step`](super::CombatStateMachine::step).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Moved into a state that runs on its own.
    Advanced(CombatState),
    /// Parked at a suspension point until the matching signal arrives.
    Suspended(Suspension),
    Finished { victory: bool },
}

/// Why an actor's turn produced no action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// Every skill is on cooldown.
    NoUsableSkill,
    /// Usable skills exist but none has a living target.
    NoValidTarget,
}

/// Everything that happened during one actor's turn, handed to the
/// presentation layer at `AnimationSync`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOutcome {
    pub actor: CombatantId,
    pub skill: Option<SkillId>,
    pub target: Option<CombatantId>,
    /// Skill the target answered with, when a clash took place.
    pub counter_skill: Option<SkillId>,
    pub clash: Option<ClashOutcome>,
    /// Landed hits in application order. Empty on a skipped turn or a drawn clash.
    pub hits: Vec<HitReport>,
    pub skipped: Option<SkipReason>,
}

impl TurnOutcome {
    pub(crate) fn skipped(actor: CombatantId, reason: SkipReason) -> Self {
        Self {
            actor,
            skill: None,
            target: None,
            counter_skill: None,
            clash: None,
            hits: Vec::new(),
            skipped: Some(reason),
        }
    }

    pub fn total_damage(&self) -> u64 {
        self.hits.iter().map(|hit| u64::from(hit.damage)).sum()
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// Read-only view of a battle for UIs and logs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub state: CombatState,
    /// 1-based; 0 before the first round is built.
    pub round: u32,
    pub current_actor: Option<CombatantId>,
    /// Actors still queued this round, in order.
    pub turn_queue: Vec<CombatantId>,
    pub roster: Roster,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_states() {
        assert_eq!(CombatState::WaitingForInput.to_string(), "waiting_for_input");
        assert_eq!(
            CombatState::CombatEnd { victory: true }.to_string(),
            "combat_end(victory=true)"
        );
        assert!(CombatState::AnimationSync.is_suspended());
        assert!(!CombatState::ClashSetup.is_suspended());
        assert!(CombatState::CombatEnd { victory: false }.is_terminal());
    }
}
