use clash_core::{CleanupReport, CombatantId, SkillSelection, StatusEffect, TurnOutcome};
use serde::{Deserialize, Serialize};

/// Battle-wide milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A new round queue was built, fastest first.
    RoundStarted { round: u32, order: Vec<CombatantId> },
    Ended { victory: bool },
}

/// Events scoped to a single actor's turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    AwaitingSelection {
        actor: CombatantId,
    },
    SkillSelected {
        actor: CombatantId,
        selection: SkillSelection,
    },
    DamageDealt {
        target: CombatantId,
        amount: u32,
    },
    EffectApplied {
        target: CombatantId,
        effect: StatusEffect,
    },
    Resolved {
        outcome: TurnOutcome,
    },
    /// End-of-turn upkeep finished for `actor`.
    Cleanup {
        actor: CombatantId,
        report: CleanupReport,
    },
}
