//! Skill and target choice for AI-controlled combatants.

use crate::rng::RngOracle;
use crate::state::{Combatant, CombatantId, Roster, SkillId};

/// A skill together with the combatant it is aimed at.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSelection {
    pub skill: SkillId,
    pub target: CombatantId,
}

impl SkillSelection {
    pub fn new(skill: impl Into<SkillId>, target: impl Into<CombatantId>) -> Self {
        Self {
            skill: skill.into(),
            target: target.into(),
        }
    }
}

/// Decides what an AI-controlled actor does on its turn.
///
/// Implementations must only return a usable skill (off cooldown) and a
/// target listed by [`Roster::valid_targets`] for that skill's scope.
/// Returning `None` skips the turn.
pub trait AiPolicy: Send {
    fn select(
        &self,
        actor: &Combatant,
        roster: &Roster,
        rng: &mut dyn RngOracle,
    ) -> Option<SkillSelection>;
}

/// Picks a uniformly random usable skill, then a random valid target for it.
///
/// Skills without any living target are never picked.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPolicy;

impl AiPolicy for RandomPolicy {
    fn select(
        &self,
        actor: &Combatant,
        roster: &Roster,
        rng: &mut dyn RngOracle,
    ) -> Option<SkillSelection> {
        let mut candidates: Vec<(SkillId, Vec<CombatantId>)> = actor
            .usable_skills()
            .map(|skill| (skill.id.clone(), roster.valid_targets(&actor.id, skill.scope)))
            .filter(|(_, targets)| !targets.is_empty())
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let (skill, mut targets) = candidates.swap_remove(rng.pick(candidates.len()));
        let target = targets.swap_remove(rng.pick(targets.len()));
        Some(SkillSelection { skill, target })
    }
}

impl<P: AiPolicy + ?Sized> AiPolicy for Box<P> {
    fn select(
        &self,
        actor: &Combatant,
        roster: &Roster,
        rng: &mut dyn RngOracle,
    ) -> Option<SkillSelection> {
        (**self).select(actor, roster, rng)
    }
}
