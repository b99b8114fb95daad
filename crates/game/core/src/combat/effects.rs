//! End-of-turn cleanup: damage-over-time ticks, effect expiry and cooldowns.

use crate::state::{Combatant, SkillId, StatusEffect, TargetStat};

/// What end-of-turn cleanup did to one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CleanupReport {
    /// HP actually lost to damage-over-time ticks.
    pub dot_damage: u32,
    /// HP actually regained from negative damage-over-time values.
    pub dot_healing: u32,
    /// Effects removed this turn, in application order.
    pub expired: Vec<StatusEffect>,
    /// Whether a DoT tick brought the combatant to 0 HP.
    pub defeated: bool,
}

/// Runs the end-of-turn steps for the actor whose turn just finished.
///
/// 1. Every DamageOverTime effect applies its value as HP loss.
/// 2. Every effect's duration drops by one.
/// 3. Expired effects are removed; derived stats are re-summed from the
///    effects that remain.
/// 4. Every cooldown drops by one, except `armed_this_turn`.
pub fn end_of_turn_cleanup(
    actor: &mut Combatant,
    armed_this_turn: Option<&SkillId>,
) -> CleanupReport {
    let mut report = CleanupReport::default();
    let was_alive = actor.is_alive();

    let dot_values: Vec<i32> = actor
        .effects()
        .iter()
        .filter(|effect| effect.target_stat == TargetStat::DamageOverTime)
        .map(|effect| effect.value)
        .collect();

    for value in dot_values {
        if value >= 0 {
            report.dot_damage += actor.take_damage(value.unsigned_abs());
        } else {
            report.dot_healing += actor.heal(value.unsigned_abs());
        }
    }

    let effects = actor.effects_mut();
    effects.tick();
    report.expired = effects.drain_expired();

    if report
        .expired
        .iter()
        .any(|effect| effect.target_stat.is_stat_modifier())
    {
        actor.recompute_derived();
    }

    actor.tick_cooldowns(armed_this_turn);

    report.defeated = was_alive && actor.is_defeated();
    report
}
