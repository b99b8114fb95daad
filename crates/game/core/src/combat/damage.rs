//! Damage calculation and application.

use crate::state::{Combatant, CombatantId, Skill, StatusEffect};

// ============================================================================
// Damage Calculation
// ============================================================================

/// Attack power of a hit before defense.
///
/// # Formula
///
/// ```text
/// attack_power = attack + base_power + coin_bonus × win_coin_count
/// ```
pub fn attack_power(attack: u32, skill: &Skill, win_coin_count: u32) -> i64 {
    i64::from(attack)
        + i64::from(skill.base_power)
        + i64::from(skill.coin_bonus) * i64::from(win_coin_count)
}

/// Final HP damage of a hit.
///
/// # Formula
///
/// ```text
/// final_damage = max(1, attack_power - defense)
/// ```
///
/// The floor of one is a hard rule: a landed hit always deals damage.
pub fn calculate_damage(attack: u32, defense: u32, skill: &Skill, win_coin_count: u32) -> u32 {
    let raw = attack_power(attack, skill, win_coin_count) - i64::from(defense);
    raw.clamp(1, i64::from(u32::MAX)) as u32
}

/// [`calculate_damage`] between two combatants' current derived stats.
pub fn compute_damage(
    attacker: &Combatant,
    defender: &Combatant,
    skill: &Skill,
    win_coin_count: u32,
) -> u32 {
    calculate_damage(attacker.attack(), defender.defense(), skill, win_coin_count)
}

/// Apply damage to current HP.
///
/// Returns the new HP value (clamped to 0).
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

// ============================================================================
// Hit Application
// ============================================================================

/// What a single landed hit did to one target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitReport {
    pub target: CombatantId,
    /// HP damage dealt (0 for support skills).
    pub damage: u32,
    /// Effect instances appended to the target, in application order.
    pub effects_applied: Vec<StatusEffect>,
    /// Whether this hit brought the target to 0 HP.
    pub defeated: bool,
}

/// Lands a hostile skill on `defender`: deals damage, then grants the skill's
/// effects as fresh instances.
///
/// `attack` is the attacker's derived attack captured before the hit.
pub fn apply_hit(
    attack: u32,
    defender: &mut Combatant,
    skill: &Skill,
    win_coin_count: u32,
) -> HitReport {
    let was_alive = defender.is_alive();
    let damage = calculate_damage(attack, defender.defense(), skill, win_coin_count);
    defender.take_damage(damage);

    let effects_applied = grant_effects(defender, skill);

    HitReport {
        target: defender.id.clone(),
        damage,
        effects_applied,
        defeated: was_alive && defender.is_defeated(),
    }
}

/// Lands a support skill (Self / SingleAlly): effects only, no damage.
pub fn apply_support(target: &mut Combatant, skill: &Skill) -> HitReport {
    let effects_applied = grant_effects(target, skill);
    HitReport {
        target: target.id.clone(),
        damage: 0,
        effects_applied,
        defeated: false,
    }
}

fn grant_effects(target: &mut Combatant, skill: &Skill) -> Vec<StatusEffect> {
    let mut applied = Vec::with_capacity(skill.effects_to_apply.len());
    for template in &skill.effects_to_apply {
        let effect = template.instantiate();
        target.add_effect(effect.clone());
        applied.push(effect);
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        BaseStats, Controller, EffectKind, Side, TargetScope, TargetStat,
    };

    fn fighter(id: &str, side: Side, attack: i32, defense: i32) -> Combatant {
        Combatant::new(id, id, side, Controller::Ai, 100, BaseStats::new(attack, defense, 5))
    }

    #[test]
    fn damage_scenario_matches_formula() {
        let attacker = fighter("a", Side::Party, 15, 0);
        let defender = fighter("d", Side::Enemy, 0, 8);
        let skill = Skill::new("s", "Strike", TargetScope::SingleEnemy, 5, 2, 3);

        // max(1, 15 + 5 + 3*2 - 8) = 18
        assert_eq!(compute_damage(&attacker, &defender, &skill, 2), 18);
    }

    #[test]
    fn minimum_1_damage() {
        let skill = Skill::new("s", "Poke", TargetScope::SingleEnemy, 0, 1, 0);
        assert_eq!(calculate_damage(0, 500, &skill, 0), 1);

        let negative = Skill::new("n", "Feeble", TargetScope::SingleEnemy, -50, 1, -10);
        assert_eq!(calculate_damage(3, 0, &negative, 4), 1);
    }

    #[test]
    fn damage_never_below_one_for_any_defense() {
        let skill = Skill::new("s", "Strike", TargetScope::SingleEnemy, 5, 3, 2);
        for defense in [0u32, 10, 25, 1_000, u32::MAX] {
            for coins in 0..=3 {
                assert!(calculate_damage(10, defense, &skill, coins) >= 1);
            }
        }
    }

    #[test]
    fn apply_damage_clamps_to_zero() {
        assert_eq!(apply_damage(10, 3), 7);
        assert_eq!(apply_damage(10, 10), 0);
        assert_eq!(apply_damage(10, 99), 0);
    }

    #[test]
    fn apply_hit_grants_independent_effect_instances() {
        let mut defender = fighter("d", Side::Enemy, 0, 0);
        let skill = Skill::new("s", "Rend", TargetScope::SingleEnemy, 5, 1, 0).with_effect(
            StatusEffect::new("Bleed", EffectKind::Debuff, TargetStat::DamageOverTime, 2, 3),
        );

        let first = apply_hit(10, &mut defender, &skill, 1);
        let second = apply_hit(10, &mut defender, &skill, 1);

        assert_eq!(first.damage, 15);
        assert_eq!(second.damage, 15);
        assert_eq!(defender.current_hp(), 70);
        assert_eq!(defender.effects().len(), 2);
        assert_eq!(skill.effects_to_apply[0].duration, 2);
    }

    #[test]
    fn repeated_hits_stack_every_effect() {
        let mut defender = fighter("d", Side::Enemy, 0, 0);
        let skill = Skill::new("s", "Lacerate", TargetScope::SingleEnemy, 0, 1, 0).with_effect(
            StatusEffect::new("Bleed", EffectKind::Debuff, TargetStat::DamageOverTime, 20, 2),
        );

        for _ in 0..20 {
            let report = apply_hit(0, &mut defender, &skill, 0);
            assert_eq!(report.effects_applied.len(), 1);
        }

        assert_eq!(defender.current_hp(), 80);
        assert_eq!(defender.effects().len(), 20);
        assert_eq!(defender.effects().sum(TargetStat::DamageOverTime), 40);
    }

    #[test]
    fn apply_hit_reports_the_killing_blow_once() {
        let mut defender = fighter("d", Side::Enemy, 0, 0).with_current_hp(5);
        let skill = Skill::new("s", "Finish", TargetScope::SingleEnemy, 10, 1, 0);

        assert!(apply_hit(0, &mut defender, &skill, 1).defeated);
        assert!(!apply_hit(0, &mut defender, &skill, 1).defeated);
    }

    #[test]
    fn support_skills_only_grant_effects() {
        let mut ally = fighter("m", Side::Party, 5, 5);
        let skill = Skill::new("b", "Bless", TargetScope::SingleAlly, 50, 1, 0).with_effect(
            StatusEffect::new("Blessed", EffectKind::Buff, TargetStat::Attack, 2, 4),
        );

        let report = apply_support(&mut ally, &skill);
        assert_eq!(report.damage, 0);
        assert_eq!(ally.current_hp(), 100);
        assert_eq!(ally.attack(), 9);
    }
}
