//! Combatant state: vitals, stats, skills, cooldowns and active effects.

use std::collections::BTreeMap;

use super::{
    CombatantId, Controller, Side, Skill, SkillId, StatusEffect, StatusEffects, TargetStat,
};

/// Immutable baseline stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl BaseStats {
    pub const fn new(attack: i32, defense: i32, speed: i32) -> Self {
        Self {
            attack,
            defense,
            speed,
        }
    }
}

/// Stats after folding in active effects, floored at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl DerivedStats {
    /// Re-sums every active effect on top of the base stats.
    pub fn compute(base: &BaseStats, effects: &StatusEffects) -> Self {
        let fold = |base: i32, stat: TargetStat| -> u32 {
            base.saturating_add(effects.sum(stat)).max(0) as u32
        };

        Self {
            attack: fold(base.attack, TargetStat::Attack),
            defense: fold(base.defense, TargetStat::Defense),
            speed: fold(base.speed, TargetStat::Speed),
        }
    }
}

/// A party member or enemy taking part in the battle.
///
/// # Invariants
///
/// - `0 <= current_hp <= max_hp`; every HP write clamps to that range.
/// - `derived` always reflects `base` plus the sum of `effects`. It is
///   recomputed only when the effect list changes (apply / expire).
/// - A combatant at 0 HP is defeated: it leaves turn order and target sets but
///   stays addressable in the roster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub controller: Controller,

    max_hp: u32,
    current_hp: u32,
    base: BaseStats,
    derived: DerivedStats,

    skills: Vec<Skill>,
    cooldowns: BTreeMap<SkillId, u32>,
    effects: StatusEffects,
}

impl Combatant {
    /// Creates a combatant at full HP with no skills or effects.
    pub fn new(
        id: impl Into<CombatantId>,
        name: impl Into<String>,
        side: Side,
        controller: Controller,
        max_hp: u32,
        base: BaseStats,
    ) -> Self {
        let effects = StatusEffects::empty();
        Self {
            id: id.into(),
            name: name.into(),
            side,
            controller,
            max_hp,
            current_hp: max_hp,
            base,
            derived: DerivedStats::compute(&base, &effects),
            skills: Vec::new(),
            cooldowns: BTreeMap::new(),
            effects,
        }
    }

    /// Starts the combatant below full HP (clamped to `max_hp`).
    pub fn with_current_hp(mut self, hp: u32) -> Self {
        self.set_current_hp(i64::from(hp));
        self
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = Skill>) -> Self {
        self.skills.extend(skills);
        self
    }

    // ========================================================================
    // Vitals
    // ========================================================================

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn is_defeated(&self) -> bool {
        self.current_hp == 0
    }

    /// Writes HP, clamping into `[0, max_hp]`.
    pub fn set_current_hp(&mut self, hp: i64) {
        self.current_hp = hp.clamp(0, i64::from(self.max_hp)) as u32;
    }

    /// Removes HP and returns how much was actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = crate::combat::apply_damage(before, amount);
        before - self.current_hp
    }

    /// Restores HP up to `max_hp` and returns how much was actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.set_current_hp(i64::from(before) + i64::from(amount));
        self.current_hp - before
    }

    // ========================================================================
    // Stats
    // ========================================================================

    pub fn base(&self) -> &BaseStats {
        &self.base
    }

    pub fn derived(&self) -> &DerivedStats {
        &self.derived
    }

    pub fn attack(&self) -> u32 {
        self.derived.attack
    }

    pub fn defense(&self) -> u32 {
        self.derived.defense
    }

    pub fn speed(&self) -> u32 {
        self.derived.speed
    }

    // ========================================================================
    // Effects
    // ========================================================================

    pub fn effects(&self) -> &StatusEffects {
        &self.effects
    }

    /// Appends an effect instance and refreshes derived stats.
    pub fn add_effect(&mut self, effect: StatusEffect) {
        let modifies_stats = effect.target_stat.is_stat_modifier();
        self.effects.push(effect);
        if modifies_stats {
            self.recompute_derived();
        }
    }

    /// Re-derives Attack/Defense/Speed from the base stats and every remaining effect.
    pub fn recompute_derived(&mut self) {
        self.derived = DerivedStats::compute(&self.base, &self.effects);
    }

    pub(crate) fn effects_mut(&mut self) -> &mut StatusEffects {
        &mut self.effects
    }

    // ========================================================================
    // Skills & cooldowns
    // ========================================================================

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn skill(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.iter().find(|skill| &skill.id == id)
    }

    /// Remaining cooldown turns for a skill (0 when ready or unknown).
    pub fn cooldown(&self, id: &SkillId) -> u32 {
        self.cooldowns.get(id).copied().unwrap_or(0)
    }

    pub fn is_skill_ready(&self, id: &SkillId) -> bool {
        self.cooldown(id) == 0
    }

    /// Skills off cooldown, in skill-set order.
    pub fn usable_skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills
            .iter()
            .filter(|skill| self.is_skill_ready(&skill.id))
    }

    /// Disables a skill for `turns` owner turns.
    pub fn arm_cooldown(&mut self, id: &SkillId, turns: u32) {
        if turns == 0 {
            self.cooldowns.remove(id);
        } else {
            self.cooldowns.insert(id.clone(), turns);
        }
    }

    /// Decrements every cooldown by one turn, floored at zero.
    ///
    /// `except` names a cooldown armed during the current turn, which starts
    /// counting from the owner's next turn.
    pub fn tick_cooldowns(&mut self, except: Option<&SkillId>) {
        for (id, remaining) in self.cooldowns.iter_mut() {
            if except == Some(id) {
                continue;
            }
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EffectKind, TargetScope};

    fn knight() -> Combatant {
        Combatant::new(
            "knight",
            "Knight",
            Side::Party,
            Controller::Player,
            100,
            BaseStats::new(15, 8, 10),
        )
        .with_skill(Skill::new("slash", "Slash", TargetScope::SingleEnemy, 5, 2, 3).with_cooldown(2))
    }

    #[test]
    fn hp_floors_at_zero() {
        for (start, damage) in [(100u32, 0u32), (100, 40), (100, 100), (100, 250), (1, u32::MAX)] {
            let mut unit = knight().with_current_hp(start);
            unit.take_damage(damage);
            assert_eq!(unit.current_hp(), start.saturating_sub(damage));
        }
    }

    #[test]
    fn hp_writes_clamp_to_bounds() {
        let mut unit = knight();
        unit.set_current_hp(-20);
        assert_eq!(unit.current_hp(), 0);
        assert!(unit.is_defeated());

        unit.set_current_hp(500);
        assert_eq!(unit.current_hp(), 100);

        let unit = knight().with_current_hp(250);
        assert_eq!(unit.current_hp(), 100);
    }

    #[test]
    fn heal_caps_at_max_hp() {
        let mut unit = knight().with_current_hp(90);
        assert_eq!(unit.heal(30), 10);
        assert_eq!(unit.current_hp(), 100);
    }

    #[test]
    fn derived_stats_floor_at_zero() {
        let mut unit = knight();
        unit.add_effect(StatusEffect::new(
            "Shatter",
            EffectKind::Debuff,
            TargetStat::Defense,
            2,
            -20,
        ));
        assert_eq!(unit.defense(), 0);
        assert_eq!(unit.attack(), 15);
    }

    #[test]
    fn dot_effects_leave_derived_stats_alone() {
        let mut unit = knight();
        unit.add_effect(StatusEffect::new(
            "Bleed",
            EffectKind::Debuff,
            TargetStat::DamageOverTime,
            2,
            5,
        ));
        assert_eq!(unit.derived(), &DerivedStats::compute(unit.base(), &StatusEffects::empty()));
    }

    #[test]
    fn cooldown_armed_this_turn_survives_its_own_tick() {
        let mut unit = knight();
        let slash = SkillId::new("slash");
        unit.arm_cooldown(&slash, 2);

        unit.tick_cooldowns(Some(&slash));
        assert_eq!(unit.cooldown(&slash), 2);
        assert_eq!(unit.usable_skills().count(), 0);

        unit.tick_cooldowns(None);
        assert_eq!(unit.cooldown(&slash), 1);
        unit.tick_cooldowns(None);
        assert!(unit.is_skill_ready(&slash));
        unit.tick_cooldowns(None);
        assert_eq!(unit.cooldown(&slash), 0);
    }
}
