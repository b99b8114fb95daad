use std::collections::HashSet;

use crate::config::CombatConfig;
use crate::error::ConfigurationError;

use super::{Combatant, CombatantId, Side, TargetScope};

/// Both sides of the battle, kept in registration order.
///
/// Iteration order (party first, then enemies, each in insertion order) is
/// the tie-break order used by turn scheduling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    party: Vec<Combatant>,
    enemies: Vec<Combatant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and adds a combatant to its side.
    pub fn register(&mut self, combatant: Combatant) -> Result<(), ConfigurationError> {
        if self.len() >= CombatConfig::MAX_COMBATANTS {
            return Err(ConfigurationError::RosterFull {
                max: CombatConfig::MAX_COMBATANTS,
            });
        }
        validate_combatant(&combatant)?;
        if self.get(&combatant.id).is_some() {
            return Err(ConfigurationError::DuplicateCombatant(combatant.id));
        }

        match combatant.side {
            Side::Party => self.party.push(combatant),
            Side::Enemy => self.enemies.push(combatant),
        }
        Ok(())
    }

    /// Checks that both sides are populated.
    pub fn validate_complete(&self) -> Result<(), ConfigurationError> {
        if self.party.is_empty() {
            return Err(ConfigurationError::EmptyParty);
        }
        if self.enemies.is_empty() {
            return Err(ConfigurationError::NoEnemies);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.party.len() + self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn side(&self, side: Side) -> &[Combatant] {
        match side {
            Side::Party => &self.party,
            Side::Enemy => &self.enemies,
        }
    }

    /// Party first, then enemies, each in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.party.iter().chain(self.enemies.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.party.iter_mut().chain(self.enemies.iter_mut())
    }

    pub fn get(&self, id: &CombatantId) -> Option<&Combatant> {
        self.iter().find(|combatant| &combatant.id == id)
    }

    pub fn get_mut(&mut self, id: &CombatantId) -> Option<&mut Combatant> {
        self.iter_mut().find(|combatant| &combatant.id == id)
    }

    pub fn living(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.side(side).iter().filter(|combatant| combatant.is_alive())
    }

    pub fn all_defeated(&self, side: Side) -> bool {
        self.side(side).iter().all(Combatant::is_defeated)
    }

    /// Living combatants `actor` may aim a skill of the given scope at.
    ///
    /// `AllEnemies` lists every living opponent; the selection names one of
    /// them nominally and the hit lands on all of them.
    pub fn valid_targets(&self, actor: &CombatantId, scope: TargetScope) -> Vec<CombatantId> {
        let Some(actor) = self.get(actor) else {
            return Vec::new();
        };

        match scope {
            TargetScope::SingleEnemy | TargetScope::AllEnemies => self
                .living(actor.side.opponent())
                .map(|c| c.id.clone())
                .collect(),
            TargetScope::SelfOnly => {
                if actor.is_alive() {
                    vec![actor.id.clone()]
                } else {
                    Vec::new()
                }
            }
            TargetScope::SingleAlly => self.living(actor.side).map(|c| c.id.clone()).collect(),
        }
    }

    /// Consumes the roster, returning `(party, enemies)`.
    pub fn into_sides(self) -> (Vec<Combatant>, Vec<Combatant>) {
        (self.party, self.enemies)
    }
}

fn validate_combatant(combatant: &Combatant) -> Result<(), ConfigurationError> {
    if combatant.id.is_empty() {
        return Err(ConfigurationError::EmptyCombatantId);
    }
    if combatant.max_hp() == 0 {
        return Err(ConfigurationError::ZeroMaxHp(combatant.id.clone()));
    }
    if combatant.skills().is_empty() {
        return Err(ConfigurationError::NoSkills(combatant.id.clone()));
    }

    let mut seen = HashSet::new();
    for skill in combatant.skills() {
        if skill.id.is_empty() {
            return Err(ConfigurationError::EmptySkillId {
                combatant: combatant.id.clone(),
            });
        }
        if !seen.insert(&skill.id) {
            return Err(ConfigurationError::DuplicateSkill {
                combatant: combatant.id.clone(),
                skill: skill.id.clone(),
            });
        }
        if skill.coin_count == 0 {
            return Err(ConfigurationError::ZeroCoinCount {
                combatant: combatant.id.clone(),
                skill: skill.id.clone(),
            });
        }
        if let Some(effect) = skill.effects_to_apply.iter().find(|e| e.duration == 0) {
            return Err(ConfigurationError::ZeroEffectDuration {
                skill: skill.id.clone(),
                effect: effect.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BaseStats, Controller, Skill};

    fn unit(id: &str, side: Side) -> Combatant {
        Combatant::new(id, id, side, Controller::Ai, 50, BaseStats::new(10, 5, 5))
            .with_skill(Skill::new("hit", "Hit", TargetScope::SingleEnemy, 3, 1, 2))
    }

    #[test]
    fn rejects_duplicate_ids_across_sides() {
        let mut roster = Roster::new();
        roster.register(unit("a", Side::Party)).unwrap();
        let err = roster.register(unit("a", Side::Enemy)).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateCombatant(CombatantId::new("a")));
    }

    #[test]
    fn rejects_malformed_combatants() {
        let mut roster = Roster::new();

        let no_skills = Combatant::new("x", "X", Side::Party, Controller::Ai, 10, BaseStats::default());
        assert_eq!(
            roster.register(no_skills),
            Err(ConfigurationError::NoSkills(CombatantId::new("x")))
        );

        let zero_hp = Combatant::new("y", "Y", Side::Party, Controller::Ai, 0, BaseStats::default())
            .with_skill(Skill::new("hit", "Hit", TargetScope::SingleEnemy, 1, 1, 1));
        assert!(matches!(roster.register(zero_hp), Err(ConfigurationError::ZeroMaxHp(_))));

        let twice = unit("z", Side::Enemy)
            .with_skill(Skill::new("hit", "Again", TargetScope::SingleEnemy, 1, 1, 1));
        assert!(matches!(
            roster.register(twice),
            Err(ConfigurationError::DuplicateSkill { .. })
        ));

        let coinless = Combatant::new("w", "W", Side::Enemy, Controller::Ai, 10, BaseStats::default())
            .with_skill(Skill::new("nil", "Nil", TargetScope::SingleEnemy, 1, 0, 1));
        assert!(matches!(
            roster.register(coinless),
            Err(ConfigurationError::ZeroCoinCount { .. })
        ));

        assert!(matches!(
            roster.register(unit("", Side::Enemy)),
            Err(ConfigurationError::EmptyCombatantId)
        ));
        assert!(roster.is_empty());
    }

    #[test]
    fn completeness_requires_both_sides() {
        let mut roster = Roster::new();
        assert_eq!(roster.validate_complete(), Err(ConfigurationError::EmptyParty));
        roster.register(unit("hero", Side::Party)).unwrap();
        assert_eq!(roster.validate_complete(), Err(ConfigurationError::NoEnemies));
        roster.register(unit("slime", Side::Enemy)).unwrap();
        assert!(roster.validate_complete().is_ok());
    }

    #[test]
    fn valid_targets_follow_scope_and_skip_the_defeated() {
        let mut roster = Roster::new();
        roster.register(unit("hero", Side::Party)).unwrap();
        roster.register(unit("mage", Side::Party)).unwrap();
        roster.register(unit("slime", Side::Enemy)).unwrap();
        roster.register(unit("bat", Side::Enemy)).unwrap();
        roster.get_mut(&CombatantId::new("bat")).unwrap().set_current_hp(0);

        let hero = CombatantId::new("hero");
        assert_eq!(
            roster.valid_targets(&hero, TargetScope::SingleEnemy),
            vec![CombatantId::new("slime")]
        );
        assert_eq!(roster.valid_targets(&hero, TargetScope::SelfOnly), vec![hero.clone()]);
        assert_eq!(
            roster.valid_targets(&hero, TargetScope::SingleAlly),
            vec![hero.clone(), CombatantId::new("mage")]
        );
        assert!(roster.valid_targets(&CombatantId::new("ghost"), TargetScope::SingleEnemy).is_empty());
    }
}
