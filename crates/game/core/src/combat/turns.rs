//! Round-based turn scheduling.

use std::collections::VecDeque;

use crate::state::{CombatantId, Roster};

/// Builds round queues from the roster.
pub struct TurnScheduler;

impl TurnScheduler {
    /// Orders the living combatants of a round by speed, fastest first.
    ///
    /// Ties keep roster order (party before enemies, then registration order);
    /// the sort is stable so the result is identical for identical input.
    pub fn prepare_round(roster: &Roster) -> TurnQueue {
        let mut living: Vec<(u32, &CombatantId)> = roster
            .iter()
            .filter(|combatant| combatant.is_alive())
            .map(|combatant| (combatant.speed(), &combatant.id))
            .collect();

        living.sort_by(|(a, _), (b, _)| b.cmp(a));

        TurnQueue {
            order: living.into_iter().map(|(_, id)| id.clone()).collect(),
        }
    }
}

/// FIFO queue of actors for the current round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnQueue {
    order: VecDeque<CombatantId>,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops queued actors until one still alive in `roster` is found.
    ///
    /// Actors defeated since the round was built are discarded.
    pub fn next_living(&mut self, roster: &Roster) -> Option<CombatantId> {
        while let Some(id) = self.order.pop_front() {
            if roster.get(&id).is_some_and(|c| c.is_alive()) {
                return Some(id);
            }
            tracing::debug!(actor = %id, "skipping defeated actor in turn queue");
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatantId> {
        self.order.iter()
    }

    /// Copy of the remaining order, for presentation.
    pub fn snapshot(&self) -> Vec<CombatantId> {
        self.order.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        BaseStats, Combatant, Controller, Side, Skill, StatusEffect, EffectKind, TargetScope,
        TargetStat,
    };

    fn unit(id: &str, side: Side, speed: i32) -> Combatant {
        Combatant::new(id, id, side, Controller::Ai, 10, BaseStats::new(1, 1, speed))
            .with_skill(Skill::new("hit", "Hit", TargetScope::SingleEnemy, 1, 1, 1))
    }

    fn ids(queue: &TurnQueue) -> Vec<&str> {
        queue.iter().map(CombatantId::as_str).collect()
    }

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.register(unit("knight", Side::Party, 10)).unwrap();
        roster.register(unit("archer", Side::Party, 14)).unwrap();
        roster.register(unit("goblin", Side::Enemy, 14)).unwrap();
        roster.register(unit("ogre", Side::Enemy, 10)).unwrap();
        roster.register(unit("wisp", Side::Enemy, 20)).unwrap();
        roster
    }

    #[test]
    fn orders_by_speed_with_roster_tie_break() {
        let queue = TurnScheduler::prepare_round(&roster());
        assert_eq!(ids(&queue), vec!["wisp", "archer", "goblin", "knight", "ogre"]);
    }

    #[test]
    fn ordering_is_deterministic() {
        let roster = roster();
        let first = TurnScheduler::prepare_round(&roster);
        for _ in 0..10 {
            assert_eq!(TurnScheduler::prepare_round(&roster), first);
        }
    }

    #[test]
    fn excludes_defeated_combatants() {
        let mut roster = roster();
        roster.get_mut(&CombatantId::new("wisp")).unwrap().set_current_hp(0);
        let queue = TurnScheduler::prepare_round(&roster);
        assert_eq!(ids(&queue), vec!["archer", "goblin", "knight", "ogre"]);
    }

    #[test]
    fn speed_effects_change_order() {
        let mut roster = roster();
        roster.get_mut(&CombatantId::new("ogre")).unwrap().add_effect(StatusEffect::new(
            "Haste",
            EffectKind::Buff,
            TargetStat::Speed,
            2,
            15,
        ));
        let queue = TurnScheduler::prepare_round(&roster);
        assert_eq!(ids(&queue)[0], "ogre");
    }

    #[test]
    fn next_living_skips_actors_defeated_mid_round() {
        let mut roster = roster();
        let mut queue = TurnScheduler::prepare_round(&roster);
        roster.get_mut(&CombatantId::new("wisp")).unwrap().set_current_hp(0);
        roster.get_mut(&CombatantId::new("archer")).unwrap().set_current_hp(0);

        assert_eq!(queue.next_living(&roster), Some(CombatantId::new("goblin")));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn empty_roster_yields_empty_queue() {
        assert!(TurnScheduler::prepare_round(&Roster::new()).is_empty());
    }
}
