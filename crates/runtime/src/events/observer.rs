use clash_core::{ClashTick, Combatant, CombatObserver, CombatantId, StatusEffect, TurnOutcome};

use super::{BattleEvent, EventBus, TurnEvent};

/// Forwards engine observer hooks onto the [`EventBus`].
pub struct EventObserver {
    bus: EventBus,
    round: u32,
}

impl EventObserver {
    pub fn new(bus: EventBus) -> Self {
        Self { bus, round: 0 }
    }
}

impl CombatObserver for EventObserver {
    fn request_skill_selection(&mut self, actor: &Combatant) {
        self.bus.publish(TurnEvent::AwaitingSelection {
            actor: actor.id.clone(),
        });
    }

    fn report_clash_tick(&mut self, tick: &ClashTick) {
        self.bus.publish(tick.clone());
    }

    fn report_damage(&mut self, target: &CombatantId, amount: u32) {
        self.bus.publish(TurnEvent::DamageDealt {
            target: target.clone(),
            amount,
        });
    }

    fn report_effect_applied(&mut self, target: &CombatantId, effect: &StatusEffect) {
        self.bus.publish(TurnEvent::EffectApplied {
            target: target.clone(),
            effect: effect.clone(),
        });
    }

    fn report_turn_order(&mut self, queue: &[CombatantId]) {
        self.round += 1;
        self.bus.publish(BattleEvent::RoundStarted {
            round: self.round,
            order: queue.to_vec(),
        });
    }

    fn report_combat_end(&mut self, victory: bool) {
        self.bus.publish(BattleEvent::Ended { victory });
    }

    fn request_animation(&mut self, _actor: &CombatantId, outcome: &TurnOutcome) {
        self.bus.publish(TurnEvent::Resolved {
            outcome: outcome.clone(),
        });
    }
}
