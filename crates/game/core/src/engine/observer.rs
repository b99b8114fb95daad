use crate::combat::ClashTick;
use crate::state::{Combatant, CombatantId, StatusEffect};

use super::TurnOutcome;

/// Collaborator the state machine calls into as the battle unfolds.
///
/// Every hook has a no-op default; the engine behaves identically whether or
/// not anything is listening. The two `request_*` hooks fire on entering a
/// suspension point and expect the host to eventually resume the machine
/// with the matching signal.
pub trait CombatObserver: Send {
    /// Entered `WaitingForInput` for a player-controlled actor.
    fn request_skill_selection(&mut self, _actor: &Combatant) {}

    /// One clash contest finished.
    fn report_clash_tick(&mut self, _tick: &ClashTick) {}

    fn report_damage(&mut self, _target: &CombatantId, _amount: u32) {}

    fn report_effect_applied(&mut self, _target: &CombatantId, _effect: &StatusEffect) {}

    /// A new round queue was built.
    fn report_turn_order(&mut self, _queue: &[CombatantId]) {}

    fn report_combat_end(&mut self, _victory: bool) {}

    /// Entered `AnimationSync` with the turn's outcome.
    fn request_animation(&mut self, _actor: &CombatantId, _outcome: &TurnOutcome) {}
}

/// Observer that ignores every hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl CombatObserver for NoopObserver {}

impl<O: CombatObserver + ?Sized> CombatObserver for Box<O> {
    fn request_skill_selection(&mut self, actor: &Combatant) {
        (**self).request_skill_selection(actor);
    }

    fn report_clash_tick(&mut self, tick: &ClashTick) {
        (**self).report_clash_tick(tick);
    }

    fn report_damage(&mut self, target: &CombatantId, amount: u32) {
        (**self).report_damage(target, amount);
    }

    fn report_effect_applied(&mut self, target: &CombatantId, effect: &StatusEffect) {
        (**self).report_effect_applied(target, effect);
    }

    fn report_turn_order(&mut self, queue: &[CombatantId]) {
        (**self).report_turn_order(queue);
    }

    fn report_combat_end(&mut self, victory: bool) {
        (**self).report_combat_end(victory);
    }

    fn request_animation(&mut self, actor: &CombatantId, outcome: &TurnOutcome) {
        (**self).request_animation(actor, outcome);
    }
}
