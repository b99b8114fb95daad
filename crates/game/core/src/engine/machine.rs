use crate::combat::{
    AiPolicy, CleanupReport, ClashOutcome, ClashResolver, ClashWinner, Contestant, TurnQueue,
    TurnScheduler, apply_hit, apply_support, end_of_turn_cleanup,
};
use crate::config::CombatConfig;
use crate::error::{SelectionError, SignalError, SignalKind};
use crate::rng::RngOracle;
use crate::state::{Combatant, CombatantId, Controller, Roster, Side, Skill, SkillId, TargetScope};

use super::{BattleSnapshot, CombatBuilder, CombatObserver, CombatState, SkipReason, Step, Suspension, TurnOutcome};

/// The skill chosen for the current turn, carried from selection through
/// damage application.
#[derive(Clone, Debug)]
struct Engagement {
    skill: Skill,
    target: CombatantId,
    counter: Option<Skill>,
    clash: Option<ClashOutcome>,
}

impl Engagement {
    fn new(skill: Skill, target: CombatantId) -> Self {
        Self {
            skill,
            target,
            counter: None,
            clash: None,
        }
    }
}

/// Owns the roster and drives a battle from `Setup` to `CombatEnd`.
///
/// The machine never recurses through transitions: each call to
/// [`step`](Self::step) runs exactly one state's entry action and reports
/// where it ended up. [`advance`](Self::advance) loops `step` until the
/// machine parks at a suspension point or finishes, and the two resume
/// signals are the only way out of a suspension.
pub struct CombatStateMachine {
    config: CombatConfig,
    roster: Roster,
    queue: TurnQueue,
    round: u32,
    state: CombatState,
    current_actor: Option<CombatantId>,
    engagement: Option<Engagement>,
    outcome: Option<TurnOutcome>,
    /// Skill whose cooldown was armed this turn; exempt from this turn's tick.
    armed: Option<SkillId>,
    rng: Box<dyn RngOracle>,
    observer: Box<dyn CombatObserver>,
    policy: Box<dyn AiPolicy>,
}

impl CombatStateMachine {
    pub(crate) fn new(
        config: CombatConfig,
        roster: Roster,
        rng: Box<dyn RngOracle>,
        observer: Box<dyn CombatObserver>,
        policy: Box<dyn AiPolicy>,
    ) -> Self {
        Self {
            config,
            roster,
            queue: TurnQueue::new(),
            round: 0,
            state: CombatState::Setup,
            current_actor: None,
            engagement: None,
            outcome: None,
            armed: None,
            rng,
            observer,
            policy,
        }
    }

    pub fn builder() -> CombatBuilder {
        CombatBuilder::new()
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn current_actor(&self) -> Option<&Combatant> {
        self.current_actor
            .as_ref()
            .and_then(|id| self.roster.get(id))
    }

    /// Outcome of the turn being presented. Set on entering `AnimationSync`
    /// and cleared when the next turn starts.
    pub fn pending_outcome(&self) -> Option<&TurnOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            state: self.state,
            round: self.round,
            current_actor: self.current_actor.clone(),
            turn_queue: self.queue.snapshot(),
            roster: self.roster.clone(),
        }
    }

    // ========================================================================
    // Driving
    // ========================================================================

    /// Runs the current state's entry action once.
    pub fn step(&mut self) -> Step {
        let next = match self.state {
            CombatState::Setup => self.setup(),
            CombatState::StartTurn => self.start_turn(),
            CombatState::ClashSetup => self.setup_clash(),
            CombatState::ClashResolution => self.resolve_clash(),
            CombatState::DamageApplication => self.apply_turn(),
            CombatState::WaitingForInput => return Step::Suspended(Suspension::AwaitingSelection),
            CombatState::AnimationSync => return Step::Suspended(Suspension::AwaitingAnimation),
            CombatState::CombatEnd { victory } => return Step::Finished { victory },
        };

        self.transition(next);
        Self::classify(next)
    }

    /// Steps until the machine suspends or the battle ends.
    pub fn advance(&mut self) -> Step {
        loop {
            match self.step() {
                Step::Advanced(_) => continue,
                parked => return parked,
            }
        }
    }

    /// Resume signal for `WaitingForInput`.
    ///
    /// A signal in any other state, or a selection that fails validation, is
    /// rejected and leaves every combatant untouched.
    pub fn submit_skill_selection(
        &mut self,
        skill: &SkillId,
        target: &CombatantId,
    ) -> Result<(), SignalError> {
        if self.state != CombatState::WaitingForInput {
            return Err(self.reject(SignalKind::SkillSelected));
        }
        let Some(actor) = self.current_actor.clone() else {
            return Err(self.reject(SignalKind::SkillSelected));
        };

        let chosen = validate_selection(&self.roster, &actor, skill, target).map_err(|err| {
            tracing::warn!(actor = %actor, skill = %skill, target = %target, error = %err, "skill selection rejected");
            SignalError::from(err)
        })?;

        tracing::info!(actor = %actor, skill = %skill, target = %target, "skill selected");
        self.engagement = Some(Engagement::new(chosen, target.clone()));
        self.transition(CombatState::ClashSetup);
        Ok(())
    }

    /// Resume signal for `AnimationSync`: runs end-of-turn cleanup for the
    /// actor and moves on to the next turn.
    pub fn notify_animation_complete(&mut self) -> Result<CleanupReport, SignalError> {
        if self.state != CombatState::AnimationSync {
            return Err(self.reject(SignalKind::AnimationFinished));
        }

        let report = match self
            .current_actor
            .as_ref()
            .and_then(|id| self.roster.get_mut(id))
        {
            Some(actor) => end_of_turn_cleanup(actor, self.armed.as_ref()),
            None => CleanupReport::default(),
        };

        if let Some(actor) = self.current_actor.as_ref() {
            if report.dot_damage > 0 {
                tracing::info!(target = %actor, damage = report.dot_damage, "damage over time");
                self.observer.report_damage(actor, report.dot_damage);
            }
            for effect in &report.expired {
                tracing::debug!(actor = %actor, effect = %effect.name, "effect expired");
            }
            if report.defeated {
                tracing::info!(combatant = %actor, "combatant defeated");
            }
        }

        self.transition(CombatState::StartTurn);
        Ok(report)
    }

    // ========================================================================
    // State entry actions
    // ========================================================================

    fn setup(&mut self) -> CombatState {
        tracing::info!(
            party = self.roster.side(Side::Party).len(),
            enemies = self.roster.side(Side::Enemy).len(),
            "combat setup"
        );
        self.build_round();
        CombatState::StartTurn
    }

    fn start_turn(&mut self) -> CombatState {
        self.current_actor = None;
        self.engagement = None;
        self.outcome = None;
        self.armed = None;

        if let Some(victory) = self.battle_result() {
            return CombatState::CombatEnd { victory };
        }

        let actor_id = match self.queue.next_living(&self.roster) {
            Some(id) => id,
            None => {
                if let Some(limit) = self.config.round_limit {
                    if self.round >= limit {
                        tracing::info!(round = self.round, limit, "round limit reached");
                        return CombatState::CombatEnd { victory: false };
                    }
                }
                self.build_round();
                match self.queue.next_living(&self.roster) {
                    Some(id) => id,
                    None => return CombatState::CombatEnd { victory: false },
                }
            }
        };

        let Some(actor) = self.roster.get(&actor_id) else {
            return CombatState::StartTurn;
        };
        tracing::info!(
            actor = %actor.id,
            round = self.round,
            controller = %actor.controller,
            hp = actor.current_hp(),
            "turn start"
        );
        self.current_actor = Some(actor_id.clone());

        match actor.controller {
            Controller::Player => match skip_reason(actor, &self.roster) {
                Some(reason) => self.skip_turn(reason),
                None => CombatState::WaitingForInput,
            },
            Controller::Ai => {
                let Some(selection) = self.policy.select(actor, &self.roster, &mut *self.rng)
                else {
                    let reason = skip_reason(actor, &self.roster).unwrap_or(SkipReason::NoValidTarget);
                    return self.skip_turn(reason);
                };

                match validate_selection(&self.roster, &actor_id, &selection.skill, &selection.target) {
                    Ok(skill) => {
                        tracing::info!(
                            actor = %actor_id,
                            skill = %selection.skill,
                            target = %selection.target,
                            "skill selected"
                        );
                        self.engagement = Some(Engagement::new(skill, selection.target));
                        CombatState::ClashSetup
                    }
                    Err(err) => {
                        tracing::warn!(actor = %actor_id, error = %err, "ai policy chose an invalid action");
                        self.skip_turn(SkipReason::NoValidTarget)
                    }
                }
            }
        }
    }

    fn setup_clash(&mut self) -> CombatState {
        let Some(engagement) = self.engagement.as_mut() else {
            return CombatState::DamageApplication;
        };
        if !engagement.skill.scope.invites_clash() {
            return CombatState::DamageApplication;
        }

        let counter = self
            .roster
            .get(&engagement.target)
            .filter(|target| target.is_alive())
            .and_then(|target| {
                target
                    .usable_skills()
                    .find(|skill| skill.scope.invites_clash())
                    .cloned()
            });

        match counter {
            Some(counter) => {
                tracing::debug!(target = %engagement.target, counter = %counter.id, "target answers with counter skill");
                engagement.counter = Some(counter);
                CombatState::ClashResolution
            }
            None => CombatState::DamageApplication,
        }
    }

    fn resolve_clash(&mut self) -> CombatState {
        let (Some(actor_id), Some(engagement)) =
            (self.current_actor.as_ref(), self.engagement.as_mut())
        else {
            return CombatState::DamageApplication;
        };
        let Some(counter) = engagement.counter.as_ref() else {
            return CombatState::DamageApplication;
        };
        let (Some(attacker), Some(defender)) =
            (self.roster.get(actor_id), self.roster.get(&engagement.target))
        else {
            return CombatState::DamageApplication;
        };

        let resolver = ClashResolver::new(&self.config);
        let observer = &mut self.observer;
        let outcome = resolver.resolve(
            Contestant {
                name: &attacker.name,
                attack: attacker.attack(),
                skill: &engagement.skill,
            },
            Contestant {
                name: &defender.name,
                attack: defender.attack(),
                skill: counter,
            },
            &mut *self.rng,
            |tick| observer.report_clash_tick(tick),
        );

        tracing::info!(
            actor = %actor_id,
            target = %engagement.target,
            winner = %outcome.winner,
            contests = outcome.ticks.len(),
            winning_coins = outcome.winning_coins(),
            "clash resolved"
        );
        engagement.clash = Some(outcome);
        CombatState::DamageApplication
    }

    fn apply_turn(&mut self) -> CombatState {
        let Some(actor_id) = self.current_actor.clone() else {
            return CombatState::StartTurn;
        };
        let Some(Engagement {
            skill,
            target,
            counter,
            clash,
        }) = self.engagement.take()
        else {
            if self.outcome.is_none() {
                self.outcome = Some(TurnOutcome::skipped(actor_id, SkipReason::NoValidTarget));
            }
            return CombatState::AnimationSync;
        };

        let Some(actor) = self.roster.get(&actor_id) else {
            return CombatState::StartTurn;
        };
        let attack = actor.attack();
        let opponents = actor.side.opponent();
        let mut hits = Vec::new();

        match skill.scope {
            TargetScope::SingleEnemy => match (&clash, &counter) {
                (Some(result), Some(counter_skill)) => match result.winner {
                    ClashWinner::Attacker => {
                        if let Some(defender) = self.roster.get_mut(&target) {
                            hits.push(apply_hit(attack, defender, &skill, result.attacker.win_coin_count));
                        }
                    }
                    ClashWinner::Defender => {
                        let counter_attack = self.roster.get(&target).map_or(0, Combatant::attack);
                        if let Some(attacker) = self.roster.get_mut(&actor_id) {
                            hits.push(apply_hit(
                                counter_attack,
                                attacker,
                                counter_skill,
                                result.defender.win_coin_count,
                            ));
                        }
                    }
                    ClashWinner::Draw => {
                        tracing::info!(actor = %actor_id, target = %target, "clash drawn, no damage dealt");
                    }
                },
                _ => {
                    if let Some(defender) = self.roster.get_mut(&target) {
                        hits.push(apply_hit(attack, defender, &skill, skill.coin_count));
                    }
                }
            },
            TargetScope::AllEnemies => {
                let targets: Vec<CombatantId> = self
                    .roster
                    .living(opponents)
                    .map(|enemy| enemy.id.clone())
                    .collect();
                for id in targets {
                    if let Some(enemy) = self.roster.get_mut(&id) {
                        hits.push(apply_hit(attack, enemy, &skill, skill.coin_count));
                    }
                }
            }
            TargetScope::SelfOnly | TargetScope::SingleAlly => {
                if let Some(ally) = self.roster.get_mut(&target) {
                    hits.push(apply_support(ally, &skill));
                }
            }
        }

        if skill.max_cooldown > 0 {
            if let Some(actor) = self.roster.get_mut(&actor_id) {
                actor.arm_cooldown(&skill.id, skill.max_cooldown);
            }
            self.armed = Some(skill.id.clone());
        }

        for hit in &hits {
            if hit.damage > 0 {
                tracing::info!(
                    actor = %actor_id,
                    target = %hit.target,
                    skill = %skill.id,
                    damage = hit.damage,
                    "damage applied"
                );
                self.observer.report_damage(&hit.target, hit.damage);
            }
            for effect in &hit.effects_applied {
                tracing::debug!(target = %hit.target, effect = %effect.name, duration = effect.duration, "effect applied");
                self.observer.report_effect_applied(&hit.target, effect);
            }
            if hit.defeated {
                tracing::info!(combatant = %hit.target, "combatant defeated");
            }
        }

        self.outcome = Some(TurnOutcome {
            actor: actor_id,
            skill: Some(skill.id),
            target: Some(target),
            counter_skill: counter.map(|counter| counter.id),
            clash,
            hits,
            skipped: None,
        });
        CombatState::AnimationSync
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn transition(&mut self, next: CombatState) {
        tracing::debug!(from = %self.state, to = %next, "state transition");
        self.state = next;

        match next {
            CombatState::WaitingForInput => {
                if let Some(actor) = self.current_actor.as_ref().and_then(|id| self.roster.get(id)) {
                    self.observer.request_skill_selection(actor);
                }
            }
            CombatState::AnimationSync => {
                if let (Some(actor), Some(outcome)) = (self.current_actor.as_ref(), self.outcome.as_ref()) {
                    self.observer.request_animation(actor, outcome);
                }
            }
            CombatState::CombatEnd { victory } => {
                tracing::info!(victory, rounds = self.round, "combat ended");
                self.observer.report_combat_end(victory);
            }
            _ => {}
        }
    }

    fn classify(state: CombatState) -> Step {
        match state {
            CombatState::WaitingForInput => Step::Suspended(Suspension::AwaitingSelection),
            CombatState::AnimationSync => Step::Suspended(Suspension::AwaitingAnimation),
            CombatState::CombatEnd { victory } => Step::Finished { victory },
            other => Step::Advanced(other),
        }
    }

    fn reject(&self, signal: SignalKind) -> SignalError {
        tracing::warn!(signal = %signal, state = %self.state, "resume signal rejected");
        SignalError::InvalidTransition {
            signal,
            state: self.state,
        }
    }

    fn build_round(&mut self) {
        self.round += 1;
        self.queue = TurnScheduler::prepare_round(&self.roster);
        let order = self.queue.snapshot();
        tracing::debug!(round = self.round, order = ?order, "round prepared");
        self.observer.report_turn_order(&order);
    }

    /// `Some(true)` once every enemy is down, `Some(false)` once the party is.
    fn battle_result(&self) -> Option<bool> {
        if self.roster.all_defeated(Side::Enemy) {
            Some(true)
        } else if self.roster.all_defeated(Side::Party) {
            Some(false)
        } else {
            None
        }
    }

    fn skip_turn(&mut self, reason: SkipReason) -> CombatState {
        if let Some(actor) = self.current_actor.clone() {
            tracing::warn!(actor = %actor, reason = %reason, "turn skipped");
            self.outcome = Some(TurnOutcome::skipped(actor, reason));
        }
        self.engagement = None;
        CombatState::DamageApplication
    }
}

/// Checks a selection against the actor's skill set, cooldowns and the
/// skill's target scope. Returns the chosen skill.
fn validate_selection(
    roster: &Roster,
    actor: &CombatantId,
    skill: &SkillId,
    target: &CombatantId,
) -> Result<Skill, SelectionError> {
    let chosen = roster
        .get(actor)
        .and_then(|actor| actor.skill(skill).map(|chosen| (actor, chosen)));
    let Some((actor_state, chosen)) = chosen else {
        return Err(SelectionError::UnknownSkill(skill.clone()));
    };

    let remaining = actor_state.cooldown(skill);
    if remaining > 0 {
        return Err(SelectionError::OnCooldown {
            skill: skill.clone(),
            remaining,
        });
    }

    let target_state = roster
        .get(target)
        .ok_or_else(|| SelectionError::UnknownTarget(target.clone()))?;
    if target_state.is_defeated() {
        return Err(SelectionError::TargetDefeated(target.clone()));
    }
    if !roster.valid_targets(actor, chosen.scope).contains(target) {
        return Err(SelectionError::TargetOutOfScope {
            skill: skill.clone(),
            target: target.clone(),
        });
    }

    Ok(chosen.clone())
}

/// Why `actor` cannot act this turn, if it cannot.
fn skip_reason(actor: &Combatant, roster: &Roster) -> Option<SkipReason> {
    let mut usable = actor.usable_skills().peekable();
    if usable.peek().is_none() {
        return Some(SkipReason::NoUsableSkill);
    }
    if usable.any(|skill| !roster.valid_targets(&actor.id, skill.scope).is_empty()) {
        None
    } else {
        Some(SkipReason::NoValidTarget)
    }
}
