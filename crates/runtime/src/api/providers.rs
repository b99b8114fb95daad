//! Asynchronous seams for player intent and turn presentation.
//!
//! The combat engine parks at two points: waiting for a skill choice and
//! waiting for the turn to be shown. The runtime fills each with a provider
//! so a battle can run against a terminal, a scripted fixture, or an AI
//! policy without touching the engine.
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use clash_core::{
    AiPolicy, BattleSnapshot, Combatant, PcgRng, RandomPolicy, SkillSelection, TurnOutcome,
};
use tokio::sync::Mutex;

use super::errors::{ProviderKind, Result, RuntimeError};

/// Supplies the skill and target for a player-controlled actor.
#[async_trait]
pub trait SelectionProvider: Send + Sync {
    /// Choose a skill for `actor`.
    ///
    /// The choice is validated by the engine; a rejected choice is asked for
    /// again up to the runtime's retry limit.
    async fn select_skill(
        &self,
        actor: &Combatant,
        snapshot: &BattleSnapshot,
    ) -> Result<SkillSelection>;
}

/// Plays back a resolved turn. The battle resumes once this returns.
#[async_trait]
pub trait PresentationProvider: Send + Sync {
    async fn present_turn(&self, outcome: &TurnOutcome, snapshot: &BattleSnapshot) -> Result<()>;
}

/// Always takes the first ready skill against its first valid target.
pub struct FirstAvailableProvider;

#[async_trait]
impl SelectionProvider for FirstAvailableProvider {
    async fn select_skill(
        &self,
        actor: &Combatant,
        snapshot: &BattleSnapshot,
    ) -> Result<SkillSelection> {
        actor
            .usable_skills()
            .find_map(|skill| {
                snapshot
                    .roster
                    .valid_targets(&actor.id, skill.scope)
                    .into_iter()
                    .next()
                    .map(|target| SkillSelection::new(skill.id.clone(), target))
            })
            .ok_or_else(|| {
                RuntimeError::provider(
                    ProviderKind::Selection,
                    format!("{} has no skill with a valid target", actor.id),
                )
            })
    }
}

/// Delegates player turns to an [`AiPolicy`], for auto-battle.
pub struct PolicySelectionProvider {
    inner: Mutex<PolicyState>,
}

struct PolicyState {
    policy: Box<dyn AiPolicy>,
    rng: PcgRng,
}

impl PolicySelectionProvider {
    pub fn new(policy: impl AiPolicy + 'static, seed: u64) -> Self {
        Self {
            inner: Mutex::new(PolicyState {
                policy: Box::new(policy),
                rng: PcgRng::seed_from_u64(seed),
            }),
        }
    }

    pub fn random(seed: u64) -> Self {
        Self::new(RandomPolicy, seed)
    }

    /// Random-policy provider for the party in a battle seeded with `battle_seed`.
    ///
    /// The engine already draws coins and enemy choices from `battle_seed`;
    /// party choices come from [`party_seed`](Self::party_seed) so the two
    /// sequences never line up.
    pub fn auto_battle(battle_seed: u64) -> Self {
        Self::random(Self::party_seed(battle_seed))
    }

    /// Seed of the party's choice stream for a given battle seed.
    pub const fn party_seed(battle_seed: u64) -> u64 {
        battle_seed ^ Self::PARTY_STREAM
    }

    const PARTY_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;
}

#[async_trait]
impl SelectionProvider for PolicySelectionProvider {
    async fn select_skill(
        &self,
        actor: &Combatant,
        snapshot: &BattleSnapshot,
    ) -> Result<SkillSelection> {
        let mut guard = self.inner.lock().await;
        let PolicyState { policy, rng } = &mut *guard;
        policy.select(actor, &snapshot.roster, rng).ok_or_else(|| {
            RuntimeError::provider(
                ProviderKind::Selection,
                format!("policy found nothing for {} to do", actor.id),
            )
        })
    }
}

/// Replays a fixed list of selections in order.
pub struct ScriptedSelectionProvider {
    script: Mutex<VecDeque<SkillSelection>>,
}

impl ScriptedSelectionProvider {
    pub fn new(script: impl IntoIterator<Item = SkillSelection>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl SelectionProvider for ScriptedSelectionProvider {
    async fn select_skill(
        &self,
        actor: &Combatant,
        _snapshot: &BattleSnapshot,
    ) -> Result<SkillSelection> {
        self.script.lock().await.pop_front().ok_or_else(|| {
            RuntimeError::provider(
                ProviderKind::Selection,
                format!("script exhausted before {}'s turn", actor.id),
            )
        })
    }
}

/// Resumes immediately.
pub struct InstantPresentation;

#[async_trait]
impl PresentationProvider for InstantPresentation {
    async fn present_turn(&self, _outcome: &TurnOutcome, _snapshot: &BattleSnapshot) -> Result<()> {
        Ok(())
    }
}

/// Holds every turn on screen for a fixed delay.
pub struct DelayedPresentation {
    delay: Duration,
}

impl DelayedPresentation {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PresentationProvider for DelayedPresentation {
    async fn present_turn(&self, outcome: &TurnOutcome, _snapshot: &BattleSnapshot) -> Result<()> {
        tracing::trace!(actor = %outcome.actor, delay_ms = self.delay.as_millis() as u64, "holding turn");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clash_core::RngOracle;

    fn draws(seed: u64) -> Vec<u32> {
        let mut rng = PcgRng::seed_from_u64(seed);
        (0..16).map(|_| rng.next_u32()).collect()
    }

    #[test]
    fn party_stream_diverges_from_battle_stream() {
        for battle_seed in [0, 1, 42, u64::MAX] {
            let party_seed = PolicySelectionProvider::party_seed(battle_seed);
            assert_ne!(party_seed, battle_seed);

            assert_ne!(draws(battle_seed), draws(party_seed));
        }
    }
}
