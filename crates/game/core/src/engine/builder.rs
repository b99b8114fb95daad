use crate::combat::{AiPolicy, RandomPolicy};
use crate::config::CombatConfig;
use crate::error::ConfigurationError;
use crate::rng::{PcgRng, RngOracle};
use crate::state::{Combatant, Roster};

use super::{CombatObserver, CombatStateMachine, NoopObserver};

/// Assembles a [`CombatStateMachine`] with its collaborators.
///
/// Combatants are validated as they are registered, so malformed content
/// fails before the battle exists. `build` additionally requires both sides
/// to be populated.
pub struct CombatBuilder {
    config: CombatConfig,
    roster: Roster,
    rng: Box<dyn RngOracle>,
    observer: Box<dyn CombatObserver>,
    policy: Box<dyn AiPolicy>,
}

impl CombatBuilder {
    /// Seed used when no RNG is supplied.
    pub const DEFAULT_SEED: u64 = 0;

    pub fn new() -> Self {
        Self {
            config: CombatConfig::default(),
            roster: Roster::new(),
            rng: Box::new(PcgRng::seed_from_u64(Self::DEFAULT_SEED)),
            observer: Box::new(NoopObserver),
            policy: Box::new(RandomPolicy),
        }
    }

    pub fn config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn seed(self, seed: u64) -> Self {
        self.rng(PcgRng::seed_from_u64(seed))
    }

    pub fn observer(mut self, observer: impl CombatObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn policy(mut self, policy: impl AiPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Validates and adds one combatant.
    pub fn register_combatant(&mut self, combatant: Combatant) -> Result<(), ConfigurationError> {
        let id = combatant.id.clone();
        self.roster.register(combatant).inspect_err(|err| {
            tracing::warn!(combatant = %id, error = %err, "combatant rejected");
        })
    }

    pub fn with_combatant(mut self, combatant: Combatant) -> Result<Self, ConfigurationError> {
        self.register_combatant(combatant)?;
        Ok(self)
    }

    pub fn with_combatants(
        mut self,
        combatants: impl IntoIterator<Item = Combatant>,
    ) -> Result<Self, ConfigurationError> {
        for combatant in combatants {
            self.register_combatant(combatant)?;
        }
        Ok(self)
    }

    /// Registers every combatant of an already assembled roster, in order.
    pub fn with_roster(self, roster: Roster) -> Result<Self, ConfigurationError> {
        let (party, enemies) = roster.into_sides();
        self.with_combatants(party.into_iter().chain(enemies))
    }

    /// Finishes setup. The machine starts in `Setup`.
    pub fn build(self) -> Result<CombatStateMachine, ConfigurationError> {
        self.roster.validate_complete()?;
        tracing::debug!(
            combatants = self.roster.len(),
            coin_success_percent = self.config.coin_success_percent,
            round_limit = ?self.config.round_limit,
            "combat state machine built"
        );
        Ok(CombatStateMachine::new(
            self.config,
            self.roster,
            self.rng,
            self.observer,
            self.policy,
        ))
    }
}

impl Default for CombatBuilder {
    fn default() -> Self {
        Self::new()
    }
}
