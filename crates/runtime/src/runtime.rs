//! High-level battle orchestrator.
//!
//! The runtime owns a [`CombatStateMachine`], fills its two suspension points
//! from async providers, and fans engine notifications out over the
//! [`EventBus`]. Clients configure it through [`RuntimeBuilder`].

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast;

use clash_content::RosterLoader;
use clash_core::{
    AiPolicy, BattleSnapshot, CombatBuilder, CombatConfig, CombatStateMachine, CombatantId,
    Roster, Step, Suspension,
};

use crate::api::{
    InstantPresentation, PresentationProvider, ProviderKind, Result, RuntimeError,
    SelectionProvider,
};
use crate::events::{Event, EventBus, EventObserver, Topic, TurnEvent};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub event_buffer_size: usize,
    /// Battle seed; drawn from the OS when absent.
    pub seed: Option<u64>,
    /// How many times a player is asked again after an invalid selection.
    pub max_selection_attempts: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            event_buffer_size: 100,
            seed: None,
            max_selection_attempts: 3,
        }
    }
}

/// Summary of a finished battle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BattleReport {
    pub victory: bool,
    pub rounds: u32,
    /// Turns that reached animation sync, skipped ones included.
    pub turns: u32,
    pub seed: u64,
    pub survivors: Vec<CombatantId>,
}

/// Main runtime that drives one battle to completion.
pub struct Runtime {
    machine: CombatStateMachine,
    bus: EventBus,

    selection: Option<Arc<dyn SelectionProvider>>,
    presentation: Arc<dyn PresentationProvider>,

    max_selection_attempts: u32,
    seed: u64,
    turns: u32,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Subscribe to one event topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        self.machine.snapshot()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_finished(&self) -> bool {
        self.machine.is_finished()
    }

    /// Advance the battle to its next suspension point and resolve it.
    ///
    /// Returns the final report once the battle has ended; every call after
    /// that returns the same report.
    pub async fn step(&mut self) -> Result<Option<BattleReport>> {
        match self.machine.advance() {
            Step::Finished { victory } => Ok(Some(self.report(victory))),
            Step::Suspended(Suspension::AwaitingSelection) => {
                self.collect_selection().await?;
                Ok(None)
            }
            Step::Suspended(Suspension::AwaitingAnimation) => {
                self.present_turn().await?;
                Ok(None)
            }
            Step::Advanced(_) => Ok(None),
        }
    }

    /// Run the battle until one side falls or the round limit is hit.
    pub async fn run(&mut self) -> Result<BattleReport> {
        loop {
            if let Some(report) = self.step().await? {
                tracing::info!(
                    victory = report.victory,
                    rounds = report.rounds,
                    turns = report.turns,
                    seed = report.seed,
                    "battle finished"
                );
                return Ok(report);
            }
        }
    }

    pub fn set_selection_provider(&mut self, provider: impl SelectionProvider + 'static) {
        self.selection = Some(Arc::new(provider));
    }

    pub fn set_presentation_provider(&mut self, provider: impl PresentationProvider + 'static) {
        self.presentation = Arc::new(provider);
    }

    async fn collect_selection(&mut self) -> Result<()> {
        let provider = self
            .selection
            .clone()
            .ok_or(RuntimeError::ProviderNotSet {
                kind: ProviderKind::Selection,
            })?;
        let Some(actor) = self.machine.current_actor().cloned() else {
            return Ok(());
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            let snapshot = self.machine.snapshot();
            let selection = provider.select_skill(&actor, &snapshot).await?;

            match self
                .machine
                .submit_skill_selection(&selection.skill, &selection.target)
            {
                Ok(()) => {
                    self.bus.publish(TurnEvent::SkillSelected {
                        actor: actor.id.clone(),
                        selection,
                    });
                    return Ok(());
                }
                Err(err) if err.severity().is_recoverable() && attempts < self.max_selection_attempts => {
                    tracing::debug!(actor = %actor.id, attempts, error = %err, "asking for another selection");
                }
                Err(source) => {
                    return Err(RuntimeError::SelectionRejected {
                        actor: actor.id.clone(),
                        attempts,
                        source,
                    });
                }
            }
        }
    }

    async fn present_turn(&mut self) -> Result<()> {
        let Some(outcome) = self.machine.pending_outcome().cloned() else {
            return Ok(());
        };
        let snapshot = self.machine.snapshot();
        self.presentation.present_turn(&outcome, &snapshot).await?;

        let report = self.machine.notify_animation_complete()?;
        self.turns += 1;
        self.bus.publish(TurnEvent::Cleanup {
            actor: outcome.actor,
            report,
        });
        Ok(())
    }

    fn report(&self, victory: bool) -> BattleReport {
        BattleReport {
            victory,
            rounds: self.machine.round(),
            turns: self.turns,
            seed: self.seed,
            survivors: self
                .machine
                .roster()
                .iter()
                .filter(|combatant| combatant.is_alive())
                .map(|combatant| combatant.id.clone())
                .collect(),
        }
    }
}

/// Builder for [`Runtime`].
///
/// A roster is required, either in memory or as a path to a roster file. The
/// selection provider may be set later with
/// [`Runtime::set_selection_provider`]; presentation defaults to
/// [`InstantPresentation`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    roster: Option<Roster>,
    roster_path: Option<PathBuf>,
    selection: Option<Arc<dyn SelectionProvider>>,
    presentation: Option<Arc<dyn PresentationProvider>>,
    policy: Option<Box<dyn AiPolicy>>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            roster: None,
            roster_path: None,
            selection: None,
            presentation: None,
            policy: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Load the roster from a `.ron` or `.toml` file at build time.
    pub fn roster_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.roster_path = Some(path.into());
        self
    }

    pub fn selection_provider(mut self, provider: impl SelectionProvider + 'static) -> Self {
        self.selection = Some(Arc::new(provider));
        self
    }

    pub fn presentation_provider(mut self, provider: impl PresentationProvider + 'static) -> Self {
        self.presentation = Some(Arc::new(provider));
        self
    }

    /// Policy for enemy turns; random when unset.
    pub fn ai_policy(mut self, policy: impl AiPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    pub fn build(self) -> Result<Runtime> {
        let roster = match (self.roster, self.roster_path) {
            (Some(roster), _) => roster,
            (None, Some(path)) => {
                RosterLoader::load(&path).map_err(|err| RuntimeError::Content {
                    reason: format!("{err:#}"),
                    path,
                })?
            }
            (None, None) => return Err(RuntimeError::MissingRoster),
        };

        let RuntimeConfig {
            combat,
            event_buffer_size,
            seed,
            max_selection_attempts,
        } = self.config;
        let seed = seed.unwrap_or_else(rand::random);
        let bus = EventBus::with_capacity(event_buffer_size);

        let mut combat_builder = CombatBuilder::new()
            .config(combat)
            .seed(seed)
            .observer(EventObserver::new(bus.clone()));
        if let Some(policy) = self.policy {
            combat_builder = combat_builder.policy(policy);
        }
        let machine = combat_builder.with_roster(roster)?.build()?;

        tracing::info!(seed, combatants = machine.roster().len(), "runtime ready");

        Ok(Runtime {
            machine,
            bus,
            selection: self.selection,
            presentation: self
                .presentation
                .unwrap_or_else(|| Arc::new(InstantPresentation)),
            max_selection_attempts: max_selection_attempts.max(1),
            seed,
            turns: 0,
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
