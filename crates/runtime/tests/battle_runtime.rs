//! Battles driven end to end through the async runtime.

use std::time::Duration;

use clash_core::{
    BaseStats, CombatConfig, Combatant, CombatantId, Controller, Roster, SelectionError, Side,
    SignalError, Skill, SkillSelection, TargetScope,
};
use runtime::{
    BattleEvent, BattleReport, DelayedPresentation, Event, FirstAvailableProvider, PolicySelectionProvider,
    ProviderKind, Runtime, RuntimeConfig, RuntimeError, ScriptedSelectionProvider, Topic,
    TurnEvent,
};
use tokio::sync::broadcast::Receiver;

fn hero() -> Combatant {
    Combatant::new("hero", "Hero", Side::Party, Controller::Player, 100, BaseStats::new(15, 8, 10))
        .with_skill(Skill::new("strike", "Strike", TargetScope::SingleEnemy, 5, 2, 3))
}

/// Never clashes back, so every hero strike lands unopposed for 26.
fn slime() -> Combatant {
    Combatant::new("slime", "Slime", Side::Enemy, Controller::Ai, 20, BaseStats::new(3, 0, 1))
        .with_skill(Skill::new("wobble", "Wobble", TargetScope::SelfOnly, 0, 1, 0))
}

fn roster(combatants: impl IntoIterator<Item = Combatant>) -> Roster {
    let mut roster = Roster::new();
    for combatant in combatants {
        roster.register(combatant).unwrap();
    }
    roster
}

fn strike(target: &str) -> SkillSelection {
    SkillSelection::new("strike", target)
}

fn drain(rx: &mut Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn scripted_battle_reports_victory() {
    let mut runtime = Runtime::builder()
        .seed(7)
        .roster(roster([hero(), slime()]))
        .selection_provider(ScriptedSelectionProvider::new([strike("slime")]))
        .build()
        .unwrap();

    let report = runtime.run().await.unwrap();
    assert!(report.victory);
    assert_eq!(report.rounds, 1);
    assert_eq!(report.turns, 1);
    assert_eq!(report.seed, 7);
    assert_eq!(report.survivors, vec![CombatantId::new("hero")]);

    // Finished battles keep answering with the same report.
    assert_eq!(runtime.step().await.unwrap(), Some(report));
    assert!(runtime.is_finished());
}

#[tokio::test]
async fn events_are_published_per_topic() {
    let mut runtime = Runtime::builder()
        .seed(1)
        .roster(roster([hero(), slime()]))
        .selection_provider(ScriptedSelectionProvider::new([strike("slime")]))
        .build()
        .unwrap();
    let mut battle_rx = runtime.subscribe(Topic::Battle);
    let mut turn_rx = runtime.subscribe(Topic::Turn);
    let mut clash_rx = runtime.subscribe(Topic::Clash);

    runtime.run().await.unwrap();

    assert_eq!(
        drain(&mut battle_rx),
        vec![
            Event::Battle(BattleEvent::RoundStarted {
                round: 1,
                order: vec![CombatantId::new("hero"), CombatantId::new("slime")],
            }),
            Event::Battle(BattleEvent::Ended { victory: true }),
        ]
    );

    let turn_events = drain(&mut turn_rx);
    assert_eq!(turn_events.len(), 5, "{turn_events:?}");
    assert!(matches!(&turn_events[0], Event::Turn(TurnEvent::AwaitingSelection { actor }) if actor.as_str() == "hero"));
    assert!(matches!(&turn_events[1], Event::Turn(TurnEvent::SkillSelected { selection, .. }) if *selection == strike("slime")));
    assert!(matches!(&turn_events[2], Event::Turn(TurnEvent::DamageDealt { amount: 26, .. })));
    assert!(matches!(&turn_events[3], Event::Turn(TurnEvent::Resolved { outcome }) if outcome.total_damage() == 26));
    assert!(matches!(&turn_events[4], Event::Turn(TurnEvent::Cleanup { actor, .. }) if actor.as_str() == "hero"));

    assert!(drain(&mut clash_rx).is_empty());
}

#[tokio::test]
async fn invalid_selection_is_asked_again() {
    let script = ScriptedSelectionProvider::new([strike("hero"), strike("slime")]);
    let mut runtime = Runtime::builder()
        .seed(3)
        .roster(roster([hero(), slime()]))
        .build()
        .unwrap();
    runtime.set_selection_provider(script);

    let report = runtime.run().await.unwrap();
    assert!(report.victory);
}

#[tokio::test]
async fn repeated_invalid_selections_abort_the_run() {
    let config = RuntimeConfig {
        max_selection_attempts: 2,
        ..RuntimeConfig::default()
    };
    let mut runtime = Runtime::builder()
        .config(config)
        .seed(3)
        .roster(roster([hero(), slime()]))
        .selection_provider(ScriptedSelectionProvider::new([strike("hero"), strike("ghost")]))
        .build()
        .unwrap();

    let err = runtime.run().await.unwrap_err();
    match err {
        RuntimeError::SelectionRejected { actor, attempts, source } => {
            assert_eq!(actor.as_str(), "hero");
            assert_eq!(attempts, 2);
            assert!(matches!(
                source,
                SignalError::InvalidSelection(SelectionError::UnknownTarget(_))
            ));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Nothing was applied; the machine is still waiting for the hero.
    let snapshot = runtime.snapshot();
    assert_eq!(snapshot.current_actor, Some(CombatantId::new("hero")));
    assert_eq!(snapshot.roster.get(&CombatantId::new("slime")).unwrap().current_hp(), 20);
}

#[tokio::test]
async fn player_turn_without_provider_fails() {
    let mut runtime = Runtime::builder()
        .roster(roster([hero(), slime()]))
        .build()
        .unwrap();

    let err = runtime.step().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::ProviderNotSet {
            kind: ProviderKind::Selection
        }
    ));
}

#[tokio::test]
async fn build_requires_a_roster() {
    let err = Runtime::builder().build().err().expect("missing roster");
    assert!(matches!(err, RuntimeError::MissingRoster));

    let err = Runtime::builder()
        .roster(roster([hero()]))
        .build()
        .err()
        .expect("one-sided roster");
    assert!(matches!(err, RuntimeError::Configuration(_)));
}

fn ogre() -> Combatant {
    Combatant::new("ogre", "Ogre", Side::Enemy, Controller::Ai, 60, BaseStats::new(12, 4, 6))
        .with_skill(Skill::new("club", "Club", TargetScope::SingleEnemy, 4, 2, 2))
}

async fn auto_battle(seed: u64) -> (BattleReport, Vec<Event>) {
    let config = RuntimeConfig {
        combat: CombatConfig::default().with_round_limit(20),
        seed: Some(seed),
        event_buffer_size: 4096,
        ..RuntimeConfig::default()
    };
    let mut runtime = Runtime::builder()
        .config(config)
        .roster(roster([hero(), ogre()]))
        .selection_provider(PolicySelectionProvider::auto_battle(seed))
        .presentation_provider(DelayedPresentation::new(Duration::from_millis(1)))
        .build()
        .unwrap();
    let mut clash_rx = runtime.subscribe(Topic::Clash);
    let report = runtime.run().await.unwrap();
    (report, drain(&mut clash_rx))
}

#[tokio::test]
async fn seeded_auto_battles_are_reproducible() {
    let (first, first_ticks) = auto_battle(99).await;
    let (second, second_ticks) = auto_battle(99).await;
    assert_eq!(first, second);
    assert_eq!(first_ticks, second_ticks);
    assert!(!first_ticks.is_empty());
}

#[tokio::test]
async fn roster_file_is_loaded_at_build() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("duel.ron");
    std::fs::write(
        &path,
        r#"(
            skills: [
                (id: "strike", name: "Strike", scope: SingleEnemy, base_power: 5, coin_count: 2, coin_bonus: 3),
                (id: "wobble", name: "Wobble", scope: Self, base_power: 0, coin_count: 1, coin_bonus: 0),
            ],
            party: [(id: "hero", name: "Hero", max_hp: 100, attack: 15, defense: 8, speed: 10, skills: ["strike"])],
            enemies: [(id: "slime", name: "Slime", max_hp: 20, attack: 3, defense: 0, speed: 1, skills: ["wobble"])],
        )"#,
    )
    .unwrap();

    let mut runtime = Runtime::builder()
        .seed(5)
        .roster_path(&path)
        .selection_provider(FirstAvailableProvider)
        .build()
        .unwrap();
    assert!(runtime.run().await.unwrap().victory);

    let missing = dir.path().join("missing.ron");
    let err = Runtime::builder()
        .roster_path(&missing)
        .build()
        .err()
        .expect("missing file");
    match err {
        RuntimeError::Content { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}
