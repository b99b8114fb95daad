//! Content outside the shipped `data/` directory, resolved from the environment.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use clash_client::ClientConfig;
use clash_core::CombatantId;

const DUEL: &str = r#"
[[skills]]
id = "jab"
name = "Jab"
scope = "SingleEnemy"
base_power = 3
coin_count = 1
coin_bonus = 2

[[party]]
id = "duelist"
name = "Duelist"
max_hp = 40
attack = 9
defense = 2
speed = 7
skills = ["jab"]

[[enemies]]
id = "rival"
name = "Rival"
max_hp = 35
attack = 8
defense = 3
speed = 6
skills = ["jab"]
"#;

fn config_from(pairs: &[(&str, &Path)]) -> ClientConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.display().to_string()))
        .collect();
    ClientConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn named_roster_loads_from_a_custom_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("combat.toml"),
        "coin_success_percent = 65\nround_limit = 12\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("rosters")).unwrap();
    fs::write(dir.path().join("rosters").join("skirmish.toml"), DUEL).unwrap();

    let config = config_from(&[("CLASH_DATA_DIR", dir.path())]);
    let (combat, roster) = config.load_content().unwrap();

    assert_eq!(combat.coin_success_percent, 65);
    assert_eq!(combat.round_limit, Some(12));
    assert_eq!(roster.len(), 2);
    assert!(roster.get(&CombatantId::new("rival")).is_some());
}

#[test]
fn roster_path_wins_over_the_named_roster() {
    let data = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let duel = elsewhere.path().join("duel.toml");
    fs::write(&duel, DUEL).unwrap();

    // The data dir has no rosters at all; only ROSTER_PATH can satisfy the load.
    let config = config_from(&[("CLASH_DATA_DIR", data.path()), ("ROSTER_PATH", &duel)]);
    let (combat, roster) = config.load_content().unwrap();

    assert_eq!(combat, clash_core::CombatConfig::default());
    let duelist = roster.get(&CombatantId::new("duelist")).unwrap();
    assert_eq!(duelist.max_hp(), 40);
}

#[test]
fn missing_roster_reports_its_name() {
    let data = tempfile::tempdir().unwrap();
    let config = config_from(&[("CLASH_DATA_DIR", data.path())]);

    let err = config.load_content().unwrap_err();
    assert!(format!("{err:#}").contains("skirmish"));
}
