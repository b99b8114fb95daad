//! Clash battle client binary.
//!
//! # Examples
//!
//! ```bash
//! # Fight the default roster from ./data
//! cargo run -p clash-client
//!
//! # Watch a reproducible auto-battle with a different roster
//! CLASH_ROSTER=boss AUTO_BATTLE=1 BATTLE_SEED=42 cargo run -p clash-client
//!
//! # Load a roster file from anywhere
//! ROSTER_PATH=/tmp/duel.ron cargo run -p clash-client
//! ```

use anyhow::Result;
use clash_client::console::{self, ConsolePresentation, ConsoleSelection};
use clash_client::{ClientConfig, logging};
use runtime::{PolicySelectionProvider, Runtime, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let log_file = logging::setup_logging(config.session_id.as_deref(), config.log_to_stderr)?;

    tracing::info!(
        data_dir = %config.data_dir.display(),
        roster = %config.roster,
        auto_battle = config.auto_battle,
        "starting clash client"
    );

    let (combat, roster) = config.load_content()?;
    let names = roster.clone();

    let mut runtime = Runtime::builder()
        .config(RuntimeConfig {
            combat,
            seed: config.seed,
            ..RuntimeConfig::default()
        })
        .roster(roster)
        .presentation_provider(ConsolePresentation::new(config.animation_delay))
        .build()?;

    if config.auto_battle {
        runtime.set_selection_provider(PolicySelectionProvider::auto_battle(runtime.seed()));
    } else {
        runtime.set_selection_provider(ConsoleSelection::new());
    }

    println!("Battle seed {} (log: {})", runtime.seed(), log_file.display());
    let battle_log = console::spawn_battle_log(runtime.event_bus(), names);

    let report = runtime.run().await?;
    battle_log.await.ok();

    println!(
        "{} rounds, {} turns. Standing: {}",
        report.rounds,
        report.turns,
        report
            .survivors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
