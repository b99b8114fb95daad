//! Client configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clash_content::{ContentFactory, RosterLoader};
use clash_core::{CombatConfig, Roster};

/// Everything the `clash` binary needs before a battle can start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Directory holding `combat.toml` and `rosters/`.
    pub data_dir: PathBuf,
    /// Roster name under `rosters/`, without extension.
    pub roster: String,
    /// Explicit roster file; takes precedence over `roster`.
    pub roster_path: Option<PathBuf>,
    pub seed: Option<u64>,
    /// Let the random policy play the party too.
    pub auto_battle: bool,
    pub coin_success_percent: Option<u32>,
    pub round_limit: Option<u32>,
    pub animation_delay: Duration,
    pub session_id: Option<String>,
    pub log_to_stderr: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
            roster: Self::DEFAULT_ROSTER.to_string(),
            roster_path: None,
            seed: None,
            auto_battle: false,
            coin_success_percent: None,
            round_limit: None,
            animation_delay: Duration::from_millis(Self::DEFAULT_ANIMATION_DELAY_MS),
            session_id: None,
            log_to_stderr: false,
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "data";
    pub const DEFAULT_ROSTER: &'static str = "skirmish";
    pub const DEFAULT_ANIMATION_DELAY_MS: u64 = 400;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CLASH_DATA_DIR` - Content directory (default: `data`)
    /// - `CLASH_ROSTER` - Roster to fight (default: `skirmish`)
    /// - `ROSTER_PATH` - Roster file to load instead of `CLASH_ROSTER`
    /// - `BATTLE_SEED` - Fixed battle seed (default: random)
    /// - `AUTO_BATTLE` - Let the AI play the party (default: false)
    /// - `COIN_SUCCESS_PERCENT` - Overrides `combat.toml`
    /// - `ROUND_LIMIT` - Overrides `combat.toml`
    /// - `ANIMATION_DELAY_MS` - Pause after each turn (default: 400)
    /// - `BATTLE_SESSION_ID` - Log directory name (default: auto-generated)
    /// - `LOG_TO_STDERR` - Mirror logs to stderr (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = read("CLASH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(roster) = read("CLASH_ROSTER") {
            config.roster = roster;
        }
        config.roster_path = read("ROSTER_PATH").map(PathBuf::from);

        config.seed = parse(read("BATTLE_SEED"));
        config.auto_battle = flag(read("AUTO_BATTLE"));
        config.coin_success_percent = parse::<u32>(read("COIN_SUCCESS_PERCENT"))
            .map(|percent| percent.min(100));
        config.round_limit = parse(read("ROUND_LIMIT"));

        if let Some(ms) = parse::<u64>(read("ANIMATION_DELAY_MS")) {
            config.animation_delay = Duration::from_millis(ms);
        }

        config.session_id = read("BATTLE_SESSION_ID");
        config.log_to_stderr = flag(read("LOG_TO_STDERR"));

        config
    }

    /// Applies the environment overrides on top of file-based combat tuning.
    pub fn combat_config(&self, mut base: CombatConfig) -> CombatConfig {
        if let Some(percent) = self.coin_success_percent {
            base = base.with_coin_success_percent(percent);
        }
        if let Some(rounds) = self.round_limit {
            base = base.with_round_limit(rounds);
        }
        base
    }

    /// Loads combat tuning and the roster this configuration points at.
    ///
    /// `roster_path` wins over the named roster under `data_dir`; the
    /// environment overrides are applied on top of `combat.toml`.
    pub fn load_content(&self) -> Result<(CombatConfig, Roster)> {
        let factory = ContentFactory::new(&self.data_dir);
        let combat = self.combat_config(factory.load_config()?);
        let roster = match &self.roster_path {
            Some(path) => RosterLoader::load(path)?,
            None => factory
                .load_roster(&self.roster)
                .with_context(|| format!("Failed to load roster '{}'", self.roster))?,
        };
        Ok((combat, roster))
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

/// A present variable counts as set unless it spells out a false value.
fn flag(value: Option<String>) -> bool {
    match value {
        Some(value) => !matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(config_from(&[]), ClientConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("CLASH_DATA_DIR", "/srv/clash"),
            ("CLASH_ROSTER", "boss"),
            ("ROSTER_PATH", "duel.toml"),
            ("BATTLE_SEED", "1234"),
            ("AUTO_BATTLE", "1"),
            ("COIN_SUCCESS_PERCENT", "70"),
            ("ROUND_LIMIT", "12"),
            ("ANIMATION_DELAY_MS", "0"),
            ("BATTLE_SESSION_ID", "duel"),
            ("LOG_TO_STDERR", "true"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/srv/clash"));
        assert_eq!(config.roster, "boss");
        assert_eq!(config.roster_path, Some(PathBuf::from("duel.toml")));
        assert_eq!(config.seed, Some(1234));
        assert!(config.auto_battle);
        assert_eq!(config.coin_success_percent, Some(70));
        assert_eq!(config.round_limit, Some(12));
        assert_eq!(config.animation_delay, Duration::ZERO);
        assert_eq!(config.session_id.as_deref(), Some("duel"));
        assert!(config.log_to_stderr);
    }

    #[test]
    fn malformed_values_are_ignored() {
        let config = config_from(&[
            ("BATTLE_SEED", "soon"),
            ("AUTO_BATTLE", "off"),
            ("COIN_SUCCESS_PERCENT", "250"),
            ("BATTLE_SESSION_ID", "  "),
        ]);
        assert_eq!(config.seed, None);
        assert!(!config.auto_battle);
        assert_eq!(config.coin_success_percent, Some(100));
        assert_eq!(config.session_id, None);
    }

    #[test]
    fn environment_overrides_file_tuning() {
        let config = config_from(&[("ROUND_LIMIT", "5")]);
        let combat = config.combat_config(CombatConfig::default().with_coin_success_percent(40));
        assert_eq!(combat.coin_success_percent, 40);
        assert_eq!(combat.round_limit, Some(5));
    }
}
