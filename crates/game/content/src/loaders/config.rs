//! Combat configuration loader.

use std::path::Path;

use clash_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`CombatConfig::default`].
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.coin_success_percent > 100 {
            anyhow::bail!(
                "coin_success_percent must be between 0 and 100, got {}",
                config.coin_success_percent
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), CombatConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = ConfigLoader::parse("coin_success_percent = 65\nround_limit = 30\n").unwrap();
        assert_eq!(config.coin_success_percent, 65);
        assert_eq!(config.round_limit, Some(30));
    }

    #[test]
    fn rejects_impossible_chance() {
        assert!(ConfigLoader::parse("coin_success_percent = 101").is_err());
    }
}
