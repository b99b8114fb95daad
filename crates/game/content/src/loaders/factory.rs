//! Content factory for loading battle content from a data directory.

use std::path::{Path, PathBuf};

use clash_core::{CombatConfig, Roster};

use crate::loaders::{ConfigLoader, LoadResult, RosterLoader};

/// Content factory that loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml        (optional)
/// └── rosters/
///     ├── tutorial.ron
///     └── arena.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "combat.toml";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tuning from `combat.toml`, or defaults when it is absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load `rosters/{name}.ron`, falling back to `rosters/{name}.toml`.
    pub fn load_roster(&self, name: &str) -> LoadResult<Roster> {
        let rosters = self.data_dir.join("rosters");
        let ron = rosters.join(format!("{}.ron", name));
        if ron.exists() {
            return RosterLoader::load(&ron);
        }
        RosterLoader::load(&rosters.join(format!("{}.toml", name)))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
