//! Data-driven battle content and loaders.
//!
//! Rosters (skill catalog, party, enemies) are authored in RON or TOML and
//! combat tuning in TOML. Loaders validate everything up front so malformed
//! content fails before a battle is built.
//!
//! All loaders deserialize straight into clash-core types where the shapes
//! match and go through small intermediate structs where content is more compact
//! than the runtime model (skills referenced by id, optional current HP).

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CombatantSpec, ConfigLoader, ContentFactory, RosterFile, RosterFormat, RosterLoader, SkillSpec,
};
