//! Roster loader.
//!
//! A roster file holds a shared skill catalog and the two sides of a battle.
//! Combatants reference catalog skills by id:
//!
//! ```ron
//! (
//!     skills: [
//!         (id: "slash", name: "Slash", scope: SingleEnemy,
//!          base_power: 5, coin_count: 2, coin_bonus: 3),
//!     ],
//!     party: [
//!         (id: "knight", name: "Knight", max_hp: 100,
//!          attack: 15, defense: 8, speed: 10, skills: ["slash"]),
//!     ],
//!     enemies: [ /* ... */ ],
//! )
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use clash_core::{
    BaseStats, Combatant, CombatantId, ConfigurationError, Controller, Roster, Side, Skill,
    SkillId, StatusEffect, TargetScope,
};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Skill entry of the catalog.
///
/// `clash_base` and `clash_coin_bonus` default to `base_power` and
/// `coin_bonus` when omitted.
#[derive(Clone, Debug, Deserialize)]
pub struct SkillSpec {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub scope: TargetScope,
    pub base_power: i32,
    pub coin_count: u32,
    pub coin_bonus: i32,
    #[serde(default)]
    pub clash_base: Option<i32>,
    #[serde(default)]
    pub clash_coin_bonus: Option<i32>,
    #[serde(default)]
    pub clash_bonus: i32,
    #[serde(default)]
    pub max_cooldown: u32,
    #[serde(default)]
    pub effects: Vec<StatusEffect>,
}

impl SkillSpec {
    pub fn into_skill(self) -> Skill {
        let clash_base = self.clash_base.unwrap_or(self.base_power);
        let clash_coin_bonus = self.clash_coin_bonus.unwrap_or(self.coin_bonus);

        let mut skill = Skill::new(
            self.id,
            self.name,
            self.scope,
            self.base_power,
            self.coin_count,
            self.coin_bonus,
        )
        .with_clash(clash_base, clash_coin_bonus)
        .with_clash_bonus(self.clash_bonus)
        .with_cooldown(self.max_cooldown)
        .with_description(self.description);
        skill.effects_to_apply = self.effects;
        skill
    }
}

/// Combatant entry of a roster side.
#[derive(Clone, Debug, Deserialize)]
pub struct CombatantSpec {
    pub id: CombatantId,
    pub name: String,
    /// Defaults to `Player` for the party and `Ai` for enemies.
    #[serde(default)]
    pub controller: Option<Controller>,
    pub max_hp: u32,
    /// Starting HP; full when omitted, clamped to `max_hp`.
    #[serde(default)]
    pub current_hp: Option<u32>,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub skills: Vec<SkillId>,
}

/// On-disk roster layout.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RosterFile {
    #[serde(default)]
    pub skills: Vec<SkillSpec>,
    #[serde(default)]
    pub party: Vec<CombatantSpec>,
    #[serde(default)]
    pub enemies: Vec<CombatantSpec>,
}

impl RosterFile {
    /// Resolves skill references and registers every combatant.
    ///
    /// Fails on the first malformed entry; the error wraps the underlying
    /// [`ConfigurationError`] when one applies.
    pub fn into_roster(self) -> LoadResult<Roster> {
        let mut catalog: HashMap<SkillId, Skill> = HashMap::with_capacity(self.skills.len());
        for spec in self.skills {
            let id = spec.id.clone();
            if catalog.insert(id.clone(), spec.into_skill()).is_some() {
                anyhow::bail!("Skill '{}' is defined more than once in the catalog", id);
            }
        }

        let mut roster = Roster::new();
        let sides = [(Side::Party, self.party), (Side::Enemy, self.enemies)];
        for (side, specs) in sides {
            for spec in specs {
                let id = spec.id.clone();
                let combatant = build_combatant(spec, side, &catalog)
                    .with_context(|| format!("Invalid combatant '{}'", id))?;
                roster
                    .register(combatant)
                    .with_context(|| format!("Failed to register combatant '{}'", id))?;
            }
        }

        roster.validate_complete()?;
        Ok(roster)
    }
}

fn build_combatant(
    spec: CombatantSpec,
    side: Side,
    catalog: &HashMap<SkillId, Skill>,
) -> Result<Combatant, ConfigurationError> {
    let skills = spec
        .skills
        .iter()
        .map(|skill_id| {
            catalog
                .get(skill_id)
                .cloned()
                .ok_or_else(|| ConfigurationError::UnknownSkill {
                    combatant: spec.id.clone(),
                    skill: skill_id.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let controller = spec.controller.unwrap_or(match side {
        Side::Party => Controller::Player,
        Side::Enemy => Controller::Ai,
    });

    let mut combatant = Combatant::new(
        spec.id,
        spec.name,
        side,
        controller,
        spec.max_hp,
        BaseStats::new(spec.attack, spec.defense, spec.speed),
    )
    .with_skills(skills);
    if let Some(hp) = spec.current_hp {
        combatant = combatant.with_current_hp(hp);
    }
    Ok(combatant)
}

/// Serialization format of a roster file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RosterFormat {
    Ron,
    Toml,
}

impl RosterFormat {
    /// Picks the format from a file extension (`.ron` or `.toml`).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(Self::Ron),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(anyhow::anyhow!(
                "Unsupported roster format for {} (expected .ron or .toml)",
                path.display()
            )),
        }
    }
}

/// Loader for battle rosters from RON or TOML files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load and validate a roster, choosing the format by extension.
    pub fn load(path: &Path) -> LoadResult<Roster> {
        let format = RosterFormat::from_path(path)?;
        let content = read_file(path)?;
        Self::parse(&content, format)
            .with_context(|| format!("Failed to load roster {}", path.display()))
    }

    /// Parse and validate roster content already in memory.
    pub fn parse(content: &str, format: RosterFormat) -> LoadResult<Roster> {
        let file: RosterFile = match format {
            RosterFormat::Ron => ron::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?,
            RosterFormat::Toml => toml::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse roster TOML: {}", e))?,
        };
        file.into_roster()
    }
}
