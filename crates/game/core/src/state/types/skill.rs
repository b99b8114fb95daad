//! Skill definitions and per-clash coin bookkeeping.

use super::{SkillId, StatusEffect};

/// Who a skill may be aimed at.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetScope {
    SingleEnemy,
    AllEnemies,
    #[cfg_attr(feature = "serde", serde(rename = "Self"))]
    #[strum(serialize = "self")]
    SelfOnly,
    SingleAlly,
}

impl TargetScope {
    /// Hostile scopes deal damage; support scopes only grant effects.
    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::SingleEnemy | Self::AllEnemies)
    }

    /// Whether a single defender gets to answer with a counter-skill.
    pub const fn invites_clash(self) -> bool {
        matches!(self, Self::SingleEnemy)
    }
}

/// Immutable skill content.
///
/// Damage and clash inputs are tracked separately; unless overridden the clash
/// inputs mirror the damage inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub description: String,
    pub scope: TargetScope,

    // === Damage formula ===
    pub base_power: i32,
    /// Coins thrown; also the starting coin count of every clash.
    pub coin_count: u32,
    /// Power added per surviving coin on the final hit.
    pub coin_bonus: i32,

    // === Clash formula ===
    pub clash_base: i32,
    /// Power added per successful coin during a clash contest.
    pub clash_coin_bonus: i32,
    /// Flat power added to every clash contest roll.
    pub clash_bonus: i32,

    /// Owner turns the skill stays disabled after use.
    pub max_cooldown: u32,
    /// Templates granted to the target on a successful hit.
    pub effects_to_apply: Vec<StatusEffect>,
}

impl Skill {
    /// Creates a skill whose clash inputs mirror its damage inputs.
    pub fn new(
        id: impl Into<SkillId>,
        name: impl Into<String>,
        scope: TargetScope,
        base_power: i32,
        coin_count: u32,
        coin_bonus: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            scope,
            base_power,
            coin_count,
            coin_bonus,
            clash_base: base_power,
            clash_coin_bonus: coin_bonus,
            clash_bonus: 0,
            max_cooldown: 0,
            effects_to_apply: Vec::new(),
        }
    }

    pub fn with_clash(mut self, clash_base: i32, clash_coin_bonus: i32) -> Self {
        self.clash_base = clash_base;
        self.clash_coin_bonus = clash_coin_bonus;
        self
    }

    pub fn with_clash_bonus(mut self, clash_bonus: i32) -> Self {
        self.clash_bonus = clash_bonus;
        self
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.max_cooldown = turns;
        self
    }

    pub fn with_effect(mut self, effect: StatusEffect) -> Self {
        self.effects_to_apply.push(effect);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Runtime coin state of one skill during a single clash.
///
/// Owned by the state machine for the duration of one clash and rebuilt from
/// the skill at every clash setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClashCoins {
    /// Coins still in play; one is destroyed per lost contest.
    pub current_coin_count: u32,
    /// Coins left when the clash concluded; scales the final hit.
    pub win_coin_count: u32,
}

impl ClashCoins {
    /// Fresh coin state for a skill at clash setup.
    pub fn reset(skill: &Skill) -> Self {
        Self {
            current_coin_count: skill.coin_count,
            win_coin_count: skill.coin_count,
        }
    }

    pub fn has_coins(&self) -> bool {
        self.current_coin_count > 0
    }

    /// Destroys one coin after a lost contest.
    pub fn destroy_one(&mut self) {
        self.current_coin_count = self.current_coin_count.saturating_sub(1);
    }

    /// Locks in the surviving coins when the clash ends.
    pub fn conclude(&mut self) {
        self.win_coin_count = self.current_coin_count;
    }

    /// Zeroes both counters (a drawn clash grants no bonus to either side).
    pub fn forfeit(&mut self) {
        self.current_coin_count = 0;
        self.win_coin_count = 0;
    }
}
