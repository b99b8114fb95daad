//! Status effect system for combatants.
//!
//! Status effects are timed stat modifiers (buffs and debuffs on Attack,
//! Defense or Speed) or damage-over-time ticks.
//!
//! # Turn-based Duration
//!
//! `duration` counts the owner's remaining turns. It is decremented once at
//! the end of each of the owner's turns; an effect that reaches zero is
//! removed. Effects are kept in application order so expiry ties resolve
//! first-in, first-out.

/// Whether an effect helps or hinders its owner.
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
pub enum EffectKind {
    Buff,
    Debuff,
}

/// The stat an effect acts on.
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
pub enum TargetStat {
    Attack,
    Defense,
    Speed,
    /// HP loss applied at the end of each of the owner's turns.
    DamageOverTime,
}

impl TargetStat {
    /// True for stats folded into the cached derived stats.
    pub const fn is_stat_modifier(self) -> bool {
        !matches!(self, Self::DamageOverTime)
    }
}

/// A single status effect instance.
///
/// Skills carry effects as templates; every application clones the template
/// into an independent instance so each application tracks its own duration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub name: String,
    pub kind: EffectKind,
    pub target_stat: TargetStat,
    /// Remaining owner turns.
    pub duration: u32,
    /// Signed magnitude. For stat modifiers this is added to the base stat;
    /// for damage over time it is the HP lost per tick.
    pub value: i32,
}

impl StatusEffect {
    pub fn new(
        name: impl Into<String>,
        kind: EffectKind,
        target_stat: TargetStat,
        duration: u32,
        value: i32,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            target_stat,
            duration,
            value,
        }
    }

    /// Creates a fresh instance from this template.
    pub fn instantiate(&self) -> Self {
        self.clone()
    }

    pub fn is_expired(&self) -> bool {
        self.duration == 0
    }
}

/// Active status effects on a combatant, in application order.
///
/// The list is unbounded: every application is kept until it expires.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Appends an effect after every effect already present.
    pub fn push(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    /// Sum of the values of every effect acting on `stat`.
    pub fn sum(&self, stat: TargetStat) -> i32 {
        self.effects
            .iter()
            .filter(|effect| effect.target_stat == stat)
            .fold(0i32, |total, effect| total.saturating_add(effect.value))
    }

    /// Decrements every effect's remaining duration by one turn.
    pub fn tick(&mut self) {
        for effect in self.effects.iter_mut() {
            effect.duration = effect.duration.saturating_sub(1);
        }
    }

    /// Removes expired effects and returns them in application order.
    pub fn drain_expired(&mut self) -> Vec<StatusEffect> {
        let (expired, kept) = std::mem::take(&mut self.effects)
            .into_iter()
            .partition(StatusEffect::is_expired);
        self.effects = kept;
        expired
    }

    /// Returns an iterator over all effects in application order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
