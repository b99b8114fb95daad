/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Chance (0-100) that a single coin lands on its success face.
    pub coin_success_percent: u32,

    /// Number of rounds after which the battle is called as a defeat for the
    /// party. `None` lets the battle run until one side falls.
    pub round_limit: Option<u32>,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of combatants across both sides.
    pub const MAX_COMBATANTS: usize = 32;
    /// Contest iterations after which a clash is called a draw.
    pub const MAX_CLASH_ITERATIONS: u32 = 1_000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COIN_SUCCESS_PERCENT: u32 = 50;

    pub fn new() -> Self {
        Self {
            coin_success_percent: Self::DEFAULT_COIN_SUCCESS_PERCENT,
            round_limit: None,
        }
    }

    pub fn with_coin_success_percent(mut self, percent: u32) -> Self {
        self.coin_success_percent = percent.min(100);
        self
    }

    pub fn with_round_limit(mut self, rounds: u32) -> Self {
        self.round_limit = Some(rounds);
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
