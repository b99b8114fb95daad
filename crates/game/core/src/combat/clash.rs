//! Clash resolution: the repeated coin contest between two opposing skills.
//!
//! # Algorithm
//!
//! While both skills still hold coins, each side rolls a contest power:
//!
//! ```text
//! power = attack + clash_base + clash_bonus + successes × clash_coin_bonus
//! ```
//!
//! where every remaining coin is flipped again each iteration. The strictly
//! lower power loses one coin; equal powers destroy nothing and the contest is
//! simply rolled again. The side still holding coins when the other runs out
//! wins, and its surviving coins scale the follow-up hit.

use crate::config::CombatConfig;
use crate::rng::RngOracle;
use crate::state::{ClashCoins, Skill};

/// One side of a clash.
#[derive(Clone, Copy, Debug)]
pub struct Contestant<'a> {
    pub name: &'a str,
    /// Derived attack at clash start.
    pub attack: u32,
    pub skill: &'a Skill,
}

/// Per-iteration record of a clash, for presentation and audit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClashTick {
    /// 1-based contest number.
    pub iteration: u32,
    pub attacker_name: String,
    pub attacker_power: i64,
    pub defender_name: String,
    pub defender_power: i64,
    /// Coins left after this contest.
    pub attacker_coins: u32,
    pub defender_coins: u32,
}

/// Which side came out of the clash with coins.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ClashWinner {
    Attacker,
    Defender,
    /// Neither side kept a coin; nobody lands a hit.
    Draw,
}

/// Final result of a clash.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClashOutcome {
    pub winner: ClashWinner,
    pub attacker: ClashCoins,
    pub defender: ClashCoins,
    pub ticks: Vec<ClashTick>,
}

impl ClashOutcome {
    /// Surviving coins of the winning side (0 on a draw).
    pub fn winning_coins(&self) -> u32 {
        match self.winner {
            ClashWinner::Attacker => self.attacker.win_coin_count,
            ClashWinner::Defender => self.defender.win_coin_count,
            ClashWinner::Draw => 0,
        }
    }
}

/// Runs clashes under a given combat configuration.
pub struct ClashResolver<'c> {
    config: &'c CombatConfig,
}

impl<'c> ClashResolver<'c> {
    pub fn new(config: &'c CombatConfig) -> Self {
        Self { config }
    }

    /// Rolls one side's contest power with its remaining coins.
    pub fn contest_power(
        &self,
        contestant: &Contestant<'_>,
        coins_remaining: u32,
        rng: &mut dyn RngOracle,
    ) -> i64 {
        let successes = (0..coins_remaining)
            .filter(|_| rng.coin(self.config.coin_success_percent))
            .count() as i64;

        i64::from(contestant.attack)
            + i64::from(contestant.skill.clash_base)
            + i64::from(contestant.skill.clash_bonus)
            + successes * i64::from(contestant.skill.clash_coin_bonus)
    }

    /// Runs the contest loop to completion.
    ///
    /// `on_tick` is invoked once per iteration after coins were destroyed.
    /// Coins are flipped attacker first, then defender, each in coin order.
    pub fn resolve(
        &self,
        attacker: Contestant<'_>,
        defender: Contestant<'_>,
        rng: &mut dyn RngOracle,
        mut on_tick: impl FnMut(&ClashTick),
    ) -> ClashOutcome {
        let mut attacker_coins = ClashCoins::reset(attacker.skill);
        let mut defender_coins = ClashCoins::reset(defender.skill);
        let mut ticks = Vec::new();
        let mut iteration = 0u32;

        while attacker_coins.has_coins() && defender_coins.has_coins() {
            if iteration >= CombatConfig::MAX_CLASH_ITERATIONS {
                tracing::warn!(
                    attacker = attacker.name,
                    defender = defender.name,
                    iterations = iteration,
                    "clash exceeded iteration bound, calling it a draw"
                );
                attacker_coins.forfeit();
                defender_coins.forfeit();
                break;
            }
            iteration += 1;

            let attacker_power =
                self.contest_power(&attacker, attacker_coins.current_coin_count, rng);
            let defender_power =
                self.contest_power(&defender, defender_coins.current_coin_count, rng);

            if attacker_power > defender_power {
                defender_coins.destroy_one();
            } else if defender_power > attacker_power {
                attacker_coins.destroy_one();
            }

            let tick = ClashTick {
                iteration,
                attacker_name: attacker.name.to_owned(),
                attacker_power,
                defender_name: defender.name.to_owned(),
                defender_power,
                attacker_coins: attacker_coins.current_coin_count,
                defender_coins: defender_coins.current_coin_count,
            };
            tracing::trace!(
                iteration,
                attacker_power,
                defender_power,
                attacker_coins = tick.attacker_coins,
                defender_coins = tick.defender_coins,
                "clash contest"
            );
            on_tick(&tick);
            ticks.push(tick);
        }

        attacker_coins.conclude();
        defender_coins.conclude();

        let winner = match (attacker_coins.has_coins(), defender_coins.has_coins()) {
            (true, false) => ClashWinner::Attacker,
            (false, true) => ClashWinner::Defender,
            _ => {
                attacker_coins.forfeit();
                defender_coins.forfeit();
                ClashWinner::Draw
            }
        };

        ClashOutcome {
            winner,
            attacker: attacker_coins,
            defender: defender_coins,
            ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{PcgRng, ScriptedRng};
    use crate::state::TargetScope;

    fn skill(clash_base: i32, clash_coin_bonus: i32, coins: u32) -> Skill {
        Skill::new("s", "Skill", TargetScope::SingleEnemy, clash_base, coins, clash_coin_bonus)
    }

    #[test]
    fn tie_rerolls_without_destroying_coins() {
        let config = CombatConfig::default();
        let resolver = ClashResolver::new(&config);
        let attacker_skill = skill(5, 3, 2);
        let defender_skill = skill(5, 3, 1);
        let attacker = Contestant { name: "A", attack: 15, skill: &attacker_skill };
        let defender = Contestant { name: "D", attack: 15, skill: &defender_skill };

        // Iteration 1: A [fail, success] = 23, D [success] = 23 -> tie.
        // Iteration 2: A [success, success] = 26, D [fail] = 20 -> D loses its coin.
        let mut rng = ScriptedRng::new().with_coins([false, true, true, true, true, false]);
        let outcome = resolver.resolve(attacker, defender, &mut rng, |_| {});

        let first = &outcome.ticks[0];
        assert_eq!((first.attacker_power, first.defender_power), (23, 23));
        assert_eq!((first.attacker_coins, first.defender_coins), (2, 1));

        let second = &outcome.ticks[1];
        assert_eq!((second.attacker_power, second.defender_power), (26, 20));

        assert_eq!(outcome.winner, ClashWinner::Attacker);
        assert_eq!(outcome.attacker.win_coin_count, 2);
        assert_eq!(outcome.defender.win_coin_count, 0);
        assert_eq!(outcome.winning_coins(), 2);
        assert_eq!(rng.remaining_coins(), 0);
    }

    #[test]
    fn defender_can_win() {
        let config = CombatConfig::default();
        let resolver = ClashResolver::new(&config);
        let weak = skill(1, 1, 1);
        let strong = skill(10, 1, 3);
        let attacker = Contestant { name: "A", attack: 0, skill: &weak };
        let defender = Contestant { name: "D", attack: 0, skill: &strong };

        let mut rng = PcgRng::seed_from_u64(3);
        let outcome = resolver.resolve(attacker, defender, &mut rng, |_| {});

        assert_eq!(outcome.winner, ClashWinner::Defender);
        assert_eq!(outcome.defender.win_coin_count, 3);
        assert_eq!(outcome.attacker.current_coin_count, 0);
    }

    #[test]
    fn conservation_holds_for_many_seeds() {
        let config = CombatConfig::default();
        let resolver = ClashResolver::new(&config);
        let a = skill(4, 3, 3);
        let d = skill(6, 2, 2);

        for seed in 0..200 {
            let mut rng = PcgRng::seed_from_u64(seed);
            let outcome = resolver.resolve(
                Contestant { name: "A", attack: 10, skill: &a },
                Contestant { name: "D", attack: 9, skill: &d },
                &mut rng,
                |_| {},
            );

            let remaining = [outcome.attacker.current_coin_count, outcome.defender.current_coin_count];
            assert!(remaining.contains(&0), "seed {seed}: {remaining:?}");
            assert!(outcome.attacker.current_coin_count <= 3);
            assert!(outcome.defender.current_coin_count <= 2);
            assert_ne!(outcome.winner, ClashWinner::Draw);

            for pair in outcome.ticks.windows(2) {
                let lost = (pair[0].attacker_coins - pair[1].attacker_coins)
                    + (pair[0].defender_coins - pair[1].defender_coins);
                assert!(lost <= 1);
            }
        }
    }

    #[test]
    fn on_tick_sees_every_iteration() {
        let config = CombatConfig::default();
        let resolver = ClashResolver::new(&config);
        let a = skill(5, 2, 2);
        let d = skill(5, 2, 2);
        let mut seen = Vec::new();

        let mut rng = PcgRng::seed_from_u64(11);
        let outcome = resolver.resolve(
            Contestant { name: "A", attack: 5, skill: &a },
            Contestant { name: "D", attack: 5, skill: &d },
            &mut rng,
            |tick| seen.push(tick.iteration),
        );

        assert_eq!(seen.len(), outcome.ticks.len());
        assert_eq!(seen, (1..=seen.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn endless_ties_end_in_a_draw() {
        let config = CombatConfig::default().with_coin_success_percent(0);
        let resolver = ClashResolver::new(&config);
        let a = skill(5, 3, 2);
        let d = skill(5, 3, 2);

        let mut rng = PcgRng::seed_from_u64(0);
        let outcome = resolver.resolve(
            Contestant { name: "A", attack: 7, skill: &a },
            Contestant { name: "D", attack: 7, skill: &d },
            &mut rng,
            |_| {},
        );

        assert_eq!(outcome.winner, ClashWinner::Draw);
        assert_eq!(outcome.attacker.win_coin_count, 0);
        assert_eq!(outcome.defender.win_coin_count, 0);
        assert_eq!(outcome.ticks.len() as u32, CombatConfig::MAX_CLASH_ITERATIONS);
    }
}
