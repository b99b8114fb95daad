//! RNG oracle for deterministic random number generation.
//!
//! Every coin flip and every AI choice in a battle draws from one shared
//! [`RngOracle`] owned by the combat state machine. Implementations must be
//! deterministic: given the same seed they produce the same sequence, which is
//! what makes battles replayable and testable.

use std::collections::VecDeque;

/// Source of randomness for combat mechanics.
pub trait RngOracle: Send {
    /// Generate the next random u32 value.
    fn next_u32(&mut self) -> u32;

    /// Flip one coin that lands on its success face with the given chance.
    fn coin(&mut self, success_percent: u32) -> bool {
        self.next_u32() % 100 < success_percent
    }

    /// Pick an index in `0..len`. Returns 0 for empty or single-element ranges.
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.next_u32() as usize % len
    }
}

impl<R: RngOracle + ?Sized> RngOracle for Box<R> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn coin(&mut self, success_percent: u32) -> bool {
        (**self).coin(success_percent)
    }

    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Uses the PCG-XSH-RR variant: 64 bits of state, 32-bit output.
///
/// - **Deterministic**: Same seed always produces same output
/// - **Fast**: Single multiply + xorshift + rotate
/// - **Small state**: Only 64 bits
///
/// Reference: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator from a seed.
    ///
    /// The seed is advanced once so nearby seeds do not start from nearby states.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            state: Self::pcg_step(seed.wrapping_add(Self::INCREMENT)),
        }
    }

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }
}

/// Replays scripted coin faces and picks, for deterministic scenarios.
///
/// Once the script runs dry the oracle falls back to a seeded [`PcgRng`],
/// so long-running tests never stall on an exhausted script.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    coins: VecDeque<bool>,
    picks: VecDeque<usize>,
    fallback: PcgRng,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self {
            coins: VecDeque::new(),
            picks: VecDeque::new(),
            fallback: PcgRng::seed_from_u64(0),
        }
    }

    /// Queue coin faces (`true` = success) in the order they will be flipped.
    pub fn with_coins(mut self, coins: impl IntoIterator<Item = bool>) -> Self {
        self.coins.extend(coins);
        self
    }

    /// Queue pick results. Each value is reduced modulo the requested range.
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Number of scripted coin faces not yet consumed.
    pub fn remaining_coins(&self) -> usize {
        self.coins.len()
    }
}

impl Default for ScriptedRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RngOracle for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.fallback.next_u32()
    }

    fn coin(&mut self, success_percent: u32) -> bool {
        match self.coins.pop_front() {
            Some(face) => face,
            None => self.fallback.coin(success_percent),
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self.picks.pop_front() {
            Some(index) => index % len,
            None => self.fallback.pick(len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PcgRng::seed_from_u64(42);
        let mut b = PcgRng::seed_from_u64(42);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = PcgRng::seed_from_u64(1);
        let mut b = PcgRng::seed_from_u64(2);
        let a_values: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let b_values: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(a_values, b_values);
    }

    #[test]
    fn coin_respects_extreme_chances() {
        let mut rng = PcgRng::seed_from_u64(7);
        assert!((0..100).all(|_| rng.coin(100)));
        assert!((0..100).all(|_| !rng.coin(0)));
    }

    #[test]
    fn fair_coin_is_roughly_balanced() {
        let mut rng = PcgRng::seed_from_u64(2024);
        let successes = (0..10_000).filter(|_| rng.coin(50)).count();
        assert!((4_500..5_500).contains(&successes), "got {successes}");
    }

    #[test]
    fn pick_stays_in_range() {
        let mut rng = PcgRng::seed_from_u64(9);
        for len in 1..10 {
            for _ in 0..50 {
                assert!(rng.pick(len) < len);
            }
        }
        assert_eq!(rng.pick(0), 0);
    }

    #[test]
    fn scripted_rng_replays_then_falls_back() {
        let mut rng = ScriptedRng::new()
            .with_coins([false, true])
            .with_picks([5]);

        assert!(!rng.coin(50));
        assert!(rng.coin(50));
        assert_eq!(rng.remaining_coins(), 0);
        assert_eq!(rng.pick(3), 2);

        // Script exhausted: still answers within range.
        assert!(rng.pick(4) < 4);
        assert!(rng.coin(100));
    }
}
