use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::types::ContestantId;

/// Random fixed-width numeric tokens, checked against the live set.
///
/// Tokens are drawn from `10^(digits-1) ..= 10^digits - 1`, or `0..=9` for a
/// single digit. After
/// `max_attempts` random collisions the generator walks the space from a
/// random offset, so it only gives up once every token is taken.
#[derive(Debug)]
pub struct IdGenerator {
    rng: StdRng,
    low: u64,
    span: u64,
    digits: u32,
    max_attempts: u32,
}

impl IdGenerator {
    /// Entropy-seeded generator.
    pub fn new(digits: u32, max_attempts: u32) -> Self {
        Self::with_rng(digits, max_attempts, StdRng::from_entropy())
    }

    /// Deterministic generator for tests and replays.
    pub fn seeded(digits: u32, max_attempts: u32, seed: u64) -> Self {
        Self::with_rng(digits, max_attempts, StdRng::seed_from_u64(seed))
    }

    fn with_rng(digits: u32, max_attempts: u32, rng: StdRng) -> Self {
        let digits = digits.clamp(1, 18);
        let low = if digits == 1 { 0 } else { 10u64.pow(digits - 1) };
        let high = 10u64.pow(digits);
        Self {
            rng,
            low,
            span: high - low,
            digits,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Token width in digits.
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Number of distinct tokens the generator can produce.
    pub fn capacity(&self) -> u64 {
        self.span
    }

    /// Returns a token for which `taken` is false, or `None` if the space is full.
    pub fn generate(&mut self, mut taken: impl FnMut(&str) -> bool) -> Option<ContestantId> {
        for _ in 0..self.max_attempts {
            let candidate = (self.low + self.rng.gen_range(0..self.span)).to_string();
            if !taken(&candidate) {
                return Some(ContestantId::new(candidate));
            }
        }

        let start = self.rng.gen_range(0..self.span);
        (0..self.span)
            .map(|step| (self.low + (start + step) % self.span).to_string())
            .find(|candidate| !taken(candidate))
            .map(ContestantId::new)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn six_digit_tokens_stay_in_range() {
        let mut ids = IdGenerator::seeded(6, 8, 1);
        assert_eq!(ids.digits(), 6);
        assert_eq!(ids.capacity(), 900_000);
        for _ in 0..1_000 {
            let id = ids.generate(|_| false).unwrap();
            let n: u64 = id.as_str().parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
            assert_eq!(id.as_str().len(), 6);
        }
    }

    #[test]
    fn single_digit_space_includes_zero() {
        let ids = IdGenerator::seeded(1, 4, 9);
        assert_eq!(ids.digits(), 1);
        assert_eq!(ids.capacity(), 10);
        assert_eq!(IdGenerator::seeded(2, 4, 9).capacity(), 90);
        assert_eq!(IdGenerator::seeded(0, 4, 9).digits(), 1);
    }

    #[test]
    fn fills_a_tiny_space_without_duplicates_then_gives_up() {
        let mut ids = IdGenerator::seeded(1, 2, 3);
        let mut live = HashSet::new();
        for _ in 0..10 {
            let id = ids.generate(|c| live.contains(c)).unwrap();
            assert!(live.insert(id.as_str().to_string()));
        }
        assert!(ids.generate(|c| live.contains(c)).is_none());
    }
}
