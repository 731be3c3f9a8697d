//! RNG module - seedable token generation
//!
//! Refill draws each new token uniformly from the `K` non-empty kinds.
//! The default source is a small LCG so that a seed reproduces a whole game,
//! which keeps tests and replays deterministic.

use crate::types::Token;

/// Anything that can hand out fresh tokens for refill
pub trait TokenSource {
    /// Draw one token with kind in `1..=kind_count`
    fn draw(&mut self, kind_count: u8) -> Token;
}

/// Number of distinct values in the high half of an LCG output
const HIGH_SPAN: u32 = 1 << 16;

/// Largest multiple of `max` not above [`HIGH_SPAN`]; draws at or past it are
/// redrawn so every residue is equally likely
fn accept_limit(max: u32) -> u32 {
    HIGH_SPAN - HIGH_SPAN % max
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max), uniformly
    pub fn next_range(&mut self, max: u32) -> u32 {
        let max = max.max(1);
        if max > HIGH_SPAN {
            return self.next_u32() % max;
        }
        // Low LCG bits have short periods; use the high half.
        let limit = accept_limit(max);
        loop {
            let value = self.next_u32() >> 16;
            if value < limit {
                return value % max;
            }
        }
    }

    /// Current internal state (feed back into `new` to resume the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TokenSource for SimpleRng {
    fn draw(&mut self, kind_count: u8) -> Token {
        let kind = self.next_range(kind_count.max(1) as u32) as u8 + 1;
        Token::new(kind).unwrap_or(Token::MIN)
    }
}

/// Replays a fixed list of kinds, cycling when exhausted
///
/// Lets callers script refills exactly. Kinds above the requested
/// `kind_count` are folded back into range.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    kinds: Vec<u8>,
    next: usize,
}

impl SequenceSource {
    pub fn new(kinds: impl Into<Vec<u8>>) -> Self {
        Self {
            kinds: kinds.into(),
            next: 0,
        }
    }

    /// Number of tokens handed out so far
    pub fn drawn(&self) -> usize {
        self.next
    }
}

impl TokenSource for SequenceSource {
    fn draw(&mut self, kind_count: u8) -> Token {
        let kind_count = kind_count.max(1);
        let raw = if self.kinds.is_empty() {
            1
        } else {
            self.kinds[self.next % self.kinds.len()]
        };
        self.next += 1;
        let kind = (raw.max(1) - 1) % kind_count + 1;
        Token::new(kind).unwrap_or(Token::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        let v1 = rng1.next_u32();
        let v2 = rng2.next_u32();
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_eq!(rng.state(), 1);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_draw_stays_in_kind_range() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            let kind = rng.draw(5).kind();
            assert!((1..=5).contains(&kind), "kind {} out of range", kind);
        }
    }

    #[test]
    fn test_draw_covers_every_kind() {
        let mut rng = SimpleRng::new(99);
        let mut seen = [false; 5];
        for _ in 0..500 {
            seen[rng.draw(5).kind() as usize - 1] = true;
        }
        assert!(seen.iter().all(|&s| s), "kinds seen: {:?}", seen);
    }

    #[test]
    fn test_range_drops_uneven_tail() {
        assert_eq!(accept_limit(5), 65535);
        assert_eq!(accept_limit(3), 65535);
        assert_eq!(accept_limit(4), 65536);
        assert_eq!(accept_limit(40000), 40000);

        let mut rng = SimpleRng::new(3);
        for _ in 0..1000 {
            assert!(rng.next_range(40000) < 40000);
            assert!(rng.next_range(100_000) < 100_000);
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_resume_from_state() {
        let mut rng = SimpleRng::new(42);
        rng.next_u32();
        let mut resumed = SimpleRng::new(rng.state());
        assert_eq!(rng.next_u32(), resumed.next_u32());
    }

    #[test]
    fn test_sequence_source_cycles_and_folds() {
        let mut source = SequenceSource::new(vec![1, 2, 7]);
        assert_eq!(source.draw(5).kind(), 1);
        assert_eq!(source.draw(5).kind(), 2);
        // 7 folds into 1..=5 as 2
        assert_eq!(source.draw(5).kind(), 2);
        assert_eq!(source.draw(5).kind(), 1);
        assert_eq!(source.drawn(), 4);
    }
}
