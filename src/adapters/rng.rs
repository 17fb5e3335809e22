//! Target randomness adapter.
//!
//! A small xorshift32 generator seeded once at boot — `esp_random()` on
//! device, a clock-derived seed on host.  More than enough state for a
//! four-bit party game, and no dependency on a heavyweight RNG stack.

use crate::game::ports::RandomPort;

pub struct GameRng {
    state: u32,
}

impl GameRng {
    /// Seed explicitly (tests want determinism).  Zero is remapped — a
    /// xorshift state of 0 is a fixed point.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    /// Seed from the platform entropy source.
    #[cfg(target_os = "espidf")]
    pub fn from_entropy() -> Self {
        // SAFETY: esp_random is a plain hardware RNG register read.
        Self::new(unsafe { esp_idf_svc::sys::esp_random() })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn from_entropy() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0x1234_5678);
        Self::new(nanos)
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RandomPort for GameRng {
    fn next_target(&mut self) -> u8 {
        (self.next_u32() % 16) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_stay_in_range() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            assert!(rng.next_target() <= 15);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = GameRng::new(7);
        let mut b = GameRng::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_target(), b.next_target());
        }
    }

    #[test]
    fn every_target_value_shows_up() {
        let mut rng = GameRng::new(0xDEAD_BEEF);
        let mut seen = [false; 16];
        for _ in 0..1000 {
            seen[rng.next_target() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "a 1000-draw run must cover 0..=15");
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut rng = GameRng::new(0);
        let first = rng.next_target();
        let second = rng.next_target();
        // A zero state would loop on 0 forever.
        assert!(first != 0 || second != 0);
    }
}
