use arrayvec::ArrayVec;

pub const MAX_ROUNDS: usize = 32;

pub type RoundKeys = ArrayVec<u64, MAX_ROUNDS>;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Round count used when the configuration does not pin one.
///
/// Narrow domains leave the mixer very few input bits per round, so they get
/// more rounds; a full 128-bit domain settles at eight.
pub fn default_round_count(bits: u32) -> u8 {
    if bits == 0 {
        return 0;
    }
    let rounds = 8 + 60 / bits.max(4);
    rounds.min(MAX_ROUNDS as u32) as u8
}

/// Expands `seed` into one key per round with a splitmix64 stream.
pub fn derive_round_keys(seed: u64, rounds: u8) -> RoundKeys {
    let mut keys = RoundKeys::new();
    let mut state = seed;
    for _ in 0..(rounds as usize).min(MAX_ROUNDS) {
        state = state.wrapping_add(GOLDEN_GAMMA);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        keys.push(z ^ (z >> 31));
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_schedule_shrinks_with_width() {
        assert_eq!(default_round_count(0), 0);
        assert_eq!(default_round_count(1), 23);
        assert_eq!(default_round_count(4), 23);
        assert_eq!(default_round_count(10), 14);
        assert_eq!(default_round_count(64), 8);
        assert_eq!(default_round_count(128), 8);
    }

    #[test]
    fn keys_are_seed_dependent_and_stable() {
        let a = derive_round_keys(42, 6);
        let b = derive_round_keys(42, 6);
        let c = derive_round_keys(43, 6);
        assert_eq!(a.len(), 6);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn key_count_is_capped() {
        assert_eq!(derive_round_keys(7, u8::MAX).len(), MAX_ROUNDS);
    }
}
