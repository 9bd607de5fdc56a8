use crate::crypto::keys::{derive_round_keys, RoundKeys};
use crate::crypto::mixer::{width_mask, RoundMixer};

/// Bit layout of the power-of-two domain that covers `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainBits {
    pub total: u32,
    pub left: u32,
    pub right: u32,
}

impl DomainBits {
    /// Smallest `b` with `2^b >= len`; `len <= 1` maps to `b = 0`.
    pub fn for_len(len: u128) -> Self {
        let total = if len <= 1 {
            0
        } else {
            u128::BITS - (len - 1).leading_zeros()
        };
        DomainBits {
            total,
            left: total.div_ceil(2),
            right: total / 2,
        }
    }

    /// Exclusive upper bound `2^b`, or `None` when it does not fit in a `u128`.
    pub fn capacity(&self) -> Option<u128> {
        1u128.checked_shl(self.total)
    }
}

/// Unbalanced Feistel network: a keyed bijection on `[0, 2^b)`.
///
/// The input splits into a high half of `ceil(b/2)` bits and a low half of
/// `floor(b/2)` bits. Each round replaces the pair `(L, R)` by
/// `(R, L ^ F(R))`, so the halves trade widths every round when `b` is odd.
#[derive(Debug, Clone)]
pub struct FeistelNetwork<M> {
    bits: DomainBits,
    keys: RoundKeys,
    mixer: M,
}

impl<M: RoundMixer> FeistelNetwork<M> {
    pub fn new(bits: DomainBits, seed: u64, rounds: u8, mixer: M) -> Self {
        let rounds = if bits.total == 0 { 0 } else { rounds };
        FeistelNetwork {
            bits,
            keys: derive_round_keys(seed, rounds),
            mixer,
        }
    }

    pub fn bits(&self) -> DomainBits {
        self.bits
    }

    pub fn rounds(&self) -> usize {
        self.keys.len()
    }

    pub fn round_keys(&self) -> &[u64] {
        &self.keys
    }

    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn forward(&self, x: u128) -> u128 {
        if self.bits.total == 0 {
            return x;
        }
        let mut left_bits = self.bits.left;
        let mut right_bits = self.bits.right;
        let (mut left, mut right) = split(x, right_bits);

        for (round, &key) in self.keys.iter().enumerate() {
            let f = self.mixer.mix(key, round as u8, left_bits, right);
            let updated = (left ^ f) & width_mask(left_bits);
            left = right;
            right = updated;
            std::mem::swap(&mut left_bits, &mut right_bits);
        }

        join(left, right, right_bits)
    }

    pub fn backward(&self, y: u128) -> u128 {
        if self.bits.total == 0 {
            return y;
        }
        let (mut left_bits, mut right_bits) = if self.keys.len() % 2 == 0 {
            (self.bits.left, self.bits.right)
        } else {
            (self.bits.right, self.bits.left)
        };
        let (mut left, mut right) = split(y, right_bits);

        for (round, &key) in self.keys.iter().enumerate().rev() {
            // `left` is the untouched half of this round; `right` carries the xor.
            let f = self.mixer.mix(key, round as u8, right_bits, left);
            let restored = (right ^ f) & width_mask(right_bits);
            right = left;
            left = restored;
            std::mem::swap(&mut left_bits, &mut right_bits);
        }

        join(left, right, right_bits)
    }
}

#[inline]
fn split(x: u128, right_bits: u32) -> (u64, u64) {
    let right = (x as u64) & width_mask(right_bits);
    let left = (x >> right_bits) as u64;
    (left, right)
}

#[inline]
fn join(left: u64, right: u64, right_bits: u32) -> u128 {
    ((left as u128) << right_bits) | right as u128
}
