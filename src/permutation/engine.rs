use crate::config::EngineConfig;
use crate::crypto::keys::{default_round_count, MAX_ROUNDS};
use crate::crypto::mixer::{Mixer, RoundMixer};
use crate::error::{PermutationError, Result};
use crate::permutation::cursor::Cursor;
use crate::permutation::cycle_walk::{worst_case_steps, CycleWalker};
use crate::permutation::feistel::{DomainBits, FeistelNetwork};

const LOG_TARGET: &str = "feistel_perm::engine";

/// Pseudo-random permutation of `[0, len)` that is never materialized.
///
/// Immutable after construction: `forward` and `backward` may be called from
/// any number of threads at once. Sequential traversal goes through a
/// [`Cursor`], one per traversal.
#[derive(Debug, Clone)]
pub struct Permutation<M = Mixer> {
    len: u128,
    seed: u64,
    network: FeistelNetwork<M>,
    walker: CycleWalker,
}

impl Permutation<Mixer> {
    pub fn new(len: u128, seed: u64) -> Result<Self> {
        Self::with_config(len, seed, &EngineConfig::default())
    }

    pub fn with_config(len: u128, seed: u64, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Self::with_mixer(len, seed, Mixer::from(config.mixer), config.rounds, config.walk_limit)
    }
}

impl<M: RoundMixer> Permutation<M> {
    /// Builds an engine around a caller-chosen mixer. `rounds = None` uses
    /// [`default_round_count`] for the domain width.
    ///
    /// `walk_limit` is raised to [`worst_case_steps`] when it is smaller, so a
    /// valid index never overflows the cycle walk.
    pub fn with_mixer(
        len: u128,
        seed: u64,
        mixer: M,
        rounds: Option<u8>,
        walk_limit: u32,
    ) -> Result<Self> {
        if len == 0 {
            return Err(PermutationError::InvalidDomain { len });
        }
        if let Some(rounds) = rounds {
            if rounds == 0 || rounds as usize > MAX_ROUNDS {
                return Err(PermutationError::InvalidRounds { rounds });
            }
        }
        if walk_limit == 0 {
            return Err(PermutationError::config("walk-limit must be positive"));
        }

        let bits = DomainBits::for_len(len);
        let walk_limit = walk_limit.max(worst_case_steps(len, bits));
        let rounds = rounds.unwrap_or_else(|| default_round_count(bits.total));
        let network = FeistelNetwork::new(bits, seed, rounds, mixer);
        tracing::debug!(
            target: LOG_TARGET,
            len = %len,
            seed,
            bits = bits.total,
            left_bits = bits.left,
            right_bits = bits.right,
            rounds = network.rounds(),
            walk_limit,
            "permutation constructed"
        );

        Ok(Permutation {
            len,
            seed,
            network,
            walker: CycleWalker::new(len, walk_limit),
        })
    }

    pub fn len(&self) -> u128 {
        self.len
    }

    /// Always false: construction rejects empty domains.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn bits(&self) -> DomainBits {
        self.network.bits()
    }

    pub fn rounds(&self) -> usize {
        self.network.rounds()
    }

    pub fn round_keys(&self) -> &[u64] {
        self.network.round_keys()
    }

    pub fn walk_limit(&self) -> u32 {
        self.walker.limit()
    }

    pub fn mixer(&self) -> &M {
        self.network.mixer()
    }

    /// Value at position `index`.
    pub fn forward(&self, index: u128) -> Result<u128> {
        if index >= self.len {
            return Err(PermutationError::out_of_range(index, self.len));
        }
        self.walker.walk(index, |x| self.network.forward(x))
    }

    /// Position of `value`; the inverse of [`Permutation::forward`].
    pub fn backward(&self, value: u128) -> Result<u128> {
        if value >= self.len {
            return Err(PermutationError::out_of_range(value, self.len));
        }
        self.walker.walk(value, |x| self.network.backward(x))
    }

    /// Fresh cursor positioned at index 0.
    pub fn iter(&self) -> Cursor<'_, M> {
        Cursor::new(self)
    }
}

impl<'a, M: RoundMixer> IntoIterator for &'a Permutation<M> {
    type Item = Result<u128>;
    type IntoIter = Cursor<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::mixer::MultiplyXorMixer;

    #[test]
    fn single_element_domain_is_fixed() {
        let perm = Permutation::new(1, 123).unwrap();
        assert_eq!(perm.bits().total, 0);
        assert_eq!(perm.rounds(), 0);
        assert_eq!(perm.forward(0), Ok(0));
        assert_eq!(perm.backward(0), Ok(0));
    }

    #[test]
    fn zero_rounds_are_rejected() {
        assert_eq!(
            Permutation::with_mixer(10, 0, MultiplyXorMixer, Some(0), 8).unwrap_err(),
            PermutationError::InvalidRounds { rounds: 0 }
        );
    }

    #[test]
    fn zero_walk_limit_is_rejected() {
        assert!(matches!(
            Permutation::with_mixer(10, 0, MultiplyXorMixer, None, 0),
            Err(PermutationError::Config(_))
        ));
    }

    #[test]
    fn small_walk_limit_is_raised_to_the_worst_case() {
        // n = 5 sits in [0, 8): at most 3 outside values plus the exit step
        let perm = Permutation::with_mixer(5, 0, MultiplyXorMixer, None, 1).unwrap();
        assert_eq!(perm.walk_limit(), 4);
        let generous = Permutation::with_mixer(5, 0, MultiplyXorMixer, None, 500).unwrap();
        assert_eq!(generous.walk_limit(), 500);
    }
}
