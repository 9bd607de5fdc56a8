use rand::seq::SliceRandom;
use rand::Rng;

/// Fully materialized Fisher-Yates shuffle, the baseline the Feistel engine
/// is compared against in uniformity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomPermutation(pub Vec<u32>);

impl RandomPermutation {
    pub fn generate(n: usize, rng: &mut impl Rng) -> Self {
        let mut values: Vec<u32> = (0..n as u32).collect();
        values.shuffle(rng);
        RandomPermutation(values)
    }

    pub fn into_u128(self) -> Vec<u128> {
        self.0.into_iter().map(u128::from).collect()
    }
}
