use crate::crypto::mixer::RoundMixer;
use crate::error::{PermutationError, Result};
use crate::permutation::Permutation;
use crate::utils::shuffle::RandomPermutation;
use fxhash::FxHashMap;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::ops::Range;

/// Occurrence count of each full permutation tuple.
pub type Histogram = FxHashMap<Vec<u128>, u64>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquare {
    pub statistic: f64,
    pub degrees_of_freedom: u64,
    pub p_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniformityReport {
    pub len: u32,
    pub samples: u64,
    pub distinct_permutations: usize,
    pub engine: ChiSquare,
    pub baseline: Option<ChiSquare>,
}

/// Tallies `forward(0..n)` for every seed in `seeds`, building one engine per seed.
pub fn permutation_histogram<M, F>(seeds: Range<u64>, build: F) -> Result<Histogram>
where
    M: RoundMixer,
    F: Fn(u64) -> Result<Permutation<M>> + Sync + Send,
{
    seeds
        .into_par_iter()
        .map(|seed| {
            let permutation = build(seed)?;
            permutation.iter().collect::<Result<Vec<u128>>>()
        })
        .try_fold(Histogram::default, |mut histogram, tuple| {
            *histogram.entry(tuple?).or_insert(0) += 1;
            Ok::<_, PermutationError>(histogram)
        })
        .try_reduce(Histogram::default, |mut left, right| {
            merge_into(&mut left, right);
            Ok(left)
        })
}

pub fn fisher_yates_histogram(n: usize, samples: u64, rng: &mut impl Rng) -> Histogram {
    let mut histogram = Histogram::default();
    for _ in 0..samples {
        let tuple = RandomPermutation::generate(n, rng).into_u128();
        *histogram.entry(tuple).or_insert(0) += 1;
    }
    histogram
}

fn merge_into(target: &mut Histogram, other: Histogram) {
    for (tuple, count) in other {
        *target.entry(tuple).or_insert(0) += count;
    }
}

/// Pearson goodness-of-fit of `histogram` against the uniform distribution
/// over all `n!` permutations of `n` elements.
pub fn chi_square(histogram: &Histogram, n: usize) -> ChiSquare {
    let categories: f64 = (1..=n).map(|k| k as f64).product();
    let total: u64 = histogram.values().sum();
    let degrees_of_freedom = (categories as u64).saturating_sub(1);
    if total == 0 || degrees_of_freedom == 0 {
        return ChiSquare {
            statistic: 0.0,
            degrees_of_freedom,
            p_value: 1.0,
        };
    }

    let expected = total as f64 / categories;
    let observed_part: f64 = histogram
        .values()
        .map(|&count| {
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum();
    // every permutation never drawn contributes (0 - e)^2 / e = e
    let missing = categories - histogram.len() as f64;
    let statistic = observed_part + missing.max(0.0) * expected;

    ChiSquare {
        statistic,
        degrees_of_freedom,
        p_value: chi_square_upper_tail(statistic, degrees_of_freedom as f64),
    }
}

/// Survival function of the chi-square distribution with `dof` degrees of freedom.
fn chi_square_upper_tail(statistic: f64, dof: f64) -> f64 {
    match ChiSquared::new(dof) {
        Ok(distribution) => distribution.sf(statistic).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}
