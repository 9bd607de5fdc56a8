use feistel_perm::utils::stats::{fisher_yates_histogram, permutation_histogram};
use feistel_perm::{chi_square, EngineConfig, MixerKind, Permutation};
use rand::{rngs::StdRng, SeedableRng};

// chi-square(23) exceeds 49.73 with probability 0.001
const CRITICAL_DOF_23: f64 = 49.73;

#[test]
fn four_element_permutations_are_close_to_uniform() {
    let histogram = permutation_histogram(0..24_000, |seed| Permutation::new(4, seed)).unwrap();
    assert_eq!(histogram.len(), 24, "every permutation of 4 should appear");
    let result = chi_square(&histogram, 4);
    assert_eq!(result.degrees_of_freedom, 23);
    assert!(
        result.statistic < CRITICAL_DOF_23,
        "chi-square {} (p = {})",
        result.statistic,
        result.p_value
    );
    assert!(result.p_value > 0.001);
}

#[test]
fn sha3_rounds_are_close_to_uniform() {
    let config = EngineConfig::default().with_mixer(MixerKind::Sha3);
    let histogram =
        permutation_histogram(0..24_000, |seed| Permutation::with_config(4, seed, &config))
            .unwrap();
    let result = chi_square(&histogram, 4);
    assert!(result.statistic < CRITICAL_DOF_23, "chi-square {}", result.statistic);
}

#[test]
fn five_element_permutations_cover_all_orderings() {
    let histogram = permutation_histogram(0..60_000, |seed| Permutation::new(5, seed)).unwrap();
    assert_eq!(histogram.len(), 120);
    let result = chi_square(&histogram, 5);
    assert_eq!(result.degrees_of_freedom, 119);
    assert!(result.p_value > 0.001, "chi-square {}", result.statistic);
}

#[test]
fn fisher_yates_baseline_scores_like_the_engine() {
    let mut rng = StdRng::seed_from_u64(0xB10C_cafe);
    let histogram = fisher_yates_histogram(4, 24_000, &mut rng);
    let result = chi_square(&histogram, 4);
    assert_eq!(histogram.values().sum::<u64>(), 24_000);
    // loose bound: this baseline is only a sanity reference
    assert!(result.p_value > 1e-6, "chi-square {}", result.statistic);
}

#[test]
fn degenerate_round_count_is_detected_as_biased() {
    let config = EngineConfig::default().with_rounds(1);
    let histogram =
        permutation_histogram(0..24_000, |seed| Permutation::with_config(4, seed, &config))
            .unwrap();
    let result = chi_square(&histogram, 4);
    assert!(result.p_value < 1e-6, "one round should be far from uniform");
}
