pub mod shuffle;
pub mod stats;

pub use shuffle::RandomPermutation;
pub use stats::{chi_square, fisher_yates_histogram, permutation_histogram, ChiSquare, UniformityReport};
