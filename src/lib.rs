pub mod config;
pub mod crypto;
pub mod error;
pub mod permutation;
pub mod sequence;
pub mod utils;

pub use config::EngineConfig;
pub use crypto::*;
pub use error::{OffendingIndex, PermutationError, Result};
pub use permutation::{
	Cursor,
	CycleWalker,
	DomainBits,
	FeistelNetwork,
	Permutation,
	DEFAULT_WALK_LIMIT,
};
pub use sequence::{sample, sample_indices, shuffle, PermutedSequence};
pub use utils::stats::{chi_square, ChiSquare, UniformityReport};
