use std::fmt;
use thiserror::Error;

use crate::crypto::keys::MAX_ROUNDS;

pub type Result<T> = std::result::Result<T, PermutationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermutationError {
    #[error("invalid domain size {len}: a permutation needs at least one element")]
    InvalidDomain { len: u128 },
    #[error("index {index} out of range for permutation of length {len}")]
    IndexOutOfRange { index: OffendingIndex, len: u128 },
    /// Unreachable with a working mixer; reported instead of looping forever.
    #[error("cycle walk from {start} did not re-enter the domain after {steps} steps")]
    CycleWalkOverflow { start: u128, steps: u32 },
    #[error("round count {rounds} outside 1..={max}", max = MAX_ROUNDS)]
    InvalidRounds { rounds: u8 },
    #[error("slice step cannot be zero")]
    ZeroSliceStep,
    #[error("cannot sample {requested} distinct elements from {len}")]
    SampleTooLarge { requested: u128, len: u128 },
    #[error("config error: {0}")]
    Config(String),
}

impl PermutationError {
    pub fn out_of_range(index: u128, len: u128) -> Self {
        PermutationError::IndexOutOfRange {
            index: OffendingIndex::Unsigned(index),
            len,
        }
    }

    pub fn negative_out_of_range(index: i128, len: u128) -> Self {
        PermutationError::IndexOutOfRange {
            index: OffendingIndex::Signed(index),
            len,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// The caller-supplied index, kept in the width it arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffendingIndex {
    Unsigned(u128),
    Signed(i128),
}

impl fmt::Display for OffendingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffendingIndex::Unsigned(index) => write!(f, "{index}"),
            OffendingIndex::Signed(index) => write!(f, "{index}"),
        }
    }
}
