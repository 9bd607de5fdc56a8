//! Indexable view over a [`Permutation`]: signed indices with wraparound from
//! the end, half-open slices, and sampling helpers.

use crate::crypto::Mixer;
use crate::error::{PermutationError, Result};
use crate::permutation::{Cursor, Permutation};

#[derive(Debug, Clone)]
pub struct PermutedSequence {
    inner: Permutation,
}

impl PermutedSequence {
    pub fn new(len: u128, seed: u64) -> Result<Self> {
        Ok(PermutedSequence {
            inner: Permutation::new(len, seed)?,
        })
    }

    /// Draws the seed from the thread-local generator. The seed stays readable
    /// through [`PermutedSequence::seed`] so the sequence can be rebuilt.
    pub fn with_random_seed(len: u128) -> Result<Self> {
        Self::new(len, rand::random::<u64>())
    }

    pub fn from_permutation(inner: Permutation) -> Self {
        PermutedSequence { inner }
    }

    pub fn len(&self) -> u128 {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn seed(&self) -> u64 {
        self.inner.seed()
    }

    pub fn permutation(&self) -> &Permutation {
        &self.inner
    }

    /// Element at `index`; negative indices count back from the end.
    pub fn get_one(&self, index: i128) -> Result<u128> {
        let position = normalize_index(index, self.len())?;
        self.inner.forward(position)
    }

    /// Elements at `start..stop` by `step`, clamped to the sequence the way
    /// half-open slices are; a negative step walks backwards.
    pub fn get_range(
        &self,
        start: Option<i128>,
        stop: Option<i128>,
        step: i128,
    ) -> Result<Vec<u128>> {
        SlicePositions::new(self.len(), start, stop, step)?
            .map(|position| self.inner.forward(position))
            .collect()
    }

    pub fn forward(&self, index: u128) -> Result<u128> {
        self.inner.forward(index)
    }

    /// Values are never wrapped, so negative input is always out of range.
    pub fn backward(&self, value: i128) -> Result<u128> {
        let value = u128::try_from(value)
            .map_err(|_| PermutationError::negative_out_of_range(value, self.len()))?;
        self.inner.backward(value)
    }

    pub fn iter(&self) -> Cursor<'_, Mixer> {
        self.inner.iter()
    }
}

fn normalize_index(index: i128, len: u128) -> Result<u128> {
    if index >= 0 {
        let index = index as u128;
        if index < len {
            return Ok(index);
        }
        return Err(PermutationError::out_of_range(index, len));
    }
    let back = index.unsigned_abs();
    if back > len {
        return Err(PermutationError::negative_out_of_range(index, len));
    }
    Ok(len - back)
}

/// Positions visited by a slice. `None` in `next` and `stop` stands for the
/// slot just before index 0, reachable only by negative steps.
#[derive(Debug, Clone)]
struct SlicePositions {
    next: Option<u128>,
    stop: Option<u128>,
    step: i128,
}

impl SlicePositions {
    fn new(len: u128, start: Option<i128>, stop: Option<i128>, step: i128) -> Result<Self> {
        if step == 0 {
            return Err(PermutationError::ZeroSliceStep);
        }
        let ascending = step > 0;
        let next = match start {
            Some(index) => clamp_bound(index, len, ascending),
            None if ascending => Some(0),
            None => Some(len - 1),
        };
        let stop = match stop {
            Some(index) => clamp_bound(index, len, ascending),
            None if ascending => Some(len),
            None => None,
        };
        Ok(SlicePositions { next, stop, step })
    }
}

/// Ascending slices clamp into `[0, len]`, descending ones into `[-1, len - 1]`.
fn clamp_bound(index: i128, len: u128, ascending: bool) -> Option<u128> {
    if index >= 0 {
        let index = index as u128;
        return if ascending {
            Some(index.min(len))
        } else {
            Some(index.min(len - 1))
        };
    }
    let back = index.unsigned_abs();
    match len.checked_sub(back) {
        Some(position) => Some(position),
        None if ascending => Some(0),
        None => None,
    }
}

impl Iterator for SlicePositions {
    type Item = u128;

    fn next(&mut self) -> Option<u128> {
        let current = self.next?;
        if self.step > 0 {
            let stop = self.stop?;
            if current >= stop {
                self.next = None;
                return None;
            }
            self.next = current.checked_add(self.step as u128);
        } else {
            if let Some(stop) = self.stop {
                if current <= stop {
                    self.next = None;
                    return None;
                }
            }
            self.next = current.checked_sub(self.step.unsigned_abs());
        }
        Some(current)
    }
}

/// First `count` values of the permutation of `[0, len)`: distinct indices
/// drawn without replacement.
pub fn sample_indices(len: u128, count: u128, seed: u64) -> Result<Vec<u128>> {
    if count > len {
        return Err(PermutationError::SampleTooLarge {
            requested: count,
            len,
        });
    }
    let permutation = Permutation::new(len, seed)?;
    (0..count).map(|index| permutation.forward(index)).collect()
}

pub fn sample<T: Clone>(items: &[T], count: usize, seed: u64) -> Result<Vec<T>> {
    let indices = sample_indices(items.len() as u128, count as u128, seed)?;
    Ok(indices
        .into_iter()
        .map(|index| items[index as usize].clone())
        .collect())
}

/// Shuffled copy of `items`. An empty slice shuffles to an empty vector.
pub fn shuffle<T: Clone>(items: &[T], seed: u64) -> Result<Vec<T>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    sample(items, items.len(), seed)
}
