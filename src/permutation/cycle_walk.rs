use crate::error::{PermutationError, Result};
use crate::permutation::feistel::DomainBits;

const LOG_TARGET: &str = "feistel_perm::cycle_walk";

pub const DEFAULT_WALK_LIMIT: u32 = 1 << 16;

/// Longest walk any bijection on `[0, 2^b)` can force: a cycle that visits
/// every value outside `[0, len)` before coming back in. Saturates at `u32::MAX`.
pub fn worst_case_steps(len: u128, bits: DomainBits) -> u32 {
    let outside = match bits.capacity() {
        Some(capacity) => capacity.saturating_sub(len),
        // b = 128: 2^128 - len
        None => u128::MAX - len.saturating_sub(1),
    };
    u32::try_from(outside.saturating_add(1)).unwrap_or(u32::MAX)
}

/// Restricts a bijection on `[0, 2^b)` to `[0, len)` by re-applying it until
/// the value lands back inside the target range.
///
/// Since `2^(b-1) < len`, fewer than half of the oversized domain lies outside
/// the target and a walk takes at most two steps in expectation. `limit` only
/// guards against a broken round function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleWalker {
    len: u128,
    limit: u32,
}

impl CycleWalker {
    pub fn new(len: u128, limit: u32) -> Self {
        CycleWalker {
            len,
            limit: limit.max(1),
        }
    }

    pub fn bound(&self) -> u128 {
        self.len
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn walk<F>(&self, start: u128, step: F) -> Result<u128>
    where
        F: Fn(u128) -> u128,
    {
        let mut x = start;
        for _ in 0..self.limit {
            x = step(x);
            if x < self.len {
                return Ok(x);
            }
        }
        tracing::error!(
            target: LOG_TARGET,
            start = %start,
            len = %self.len,
            steps = self.limit,
            "cycle walk exceeded its step limit"
        );
        Err(PermutationError::CycleWalkOverflow {
            start,
            steps: self.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_until_inside_range() {
        let walker = CycleWalker::new(5, 16);
        // rotation on [0, 8): 5 -> 6 -> 7 -> 0
        let rotate = |x: u128| (x + 1) % 8;
        assert_eq!(walker.walk(4, rotate), Ok(0));
        assert_eq!(walker.walk(1, rotate), Ok(2));
    }

    #[test]
    fn worst_case_counts_every_outside_value() {
        assert_eq!(worst_case_steps(1, DomainBits::for_len(1)), 1);
        assert_eq!(worst_case_steps(5, DomainBits::for_len(5)), 4);
        assert_eq!(worst_case_steps(8, DomainBits::for_len(8)), 1);
        let len = (1u128 << 20) + 1;
        assert_eq!(worst_case_steps(len, DomainBits::for_len(len)), 1 << 20);
        let wide = (1u128 << 64) + 1;
        assert_eq!(worst_case_steps(wide, DomainBits::for_len(wide)), u32::MAX);
        assert_eq!(worst_case_steps(u128::MAX, DomainBits::for_len(u128::MAX)), 2);
    }

    #[test]
    fn stuck_orbit_reports_overflow() {
        let walker = CycleWalker::new(4, 32);
        let stuck = |x: u128| if x >= 4 { x } else { 4 };
        assert_eq!(
            walker.walk(0, stuck),
            Err(PermutationError::CycleWalkOverflow { start: 0, steps: 32 })
        );
    }
}
