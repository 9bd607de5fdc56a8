use crate::crypto::mixer::RoundMixer;
use crate::error::Result;
use crate::permutation::engine::Permutation;
use std::iter::FusedIterator;

/// Sequential traversal yielding `forward(0), forward(1), …, forward(len - 1)`.
///
/// Owns only its position, so independent traversals of the same engine
/// each get their own cursor. Exhaustion is terminal until [`Cursor::reset`];
/// an error also ends the traversal.
#[derive(Debug, Clone)]
pub struct Cursor<'a, M> {
    permutation: &'a Permutation<M>,
    position: u128,
}

impl<'a, M: RoundMixer> Cursor<'a, M> {
    pub(crate) fn new(permutation: &'a Permutation<M>) -> Self {
        Cursor {
            permutation,
            position: 0,
        }
    }

    /// Index of the next value to be produced; equals `len` once exhausted.
    pub fn position(&self) -> u128 {
        self.position
    }

    pub fn remaining(&self) -> u128 {
        self.permutation.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position == self.permutation.len()
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl<'a, M: RoundMixer> Iterator for Cursor<'a, M> {
    type Item = Result<u128>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_exhausted() {
            return None;
        }
        let result = self.permutation.forward(self.position);
        self.position = match result {
            Ok(_) => self.position + 1,
            Err(_) => self.permutation.len(),
        };
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        match usize::try_from(remaining) {
            Ok(exact) => (exact, Some(exact)),
            Err(_) => (usize::MAX, None),
        }
    }

    /// Skips ahead without evaluating the skipped positions.
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let target = self.position.saturating_add(n as u128);
        self.position = target.min(self.permutation.len());
        self.next()
    }
}

impl<'a, M: RoundMixer> FusedIterator for Cursor<'a, M> {}

#[cfg(test)]
mod tests {
    use crate::permutation::engine::Permutation;

    #[test]
    fn nth_matches_forward() {
        let perm = Permutation::new(1000, 17).unwrap();
        let mut cursor = perm.iter();
        assert_eq!(cursor.nth(500), Some(perm.forward(500)));
        assert_eq!(cursor.position(), 501);
        assert_eq!(cursor.next(), Some(perm.forward(501)));
        assert_eq!(cursor.nth(10_000), None);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn reset_restarts_from_zero() {
        let perm = Permutation::new(7, 3).unwrap();
        let mut cursor = perm.iter();
        let first: Vec<u128> = cursor.by_ref().map(Result::unwrap).collect();
        assert_eq!(cursor.next(), None);
        cursor.reset();
        assert_eq!(cursor.remaining(), 7);
        let second: Vec<u128> = cursor.map(Result::unwrap).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn size_hint_tracks_remaining() {
        let perm = Permutation::new(10, 3).unwrap();
        let mut cursor = perm.iter();
        assert_eq!(cursor.size_hint(), (10, Some(10)));
        cursor.next();
        assert_eq!(cursor.size_hint(), (9, Some(9)));
        let huge = Permutation::new(u128::MAX, 3).unwrap();
        assert_eq!(huge.iter().size_hint(), (usize::MAX, None));
    }
}
