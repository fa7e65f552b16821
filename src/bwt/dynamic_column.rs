//! The dynamic BWT column backing: a plain growable sequence supporting
//! `insert_WT`/`remove_WT`/`remove_node_and_return`, used by the
//! `ring-dyn-basic`, `ring-dyn`, and `ring-dyn-map` CLI backings.
//!
//! The reference design picks a balanced-tree wavelet variant so that
//! mutation stays amortised-logarithmic; the concrete backing is out of
//! scope (§1), so this crate uses a plain `Vec<usize>` and accepts O(n)
//! shifting on insert/remove in exchange for a backing that is trivially
//! correct and easy to audit against the dynamic-update algorithms in
//! §4.4.

use super::carray::CArray;
use super::column::{BuildColumn, Column};
use serde::{Deserialize, Serialize};

/// A mutable BWT column: a growable sequence plus its C-array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicColumn {
    data: Vec<usize>,
    carray: CArray,
}

impl DynamicColumn {
    pub fn new(data: Vec<usize>, alphabet: usize, occ: &[usize]) -> Self {
        DynamicColumn { data, carray: CArray::from_occurrences(alphabet, occ) }
    }

    pub fn carray(&self) -> &CArray {
        &self.carray
    }

    /// Insert symbol `c` at row `i`, shifting everything from `i` on
    /// rightward. Does not touch the C-array; callers update `C` with
    /// [`CArray::bump`] separately, matching the reference design's split
    /// between `insert_WT` and `insert_C`.
    pub fn insert_wt(&mut self, i: usize, c: usize) {
        self.data.insert(i, c);
    }

    /// Remove row `i`, shifting everything after it leftward.
    pub fn remove_wt(&mut self, i: usize) {
        self.data.remove(i);
    }

    /// Remove row `i` and report the symbol that was there, for
    /// node-removal's propagation through the other two columns.
    pub fn remove_node_and_return(&mut self, i: usize) -> usize {
        self.data.remove(i)
    }

    /// Grow the alphabet by one symbol with zero initial occurrences.
    pub fn increment_alphabet(&mut self) {
        self.carray.push_back();
    }

    /// Record `delta` occurrences of `symbol` in the C-array (`delta` is
    /// `+1` on insertion, `-1` on removal).
    pub fn adjust_c(&mut self, symbol: usize, delta: i64) {
        if delta > 0 {
            self.carray.bump(symbol);
        } else if delta < 0 {
            self.carray.unbump(symbol);
        }
    }
}

impl Column for DynamicColumn {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn access(&self, i: usize) -> usize {
        self.data.get(i).copied().unwrap_or(0)
    }

    fn rank(&self, i: usize, c: usize) -> usize {
        self.data[..i.min(self.data.len())].iter().filter(|&&x| x == c).count()
    }

    fn c(&self, c: usize) -> usize {
        self.carray.get(c)
    }

    fn c_len(&self) -> usize {
        self.carray.len()
    }

    fn size_in_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<usize>() + self.carray.size_in_bytes()
    }

    fn carray(&self) -> &CArray {
        &self.carray
    }
}

impl BuildColumn for DynamicColumn {
    fn build(data: Vec<usize>, alphabet: usize, occ: &[usize]) -> Self {
        DynamicColumn::new(data, alphabet, occ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_then_remove_round_trips() {
        let occ = [0, 2, 1];
        let mut col = DynamicColumn::new(vec![0, 1, 2, 1], 2, &occ);
        let before = col.clone();
        col.insert_wt(2, 1);
        col.adjust_c(1, 1);
        assert_eq!(col.access(2), 1);
        assert_eq!(col.rank(4, 1), 3);
        let removed = col.remove_node_and_return(2);
        assert_eq!(removed, 1);
        col.adjust_c(1, -1);
        assert_eq!(col, before);
    }

    #[test]
    fn increment_alphabet_extends_carray() {
        let occ = [0, 2, 1];
        let mut col = DynamicColumn::new(vec![0, 1, 2, 1], 2, &occ);
        col.increment_alphabet();
        assert_eq!(col.carray().alphabet(), 3);
        assert_eq!(col.c(3), col.c(2));
    }

    #[test]
    fn backward_step_excludes_rows_outside_range() {
        // rows 1..=5 hold [2, 2, 2, 7, 9]; refining [2, 4] by symbol 2 must
        // see only row 2 (row 1 sits outside the range).
        let occ = [0, 3, 0, 0, 0, 0, 0, 1, 0, 1];
        let col = DynamicColumn::new(vec![0, 2, 2, 2, 7, 9], 9, &occ);
        let (lo, hi) = col.backward_step(2, 4, 2);
        assert_eq!(hi - lo, 1);
        let (lo, hi) = col.backward_step(1, 5, 2);
        assert_eq!(hi - lo, 3);
    }
}
