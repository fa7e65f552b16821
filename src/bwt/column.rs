//! The `Column` trait: the operation set every BWT backing — static or
//! dynamic — must provide, per the specification's §4.1 BWT primitive.
//!
//! Only `len`, `access`, `rank`, `inverse_select`, and the C-array accessor
//! `c`/`c_len` are required; every other operation (`ranky`, `select`,
//! `n_elems`, `bsearch_c`, `backward_step`, the two-level
//! `backward_search_*` family, `select_next`, `values_in_range`) has a
//! default implementation built from those primitives, so a new backing
//! only has to answer the basic succinct-structure questions. A backing
//! that exposes a genuinely faster `select` (a wavelet tree, say) overrides
//! just that one method; every `Ring`-level navigation primitive is written
//! once against this trait and is backing-agnostic either way — see the
//! select-path design note in DESIGN.md.

/// One BWT column: a sequence `L` over an integer alphabet, plus the
/// cumulative-count array that indexes it.
pub trait Column {
    /// Length of `L`, including the sentinel at position 0 (`n+1`).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `L[i]`.
    fn access(&self, i: usize) -> usize;

    /// Count of `c` in `L[0..i)`.
    fn rank(&self, i: usize, c: usize) -> usize;

    /// `(rank(i, L[i]), L[i])`.
    fn inverse_select(&self, i: usize) -> (usize, usize) {
        let sym = self.access(i);
        (self.rank(i, sym), sym)
    }

    /// `C[c]` of this column's own cumulative-count array.
    fn c(&self, c: usize) -> usize;

    /// `|A| + 2`, the length of the C-array.
    fn c_len(&self) -> usize;

    /// Same as [`Self::rank`]; named separately because mutation code
    /// counts occurrences strictly among rows that precede an
    /// about-to-be-inserted or about-to-be-removed row, which for a
    /// prefix-count function is the same computation as `rank` itself.
    fn ranky(&self, i: usize, c: usize) -> usize {
        self.rank(i, c)
    }

    /// Number of occurrences of `c` (`C[c+1] - C[c]`).
    fn n_elems(&self, c: usize) -> usize {
        self.c(c + 1) - self.c(c)
    }

    /// Smallest symbol `c` with `C[c] > pos`, minus one.
    fn bsearch_c(&self, pos: usize) -> usize {
        let mut lo = 0usize;
        let mut hi = self.c_len() - 1;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.c(mid) > pos {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo - 1
    }

    /// Position of the `k`-th occurrence of `c` (1-indexed), or `None` if
    /// `c` occurs fewer than `k` times. The default implementation binary
    /// searches over `rank`, which is correct for any backing; a backing
    /// with a native succinct `select` should override this.
    fn select(&self, c: usize, k: usize) -> Option<usize> {
        if k == 0 || k > self.rank(self.len(), c) {
            return None;
        }
        let mut lo = 0usize;
        let mut hi = self.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.rank(mid + 1, c) >= k { hi = mid } else { lo = mid + 1 }
        }
        Some(lo)
    }

    /// The rank-pair refinement of the inclusive range `[l, r]` by symbol
    /// `c`: `(rank(l, c), rank(r+1, c))` — occurrences of `c` strictly
    /// before row `l`, and occurrences of `c` up to and including row `r`.
    /// Combined with the *adjacent* column's `C[c]` offset by the caller,
    /// this is the LF-mapping step that moves a bound interval from one
    /// BWT to the next around the ring cycle.
    fn backward_step(&self, l: usize, r: usize, c: usize) -> (usize, usize) {
        (self.rank(l, c), self.rank(r + 1, c))
    }

    /// First-level block for symbol `c`: `(C[c], C[c+1]-1)`, or the
    /// canonical empty pair `(1, 0)` when `c` has no occurrences (avoids
    /// underflowing when `C[c+1]` is zero).
    fn backward_search_1_interval(&self, c: usize) -> (usize, usize) {
        let l = self.c(c);
        let r_exclusive = self.c(c + 1);
        if r_exclusive <= l { (1, 0) } else { (l, r_exclusive - 1) }
    }

    /// First-level rank-pair: the [`Self::backward_step`] refinement of
    /// symbol `x` restricted to the block already owned by `c`.
    fn backward_search_1_rank(&self, c: usize, x: usize) -> (usize, usize) {
        let (l, r) = self.backward_search_1_interval(c);
        self.backward_step(l, r, x)
    }

    /// Turn a prior rank-pair into a concrete interval by adding this
    /// column's own `C[c]` offset, or the canonical empty pair when the
    /// rank-pair itself was already empty.
    fn backward_search_2_interval(&self, c: usize, prior: (usize, usize)) -> (usize, usize) {
        let (lo, hi) = prior;
        if hi <= lo {
            return (1, 0);
        }
        let off = self.c(c);
        (off + lo, off + hi - 1)
    }

    /// Combine [`Self::backward_search_2_interval`] with a further
    /// [`Self::backward_step`] refinement by symbol `d`, yielding another
    /// rank-pair for the next level.
    fn backward_search_2_rank(&self, c: usize, d: usize, prior: (usize, usize)) -> (usize, usize) {
        let (l, r) = self.backward_search_2_interval(c, prior);
        self.backward_step(l, r, d)
    }

    /// Scan forward through occurrences of `c` (there are `n_c` of them)
    /// looking for the first whose block (per `bsearch_c`) is `>= k`.
    /// Returns `(position, relative_rank)` with `relative_rank` the
    /// 0-indexed occurrence count, or `(0, 0)` when none qualifies. Blocks
    /// are monotonic non-decreasing in occurrence order, so this binary
    /// searches rather than scanning linearly.
    fn select_next(&self, k: usize, c: usize, n_c: usize) -> (usize, usize) {
        if n_c == 0 {
            return (0, 0);
        }
        let qualifies = |occurrence: usize| -> bool {
            match self.select(c, occurrence) {
                Some(pos) => self.bsearch_c(pos) >= k,
                None => false,
            }
        };
        if !qualifies(n_c) {
            return (0, 0);
        }
        let mut lo = 1usize;
        let mut hi = n_c;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if qualifies(mid) { hi = mid } else { lo = mid + 1 }
        }
        match self.select(c, lo) {
            Some(pos) => (pos, lo - 1),
            None => (0, 0),
        }
    }

    /// Materialise every row in `[l, r]` through `access`. The only
    /// read-path operation that allocates.
    fn values_in_range(&self, l: usize, r: usize) -> Vec<usize> {
        if l > r {
            return Vec::new();
        }
        (l..=r).map(|i| self.access(i)).collect()
    }

    /// Resident footprint, for `Debug`/CLI size reporting.
    fn size_in_bytes(&self) -> usize;

    /// This column's own cumulative-count array, for structural validation
    /// (`Ring::load`'s I1 check) and size reporting generic over the
    /// concrete backing.
    fn carray(&self) -> &super::carray::CArray;
}

/// Build a column from a freshly sorted batch: the raw data sequence
/// (sentinel-prefixed), the size of the alphabet the accompanying C-array
/// is indexed over, and that alphabet's per-symbol occurrence counts.
/// Implemented identically by both backings; split out from [`Column`]
/// because a static backing has no use for it after construction.
pub trait BuildColumn: Sized {
    fn build(data: Vec<usize>, alphabet: usize, occ: &[usize]) -> Self;
}
