//! The Ring index (§4): three cooperating BWT columns that together encode
//! every lexicographic ordering of a set of `(s, p, o)` triples, plus the
//! interval-walking primitives a leapfrog-triejoin style query engine drives
//! to enumerate matches without ever materialising a sorted copy of the
//! data for the ordering it happens to need.
//!
//! A `Ring` owns three [`Column`]s:
//!
//! - `bwt_s`: POS order, the S column — `init_p`/`init_po` walk it.
//! - `bwt_p`: OSP order, the P column — `init_o`/`init_so` walk it.
//! - `bwt_o`: SPO order, the O column — `init_s`/`init_sp` walk it.
//!
//! A column stores the symbol that *precedes* its own sort key, so binding a
//! variable always means reading the adjacent column, never the one sharing
//! its name: `init_s` opens a block in `bwt_o` (the column whose C-array
//! counts S occurrences), `init_p` opens one in `bwt_s`, and `init_o` opens
//! one in `bwt_p`.
//!
//! The three are wired so that moving from one bound variable to the next
//! around the cycle S → P → O → S is always a [`Column::backward_step`]
//! against the *next* column in the cycle, which is what lets six orderings
//! come from three columns instead of six.

use crate::bwt::{BuildColumn, Column};
use crate::error::{Error, Result};
use crate::interval::Interval;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// An RDF-like triple of small integer ids.
pub type Triple = (usize, usize, usize);

/// The self-index: three BWT columns plus the alphabet bounds needed to
/// bound-check a query variable before it is ever looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring<C> {
    bwt_s: C,
    bwt_p: C,
    bwt_o: C,
    max_s: usize,
    max_p: usize,
    max_o: usize,
    n_triples: usize,
}

impl<C: Column> Ring<C> {
    pub fn n_triples(&self) -> usize {
        self.n_triples
    }

    pub fn max_s(&self) -> usize {
        self.max_s
    }

    pub fn max_p(&self) -> usize {
        self.max_p
    }

    pub fn max_o(&self) -> usize {
        self.max_o
    }

    /// Total resident size of the three columns, for CLI/Debug reporting.
    pub fn size_in_bytes(&self) -> usize {
        self.bwt_s.size_in_bytes() + self.bwt_p.size_in_bytes() + self.bwt_o.size_in_bytes()
    }

    /// I1: every column's C-array is non-decreasing and the three agree on
    /// the total triple count. Checked on `load`, not on every query.
    fn is_well_formed(&self) -> bool {
        self.bwt_s.carray().is_well_formed()
            && self.bwt_p.carray().is_well_formed()
            && self.bwt_o.carray().is_well_formed()
            && self.bwt_s.len() == self.n_triples + 1
            && self.bwt_p.len() == self.n_triples + 1
            && self.bwt_o.len() == self.n_triples + 1
    }

    // ---- entry points: one full-width interval per ordering --------------

    pub fn open_spo(&self) -> Interval {
        Interval::new(1, self.n_triples)
    }
    pub fn open_sop(&self) -> Interval {
        Interval::new(1, self.n_triples)
    }
    pub fn open_pso(&self) -> Interval {
        Interval::new(1, self.n_triples)
    }
    pub fn open_pos(&self) -> Interval {
        Interval::new(1, self.n_triples)
    }
    pub fn open_osp(&self) -> Interval {
        Interval::new(1, self.n_triples)
    }
    pub fn open_ops(&self) -> Interval {
        Interval::new(1, self.n_triples)
    }

    // ---- first-variable binding -------------------------------------------

    /// Bind the first variable of an S-first ordering. The block lives in
    /// `bwt_o`, whose C-array is indexed by S.
    pub fn init_s(&self, s_value: usize) -> Interval {
        let (l, r) = self.bwt_o.backward_search_1_interval(s_value);
        Interval::new(l, r)
    }

    /// Bind the first variable of a P-first ordering. The block lives in
    /// `bwt_s`, whose C-array is indexed by P.
    pub fn init_p(&self, p_value: usize) -> Interval {
        let (l, r) = self.bwt_s.backward_search_1_interval(p_value);
        Interval::new(l, r)
    }

    /// Bind the first variable of an O-first ordering. The block lives in
    /// `bwt_p`, whose C-array is indexed by O.
    pub fn init_o(&self, o_value: usize) -> Interval {
        let (l, r) = self.bwt_p.backward_search_1_interval(o_value);
        Interval::new(l, r)
    }

    /// Enumerate the full S column, used as the fallback start of an
    /// unbound query: every distinct value present, in order.
    pub fn min_s(&self, i: &mut Interval) -> usize {
        i.begin(&self.bwt_s)
    }
    pub fn next_s(&self, i: &mut Interval, v: usize) -> usize {
        if v > self.max_s { return 0; }
        i.next_value(v, &self.bwt_s)
    }
    pub fn min_p(&self, i: &mut Interval) -> usize {
        i.begin(&self.bwt_p)
    }
    pub fn next_p(&self, i: &mut Interval, v: usize) -> usize {
        if v > self.max_p { return 0; }
        i.next_value(v, &self.bwt_p)
    }
    pub fn min_o(&self, i: &mut Interval) -> usize {
        i.begin(&self.bwt_o)
    }
    pub fn next_o(&self, i: &mut Interval, v: usize) -> usize {
        if v > self.max_o { return 0; }
        i.next_value(v, &self.bwt_o)
    }

    // ---- two-variable bindings (direct port of the ring-cycle formulas) --

    /// `s` then `p` bound: rows of `bwt_o` whose triple has this (s, p).
    /// Opens `bwt_s`'s own block for P (its C-array is indexed by P),
    /// refines by S (its own data), then turns that rank-pair into an
    /// absolute interval within `bwt_o` via `bwt_o`'s C-array (indexed by S).
    pub fn init_sp(&self, s_value: usize, p_value: usize) -> Interval {
        let prior = self.bwt_s.backward_search_1_rank(p_value, s_value);
        let (l, r) = self.bwt_o.backward_search_2_interval(s_value, prior);
        Interval::new(l, r)
    }

    /// `s` then `o` bound: rows of `bwt_p` whose triple has this (s, o).
    /// Opens `bwt_o`'s own block for S, refines by O, then lands in `bwt_p`
    /// via `bwt_p`'s C-array (indexed by O).
    pub fn init_so(&self, s_value: usize, o_value: usize) -> Interval {
        let prior = self.bwt_o.backward_search_1_rank(s_value, o_value);
        let (l, r) = self.bwt_p.backward_search_2_interval(o_value, prior);
        Interval::new(l, r)
    }

    /// `p` then `o` bound: rows of `bwt_s` whose triple has this (p, o).
    /// Opens `bwt_p`'s own block for O, refines by P, then lands in `bwt_s`
    /// via `bwt_s`'s C-array (indexed by P).
    pub fn init_po(&self, p_value: usize, o_value: usize) -> Interval {
        let prior = self.bwt_p.backward_search_1_rank(o_value, p_value);
        let (l, r) = self.bwt_s.backward_search_2_interval(p_value, prior);
        Interval::new(l, r)
    }

    /// All three bound: the singleton (or empty) interval for one triple.
    /// Chains the same three blocks around the full cycle: `bwt_p` (block
    /// O, refine P) → `bwt_s` (block P, refine S) → `bwt_o` (block S), each
    /// step handing a rank-pair to the next column's C-array offset.
    pub fn init_spo(&self, s_value: usize, p_value: usize, o_value: usize) -> Interval {
        let first = self.bwt_p.backward_search_1_rank(o_value, p_value);
        let second = self.bwt_s.backward_search_2_rank(p_value, s_value, first);
        let (l, r) = self.bwt_o.backward_search_2_interval(s_value, second);
        Interval::new(l, r)
    }

    pub fn contains(&self, triple: Triple) -> bool {
        !self.init_spo(triple.0, triple.1, triple.2).is_empty()
    }

    // ---- PSO: P bound, then simple down to S, then read O directly -------

    /// Narrow a P-bound interval (rows of `bwt_s`) to those with S = `s_value`,
    /// landing in `bwt_o` (its C-array is indexed by S).
    pub fn down_p_s(&self, p_int: &Interval, s_value: usize) -> Interval {
        let prior = self.bwt_s.backward_step(p_int.left(), p_int.right(), s_value);
        let (l, r) = self.bwt_o.backward_search_2_interval(s_value, prior);
        Interval::new(l, r)
    }

    pub fn min_o_in_ps(&self, i: &mut Interval) -> usize {
        i.begin(&self.bwt_o)
    }
    pub fn next_o_in_ps(&self, i: &mut Interval, v: usize) -> usize {
        if v > self.max_o { return 0; }
        i.next_value(v, &self.bwt_o)
    }
    pub fn there_are_o_in_ps(&self, i: &Interval) -> bool {
        i.get_cur_value() != i.end()
    }
    // `_in_S` aliases: reading directly off `bwt_o` is the same read whether
    // the caller arrived via `down_p_s` (PSO) or `init_s` alone (S-first).
    pub fn min_o_in_s(&self, i: &mut Interval) -> usize {
        self.min_o_in_ps(i)
    }
    pub fn next_o_in_s(&self, i: &mut Interval, v: usize) -> usize {
        self.next_o_in_ps(i, v)
    }
    pub fn there_are_o_in_s(&self, i: &Interval) -> bool {
        self.there_are_o_in_ps(i)
    }
    pub fn all_o_in_range(&self, i: &Interval) -> Vec<usize> {
        self.bwt_o.values_in_range(i.left(), i.right())
    }

    // ---- OPS: O bound, then simple down to P, then read S directly -------

    /// Narrow an O-bound interval (rows of `bwt_p`) to those with P = `p_value`,
    /// landing in `bwt_s` (its C-array is indexed by P).
    pub fn down_o_p(&self, o_int: &Interval, p_value: usize) -> Interval {
        let prior = self.bwt_p.backward_step(o_int.left(), o_int.right(), p_value);
        let (l, r) = self.bwt_s.backward_search_2_interval(p_value, prior);
        Interval::new(l, r)
    }

    pub fn min_s_in_op(&self, i: &mut Interval) -> usize {
        i.begin(&self.bwt_s)
    }
    pub fn next_s_in_op(&self, i: &mut Interval, v: usize) -> usize {
        if v > self.max_s { return 0; }
        i.next_value(v, &self.bwt_s)
    }
    pub fn there_are_s_in_op(&self, i: &Interval) -> bool {
        i.get_cur_value() != i.end()
    }
    pub fn min_s_in_p(&self, i: &mut Interval) -> usize {
        self.min_s_in_op(i)
    }
    pub fn next_s_in_p(&self, i: &mut Interval, v: usize) -> usize {
        self.next_s_in_op(i, v)
    }
    pub fn there_are_s_in_p(&self, i: &Interval) -> bool {
        self.there_are_s_in_op(i)
    }
    pub fn all_s_in_range(&self, i: &Interval) -> Vec<usize> {
        self.bwt_s.values_in_range(i.left(), i.right())
    }

    // ---- SOP: S bound, then simple down to O, then read P directly -------

    /// Narrow an S-bound interval (rows of `bwt_o`) to those with O = `o_value`,
    /// landing in `bwt_p` (its C-array is indexed by O).
    pub fn down_s_o(&self, s_int: &Interval, o_value: usize) -> Interval {
        let prior = self.bwt_o.backward_step(s_int.left(), s_int.right(), o_value);
        let (l, r) = self.bwt_p.backward_search_2_interval(o_value, prior);
        Interval::new(l, r)
    }

    pub fn min_p_in_so(&self, i: &mut Interval) -> usize {
        i.begin(&self.bwt_p)
    }
    pub fn next_p_in_so(&self, i: &mut Interval, v: usize) -> usize {
        if v > self.max_p { return 0; }
        i.next_value(v, &self.bwt_p)
    }
    pub fn there_are_p_in_so(&self, i: &Interval) -> bool {
        i.get_cur_value() != i.end()
    }
    pub fn min_p_in_o(&self, i: &mut Interval) -> usize {
        self.min_p_in_so(i)
    }
    pub fn next_p_in_o(&self, i: &mut Interval, v: usize) -> usize {
        self.next_p_in_so(i, v)
    }
    pub fn there_are_p_in_o(&self, i: &Interval) -> bool {
        self.there_are_p_in_so(i)
    }
    pub fn all_p_in_range(&self, i: &Interval) -> Vec<usize> {
        self.bwt_p.values_in_range(i.left(), i.right())
    }

    // ---- SPO: S bound, complex down to P (scanning bwt_s), read O -------

    /// Discover the smallest P value with at least one row for `s_value`,
    /// caching the `select_next` result on `s_int` so a matched `down_s_p`
    /// call can reuse it instead of repeating the scan.
    pub fn min_p_in_s(&self, s_int: &mut Interval, s_value: usize) -> usize {
        let q = self.bwt_s.select_next(1, s_value, self.bwt_o.n_elems(s_value));
        if q == (0, 0) { return 0; }
        let b = self.bwt_s.bsearch_c(q.0);
        s_int.set_stored_values(b, q.1);
        s_int.set_cur(b);
        b
    }

    pub fn next_p_in_s(&self, s_int: &mut Interval, s_value: usize, p_value: usize) -> usize {
        if p_value > self.max_p { return 0; }
        let q = self.bwt_s.select_next(p_value, s_value, self.bwt_o.n_elems(s_value));
        if q == (0, 0) {
            s_int.set_cur(0);
            return 0;
        }
        let b = self.bwt_s.bsearch_c(q.0);
        s_int.set_stored_values(b, q.1);
        s_int.set_cur(b);
        b
    }

    pub fn there_are_p_in_s(&self, s_int: &Interval) -> bool {
        s_int.get_cur_value() != s_int.end()
    }

    /// Narrow `s_int` (rows of `bwt_o`, S already bound) to those with
    /// P = `p_value`, reusing `s_int`'s cached `select_next` result from the
    /// most recent `min_p_in_s`/`next_p_in_s` call on this same `p_value`
    /// when present, falling back to a fresh scan otherwise.
    pub fn down_s_p(&self, s_int: &Interval, s_value: usize, p_value: usize) -> Interval {
        let (b, start) = match s_int.get_stored_values() {
            Some(v) => v,
            None => {
                let q = self.bwt_s.select_next(p_value, s_value, self.bwt_o.n_elems(s_value));
                if q == (0, 0) {
                    return Interval::empty();
                }
                (self.bwt_s.bsearch_c(q.0), q.1)
            }
        };
        let n_e = self.bwt_s.rank(self.bwt_s.c(b + 1), s_value)
            - self.bwt_s.rank(self.bwt_s.c(b), s_value);
        if n_e == 0 {
            return Interval::empty();
        }
        Interval::new(s_int.left() + start, s_int.left() + start + n_e - 1)
    }

    pub fn min_o_in_sp(&self, i: &mut Interval) -> usize {
        i.begin(&self.bwt_o)
    }
    pub fn next_o_in_sp(&self, i: &mut Interval, v: usize) -> usize {
        if v > self.max_o { return 0; }
        i.next_value(v, &self.bwt_o)
    }
    pub fn there_are_o_in_sp(&self, i: &Interval) -> bool {
        i.get_cur_value() != i.end()
    }

    // ---- POS: P bound, complex down to O (scanning bwt_p), read S -------

    pub fn min_o_in_p(&self, p_int: &mut Interval, p_value: usize) -> usize {
        let q = self.bwt_p.select_next(1, p_value, self.bwt_s.n_elems(p_value));
        if q == (0, 0) { return 0; }
        let b = self.bwt_p.bsearch_c(q.0);
        p_int.set_stored_values(b, q.1);
        p_int.set_cur(b);
        b
    }

    pub fn next_o_in_p(&self, p_int: &mut Interval, p_value: usize, o_value: usize) -> usize {
        if o_value > self.max_o { return 0; }
        let q = self.bwt_p.select_next(o_value, p_value, self.bwt_s.n_elems(p_value));
        if q == (0, 0) {
            p_int.set_cur(0);
            return 0;
        }
        let b = self.bwt_p.bsearch_c(q.0);
        p_int.set_stored_values(b, q.1);
        p_int.set_cur(b);
        b
    }

    pub fn there_are_o_in_p(&self, p_int: &Interval) -> bool {
        p_int.get_cur_value() != p_int.end()
    }

    pub fn down_p_o(&self, p_int: &Interval, p_value: usize, o_value: usize) -> Interval {
        let (b, start) = match p_int.get_stored_values() {
            Some(v) => v,
            None => {
                let q = self.bwt_p.select_next(o_value, p_value, self.bwt_s.n_elems(p_value));
                if q == (0, 0) {
                    return Interval::empty();
                }
                (self.bwt_p.bsearch_c(q.0), q.1)
            }
        };
        let n_e = self.bwt_p.rank(self.bwt_p.c(b + 1), p_value)
            - self.bwt_p.rank(self.bwt_p.c(b), p_value);
        if n_e == 0 {
            return Interval::empty();
        }
        Interval::new(p_int.left() + start, p_int.left() + start + n_e - 1)
    }

    pub fn min_s_in_po(&self, i: &mut Interval) -> usize {
        i.begin(&self.bwt_s)
    }
    pub fn next_s_in_po(&self, i: &mut Interval, v: usize) -> usize {
        if v > self.max_s { return 0; }
        i.next_value(v, &self.bwt_s)
    }
    pub fn there_are_s_in_po(&self, i: &Interval) -> bool {
        i.get_cur_value() != i.end()
    }

    // ---- OSP: O bound, complex down to S (scanning bwt_o), read P -------

    pub fn min_s_in_o(&self, o_int: &mut Interval, o_value: usize) -> usize {
        let q = self.bwt_o.select_next(1, o_value, self.bwt_p.n_elems(o_value));
        if q == (0, 0) { return 0; }
        let b = self.bwt_o.bsearch_c(q.0);
        o_int.set_stored_values(b, q.1);
        o_int.set_cur(b);
        b
    }

    pub fn next_s_in_o(&self, o_int: &mut Interval, o_value: usize, s_value: usize) -> usize {
        if s_value > self.max_s { return 0; }
        let q = self.bwt_o.select_next(s_value, o_value, self.bwt_p.n_elems(o_value));
        if q == (0, 0) {
            o_int.set_cur(0);
            return 0;
        }
        let b = self.bwt_o.bsearch_c(q.0);
        o_int.set_stored_values(b, q.1);
        o_int.set_cur(b);
        b
    }

    pub fn there_are_s_in_o(&self, o_int: &Interval) -> bool {
        o_int.get_cur_value() != o_int.end()
    }

    pub fn down_o_s(&self, o_int: &Interval, o_value: usize, s_value: usize) -> Interval {
        let (b, start) = match o_int.get_stored_values() {
            Some(v) => v,
            None => {
                let q = self.bwt_o.select_next(s_value, o_value, self.bwt_p.n_elems(o_value));
                if q == (0, 0) {
                    return Interval::empty();
                }
                (self.bwt_o.bsearch_c(q.0), q.1)
            }
        };
        let n_e = self.bwt_o.rank(self.bwt_o.c(b + 1), o_value)
            - self.bwt_o.rank(self.bwt_o.c(b), o_value);
        if n_e == 0 {
            return Interval::empty();
        }
        Interval::new(o_int.left() + start, o_int.left() + start + n_e - 1)
    }

    pub fn min_p_in_os(&self, i: &mut Interval) -> usize {
        i.begin(&self.bwt_p)
    }
    pub fn next_p_in_os(&self, i: &mut Interval, v: usize) -> usize {
        if v > self.max_p { return 0; }
        i.next_value(v, &self.bwt_p)
    }
    pub fn there_are_p_in_os(&self, i: &Interval) -> bool {
        i.get_cur_value() != i.end()
    }

    // ---- down from a single bound variable, used ahead of a complex walk -

    pub fn down_s(&self, s_value: usize) -> Interval {
        self.init_s(s_value)
    }
    pub fn down_p(&self, p_value: usize) -> Interval {
        self.init_p(p_value)
    }
    pub fn down_o(&self, o_value: usize) -> Interval {
        self.init_o(o_value)
    }
}

impl<C: BuildColumn + Column> Ring<C> {
    /// Build a Ring from a batch of triples. Three sorting passes (full
    /// triple, then by O, then by P) derive the three BWT column sequences
    /// and their C-arrays per the ring-cycle construction.
    ///
    /// The first sort may use an unstable comparator: ties only occur
    /// between structurally identical (duplicate) triples, for which any
    /// relative order is correct. The two re-sorts that follow MUST be
    /// stable: each preserves the relative order the previous pass
    /// established among rows sharing the re-sort's key, and the ring-cycle
    /// invariant depends on that order surviving into the final column.
    pub fn from_triples(mut triples: Vec<Triple>) -> Self {
        use rayon::slice::ParallelSliceMut;

        triples.par_sort_unstable_by(|a, b| a.cmp(b));
        triples.dedup();
        let n = triples.len();
        info!("building ring index from {n} distinct triples");

        let max_s = triples.iter().map(|t| t.0).max().unwrap_or(0);
        let max_p = triples.iter().map(|t| t.1).max().unwrap_or(0);
        let max_o = triples.iter().map(|t| t.2).max().unwrap_or(0);
        let max_so = max_s.max(max_o);

        // Pass 1 (already done above): SPO order gives the O column for
        // `bwt_o`, whose C-array counts S occurrences (the symbol
        // preceding O in this order).
        let mut o_occ = vec![0usize; max_so + 2];
        let mut o_data = Vec::with_capacity(n + 1);
        o_data.push(0);
        for &(s, _, o) in &triples {
            o_data.push(o);
            o_occ[s] += 1;
        }
        let bwt_o = C::build(o_data, max_so, &o_occ);

        // Pass 2: stable re-sort by O alone gives OSP order, from which the
        // P column for `bwt_p` is taken; its C-array counts O occurrences.
        triples.par_sort_by_key(|t| t.2);
        let mut p_occ = vec![0usize; max_so + 2];
        let mut p_data = Vec::with_capacity(n + 1);
        p_data.push(0);
        for &(_, p, o) in &triples {
            p_data.push(p);
            p_occ[o] += 1;
        }
        let bwt_p = C::build(p_data, max_so, &p_occ);

        // Pass 3: stable re-sort by P alone gives POS order, from which the
        // S column for `bwt_s` is taken; its C-array counts P occurrences.
        triples.par_sort_by_key(|t| t.1);
        let mut s_occ = vec![0usize; max_p + 2];
        let mut s_data = Vec::with_capacity(n + 1);
        s_data.push(0);
        for &(s, p, _) in &triples {
            s_data.push(s);
            s_occ[p] += 1;
        }
        let bwt_s = C::build(s_data, max_p, &s_occ);

        debug!("ring alphabet bounds: max_s={max_s} max_p={max_p} max_o={max_o}");
        Ring { bwt_s, bwt_p, bwt_o, max_s, max_p, max_o, n_triples: n }
    }
}

impl<C: Column + Serialize + for<'de> Deserialize<'de>> Ring<C> {
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        info!("serialized ring ({} triples) to {} bytes", self.n_triples, bytes.len());
        Ok(bytes)
    }

    pub fn load(bytes: &[u8]) -> Result<Self> {
        let (ring, _): (Self, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        if !ring.is_well_formed() {
            return Err(Error::Corrupt("C-array structural check failed on load".into()));
        }
        info!("loaded ring ({} triples) from {} bytes", ring.n_triples, bytes.len());
        Ok(ring)
    }
}

use crate::bwt::DynamicColumn;

impl Ring<DynamicColumn> {
    /// Insert one triple. A no-op (not an error) if the triple is already
    /// present. One of the three branches below always collapses to a
    /// single row once alphabet growth has been applied, since the ring
    /// cycle invariant (I2) guarantees every triple is reachable from at
    /// least one of the three columns' sorted order; the final `Err` arm is
    /// reachable only if that invariant was already broken before the call.
    pub fn insert(&mut self, triple: Triple) -> Result<()> {
        let (s, p, o) = triple;
        if !self.init_spo(s, p, o).is_empty() {
            return Ok(());
        }

        if s > self.max_s {
            self.bwt_o.increment_alphabet();
            self.bwt_p.increment_alphabet();
            self.max_s = s;
            self.max_o = s;
        }
        if p > self.max_p {
            self.bwt_s.increment_alphabet();
            self.max_p = p;
        }
        if o > self.max_o {
            self.bwt_p.increment_alphabet();
            self.bwt_o.increment_alphabet();
            self.max_o = o;
            self.max_s = o;
        }

        let low0 = self.bwt_s.c(p);
        let high0 = self.bwt_s.c(p + 1).saturating_sub(1);

        if low0 == high0 + 1 {
            let idx = low0;
            self.bwt_s.insert_wt(idx, s);
            self.bwt_o.adjust_c(s, 1);
            let idx = self.bwt_o.c(s) + self.bwt_s.ranky(idx, s);
            self.bwt_o.insert_wt(idx, o);
            self.bwt_p.adjust_c(o, 1);
            let idx = self.bwt_p.c(o) + self.bwt_o.ranky(idx, o);
            self.bwt_p.insert_wt(idx, p);
            self.bwt_s.adjust_c(p, 1);
            self.n_triples += 1;
            debug!("insert ({s}, {p}, {o}) resolved S-first");
            return Ok(());
        }

        let low1 = self.bwt_o.c(s) + self.bwt_s.ranky(low0, s);
        let high1 = self.bwt_o.c(s) + self.bwt_s.ranky(high0 + 1, s) - 1;

        if low1 == high1 + 1 {
            let idx = low1;
            self.bwt_o.insert_wt(idx, o);
            self.bwt_p.adjust_c(o, 1);
            let idx = self.bwt_p.c(o) + self.bwt_o.ranky(idx, o);
            self.bwt_p.insert_wt(idx, p);
            self.bwt_s.adjust_c(p, 1);
            let idx = self.bwt_s.c(p) + self.bwt_p.ranky(idx, p);
            self.bwt_s.insert_wt(idx, s);
            self.bwt_o.adjust_c(s, 1);
            self.n_triples += 1;
            debug!("insert ({s}, {p}, {o}) resolved O-first");
            return Ok(());
        }

        let low2 = self.bwt_p.c(o) + self.bwt_o.ranky(low1, o);
        let high2 = self.bwt_p.c(o) + self.bwt_o.ranky(high1 + 1, o) - 1;

        if low2 == high2 + 1 {
            let idx = low2;
            self.bwt_p.insert_wt(idx, p);
            self.bwt_s.adjust_c(p, 1);
            // Consistent with the S-first and O-first branches above: the
            // row just opened in `bwt_p` is located in `bwt_s` by ranking
            // against `bwt_s`'s own occurrences of `s`, not `bwt_p`'s.
            let idx = self.bwt_s.c(p) + self.bwt_p.ranky(idx, p);
            self.bwt_s.insert_wt(idx, s);
            self.bwt_o.adjust_c(s, 1);
            let idx = self.bwt_o.c(s) + self.bwt_s.ranky(idx, s);
            self.bwt_o.insert_wt(idx, o);
            self.bwt_p.adjust_c(o, 1);
            self.n_triples += 1;
            debug!("insert ({s}, {p}, {o}) resolved P-first");
            return Ok(());
        }

        Err(Error::RingInvariantViolated {
            detail: "insert: no branch collapsed to a single row",
        })
    }

    pub fn remove_edge(&mut self, triple: Triple) -> Result<()> {
        self.remove_edge_and_check(triple).map(|_| ())
    }

    /// Delete one triple, returning whether each of its three ids still
    /// occurs anywhere in the graph afterwards (as `(s_survives, p_survives,
    /// o_survives)`) — the signal a caller uses to decide whether a node
    /// or predicate just went fully out of scope.
    pub fn remove_edge_and_check(&mut self, triple: Triple) -> Result<(bool, bool, bool)> {
        let (s, p, o) = triple;
        let low0 = self.bwt_s.c(p);
        let high0 = self.bwt_s.c(p + 1).saturating_sub(1);

        if low0 == high0 && self.bwt_s.access(low0) == s {
            let o_idx = self.bwt_o.c(s) + self.bwt_s.ranky(low0, s);
            let p_idx = self.bwt_p.c(o) + self.bwt_o.ranky(o_idx, o);
            self.bwt_s.remove_wt(low0);
            self.bwt_o.remove_wt(o_idx);
            self.bwt_p.remove_wt(p_idx);
            self.bwt_o.adjust_c(s, -1);
            self.bwt_s.adjust_c(p, -1);
            self.bwt_p.adjust_c(o, -1);
            self.n_triples -= 1;
            debug!("remove ({s}, {p}, {o}) resolved S-first");
            return Ok((
                self.bwt_o.n_elems(s) != 0,
                self.bwt_s.n_elems(p) != 0,
                self.bwt_p.n_elems(o) != 0,
            ));
        }

        let low1 = self.bwt_o.c(s) + self.bwt_s.ranky(low0, s);
        let high1 = self.bwt_o.c(s) + self.bwt_s.ranky(high0 + 1, s) - 1;

        if low1 == high1 && self.bwt_o.access(low1) == o {
            let p_idx = self.bwt_p.c(o) + self.bwt_o.ranky(low1, o);
            let s_idx = self.bwt_s.c(p) + self.bwt_p.ranky(p_idx, p);
            self.bwt_o.remove_wt(low1);
            self.bwt_p.remove_wt(p_idx);
            self.bwt_s.remove_wt(s_idx);
            self.bwt_o.adjust_c(s, -1);
            self.bwt_s.adjust_c(p, -1);
            self.bwt_p.adjust_c(o, -1);
            self.n_triples -= 1;
            debug!("remove ({s}, {p}, {o}) resolved O-first");
            return Ok((
                self.bwt_o.n_elems(s) != 0,
                self.bwt_s.n_elems(p) != 0,
                self.bwt_p.n_elems(o) != 0,
            ));
        }

        let low2 = self.bwt_p.c(o) + self.bwt_o.ranky(low1, o);
        let high2 = self.bwt_p.c(o) + self.bwt_o.ranky(high1 + 1, o) - 1;

        if low2 == high2 && self.bwt_p.access(low2) == p {
            let s_idx = self.bwt_s.c(p) + self.bwt_p.ranky(low2, p);
            let o_idx = self.bwt_o.c(s) + self.bwt_s.ranky(s_idx, s);
            self.bwt_p.remove_wt(low2);
            self.bwt_s.remove_wt(s_idx);
            self.bwt_o.remove_wt(o_idx);
            self.bwt_o.adjust_c(s, -1);
            self.bwt_s.adjust_c(p, -1);
            self.bwt_p.adjust_c(o, -1);
            self.n_triples -= 1;
            debug!("remove ({s}, {p}, {o}) resolved P-first");
            return Ok((
                self.bwt_o.n_elems(s) != 0,
                self.bwt_s.n_elems(p) != 0,
                self.bwt_p.n_elems(o) != 0,
            ));
        }

        Err(Error::NotFound { s, p, o })
    }

    /// Remove every triple touching node `x`, whether as subject or object,
    /// in two passes (S = x, then O = x), each propagating the removal
    /// through all three columns. Returns the number of triples removed.
    pub fn remove_node(&mut self, x: usize) -> usize {
        let mut total = 0usize;

        let low = self.bwt_o.c(x);
        let high = self.bwt_o.c(x + 1).saturating_sub(1);
        if high >= low {
            let count = high - low + 1;
            total += count;
            for _ in 0..count {
                let v1 = self.bwt_o.remove_node_and_return(low);
                let idx_p = self.bwt_p.c(v1) + self.bwt_o.ranky(low, v1);
                self.bwt_p.adjust_c(v1, -1);

                let v2 = self.bwt_p.remove_node_and_return(idx_p);
                let idx_s = self.bwt_s.c(v2) + self.bwt_p.ranky(idx_p, v2);
                self.bwt_s.adjust_c(v2, -1);

                let v3 = self.bwt_s.remove_node_and_return(idx_s);
                self.bwt_o.adjust_c(v3, -1);
            }
        }

        let low = self.bwt_p.c(x);
        let high = self.bwt_p.c(x + 1).saturating_sub(1);
        if high >= low {
            let count = high - low + 1;
            total += count;
            for _ in 0..count {
                let v1 = self.bwt_p.remove_node_and_return(low);
                let idx_s = self.bwt_s.c(v1) + self.bwt_p.ranky(low, v1);
                self.bwt_s.adjust_c(v1, -1);

                let v2 = self.bwt_s.remove_node_and_return(idx_s);
                let idx_o = self.bwt_o.c(v2) + self.bwt_s.ranky(idx_s, v2);
                self.bwt_o.adjust_c(v2, -1);

                let v3 = self.bwt_o.remove_node_and_return(idx_o);
                self.bwt_p.adjust_c(v3, -1);
            }
        }

        self.n_triples -= total;
        info!("removed node {x}: {total} triples dropped");
        total
    }

    /// Same two-pass removal as [`Self::remove_node`], additionally
    /// recording in `so_removed`/`p_removed` the ids that dropped to zero
    /// occurrences as a direct result (a node fully disconnected, or a
    /// predicate no longer used anywhere), so a caller maintaining external
    /// dictionaries can prune them too.
    pub fn remove_node_with_check(
        &mut self,
        x: usize,
        so_removed: &mut Vec<usize>,
        p_removed: &mut Vec<usize>,
    ) -> usize {
        let mut total = 0usize;

        let low = self.bwt_o.c(x);
        let high = self.bwt_o.c(x + 1).saturating_sub(1);
        if high >= low {
            let count = high - low + 1;
            total += count;
            for _ in 0..count {
                let v1 = self.bwt_o.remove_node_and_return(low);
                let idx_p = self.bwt_p.c(v1) + self.bwt_o.ranky(low, v1);
                self.bwt_p.adjust_c(v1, -1);
                if self.bwt_o.n_elems(v1) == 0 && self.bwt_p.n_elems(v1) == 0 {
                    so_removed.push(v1);
                }

                let v2 = self.bwt_p.remove_node_and_return(idx_p);
                let idx_s = self.bwt_s.c(v2) + self.bwt_p.ranky(idx_p, v2);
                self.bwt_s.adjust_c(v2, -1);
                if self.bwt_s.n_elems(v2) == 0 {
                    p_removed.push(v2);
                }

                let v3 = self.bwt_s.remove_node_and_return(idx_s);
                self.bwt_o.adjust_c(v3, -1);
            }
        }

        let low = self.bwt_p.c(x);
        let high = self.bwt_p.c(x + 1).saturating_sub(1);
        if high >= low {
            let count = high - low + 1;
            total += count;
            for _ in 0..count {
                let v1 = self.bwt_p.remove_node_and_return(low);
                let idx_s = self.bwt_s.c(v1) + self.bwt_p.ranky(low, v1);
                self.bwt_s.adjust_c(v1, -1);
                if self.bwt_s.n_elems(v1) == 0 {
                    p_removed.push(v1);
                }

                let v2 = self.bwt_s.remove_node_and_return(idx_s);
                let idx_o = self.bwt_o.c(v2) + self.bwt_s.ranky(idx_s, v2);
                self.bwt_o.adjust_c(v2, -1);
                if self.bwt_p.n_elems(v2) == 0 && self.bwt_o.n_elems(v2) == 0 {
                    so_removed.push(v2);
                }

                let v3 = self.bwt_o.remove_node_and_return(idx_o);
                self.bwt_p.adjust_c(v3, -1);
            }
        }

        self.n_triples -= total;
        info!(
            "removed node {x} with check: {total} triples, {} orphaned ids, {} orphaned predicates",
            so_removed.len(),
            p_removed.len()
        );
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bwt::{DynamicColumn, StaticColumn};
    use pretty_assertions::assert_eq;

    // D = {(1,1,2), (1,2,3), (2,1,3), (2,2,2), (3,1,1)}, the worked scenario
    // used throughout this module's design: every query below is checked
    // against hand-derived expected results for this exact dataset.
    fn sample_triples() -> Vec<Triple> {
        vec![(1, 1, 2), (1, 2, 3), (2, 1, 3), (2, 2, 2), (3, 1, 1)]
    }

    fn sample_ring() -> Ring<StaticColumn> {
        Ring::from_triples(sample_triples())
    }

    fn sample_ring_dyn() -> Ring<DynamicColumn> {
        Ring::from_triples(sample_triples())
    }

    #[test]
    fn construction_sets_bounds_and_count() {
        let ring = sample_ring();
        assert_eq!(ring.n_triples(), 5);
        assert_eq!(ring.max_s(), 3);
        assert_eq!(ring.max_p(), 2);
        assert_eq!(ring.max_o(), 3);
    }

    #[test]
    fn contains_matches_membership() {
        let ring = sample_ring();
        for t in sample_triples() {
            assert!(ring.contains(t), "{t:?} should be present");
        }
        assert!(!ring.contains((1, 1, 1)));
        assert!(!ring.contains((4, 1, 1)));
    }

    #[test]
    fn down_p_s_narrows_to_singleton_rows() {
        // P = 1 over D has rows (s, o) in {(1,2), (2,3), (3,1)}; binding S on
        // top of that must land on exactly one row per S value.
        let ring = sample_ring();
        let p_int = ring.init_p(1);
        for s in [1usize, 2, 3] {
            let narrowed = ring.down_p_s(&p_int, s);
            assert_eq!(narrowed.width(), 1, "S={s} under P=1 should be a singleton");
        }
    }

    #[test]
    fn pso_enumeration_matches_dataset() {
        let ring = sample_ring();
        let mut p_int = ring.init_p(1);
        let mut collected = Vec::new();
        let mut s = ring.min_s_in_p(&mut p_int);
        while ring.there_are_s_in_p(&p_int) {
            let s_int = ring.down_p_s(&p_int, s);
            let os = ring.all_o_in_range(&s_int);
            for o in os {
                collected.push((s, 1, o));
            }
            s = ring.next_s_in_p(&mut p_int, s + 1);
        }
        collected.sort();
        let mut expected = vec![(1, 1, 2), (2, 1, 3), (3, 1, 1)];
        expected.sort();
        assert_eq!(collected, expected);
    }

    #[test]
    fn spo_complex_enumeration_matches_dataset() {
        let ring = sample_ring();
        let mut s_int = ring.down_s(1);
        let mut collected = Vec::new();
        let mut p = ring.min_p_in_s(&mut s_int, 1);
        while ring.there_are_p_in_s(&s_int) {
            let sp_int = ring.down_s_p(&s_int, 1, p);
            for o in ring.all_o_in_range(&sp_int) {
                collected.push((1, p, o));
            }
            p = ring.next_p_in_s(&mut s_int, 1, p + 1);
        }
        collected.sort();
        let mut expected = vec![(1, 1, 2), (1, 2, 3)];
        expected.sort();
        assert_eq!(collected, expected);
    }

    #[test]
    fn static_and_dynamic_backings_agree() {
        let stat = sample_ring();
        let dynm = sample_ring_dyn();
        assert_eq!(stat.n_triples(), dynm.n_triples());
        for t in sample_triples() {
            assert_eq!(stat.contains(t), dynm.contains(t));
        }
    }

    #[test]
    fn serialize_round_trips_through_load() {
        let ring = sample_ring();
        let bytes = ring.serialize().unwrap();
        let loaded = Ring::<StaticColumn>::load(&bytes).unwrap();
        assert_eq!(loaded.n_triples(), ring.n_triples());
        for t in sample_triples() {
            assert!(loaded.contains(t));
        }
    }

    #[test]
    fn insert_then_contains_then_remove() {
        let mut ring = sample_ring_dyn();
        assert!(!ring.contains((2, 2, 1)));
        ring.insert((2, 2, 1)).unwrap();
        assert!(ring.contains((2, 2, 1)));
        assert_eq!(ring.n_triples(), 6);

        ring.remove_edge((2, 2, 1)).unwrap();
        assert!(!ring.contains((2, 2, 1)));
        assert_eq!(ring.n_triples(), 5);
    }

    #[test]
    fn insert_duplicate_is_a_no_op() {
        let mut ring = sample_ring_dyn();
        ring.insert((1, 1, 2)).unwrap();
        assert_eq!(ring.n_triples(), 5);
    }

    #[test]
    fn remove_missing_edge_is_not_found() {
        let mut ring = sample_ring_dyn();
        let err = ring.remove_edge((9, 9, 9)).unwrap_err();
        assert!(matches!(err, Error::NotFound { s: 9, p: 9, o: 9 }));
    }

    #[test]
    fn remove_node_drops_every_touching_triple() {
        let mut ring = sample_ring_dyn();
        // node 2 touches (1,2,3) as O, (2,1,3) as S, (2,2,2) as S and O,
        // and (3,1,1) not at all -> 3 triples drop.
        let removed = ring.remove_node(2);
        assert_eq!(removed, 3);
        assert_eq!(ring.n_triples(), 2);
        assert!(ring.contains((1, 1, 2)));
        assert!(ring.contains((3, 1, 1)));
    }

    #[test]
    fn init_spo_distinguishes_present_from_absent() {
        let ring = sample_ring();
        assert_eq!(ring.init_spo(2, 1, 3).width(), 1);
        assert!(ring.init_spo(2, 1, 4).is_empty());
    }

    #[test]
    fn remove_then_reinsert_restores_original_state() {
        // R2: insert(t) then remove_edge(t) must restore n_triples and the
        // three C-arrays bit-identically.
        let mut ring = sample_ring_dyn();
        let before = ring.clone();
        ring.remove_edge((1, 2, 3)).unwrap();
        assert!(!ring.contains((1, 2, 3)));
        assert_eq!(ring.n_triples(), 4);
        ring.insert((1, 2, 3)).unwrap();
        assert_eq!(ring, before);
    }

    #[test]
    fn remove_node_leaves_surviving_predicate_count_intact() {
        let mut ring = sample_ring_dyn();
        ring.remove_node(1);
        assert_eq!(ring.n_triples(), 2);
        // Only (2,2,2) remains with P=2.
        let p_int = ring.init_p(2);
        assert_eq!(p_int.width(), 1);
    }

    #[test]
    fn construction_from_any_insertion_order_agrees_with_batch_build() {
        // R3: batch construction and incremental insertion must answer
        // pattern queries identically regardless of insertion order.
        let batch = sample_ring();
        let mut shuffled = sample_triples();
        shuffled.reverse();
        let mut incremental = Ring::<DynamicColumn>::from_triples(Vec::new());
        for t in shuffled {
            incremental.insert(t).unwrap();
        }
        assert_eq!(batch.n_triples(), incremental.n_triples());
        for t in sample_triples() {
            assert_eq!(batch.contains(t), incremental.contains(t));
        }
    }

    #[test]
    fn insert_grows_alphabet_past_current_max() {
        let mut ring = sample_ring_dyn();
        ring.insert((4, 3, 4)).unwrap();
        assert_eq!(ring.max_s(), 4);
        assert_eq!(ring.max_p(), 3);
        assert_eq!(ring.max_o(), 4);
        assert!(ring.contains((4, 3, 4)));
    }
}
