//! Fisher–Jenks natural breaks.
//!
//! `compute_breaks` partitions a sample into `k` classes minimizing the sum of
//! squared deviations from each class mean and returns the `k + 1` class
//! boundaries. Interior breaks are the smallest value of the class above them,
//! so the half-open intervals `[b[i], b[i+1])` reproduce the optimal classes
//! exactly (the last interval is closed).

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Ordered, non-decreasing class boundaries. `len() == classes() + 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BreakSet(Vec<f64>);

impl TryFrom<Vec<f64>> for BreakSet {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self, Error> {
        let len = values.len();
        BreakSet::new(values).ok_or_else(|| {
            Error::InvalidBreaks(format!("need at least 2 finite, non-decreasing values, got {} values", len))
        })
    }
}

impl From<BreakSet> for Vec<f64> {
    fn from(b: BreakSet) -> Self { b.0 }
}

impl BreakSet {
    /// Wraps raw boundaries. Returns `None` unless there are at least two
    /// finite, non-decreasing values.
    pub fn new(values: Vec<f64>) -> Option<Self> {
        let ordered = values.windows(2).all(|w| w[0] <= w[1]);
        (values.len() >= 2 && ordered && values.iter().all(|v| v.is_finite())).then_some(BreakSet(values))
    }

    pub fn as_slice(&self) -> &[f64] { &self.0 }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn classes(&self) -> usize { self.0.len() - 1 }
    pub fn min(&self) -> f64 { self.0[0] }
    pub fn max(&self) -> f64 { self.0[self.0.len() - 1] }

    /// Raise the top boundary to at least `max`.
    pub fn raise_max(&mut self, max: f64) {
        if let Some(last) = self.0.last_mut() {
            if max.is_finite() && max > *last {
                *last = max;
            }
        }
    }

    /// Index of the class `value` falls in. Values below the first break land
    /// in class 0, values at or above the last break in the top class.
    pub fn class_of(&self, value: f64) -> usize {
        let k = self.classes();
        // Upper bounds b[1..k]; first bound strictly greater than value.
        let upper = &self.0[1..k];
        upper.partition_point(|b| *b <= value).min(k - 1)
    }

    /// `(lower, upper)` bounds of class `i`.
    pub fn interval(&self, i: usize) -> Option<(f64, f64)> {
        (i < self.classes()).then(|| (self.0[i], self.0[i + 1]))
    }
}

/// Natural breaks of `sample` into `k` classes (`k >= 2`).
///
/// Returns `None` for an empty sample or `k < 2`. Non-finite values must be
/// filtered by the caller; any that slip through are ignored.
pub fn compute_breaks(sample: &[f64], k: usize) -> Option<BreakSet> {
    if k < 2 {
        return None;
    }
    let mut sorted: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mut distinct = sorted.clone();
    distinct.dedup();
    if distinct.len() <= k {
        return BreakSet::new(padded_breaks(&distinct, k));
    }

    let class_start = jenks_matrices(&sorted, k);
    let n = sorted.len();
    let mut breaks = vec![0.0; k + 1];
    breaks[0] = sorted[0];
    breaks[k] = sorted[n - 1];
    let mut l = n;
    for j in (2..=k).rev() {
        let start = class_start.get(l, j);
        breaks[j - 1] = sorted[start];
        l = start;
    }
    BreakSet::new(breaks)
}

// Breaks for samples with at most `k` distinct values: every distinct value
// becomes a boundary and the list is padded with copies of its second-to-last
// entry. Zero-width classes are expected here.
fn padded_breaks(distinct: &[f64], k: usize) -> Vec<f64> {
    let Some(&last) = distinct.last() else { return Vec::new() };
    let mut out = Vec::with_capacity(k + 1);
    out.push(distinct[0]);
    out.extend_from_slice(&distinct[1..]);
    out.push(last);
    while out.len() < k + 1 {
        let at = out.len() - 1;
        let dup = out[at - 1];
        out.insert(at, dup);
    }
    out.truncate(k + 1);
    out
}

/// Row-major `(n + 1) x (k + 1)` table.
struct Table<T> {
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy> Table<T> {
    fn new(rows: usize, cols: usize, fill: T) -> Self {
        Table { cols, data: vec![fill; rows * cols] }
    }
    #[inline]
    fn get(&self, r: usize, c: usize) -> T { self.data[r * self.cols + c] }
    #[inline]
    fn set(&mut self, r: usize, c: usize, v: T) { self.data[r * self.cols + c] = v; }
}

// Row `l` describes the first `l` sorted values, column `j` a partition into
// `j` classes. `class_start[l][j]` is the index of the first value of the top
// class in the best such partition; `sse[l][j]` is its cost.
fn jenks_matrices(sorted: &[f64], k: usize) -> Table<usize> {
    let n = sorted.len();
    let mut class_start = Table::new(n + 1, k + 1, 0usize);
    let mut sse = Table::new(n + 1, k + 1, f64::INFINITY);
    for j in 1..=k {
        sse.set(1, j, 0.0);
    }

    for l in 2..=n {
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut w = 0.0;
        let mut variance = 0.0;
        // Scan candidate class starts backward from l-1 down to 0.
        for m in 1..=l {
            let start = l - m;
            let x = sorted[start];
            sum += x;
            sum_sq += x * x;
            w += 1.0;
            variance = sum_sq - (sum * sum) / w;
            if start > 0 {
                for j in 2..=k {
                    let cand = variance + sse.get(start, j - 1);
                    // `>=` lets the later (earlier-starting) candidate win ties.
                    if sse.get(l, j) >= cand {
                        class_start.set(l, j, start);
                        sse.set(l, j, cand);
                    }
                }
            }
        }
        class_start.set(l, 1, 0);
        sse.set(l, 1, variance);
    }
    class_start
}
