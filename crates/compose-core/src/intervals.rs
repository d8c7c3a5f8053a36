//! Styled ranges over a flat text buffer.
//!
//! The interval store is the persistence-side half of the flat rich-text
//! model: every formatting command appends one [`StyleInterval`], nothing is
//! ever merged, split, or mutated in place. The effective style at a buffer
//! position is obtained by folding every covering interval **in insertion
//! order** (last-appended wins, field by field) over the document defaults.
//!
//! Offsets are character offsets (`char`, not bytes), half-open `[start, end)`.

use crate::style::{DocumentStyle, ResolvedStyle, StyleAttrs};

/// One styled range: `[start, end)` in char offsets plus a partial style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleInterval {
    /// Start offset (inclusive), in chars from the start of the buffer.
    pub start: usize,
    /// End offset (exclusive), in chars from the start of the buffer.
    pub end: usize,
    /// The partial style this range applies.
    pub attrs: StyleAttrs,
}

impl StyleInterval {
    /// Create a new interval over `[start, end)`.
    pub fn new(start: usize, end: usize, attrs: StyleAttrs) -> Self {
        Self { start, end, attrs }
    }

    /// Check if the interval contains a specific position.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check if two intervals overlap.
    pub fn overlaps(&self, other: &StyleInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// An interval with `start == end` covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Append-only store of style intervals with last-appended-wins resolution.
///
/// Internally the store keeps the append sequence (the fold order) plus a
/// secondary index sorted by start with a prefix maximum of end offsets, so
/// point and range queries prune to O(log n + k) instead of scanning every
/// interval a long session has accumulated.
pub struct StyleIntervalStore {
    /// Intervals in append order. Never reordered; the fold order contract
    /// depends on this.
    intervals: Vec<StyleInterval>,
    /// Indices into `intervals`, sorted by interval start.
    sorted: Vec<usize>,
    /// `prefix_max_end[i] = max(intervals[sorted[0..=i]].end)`, used to stop
    /// the backward scan early in [`covering_indices`](Self::covering_indices).
    prefix_max_end: Vec<usize>,
}

impl StyleIntervalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            sorted: Vec::new(),
            prefix_max_end: Vec::new(),
        }
    }

    /// Append an interval.
    ///
    /// An empty interval (`start == end`) covers nothing and is accepted as a
    /// no-op rather than an error; it is not stored.
    pub fn add(&mut self, interval: StyleInterval) {
        if interval.is_empty() {
            return;
        }

        let insertion_index = self.intervals.len();
        let pos = self
            .sorted
            .binary_search_by_key(&(interval.start, insertion_index), |&i| {
                (self.intervals[i].start, i)
            })
            .unwrap_or_else(|pos| pos);

        self.intervals.push(interval);
        self.sorted.insert(pos, insertion_index);
        self.prefix_max_end.insert(pos, 0);
        self.rebuild_prefix_max_end_from(pos);
    }

    fn rebuild_prefix_max_end_from(&mut self, start_idx: usize) {
        let mut max_end = if start_idx == 0 {
            0
        } else {
            self.prefix_max_end[start_idx - 1]
        };

        for i in start_idx..self.sorted.len() {
            max_end = max_end.max(self.intervals[self.sorted[i]].end);
            self.prefix_max_end[i] = max_end;
        }
    }

    /// Indices (in append order) of every interval containing `pos`.
    fn covering_indices(&self, pos: usize) -> (Vec<usize>, usize) {
        if self.intervals.is_empty() {
            return (Vec::new(), 0);
        }

        let mut found = Vec::new();
        let mut scanned = 0usize;

        // First sorted slot whose start is > pos; everything that can contain
        // pos lies before it.
        let search_key = pos.saturating_add(1);
        let idx = match self
            .sorted
            .binary_search_by_key(&(search_key, 0), |&i| (self.intervals[i].start, 0))
        {
            Ok(idx) | Err(idx) => idx,
        };

        for i in (0..idx).rev() {
            scanned += 1;

            // No interval at or before this slot reaches past pos.
            if self.prefix_max_end[i] <= pos {
                break;
            }

            let interval_idx = self.sorted[i];
            if self.intervals[interval_idx].contains(pos) {
                found.push(interval_idx);
            }
        }

        // Restore append order for the fold.
        found.sort_unstable();
        (found, scanned)
    }

    #[cfg(test)]
    fn covering_scan_count(&self, pos: usize) -> usize {
        self.covering_indices(pos).1
    }

    /// Every interval containing `pos`, in append order.
    pub fn covering(&self, pos: usize) -> Vec<&StyleInterval> {
        self.covering_indices(pos)
            .0
            .into_iter()
            .map(|i| &self.intervals[i])
            .collect()
    }

    /// Every interval overlapping `[start, end)`, in append order.
    pub fn overlapping(&self, start: usize, end: usize) -> Vec<&StyleInterval> {
        if self.intervals.is_empty() || start >= end {
            return Vec::new();
        }

        // Sorted slots whose start is >= end cannot overlap.
        let search_end = match self
            .sorted
            .binary_search_by_key(&(end, 0), |&i| (self.intervals[i].start, 0))
        {
            Ok(idx) | Err(idx) => idx,
        };

        let mut found: Vec<usize> = Vec::new();
        for i in (0..search_end).rev() {
            if self.prefix_max_end[i] <= start {
                break;
            }
            let interval_idx = self.sorted[i];
            let interval = &self.intervals[interval_idx];
            if interval.start < end && interval.end > start {
                found.push(interval_idx);
            }
        }

        found.sort_unstable();
        found.into_iter().map(|i| &self.intervals[i]).collect()
    }

    /// Fold every interval covering `pos` into a partial style, in append
    /// order (later intervals overwrite earlier ones field by field).
    pub fn resolve_attrs(&self, pos: usize) -> StyleAttrs {
        let mut folded = StyleAttrs::empty();
        for idx in self.covering_indices(pos).0 {
            folded.merge(&self.intervals[idx].attrs);
        }
        folded
    }

    /// The effective style at `pos`: document defaults with every covering
    /// interval folded on top.
    ///
    /// A position outside every interval (including positions past the end of
    /// the buffer) resolves to the document defaults.
    pub fn resolve(&self, pos: usize, doc: &DocumentStyle) -> ResolvedStyle {
        let mut resolved = ResolvedStyle::from_document(doc);
        resolved.apply(&self.resolve_attrs(pos));
        resolved
    }

    /// All intervals in append order.
    pub fn intervals(&self) -> &[StyleInterval] {
        &self.intervals
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Full reset. The only removal operation: intervals otherwise accumulate
    /// for the life of the compose session.
    pub fn clear(&mut self) {
        self.intervals.clear();
        self.sorted.clear();
        self.prefix_max_end.clear();
    }
}

impl Default for StyleIntervalStore {
    fn default() -> Self {
        Self::new()
    }
}
