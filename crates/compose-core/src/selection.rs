//! Caret/selection tracking and the active-format snapshot.
//!
//! The tracker mirrors the host text input's native selection state. Every
//! selection change is recomputed synchronously (no debouncing, no polling):
//! resolution cost is bounded by the pruned interval query, which is small in
//! practice.

use crate::intervals::StyleIntervalStore;
use crate::style::{DocumentStyle, ResolvedStyle};

/// A non-collapsed selection over the text buffer, in char offsets.
///
/// `start <= end` always; a collapsed caret is represented as the *absence*
/// of a range (`Option<SelectionRange>::None`), not as an empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl SelectionRange {
    /// Create a range, normalizing a backward selection.
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Selection length in chars.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// An empty range selects nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Observes the host input's selection and keeps the resolved style at the
/// selection in sync with the interval store and document style.
pub struct SelectionTracker {
    range: Option<SelectionRange>,
    active_format: Option<ResolvedStyle>,
}

impl SelectionTracker {
    /// Create a tracker with no active selection.
    pub fn new() -> Self {
        Self {
            range: None,
            active_format: None,
        }
    }

    /// Feed a native selection-change event.
    ///
    /// `raw_start`/`raw_end` come straight from the host input (and may be
    /// reversed for backward selections); both are clamped to
    /// `buffer_chars`. A collapsed caret publishes `None` and deactivates
    /// the formatting toolbar.
    pub fn set_from_input(
        &mut self,
        raw_start: usize,
        raw_end: usize,
        buffer_chars: usize,
        store: &StyleIntervalStore,
        doc: &DocumentStyle,
    ) {
        let start = raw_start.min(buffer_chars);
        let end = raw_end.min(buffer_chars);

        if start == end {
            self.range = None;
            self.active_format = None;
            return;
        }

        self.range = Some(SelectionRange::new(start, end));
        self.refresh(store, doc);
    }

    /// Drop the current selection (editor blur, content reset).
    pub fn clear(&mut self) {
        self.range = None;
        self.active_format = None;
    }

    /// Recompute the active format against the current store and document
    /// style.
    ///
    /// Must be called after every interval append and document-style change,
    /// so a live selection never resolves against stale style data.
    pub fn refresh(&mut self, store: &StyleIntervalStore, doc: &DocumentStyle) {
        self.active_format = self
            .range
            .map(|range| store.resolve(range.start, doc));
    }

    /// The current selection, `None` for a collapsed caret.
    pub fn range(&self) -> Option<SelectionRange> {
        self.range
    }

    /// The resolved style at the selection start, `None` when no selection
    /// is active.
    pub fn active_format(&self) -> Option<&ResolvedStyle> {
        self.active_format.as_ref()
    }

    /// Whether the formatting toolbar should be shown as active.
    pub fn is_active(&self) -> bool {
        self.range.is_some()
    }
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}
