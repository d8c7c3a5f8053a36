//! Measurement-driven pagination of the block document.
//!
//! The engine compares each paragraph's rendered bottom edge against its
//! page's usable height and repairs overflow by sentence-boundary splitting
//! (preferred) or whole-node moves onto the next page. A pass applies at
//! most one change: measuring against layout that changed mid-pass is never
//! attempted; the driver simply re-runs passes until one is clean.
//!
//! Measurement itself is a host capability behind [`LayoutProbe`], so the
//! algorithm runs (and is tested) against a deterministic measurer as well
//! as a real layout tree. Measurement failures are never fatal: the node is
//! treated as non-overflowing and pagination retries on the next trigger.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::block::{BlockDocument, Page, Paragraph};
use crate::paper::{DimensionError, PaperDimensions, usable_height};

/// A node measurement failed (typically: not mounted yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureError {
    /// Human-readable reason.
    pub reason: String,
}

impl MeasureError {
    /// Create a measurement error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "measurement failed: {}", self.reason)
    }
}

impl std::error::Error for MeasureError {}

/// Layout-measurement capability supplied by the host.
pub trait LayoutProbe {
    /// Bottom edge, in px relative to the page's content top, of paragraph
    /// `para` on page `page`.
    fn child_bottom(
        &mut self,
        doc: &BlockDocument,
        page: usize,
        para: usize,
    ) -> Result<f64, MeasureError>;
}

/// Page geometry in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Full page height.
    pub page_height: f64,
    /// Bottom margin reserved for the footer.
    pub bottom_margin: f64,
}

impl PageGeometry {
    /// Build geometry from host-supplied paper dimensions.
    pub fn from_dimensions(
        dimensions: &PaperDimensions,
        bottom_margin: f64,
    ) -> Result<Self, DimensionError> {
        Ok(Self {
            page_height: dimensions.height_px()?,
            bottom_margin,
        })
    }

    /// Usable content height.
    pub fn usable(&self) -> f64 {
        usable_height(self.page_height, self.bottom_margin)
    }
}

/// Engine phases. `Idle` between triggers; a pass moves through `Measuring`
/// into `Splitting`/`Moving` when it repairs an overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Waiting for a content-change trigger.
    #[default]
    Idle,
    /// Walking pages and measuring children.
    Measuring,
    /// Applying a sentence-boundary split.
    Splitting,
    /// Moving a whole node to the next page.
    Moving,
}

/// The structural change one pass applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassChange {
    /// An overflowing paragraph was split; the remainder leads the next page.
    SplitParagraph {
        /// Page the overflow was found on.
        page: usize,
        /// Index of the split paragraph.
        paragraph: usize,
    },
    /// A whole paragraph moved to the front of the next page.
    MovedParagraph {
        /// Page the overflow was found on.
        page: usize,
        /// Index of the moved paragraph.
        paragraph: usize,
    },
}

/// Outcome of a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// No overflow found.
    Clean,
    /// One change was applied; run another pass.
    Changed(PassChange),
    /// Dropped by the in-flight guard.
    Skipped,
}

/// Result of running pagination to a fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginateSummary {
    /// Number of measurement passes run.
    pub passes: usize,
    /// Number of structural changes applied.
    pub changes: usize,
    /// `false` when the safety cap stopped the driver before a clean pass.
    pub converged: bool,
}

/// The pagination engine.
pub struct PaginationEngine {
    geometry: PageGeometry,
    state: EngineState,
    in_flight: bool,
}

impl PaginationEngine {
    /// Create an engine for the given page geometry.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            state: EngineState::Idle,
            in_flight: false,
        }
    }

    /// Current engine phase.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Replace the page geometry (paper size change).
    pub fn set_geometry(&mut self, geometry: PageGeometry) {
        self.geometry = geometry;
    }

    /// Run one measurement pass, applying at most one structural change.
    pub fn run_pass(
        &mut self,
        doc: &mut BlockDocument,
        probe: &mut dyn LayoutProbe,
    ) -> PassOutcome {
        if self.in_flight {
            return PassOutcome::Skipped;
        }
        let outcome = self.pass_once(doc, probe);
        self.state = EngineState::Idle;
        outcome
    }

    /// Run passes until a fixed point, then recompute page numbering.
    ///
    /// Re-entrant invocations while a run is in flight are dropped; the next
    /// content-change trigger re-runs pagination.
    pub fn paginate(
        &mut self,
        doc: &mut BlockDocument,
        probe: &mut dyn LayoutProbe,
    ) -> PaginateSummary {
        if self.in_flight {
            return PaginateSummary {
                passes: 0,
                changes: 0,
                converged: false,
            };
        }
        self.in_flight = true;

        // Every change consumes at least one sentence boundary or page slot,
        // so a generous multiple of the content size bounds the loop.
        let cap = doc.char_len() + doc.page_count() * 4 + 16;

        let mut passes = 0usize;
        let mut changes = 0usize;
        let mut converged = false;

        while passes < cap {
            passes += 1;
            match self.pass_once(doc, probe) {
                PassOutcome::Clean => {
                    converged = true;
                    break;
                }
                PassOutcome::Changed(_) => changes += 1,
                PassOutcome::Skipped => unreachable!("guard held by this run"),
            }
        }

        if !converged {
            log::warn!("pagination stopped after {} passes without converging", passes);
        }

        doc.renumber();
        self.state = EngineState::Idle;
        self.in_flight = false;

        PaginateSummary {
            passes,
            changes,
            converged,
        }
    }

    fn pass_once(&mut self, doc: &mut BlockDocument, probe: &mut dyn LayoutProbe) -> PassOutcome {
        self.state = EngineState::Measuring;
        let usable = self.geometry.usable();

        for page_idx in 0..doc.page_count() {
            let paragraph_count = doc.pages()[page_idx].paragraphs.len();
            let mut previous_bottom = 0.0f64;

            for para_idx in 0..paragraph_count {
                let bottom = match probe.child_bottom(doc, page_idx, para_idx) {
                    Ok(bottom) => bottom,
                    Err(err) => {
                        // Not fatal: treat as no overflow, retry on the next
                        // trigger.
                        log::warn!(
                            "page {} paragraph {}: {}; assuming no overflow",
                            page_idx,
                            para_idx,
                            err
                        );
                        continue;
                    }
                };

                if bottom <= usable {
                    previous_bottom = bottom;
                    continue;
                }

                let top = previous_bottom;
                let height = bottom - top;
                let allowed = usable - top;

                if let Some(change) =
                    self.repair(doc, page_idx, para_idx, height, allowed)
                {
                    return PassOutcome::Changed(change);
                }

                // Unsplittable node at the top of its page: accepted
                // overflow, keep walking.
                previous_bottom = bottom;
            }
        }

        PassOutcome::Clean
    }

    /// Repair one overflowing paragraph. Returns `None` when nothing can be
    /// done (an unsplittable paragraph already at the top of its page).
    fn repair(
        &mut self,
        doc: &mut BlockDocument,
        page_idx: usize,
        para_idx: usize,
        height: f64,
        allowed: f64,
    ) -> Option<PassChange> {
        let paragraph_len = doc.pages()[page_idx].paragraphs[para_idx].char_len();

        let split_offset = if height > 0.0 && allowed > 0.0 {
            let fit = (allowed / height).clamp(0.0, 1.0);
            let target = (paragraph_len as f64 * fit).floor() as usize;
            let text = doc.pages()[page_idx].paragraphs[para_idx].text();
            sentence_split_offset(&text, target)
        } else {
            None
        };

        if let Some(offset) = split_offset {
            self.state = EngineState::Splitting;
            let remainder = doc.pages_mut()[page_idx].paragraphs[para_idx].split_at(offset);
            Self::prepend_to_next_page(doc, page_idx, remainder);
            return Some(PassChange::SplitParagraph {
                page: page_idx,
                paragraph: para_idx,
            });
        }

        // No sentence boundary fits: move the whole node. A node already at
        // the top of its page gains nothing from moving (it would overflow
        // the next page identically), so that overflow is accepted.
        if para_idx == 0 {
            return None;
        }

        self.state = EngineState::Moving;
        let paragraph = doc.pages_mut()[page_idx].paragraphs.remove(para_idx);
        Self::prepend_to_next_page(doc, page_idx, paragraph);
        doc.normalize();
        Some(PassChange::MovedParagraph {
            page: page_idx,
            paragraph: para_idx,
        })
    }

    /// Insert `paragraph` as the first child of the page after `page_idx`,
    /// creating that page if it does not exist.
    fn prepend_to_next_page(doc: &mut BlockDocument, page_idx: usize, paragraph: Paragraph) {
        let pages = doc.pages_mut();
        if page_idx + 1 >= pages.len() {
            let mut page = Page::new();
            page.paragraphs.clear();
            pages.push(page);
        }
        pages[page_idx + 1].paragraphs.insert(0, paragraph);
        doc.renumber();
    }
}

/// The split point for an overflowing paragraph: the last sentence boundary
/// (the position immediately following `". "`) at or before `target_chars`.
///
/// Returns `None` when no proper split exists (no boundary, or the boundary
/// would leave an empty side).
pub fn sentence_split_offset(text: &str, target_chars: usize) -> Option<usize> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 3 {
        return None;
    }

    let mut best = None;
    for i in 0..chars.len() - 1 {
        if chars[i] == '.' && chars[i + 1] == ' ' {
            let boundary = i + 2;
            if boundary < chars.len() && boundary <= target_chars {
                best = Some(boundary);
            }
        }
    }
    best
}

/// Debounce bookkeeping for pagination triggers.
///
/// Pure state over caller-supplied millisecond timestamps: each keystroke
/// resets the deadline (superseding stale scheduled runs), a paste fires
/// immediately. The host polls [`Debounce::take_ready`] from its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl Debounce {
    /// Typing settles after roughly this long.
    pub const DEFAULT_DELAY_MS: u64 = 100;

    /// Create a debouncer with the default delay.
    pub fn new() -> Self {
        Self::with_delay(Self::DEFAULT_DELAY_MS)
    }

    /// Create a debouncer with an explicit delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// A keystroke happened; (re)start the settle window.
    pub fn notify(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    /// A paste happened; the next poll fires immediately.
    pub fn notify_immediate(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms);
    }

    /// Whether a trigger is pending and due.
    pub fn ready(&self, now_ms: u64) -> bool {
        self.deadline.is_some_and(|deadline| now_ms >= deadline)
    }

    /// Consume a due trigger.
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        if self.ready(now_ms) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic measurer estimating paragraph heights from wrapped line
/// counts, for headless hosts and tests.
///
/// Width accounting follows UAX #11 cell widths with greedy word wrapping,
/// the same approach a monospace-grid layout uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicProbe {
    /// Usable page width in px.
    pub page_width: f64,
    /// Average glyph advance per cell in px.
    pub cell_width: f64,
    /// Line box height in px.
    pub line_height: f64,
    /// Vertical gap after each paragraph in px.
    pub paragraph_spacing: f64,
}

impl HeuristicProbe {
    /// Cells that fit on one line.
    fn cells_per_line(&self) -> usize {
        ((self.page_width / self.cell_width).floor() as usize).max(1)
    }

    /// Greedy word-wrapped line count for one paragraph of text.
    pub fn line_count(&self, text: &str) -> usize {
        let limit = self.cells_per_line();
        let mut lines = 1usize;
        let mut used = 0usize;

        for word in text.split_word_bounds() {
            let width = UnicodeWidthStr::width(word);
            if width == 0 {
                continue;
            }
            if used + width <= limit {
                used += width;
            } else if width > limit {
                // A word wider than the line hard-wraps across lines.
                let remaining = width - (limit - used);
                lines += remaining.div_ceil(limit);
                used = remaining % limit;
                if used == 0 {
                    used = limit;
                }
            } else {
                lines += 1;
                used = width;
            }
        }

        lines
    }

    /// Estimated height of one paragraph.
    pub fn paragraph_height(&self, paragraph: &Paragraph) -> f64 {
        self.line_count(&paragraph.text()) as f64 * self.line_height + self.paragraph_spacing
    }
}

impl LayoutProbe for HeuristicProbe {
    fn child_bottom(
        &mut self,
        doc: &BlockDocument,
        page: usize,
        para: usize,
    ) -> Result<f64, MeasureError> {
        let page_node = doc
            .pages()
            .get(page)
            .ok_or_else(|| MeasureError::new(format!("page {} not mounted", page)))?;
        if para >= page_node.paragraphs.len() {
            return Err(MeasureError::new(format!(
                "paragraph {} not mounted on page {}",
                para, page
            )));
        }

        Ok(page_node.paragraphs[..=para]
            .iter()
            .map(|p| self.paragraph_height(p))
            .sum())
    }
}
