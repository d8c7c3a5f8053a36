//! The block document model: page → paragraph → text-run tree.
//!
//! This is the richer of the two letter representations. Style lives on the
//! leaves as per-run marks (so, unlike the flat interval model, alignment can
//! vary per paragraph), and page boundaries are structural nodes the
//! pagination engine maintains.
//!
//! Addressing is by char offset over the document's plain-text projection:
//! paragraphs contribute their text plus one `'\n'` separator between
//! consecutive paragraphs; page boundaries contribute nothing. Note that a
//! pagination split turns one overflowing paragraph into two, which inserts a
//! paragraph boundary into the projection.
//!
//! Invariants, restored by [`BlockDocument::normalize`] after every
//! structural mutation: every paragraph has at least one run (possibly with
//! empty text), every page has at least one paragraph, and
//! `page_number`/`page_count` are derived by [`BlockDocument::renumber`],
//! never hand-set.

use crate::style::Alignment;

/// The marks carried by one text run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunMarks {
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Underline.
    pub underline: bool,
    /// Text color, `None` for the inherited default.
    pub color: Option<String>,
    /// Font family, `None` for the inherited default.
    pub font: Option<String>,
    /// Font size, `None` for the inherited default.
    pub size: Option<String>,
}

impl RunMarks {
    /// Returns `true` when no mark is set.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Apply one mark.
    pub fn apply(&mut self, mark: &Mark) {
        match mark {
            Mark::Bold => self.bold = true,
            Mark::Italic => self.italic = true,
            Mark::Underline => self.underline = true,
            Mark::Color(c) => self.color = Some(c.clone()),
            Mark::Font(f) => self.font = Some(f.clone()),
            Mark::Size(s) => self.size = Some(s.clone()),
        }
    }

    /// Remove every mark of the given kind.
    pub fn remove(&mut self, kind: MarkKind) {
        match kind {
            MarkKind::Bold => self.bold = false,
            MarkKind::Italic => self.italic = false,
            MarkKind::Underline => self.underline = false,
            MarkKind::Color => self.color = None,
            MarkKind::Font => self.font = None,
            MarkKind::Size => self.size = None,
        }
    }

    /// Whether a mark of the given kind is set.
    pub fn has(&self, kind: MarkKind) -> bool {
        match kind {
            MarkKind::Bold => self.bold,
            MarkKind::Italic => self.italic,
            MarkKind::Underline => self.underline,
            MarkKind::Color => self.color.is_some(),
            MarkKind::Font => self.font.is_some(),
            MarkKind::Size => self.size.is_some(),
        }
    }
}

/// A named mark with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    /// Bold.
    Bold,
    /// Italic.
    Italic,
    /// Underline.
    Underline,
    /// Text color.
    Color(String),
    /// Font family.
    Font(String),
    /// Font size.
    Size(String),
}

impl Mark {
    /// The kind this mark belongs to.
    pub fn kind(&self) -> MarkKind {
        match self {
            Mark::Bold => MarkKind::Bold,
            Mark::Italic => MarkKind::Italic,
            Mark::Underline => MarkKind::Underline,
            Mark::Color(_) => MarkKind::Color,
            Mark::Font(_) => MarkKind::Font,
            Mark::Size(_) => MarkKind::Size,
        }
    }
}

/// Mark kinds, for removal and toggle queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    /// Bold.
    Bold,
    /// Italic.
    Italic,
    /// Underline.
    Underline,
    /// Text color.
    Color,
    /// Font family.
    Font,
    /// Font size.
    Size,
}

/// A leaf text run with uniform marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// The run's text (may be empty).
    pub text: String,
    /// Marks applied to the whole run.
    pub marks: RunMarks,
}

impl TextRun {
    /// Create a run.
    pub fn new(text: impl Into<String>, marks: RunMarks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    /// A plain run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunMarks::default())
    }

    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A paragraph: alignment plus an ordered run sequence (always ≥ 1 run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Paragraph alignment.
    pub align: Alignment,
    /// The runs. Never empty after normalization.
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    /// An empty paragraph.
    pub fn new() -> Self {
        Self {
            align: Alignment::Left,
            runs: vec![TextRun::plain("")],
        }
    }

    /// A paragraph holding one plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            align: Alignment::Left,
            runs: vec![TextRun::plain(text)],
        }
    }

    /// Length in chars (runs only; the inter-paragraph separator is not
    /// counted here).
    pub fn char_len(&self) -> usize {
        self.runs.iter().map(TextRun::char_len).sum()
    }

    /// Plain-text projection of the paragraph.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            out.push_str(&run.text);
        }
        out
    }

    /// Restore the run invariant: drop empty runs, merge adjacent runs with
    /// equal marks, keep at least one run.
    pub fn normalize(&mut self) {
        let first_marks = self.runs.first().map(|r| r.marks.clone());
        self.runs.retain(|r| !r.text.is_empty());

        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(last) if last.marks == run.marks => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;

        if self.runs.is_empty() {
            self.runs
                .push(TextRun::new("", first_marks.unwrap_or_default()));
        }
    }

    /// Byte offset within a run for a char offset.
    fn byte_in_run(run: &TextRun, char_offset: usize) -> usize {
        run.text
            .char_indices()
            .nth(char_offset)
            .map(|(b, _)| b)
            .unwrap_or(run.text.len())
    }

    /// Split the paragraph at `char_offset`, returning the remainder.
    ///
    /// Marks and alignment are preserved on both sides; a boundary inside a
    /// run splits that run in two with the same marks.
    pub fn split_at(&mut self, char_offset: usize) -> Paragraph {
        let mut remainder = Paragraph {
            align: self.align,
            runs: Vec::new(),
        };

        let mut consumed = 0usize;
        let mut kept: Vec<TextRun> = Vec::new();

        for run in self.runs.drain(..) {
            let run_len = run.char_len();
            if consumed + run_len <= char_offset {
                consumed += run_len;
                kept.push(run);
            } else if consumed >= char_offset {
                remainder.runs.push(run);
            } else {
                let in_run = char_offset - consumed;
                let byte = Self::byte_in_run(&run, in_run);
                kept.push(TextRun::new(&run.text[..byte], run.marks.clone()));
                remainder.runs.push(TextRun::new(&run.text[byte..], run.marks));
                consumed = char_offset;
            }
        }

        self.runs = kept;
        self.normalize();
        remainder.normalize();
        remainder
    }

    /// Rewrite runs so `[start, end)` (paragraph-local char offsets) carries
    /// the given mutation, splitting runs at the boundaries.
    fn rewrite_range(&mut self, start: usize, end: usize, mutate: &dyn Fn(&mut RunMarks)) {
        if start >= end {
            return;
        }

        let mut rebuilt: Vec<TextRun> = Vec::with_capacity(self.runs.len() + 2);
        let mut cursor = 0usize;

        for run in self.runs.drain(..) {
            let run_len = run.char_len();
            let run_start = cursor;
            let run_end = cursor + run_len;
            cursor = run_end;

            let sel_start = start.max(run_start);
            let sel_end = end.min(run_end);
            if sel_start >= sel_end {
                rebuilt.push(run);
                continue;
            }

            let a = Self::byte_in_run(&run, sel_start - run_start);
            let b = Self::byte_in_run(&run, sel_end - run_start);

            if a > 0 {
                rebuilt.push(TextRun::new(&run.text[..a], run.marks.clone()));
            }
            let mut marked = TextRun::new(&run.text[a..b], run.marks.clone());
            mutate(&mut marked.marks);
            rebuilt.push(marked);
            if b < run.text.len() {
                rebuilt.push(TextRun::new(&run.text[b..], run.marks));
            }
        }

        self.runs = rebuilt;
        self.normalize();
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

/// A page: an ordered paragraph sequence plus derived footer numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The page's paragraphs. Never empty after normalization.
    pub paragraphs: Vec<Paragraph>,
    /// 1-based page number, derived by [`BlockDocument::renumber`].
    pub page_number: usize,
    /// Total page count, derived by [`BlockDocument::renumber`].
    pub page_count: usize,
}

impl Page {
    /// An empty page holding one empty paragraph.
    pub fn new() -> Self {
        Self {
            paragraphs: vec![Paragraph::new()],
            page_number: 1,
            page_count: 1,
        }
    }

    /// Length in chars, separators between this page's paragraphs included.
    pub fn char_len(&self) -> usize {
        let text: usize = self.paragraphs.iter().map(Paragraph::char_len).sum();
        text + self.paragraphs.len().saturating_sub(1)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

/// A char-offset range over the document's plain-text projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocRange {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl DocRange {
    /// Create a range, normalizing a backward pair.
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }
}

/// The document: an ordered page sequence (always ≥ 1 page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDocument {
    pages: Vec<Page>,
}

impl BlockDocument {
    /// An empty document: one page, one empty paragraph.
    pub fn new() -> Self {
        let mut doc = Self {
            pages: vec![Page::new()],
        };
        doc.renumber();
        doc
    }

    /// Build a single-page document from plain text, one paragraph per line.
    pub fn from_text(text: &str) -> Self {
        let paragraphs: Vec<Paragraph> = text.split('\n').map(Paragraph::with_text).collect();
        let mut doc = Self {
            pages: vec![Page {
                paragraphs,
                page_number: 1,
                page_count: 1,
            }],
        };
        doc.normalize();
        doc
    }

    /// Rebuild a document from explicit pages (deserialization). Invariants
    /// are restored.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        let mut doc = Self { pages };
        doc.normalize();
        doc
    }

    /// The pages, in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Mutable access for the pagination engine.
    pub(crate) fn pages_mut(&mut self) -> &mut Vec<Page> {
        &mut self.pages
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total length in chars of the plain-text projection.
    pub fn char_len(&self) -> usize {
        let paragraphs = self.paragraph_count();
        let text: usize = self
            .pages
            .iter()
            .flat_map(|p| p.paragraphs.iter())
            .map(Paragraph::char_len)
            .sum();
        text + paragraphs.saturating_sub(1)
    }

    fn paragraph_count(&self) -> usize {
        self.pages.iter().map(|p| p.paragraphs.len()).sum()
    }

    /// Plain-text projection: paragraphs joined by `'\n'`, page boundaries
    /// contributing nothing.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut first = true;
        for page in &self.pages {
            for paragraph in &page.paragraphs {
                if !first {
                    out.push('\n');
                }
                first = false;
                out.push_str(&paragraph.text());
            }
        }
        out
    }

    /// Flatten every run in document order, with its paragraph's alignment.
    ///
    /// This is the projection the flat renderer consumes for block-backed
    /// drafts.
    pub fn flatten_runs(&self) -> Vec<(Alignment, TextRun)> {
        let mut out = Vec::new();
        for page in &self.pages {
            for paragraph in &page.paragraphs {
                for run in &paragraph.runs {
                    out.push((paragraph.align, run.clone()));
                }
            }
        }
        out
    }

    /// Restore all structural invariants and derived numbering.
    pub fn normalize(&mut self) {
        for page in &mut self.pages {
            for paragraph in &mut page.paragraphs {
                paragraph.normalize();
            }
            if page.paragraphs.is_empty() {
                page.paragraphs.push(Paragraph::new());
            }
        }
        if self.pages.is_empty() {
            self.pages.push(Page::new());
        }
        self.renumber();
    }

    /// Recompute `page_number`/`page_count` for every page by counting pages
    /// in order.
    pub fn renumber(&mut self) {
        let count = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.page_number = index + 1;
            page.page_count = count;
        }
    }

    /// Walk paragraphs in document order with their global char ranges,
    /// applying `f`. `f` receives paragraph plus its global start offset.
    fn for_each_paragraph(&mut self, mut f: impl FnMut(&mut Paragraph, usize)) {
        let mut offset = 0usize;
        let mut first = true;
        for page in &mut self.pages {
            for paragraph in &mut page.paragraphs {
                if !first {
                    offset += 1; // separator
                }
                first = false;
                let len = paragraph.char_len();
                f(paragraph, offset);
                offset += len;
            }
        }
    }

    /// Apply a mark to every run intersecting `range`.
    pub fn set_mark(&mut self, range: DocRange, mark: &Mark) {
        self.for_each_paragraph(|paragraph, start| {
            let len = paragraph.char_len();
            let sel_start = range.start.max(start);
            let sel_end = range.end.min(start + len);
            if sel_start < sel_end {
                paragraph.rewrite_range(sel_start - start, sel_end - start, &|marks| {
                    marks.apply(mark)
                });
            }
        });
    }

    /// Remove a mark kind from every run intersecting `range`.
    pub fn remove_mark(&mut self, range: DocRange, kind: MarkKind) {
        self.for_each_paragraph(|paragraph, start| {
            let len = paragraph.char_len();
            let sel_start = range.start.max(start);
            let sel_end = range.end.min(start + len);
            if sel_start < sel_end {
                paragraph.rewrite_range(sel_start - start, sel_end - start, &|marks| {
                    marks.remove(kind)
                });
            }
        });
    }

    /// Set the alignment of every paragraph intersecting `range` (a
    /// collapsed range addresses the paragraph containing it).
    pub fn set_alignment(&mut self, range: DocRange, align: Alignment) {
        self.for_each_paragraph(|paragraph, start| {
            let len = paragraph.char_len();
            // Inclusive end so a caret at the paragraph edge still addresses it.
            if range.start <= start + len && range.end >= start {
                paragraph.align = align;
            }
        });
    }

    /// The marks in effect at `offset`: the marks of the run the character
    /// *before* the offset belongs to, which is what subsequently typed text
    /// inherits.
    pub fn marks_at(&self, offset: usize) -> RunMarks {
        let probe = offset.saturating_sub(1);
        let mut cursor = 0usize;
        let mut first = true;
        let mut last: RunMarks = RunMarks::default();

        for page in &self.pages {
            for paragraph in &page.paragraphs {
                if !first {
                    if probe < cursor + 1 && offset > 0 {
                        // Offset sits on a separator; inherit from the
                        // previous paragraph's trailing run.
                        return last;
                    }
                    cursor += 1;
                }
                first = false;
                for run in &paragraph.runs {
                    let run_len = run.char_len();
                    if probe < cursor + run_len || (run_len == 0 && offset == cursor) {
                        return run.marks.clone();
                    }
                    if run_len > 0 {
                        last = run.marks.clone();
                    }
                    cursor += run_len;
                }
            }
        }

        last
    }

    /// Locate a global char offset: `(page index, paragraph index, offset in
    /// paragraph)`. Offsets on a separator resolve to the end of the
    /// preceding paragraph.
    fn locate(&self, offset: usize) -> (usize, usize, usize) {
        let mut cursor = 0usize;
        let mut first = true;
        let mut last = (0, 0, 0);

        for (page_idx, page) in self.pages.iter().enumerate() {
            for (para_idx, paragraph) in page.paragraphs.iter().enumerate() {
                if !first {
                    if offset == cursor {
                        return last;
                    }
                    cursor += 1;
                }
                first = false;
                let len = paragraph.char_len();
                if offset <= cursor + len {
                    return (page_idx, para_idx, offset - cursor);
                }
                last = (page_idx, para_idx, len);
                cursor += len;
            }
        }

        last
    }

    /// Insert text at `offset`. Typed characters inherit `marks` (the caret's
    /// active marks); `'\n'` splits the paragraph at the insertion point.
    pub fn insert_text(&mut self, offset: usize, text: &str, marks: &RunMarks) {
        let offset = offset.min(self.char_len());
        let (page_idx, para_idx, in_para) = self.locate(offset);

        let align = self.pages[page_idx].paragraphs[para_idx].align;
        let tail = self.pages[page_idx].paragraphs[para_idx].split_at(in_para);

        let mut lines = text.split('\n');
        let first_line = lines.next().unwrap_or_default();
        if !first_line.is_empty() {
            self.pages[page_idx].paragraphs[para_idx]
                .runs
                .push(TextRun::new(first_line, marks.clone()));
        }

        // Each newline starts a fresh paragraph; the split-off tail stays
        // attached to the last one.
        let mut rest: Vec<Paragraph> = lines
            .map(|line| {
                let mut paragraph = Paragraph {
                    align,
                    runs: Vec::new(),
                };
                if !line.is_empty() {
                    paragraph.runs.push(TextRun::new(line, marks.clone()));
                }
                paragraph
            })
            .collect();

        match rest.last_mut() {
            Some(last) => last.runs.extend(tail.runs),
            None => self.pages[page_idx].paragraphs[para_idx]
                .runs
                .extend(tail.runs),
        }

        let mut insert_at = para_idx + 1;
        for paragraph in rest {
            self.pages[page_idx].paragraphs.insert(insert_at, paragraph);
            insert_at += 1;
        }

        self.normalize();
    }

    /// Delete `range` from the document, merging paragraphs whose separator
    /// falls inside the range. Explicit deletion is the only operation that
    /// may reduce the page count (via a later pagination pass observing
    /// shrunken content).
    pub fn delete_range(&mut self, range: DocRange) {
        if range.start >= range.end {
            return;
        }
        let end = range.end.min(self.char_len());
        let start = range.start.min(end);

        // Flatten to (paragraph, global_start) pairs, rebuild the page's
        // paragraph lists afterwards keeping page membership by paragraph
        // index.
        let (start_loc, end_loc) = (self.locate(start), self.locate(end));

        if start_loc.0 == end_loc.0 && start_loc.1 == end_loc.1 {
            let paragraph = &mut self.pages[start_loc.0].paragraphs[start_loc.1];
            let tail = paragraph.split_at(end_loc.2);
            paragraph.split_at(start_loc.2); // discard the selected middle
            paragraph.runs.extend(tail.runs);
            paragraph.normalize();
            self.normalize();
            return;
        }

        // Multi-paragraph deletion: trim the first paragraph, keep the tail
        // of the last, drop everything between, then merge first + tail.
        let tail = self.pages[end_loc.0].paragraphs[end_loc.1].split_at(end_loc.2);
        self.pages[start_loc.0].paragraphs[start_loc.1].split_at(start_loc.2);

        // Remove paragraphs strictly after (start page, start para) up to and
        // including (end page, end para), walking backwards.
        for page_idx in (start_loc.0..=end_loc.0).rev() {
            let (from, to) = {
                let para_len = self.pages[page_idx].paragraphs.len();
                let from = if page_idx == start_loc.0 {
                    start_loc.1 + 1
                } else {
                    0
                };
                let to = if page_idx == end_loc.0 {
                    (end_loc.1 + 1).min(para_len)
                } else {
                    para_len
                };
                (from, to)
            };
            if from < to {
                self.pages[page_idx].paragraphs.drain(from..to);
            }
        }

        let first = &mut self.pages[start_loc.0].paragraphs[start_loc.1];
        first.runs.extend(tail.runs);
        first.normalize();

        // Pages emptied by the drain are removed entirely.
        self.pages.retain(|p| !p.paragraphs.is_empty());
        self.normalize();
    }
}

impl Default for BlockDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// The caret's pending-mark state for the block editor.
///
/// Toggling a mark with no selection does not restyle existing text; it
/// changes what subsequently typed text inherits. The pending set is
/// recomputed synchronously from the document on every caret move (the
/// content/selection events drive it; there is no polling).
#[derive(Debug, Clone, Default)]
pub struct CaretState {
    /// Caret offset in the plain-text projection.
    pub offset: usize,
    pending: Option<RunMarks>,
}

impl CaretState {
    /// Create a caret at the start of the document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the caret, dropping any pending marks.
    pub fn move_to(&mut self, offset: usize) {
        self.offset = offset;
        self.pending = None;
    }

    /// The marks newly typed text will inherit.
    pub fn active_marks(&self, doc: &BlockDocument) -> RunMarks {
        self.pending
            .clone()
            .unwrap_or_else(|| doc.marks_at(self.offset))
    }

    /// Toggle a boolean mark for future typing.
    pub fn toggle_mark(&mut self, doc: &BlockDocument, mark: &Mark) {
        let mut marks = self.active_marks(doc);
        if marks.has(mark.kind()) {
            marks.remove(mark.kind());
        } else {
            marks.apply(mark);
        }
        self.pending = Some(marks);
    }

    /// Set a valued mark (color/font/size) for future typing.
    pub fn set_mark(&mut self, doc: &BlockDocument, mark: &Mark) {
        let mut marks = self.active_marks(doc);
        marks.apply(mark);
        self.pending = Some(marks);
    }

    /// Type text at the caret; it inherits the active marks and the caret
    /// advances past it.
    pub fn type_text(&mut self, doc: &mut BlockDocument, text: &str) {
        let marks = self.active_marks(doc);
        doc.insert_text(self.offset, text, &marks);
        self.offset += text.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold_marks() -> RunMarks {
        RunMarks {
            bold: true,
            ..RunMarks::default()
        }
    }

    #[test]
    fn test_new_document_invariants() {
        let doc = BlockDocument::new();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages()[0].paragraphs.len(), 1);
        assert_eq!(doc.pages()[0].paragraphs[0].runs.len(), 1);
        assert_eq!(doc.pages()[0].page_number, 1);
        assert_eq!(doc.pages()[0].page_count, 1);
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn test_from_text_splits_paragraphs() {
        let doc = BlockDocument::from_text("one\ntwo\nthree");
        assert_eq!(doc.pages()[0].paragraphs.len(), 3);
        assert_eq!(doc.text(), "one\ntwo\nthree");
        assert_eq!(doc.char_len(), 13);
    }

    #[test]
    fn test_set_mark_splits_runs_and_preserves_text() {
        let mut doc = BlockDocument::from_text("hello world");
        doc.set_mark(DocRange::new(6, 11), &Mark::Bold);

        assert_eq!(doc.text(), "hello world");
        let runs = &doc.pages()[0].paragraphs[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "hello ");
        assert!(!runs[0].marks.bold);
        assert_eq!(runs[1].text, "world");
        assert!(runs[1].marks.bold);
    }

    #[test]
    fn test_set_mark_across_paragraphs() {
        let mut doc = BlockDocument::from_text("one\ntwo");
        doc.set_mark(DocRange::new(2, 5), &Mark::Italic);

        let paragraphs = &doc.pages()[0].paragraphs;
        assert_eq!(paragraphs[0].runs[1].text, "e");
        assert!(paragraphs[0].runs[1].marks.italic);
        assert_eq!(paragraphs[1].runs[0].text, "t");
        assert!(paragraphs[1].runs[0].marks.italic);
        assert!(!paragraphs[1].runs[1].marks.italic);
        assert_eq!(doc.text(), "one\ntwo");
    }

    #[test]
    fn test_remove_mark() {
        let mut doc = BlockDocument::from_text("hello");
        doc.set_mark(DocRange::new(0, 5), &Mark::Bold);
        doc.remove_mark(DocRange::new(1, 4), MarkKind::Bold);

        let runs = &doc.pages()[0].paragraphs[0].runs;
        assert_eq!(runs.len(), 3);
        assert!(runs[0].marks.bold);
        assert!(!runs[1].marks.bold);
        assert!(runs[2].marks.bold);
        assert_eq!(doc.text(), "hello");
    }

    #[test]
    fn test_valued_marks() {
        let mut doc = BlockDocument::from_text("color me");
        doc.set_mark(DocRange::new(0, 5), &Mark::Color(String::from("#ff0000")));
        let runs = &doc.pages()[0].paragraphs[0].runs;
        assert_eq!(runs[0].marks.color.as_deref(), Some("#ff0000"));
        assert_eq!(runs[1].marks.color, None);
    }

    #[test]
    fn test_set_alignment_is_per_paragraph() {
        let mut doc = BlockDocument::from_text("one\ntwo\nthree");
        doc.set_alignment(DocRange::new(5, 5), Alignment::Center);

        let paragraphs = &doc.pages()[0].paragraphs;
        assert_eq!(paragraphs[0].align, Alignment::Left);
        assert_eq!(paragraphs[1].align, Alignment::Center);
        assert_eq!(paragraphs[2].align, Alignment::Left);
    }

    #[test]
    fn test_split_at_preserves_marks() {
        let mut paragraph = Paragraph::with_text("hello world");
        paragraph.rewrite_range(0, 5, &|m| m.apply(&Mark::Bold));

        let tail = {
            let mut p = paragraph.clone();
            let tail = p.split_at(3);
            assert_eq!(p.text(), "hel");
            assert!(p.runs[0].marks.bold);
            tail
        };
        assert_eq!(tail.text(), "lo world");
        assert!(tail.runs[0].marks.bold);
        assert!(!tail.runs[1].marks.bold);
    }

    #[test]
    fn test_insert_text_inherits_marks() {
        let mut doc = BlockDocument::from_text("ab");
        doc.insert_text(1, "XY", &bold_marks());

        assert_eq!(doc.text(), "aXYb");
        let runs = &doc.pages()[0].paragraphs[0].runs;
        assert_eq!(runs[1].text, "XY");
        assert!(runs[1].marks.bold);
    }

    #[test]
    fn test_insert_newline_splits_paragraph() {
        let mut doc = BlockDocument::from_text("hello world");
        doc.insert_text(5, "\n", &RunMarks::default());

        assert_eq!(doc.text(), "hello\n world");
        assert_eq!(doc.pages()[0].paragraphs.len(), 2);
    }

    #[test]
    fn test_insert_multiline_text() {
        let mut doc = BlockDocument::from_text("ab");
        doc.insert_text(1, "1\n2\n3", &RunMarks::default());
        assert_eq!(doc.text(), "a1\n2\n3b");
        assert_eq!(doc.pages()[0].paragraphs.len(), 3);
    }

    #[test]
    fn test_delete_range_within_paragraph() {
        let mut doc = BlockDocument::from_text("hello world");
        doc.delete_range(DocRange::new(5, 11));
        assert_eq!(doc.text(), "hello");
    }

    #[test]
    fn test_delete_range_merges_paragraphs() {
        let mut doc = BlockDocument::from_text("one\ntwo\nthree");
        doc.delete_range(DocRange::new(2, 9));
        assert_eq!(doc.text(), "onhree");
        assert_eq!(doc.pages()[0].paragraphs.len(), 1);
    }

    #[test]
    fn test_caret_pending_marks_apply_to_future_typing_only() {
        let mut doc = BlockDocument::from_text("ab");
        let mut caret = CaretState::new();
        caret.move_to(1);

        caret.toggle_mark(&doc, &Mark::Bold);
        // Nothing restyled yet.
        assert!(doc.pages()[0].paragraphs[0].runs.iter().all(|r| !r.marks.bold));

        caret.type_text(&mut doc, "X");
        assert_eq!(doc.text(), "aXb");
        let runs = &doc.pages()[0].paragraphs[0].runs;
        assert_eq!(runs[1].text, "X");
        assert!(runs[1].marks.bold);
        assert_eq!(caret.offset, 2);
    }

    #[test]
    fn test_caret_inherits_marks_from_preceding_run() {
        let mut doc = BlockDocument::from_text("hello");
        doc.set_mark(DocRange::new(0, 5), &Mark::Bold);

        let caret = {
            let mut c = CaretState::new();
            c.move_to(5);
            c
        };
        assert!(caret.active_marks(&doc).bold);

        let mut caret_start = CaretState::new();
        caret_start.move_to(0);
        // At offset 0 there is no preceding character; the first run's marks
        // apply.
        assert!(caret_start.active_marks(&doc).bold);
    }

    #[test]
    fn test_caret_move_clears_pending() {
        let doc = BlockDocument::from_text("ab");
        let mut caret = CaretState::new();
        caret.toggle_mark(&doc, &Mark::Bold);
        assert!(caret.active_marks(&doc).bold);

        caret.move_to(2);
        assert!(!caret.active_marks(&doc).bold);
    }

    #[test]
    fn test_renumber_after_structural_change() {
        let mut doc = BlockDocument::from_text("one");
        doc.pages_mut().push(Page::new());
        doc.renumber();

        assert_eq!(doc.pages()[0].page_number, 1);
        assert_eq!(doc.pages()[1].page_number, 2);
        assert!(doc.pages().iter().all(|p| p.page_count == 2));
    }

    #[test]
    fn test_flatten_runs_projection() {
        let mut doc = BlockDocument::from_text("one\ntwo");
        doc.set_alignment(DocRange::new(4, 7), Alignment::Right);
        doc.set_mark(DocRange::new(0, 3), &Mark::Bold);

        let flat = doc.flatten_runs();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].0, Alignment::Left);
        assert!(flat[0].1.marks.bold);
        assert_eq!(flat[1].0, Alignment::Right);
        assert_eq!(flat[1].1.text, "two");
    }
}
