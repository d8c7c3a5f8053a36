#![warn(missing_docs)]
//! Compose Core - Headless Letter-Composition Kernel
//!
//! # Overview
//!
//! `compose-core` is the editing kernel of a pen-pal letter application:
//! styled-range bookkeeping, formatting commands, inline rendering, and
//! automatic pagination, with no rendering of its own. The host supplies a
//! text-input primitive, a layout measurer, and a persistence collaborator;
//! the kernel owns the document models and every algorithm between input
//! events and display segments.
//!
//! # Two document models
//!
//! The kernel maintains both letter representations the application uses:
//!
//! - **Flat interval model** - a plain text buffer plus an append-only store
//!   of styled ranges. Resolution folds every covering range in insertion
//!   order (last-appended wins, field by field). Alignment is document-wide
//!   in this model.
//! - **Block model** - a page → paragraph → text-run tree with per-run marks
//!   and per-paragraph alignment, kept within page-height budgets by the
//!   measurement-driven pagination engine.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  ComposeSession (state, versioning, saves)  │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Commands & Selection (toolbar semantics)   │  ← Input handling
//! ├─────────────────────────────────────────────┤
//! │  Inline Renderer (segments + quotes)        │  ← Display data
//! ├─────────────────────────────────────────────┤
//! │  Interval Store  │  Block Document + Marks  │  ← Document models
//! ├─────────────────────────────────────────────┤
//! │  Pagination Engine (LayoutProbe-driven)     │  ← Page budgets
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Formatting a selection
//!
//! ```rust
//! use compose_core::{ComposeSession, FormatCommand, HostInput};
//!
//! struct Input;
//! impl HostInput for Input {
//!     fn focus(&mut self) {}
//!     fn set_selection(&mut self, _start: usize, _end: usize) {}
//! }
//!
//! let mut session = ComposeSession::new();
//! session.set_content("Hello world".to_string());
//! session.update_selection(0, 5);
//!
//! let mut input = Input;
//! session.apply_format(FormatCommand::Bold, &mut input);
//!
//! let style = session.intervals().resolve(2, session.document_style());
//! assert!(style.bold);
//! ```
//!
//! ## Paginating a block document
//!
//! ```rust
//! use compose_core::{BlockDocument, HeuristicProbe, PageGeometry, PaginationEngine};
//!
//! let mut doc = BlockDocument::from_text(
//!     "First point made. Second point follows at length.",
//! );
//! let mut engine = PaginationEngine::new(PageGeometry {
//!     page_height: 100.0,
//!     bottom_margin: 20.0,
//! });
//! let mut probe = HeuristicProbe {
//!     page_width: 80.0,
//!     cell_width: 8.0,
//!     line_height: 20.0,
//!     paragraph_spacing: 4.0,
//! };
//!
//! let summary = engine.paginate(&mut doc, &mut probe);
//! assert!(summary.converged);
//! assert_eq!(doc.pages()[0].page_number, 1);
//! ```
//!
//! # Module Description
//!
//! - [`style`] - style value types (attrs, resolved snapshots, document and
//!   letter styles)
//! - [`intervals`] - the append-only styled-range store
//! - [`selection`] - selection tracking and the active-format snapshot
//! - [`commands`] - formatting commands and URL normalization
//! - [`quote`] - embedded-quote parsing with stable scroll ids
//! - [`render`] - the inline renderer (styled segments, quote substitution)
//! - [`block`] - the page/paragraph/run tree with per-run marks
//! - [`paginate`] - the measurement-driven pagination engine
//! - [`paper`] - paper sizes and mm/in length conversion
//! - [`autosave`] - save triggering and status bookkeeping
//! - [`host`] - injected host-collaborator traits
//! - [`state`] - the versioned, observable compose session
//!
//! # Error Handling
//!
//! Internal failures degrade gracefully at the operation that can fail:
//! formatting with no selection is a silent no-op, measurement failures are
//! logged and treated as "no overflow", and send validation returns a typed
//! error for the host to surface. Nothing in the kernel panics an editing
//! session.

pub mod autosave;
pub mod block;
pub mod commands;
pub mod host;
pub mod intervals;
pub mod paginate;
pub mod paper;
pub mod quote;
pub mod render;
pub mod selection;
pub mod state;
pub mod style;

pub use autosave::{AutosaveController, DEFAULT_AUTOSAVE_SECS};
pub use block::{
    BlockDocument, CaretState, DocRange, Mark, MarkKind, Page, Paragraph, RunMarks, TextRun,
};
pub use commands::{CommandOutcome, FormatCommand, FormatProcessor, normalize_url};
pub use host::{
    ConversationView, Draft, DraftStore, HostInput, MemoryPreferences, PreferenceStore,
};
pub use intervals::{StyleInterval, StyleIntervalStore};
pub use paginate::{
    Debounce, EngineState, HeuristicProbe, LayoutProbe, MeasureError, PageGeometry,
    PaginateSummary, PaginationEngine, PassChange, PassOutcome, sentence_split_offset,
};
pub use paper::{
    DimensionError, PX_PER_IN, PX_PER_MM, PaperDimensions, PaperSize, parse_length, usable_height,
};
pub use quote::{Quote, find_quotes, quote_id};
pub use render::{QuoteSegment, RenderOptions, Segment, TextSegment, render};
pub use selection::{SelectionRange, SelectionTracker};
pub use state::{
    ComposeSession, RequiredField, SendValidationError, StateChange, StateChangeCallback,
    StateChangeType,
};
pub use style::{
    Alignment, DocumentStyle, LINK_COLOR, LetterStyle, ResolvedStyle, StyleAttrs,
};
