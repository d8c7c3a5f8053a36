#![warn(missing_docs)]
//! Draft persistence payloads and browser-profile preferences for
//! [`compose-core`](compose_core).
//!
//! The kernel hands letter content to its persistence collaborator opaquely;
//! this crate produces and parses the two serialized forms the application
//! actually stores:
//!
//! - the **flat draft**: the raw text buffer alongside the appended style
//!   intervals and document style, and
//! - the **block draft**: the JSON-serialized page/paragraph/run tree.
//!
//! It also owns the `recentTextColors` browser preference (up to three hex
//! colors, most recent first, de-duplicated) behind the kernel's injected
//! [`PreferenceStore`](compose_core::PreferenceStore) seam.

use thiserror::Error;

pub mod payload;
pub mod recent_colors;

pub use payload::{
    BlockDraft, DocumentStyleData, FlatStyleData, IntervalData, LetterStyleData, PageData,
    ParagraphData, RunData, block_draft_json, flat_style_data_json, parse_block_draft,
    parse_flat_style_data,
};
pub use recent_colors::{MAX_RECENT_COLORS, RECENT_COLORS_KEY, load_recent_colors, remember_color};

/// Errors produced while encoding or decoding draft payloads.
#[derive(Debug, Error)]
pub enum DraftError {
    /// The payload was not valid JSON for the expected shape.
    #[error("malformed draft payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// An alignment class in the payload is not one the kernel knows.
    #[error("unknown alignment class {0:?}")]
    UnknownAlignment(String),
    /// A paper size identifier in the payload is not one the kernel knows.
    #[error("unknown paper size {0:?}")]
    UnknownPaperSize(String),
}
