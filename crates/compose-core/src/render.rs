//! Inline rendering of the flat buffer: styled segments plus quote blocks.
//!
//! The renderer projects the text buffer, the document style, and the
//! interval store into a flat sequence of display segments. It never touches
//! host display primitives; the host maps text segments to styled spans
//! (anchors when a link target is set) and quote segments to the distinct
//! quote container.
//!
//! Quote detection runs over the same walk and takes precedence for the
//! quoted span's container: a style interval covering a quote does not
//! restyle the quote's interior, while text around the quote keeps its
//! resolved styling.

use crate::host::ConversationView;
use crate::intervals::StyleIntervalStore;
use crate::quote::{Quote, find_quotes};
use crate::style::{DocumentStyle, ResolvedStyle};

/// One display segment of the rendered letter.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// A run of uniformly styled text.
    Text(TextSegment),
    /// An embedded quote block.
    Quote(QuoteSegment),
    /// The empty-buffer placeholder (preview mode only).
    Placeholder(String),
}

/// A run of text with one resolved style.
///
/// When [`ResolvedStyle::link_url`] is set the host renders the run as an
/// anchor element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSegment {
    /// The run's text.
    pub text: String,
    /// Effective style for the whole run.
    pub style: ResolvedStyle,
    /// Char offset of the run start in the buffer.
    pub char_start: usize,
    /// Char offset just past the run end.
    pub char_end: usize,
}

/// An embedded quote block with its click-to-scroll identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSegment {
    /// The parsed quote (sender, date, text, offsets).
    pub quote: Quote,
    /// Stable identifier, `"quote-" + byte offset`.
    pub id: String,
}

impl QuoteSegment {
    /// Invoke the conversation-history collaborator for a click on this
    /// quote.
    pub fn activate(&self, view: &mut dyn ConversationView) {
        view.scroll_to_quote(&self.id);
    }
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Preview surfaces show a placeholder for an empty buffer; the editing
    /// surface shows nothing.
    pub preview: bool,
    /// Placeholder text for the empty preview.
    pub placeholder: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preview: false,
            placeholder: String::from("Your letter will appear here..."),
        }
    }
}

/// Render the buffer into display segments.
pub fn render(
    buffer: &str,
    doc: &DocumentStyle,
    store: &StyleIntervalStore,
    options: &RenderOptions,
) -> Vec<Segment> {
    if buffer.is_empty() {
        return if options.preview {
            vec![Segment::Placeholder(options.placeholder.clone())]
        } else {
            Vec::new()
        };
    }

    // Char index -> byte offset table, with the terminating length entry so
    // `char_to_byte[char_len]` is valid.
    let char_to_byte: Vec<usize> = buffer
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(buffer.len()))
        .collect();
    let char_len = char_to_byte.len() - 1;

    let quotes = find_quotes(buffer);

    // Elementary boundaries: buffer ends, interval edges, quote edges.
    let mut boundaries = vec![0, char_len];
    for interval in store.overlapping(0, char_len) {
        boundaries.push(interval.start.min(char_len));
        boundaries.push(interval.end.min(char_len));
    }
    for quote in &quotes {
        boundaries.push(quote.char_start);
        boundaries.push(quote.char_end);
    }
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut segments: Vec<Segment> = Vec::new();
    let mut quote_iter = quotes.into_iter().peekable();
    // End of the most recently emitted quote; elementary ranges inside it
    // were already swallowed by the quote segment.
    let mut skip_until = 0usize;

    for window in boundaries.windows(2) {
        let (seg_start, seg_end) = (window[0], window[1]);
        if seg_start >= seg_end || seg_start < skip_until {
            continue;
        }

        // A quote span starting here swallows the walk up to its end; the
        // boundary set guarantees no elementary range straddles it.
        if let Some(quote) = quote_iter.peek() {
            if quote.char_start == seg_start {
                let quote = quote_iter.next().expect("peeked");
                skip_until = quote.char_end;
                let id = quote.id();
                segments.push(Segment::Quote(QuoteSegment { quote, id }));
                continue;
            }
        }

        let style = store.resolve(seg_start, doc);
        let text = buffer[char_to_byte[seg_start]..char_to_byte[seg_end]].to_string();

        // Fold runs whose resolved style did not change across a boundary.
        if let Some(Segment::Text(prev)) = segments.last_mut() {
            if prev.style == style && prev.char_end == seg_start {
                prev.text.push_str(&text);
                prev.char_end = seg_end;
                continue;
            }
        }

        segments.push(Segment::Text(TextSegment {
            text,
            style,
            char_start: seg_start,
            char_end: seg_end,
        }));
    }

    segments
}
