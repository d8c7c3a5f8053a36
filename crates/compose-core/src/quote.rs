//! Embedded quote parsing.
//!
//! A letter can embed quotes of earlier messages directly in its raw text
//! buffer using a fixed delimiter syntax:
//!
//! ```text
//! [quote|<sender>|<date>]<quoted text>[/quote]
//! ```
//!
//! Quotes are *parsed, not stored*: they are extracted by pattern-matching at
//! render time and are not part of the persisted style model. Each quote's id
//! is derived from the byte offset of its opening bracket; the id is the
//! synchronization key between the editor and the external
//! conversation-history view and must be stable across renders.

use regex::Regex;
use std::sync::OnceLock;

/// Delimiter pattern for embedded quotes. Text is matched non-greedily and
/// may span lines.
const QUOTE_PATTERN: &str = r"(?s)\[quote\|([^|\]]*)\|([^\]]*)\](.*?)\[/quote\]";

fn quote_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(QUOTE_PATTERN).expect("quote pattern is valid"))
}

/// One quote span extracted from the raw buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Who wrote the quoted message.
    pub sender: String,
    /// When the quoted message was sent (opaque display string).
    pub date: String,
    /// The quoted text.
    pub text: String,
    /// Byte offset of the opening `[` in the buffer. The id derives from
    /// this, so it is stable for a fixed buffer.
    pub byte_offset: usize,
    /// Byte length of the whole delimited span, closing tag included.
    pub byte_len: usize,
    /// Char offset of the opening `[`.
    pub char_start: usize,
    /// Char offset just past the closing tag.
    pub char_end: usize,
}

impl Quote {
    /// The identifier handed to the conversation-history collaborator when
    /// this quote is activated.
    pub fn id(&self) -> String {
        quote_id(self.byte_offset)
    }
}

/// Build a quote id from the byte offset of its opening bracket.
pub fn quote_id(byte_offset: usize) -> String {
    format!("quote-{}", byte_offset)
}

/// Extract every quote span from `buffer`, in document order.
pub fn find_quotes(buffer: &str) -> Vec<Quote> {
    let mut quotes = Vec::new();
    let mut char_cursor = 0usize;
    let mut byte_cursor = 0usize;

    for caps in quote_regex().captures_iter(buffer) {
        let whole = caps.get(0).expect("group 0 always present");

        // Advance the char cursor from the previous match instead of
        // recounting from the start of the buffer each time.
        char_cursor += buffer[byte_cursor..whole.start()].chars().count();
        let char_start = char_cursor;
        let span_chars = buffer[whole.start()..whole.end()].chars().count();
        char_cursor += span_chars;
        byte_cursor = whole.end();

        quotes.push(Quote {
            sender: caps[1].to_string(),
            date: caps[2].to_string(),
            text: caps[3].to_string(),
            byte_offset: whole.start(),
            byte_len: whole.end() - whole.start(),
            char_start,
            char_end: char_start + span_chars,
        });
    }

    quotes
}
