//! Injected host-collaborator interfaces.
//!
//! The kernel is headless: everything it needs from the surrounding
//! application (the text input widget, the conversation-history pane, the
//! browser-profile preference store, the persistence backend) is expressed
//! as a trait and handed in by the caller. No component reaches into ambient
//! global state.

use std::collections::HashMap;

/// The host text-input primitive the compose session drives.
///
/// After a formatting command is applied, focus and the original selection
/// are restored so consecutive commands compose without the user losing
/// their selection.
pub trait HostInput {
    /// Give the input keyboard focus.
    fn focus(&mut self);
    /// Restore the selection to `[start, end)` in char offsets.
    fn set_selection(&mut self, start: usize, end: usize);
}

/// The conversation-history pane.
///
/// The kernel only owns the identifier contract (`"quote-" + byte offset`);
/// scrolling and highlighting are the host's behavior.
pub trait ConversationView {
    /// Scroll the history view to the message a quote refers to.
    fn scroll_to_quote(&mut self, quote_id: &str);
}

/// A browser-profile key/value preference store (`localStorage`-like).
///
/// Writes are read-modify-write with last-writer-wins; a single-tab host is
/// assumed.
pub trait PreferenceStore {
    /// Read a preference value.
    fn get(&self, key: &str) -> Option<String>;
    /// Write a preference value.
    fn set(&mut self, key: &str, value: String);
}

/// In-memory [`PreferenceStore`], for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// The draft payload handed to the persistence collaborator.
///
/// `style_data` is opaque to the kernel: it is whatever serialized form the
/// integration layer produced (flat buffer + intervals, or a block tree).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    /// Letter body (raw annotated buffer or serialized block tree).
    pub content: String,
    /// Letter subject line.
    pub subject: String,
    /// Recipient identifier.
    pub recipient: String,
    /// Serialized presentation/style payload.
    pub style_data: String,
}

/// The persistence collaborator.
///
/// The kernel only calls `save` and tracks timing; persistence guarantees
/// (and failures) are the collaborator's concern, never inspected here.
pub trait DraftStore {
    /// Persist the draft.
    fn save(&mut self, draft: &Draft);
}
