//! The compose session: one letter being written.
//!
//! `ComposeSession` owns the flat-model editing state — buffer, subject,
//! recipient, document style, interval store, selection tracker, autosave —
//! and exposes it behind a versioned, observable interface:
//!
//! 1. The host feeds input events (content replacement, selection changes,
//!    formatting commands).
//! 2. The session mutates synchronously, bumps its version, and notifies
//!    subscribers of the change type.
//! 3. The host re-reads whatever state it renders from.
//!
//! The buffer is replaced wholesale on every edit; there is no incremental
//! patching in this model.

use crate::autosave::AutosaveController;
use crate::commands::{CommandOutcome, FormatCommand, FormatProcessor};
use crate::host::{Draft, DraftStore, HostInput};
use crate::intervals::{StyleInterval, StyleIntervalStore};
use crate::render::{RenderOptions, Segment, render};
use crate::selection::{SelectionRange, SelectionTracker};
use crate::style::{DocumentStyle, LetterStyle, ResolvedStyle};
use chrono::{DateTime, Local};

/// What changed in a session mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Buffer content replaced.
    ContentChanged,
    /// Subject line changed.
    SubjectChanged,
    /// Recipient changed.
    RecipientChanged,
    /// Selection moved.
    SelectionChanged,
    /// A style interval was appended.
    StyleChanged,
    /// The document-wide style changed (alignment).
    DocumentStyleChanged,
    /// Paper/border presentation changed.
    LetterStyleChanged,
    /// A draft save finished.
    Saved,
}

/// A change notification record.
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type.
    pub change_type: StateChangeType,
    /// Version before the change.
    pub old_version: u64,
    /// Version after the change.
    pub new_version: u64,
}

/// Subscriber callback type.
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Fields required before a letter can be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// The recipient connection.
    Recipient,
    /// The subject line.
    Subject,
    /// The letter body.
    Content,
}

impl RequiredField {
    fn label(&self) -> &'static str {
        match self {
            RequiredField::Recipient => "recipient",
            RequiredField::Subject => "subject",
            RequiredField::Content => "content",
        }
    }
}

/// Send was attempted with required fields missing.
///
/// Surfaced to the user as a blocking notification by the host; the send is
/// aborted and no partial send occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendValidationError {
    /// The missing fields, in display order.
    pub missing: Vec<RequiredField>,
}

impl std::fmt::Display for SendValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<&str> = self.missing.iter().map(RequiredField::label).collect();
        write!(f, "missing required fields: {}", labels.join(", "))
    }
}

impl std::error::Error for SendValidationError {}

/// One letter-composition session.
pub struct ComposeSession {
    content: String,
    content_chars: usize,
    subject: String,
    recipient: String,
    document_style: DocumentStyle,
    letter_style: LetterStyle,
    store: StyleIntervalStore,
    tracker: SelectionTracker,
    autosave: AutosaveController,
    version: u64,
    subscribers: Vec<StateChangeCallback>,
}

impl ComposeSession {
    /// Create an empty session with default styles.
    pub fn new() -> Self {
        Self::with_document_style(DocumentStyle::default())
    }

    /// Create a session with an explicit initial document style.
    pub fn with_document_style(document_style: DocumentStyle) -> Self {
        Self {
            content: String::new(),
            content_chars: 0,
            subject: String::new(),
            recipient: String::new(),
            document_style,
            letter_style: LetterStyle::default(),
            store: StyleIntervalStore::new(),
            tracker: SelectionTracker::new(),
            autosave: AutosaveController::new(),
            version: 0,
            subscribers: Vec::new(),
        }
    }

    fn notify(&mut self, change_type: StateChangeType) {
        let old_version = self.version;
        self.version += 1;
        let change = StateChange {
            change_type,
            old_version,
            new_version: self.version,
        };
        for subscriber in &mut self.subscribers {
            subscriber(&change);
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&mut self, callback: StateChangeCallback) {
        self.subscribers.push(callback);
    }

    /// Monotonic session version, bumped on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The letter body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The subject line.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The recipient.
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// The document-wide style.
    pub fn document_style(&self) -> &DocumentStyle {
        &self.document_style
    }

    /// The letter's presentation settings.
    pub fn letter_style(&self) -> &LetterStyle {
        &self.letter_style
    }

    /// The interval store.
    pub fn intervals(&self) -> &StyleIntervalStore {
        &self.store
    }

    /// The current selection.
    pub fn selection(&self) -> Option<SelectionRange> {
        self.tracker.range()
    }

    /// The resolved style at the current selection (toolbar state).
    pub fn active_format(&self) -> Option<&ResolvedStyle> {
        self.tracker.active_format()
    }

    /// Autosave status bookkeeping.
    pub fn autosave(&self) -> &AutosaveController {
        &self.autosave
    }

    /// Replace the buffer wholesale.
    ///
    /// A selection that no longer fits the new content is dropped; the
    /// active format is refreshed against the new state.
    pub fn set_content(&mut self, content: String) {
        self.content_chars = content.chars().count();
        self.content = content;

        if let Some(range) = self.tracker.range() {
            if range.end > self.content_chars {
                self.tracker.clear();
            } else {
                self.tracker.refresh(&self.store, &self.document_style);
            }
        }

        self.notify(StateChangeType::ContentChanged);
    }

    /// Clear the letter body and discard accumulated style intervals.
    pub fn clear_content(&mut self) {
        self.content.clear();
        self.content_chars = 0;
        self.store.clear();
        self.tracker.clear();
        self.notify(StateChangeType::ContentChanged);
    }

    /// Set the subject line.
    pub fn set_subject(&mut self, subject: String) {
        self.subject = subject;
        self.notify(StateChangeType::SubjectChanged);
    }

    /// Set the recipient.
    pub fn set_recipient(&mut self, recipient: String) {
        self.recipient = recipient;
        self.notify(StateChangeType::RecipientChanged);
    }

    /// Set the letter's presentation settings.
    pub fn set_letter_style(&mut self, letter_style: LetterStyle) {
        self.letter_style = letter_style;
        self.notify(StateChangeType::LetterStyleChanged);
    }

    /// Feed a native selection-change event from the host input.
    pub fn update_selection(&mut self, raw_start: usize, raw_end: usize) {
        self.tracker.set_from_input(
            raw_start,
            raw_end,
            self.content_chars,
            &self.store,
            &self.document_style,
        );
        self.notify(StateChangeType::SelectionChanged);
    }

    /// Apply a formatting command to the current selection.
    ///
    /// On success the active format is refreshed (so consecutive toggles
    /// compose), an eager autosave is requested, and subscribers are
    /// notified. With no selection this is a silent no-op.
    pub fn apply_format(&mut self, command: FormatCommand, host: &mut dyn HostInput) -> CommandOutcome {
        let outcome = FormatProcessor::apply(
            command,
            &self.tracker,
            &mut self.store,
            &mut self.document_style,
            host,
        );

        match outcome {
            CommandOutcome::Applied => {
                self.tracker.refresh(&self.store, &self.document_style);
                self.autosave.request_save();
                self.notify(StateChangeType::StyleChanged);
            }
            CommandOutcome::DocumentStyleChanged => {
                self.tracker.refresh(&self.store, &self.document_style);
                self.autosave.request_save();
                self.notify(StateChangeType::DocumentStyleChanged);
            }
            CommandOutcome::Ignored => {}
        }

        outcome
    }

    /// Render the current buffer into display segments.
    pub fn render(&self, options: &RenderOptions) -> Vec<Segment> {
        render(&self.content, &self.document_style, &self.store, options)
    }

    /// All style intervals appended so far.
    pub fn style_intervals(&self) -> &[StyleInterval] {
        self.store.intervals()
    }

    /// Check the required fields before sending.
    pub fn validate_send(&self) -> Result<(), SendValidationError> {
        let mut missing = Vec::new();
        if self.recipient.trim().is_empty() {
            missing.push(RequiredField::Recipient);
        }
        if self.subject.trim().is_empty() {
            missing.push(RequiredField::Subject);
        }
        if self.content.trim().is_empty() {
            missing.push(RequiredField::Content);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SendValidationError { missing })
        }
    }

    /// Whether there is anything worth autosaving.
    pub fn has_content(&self) -> bool {
        !self.content.is_empty() || !self.subject.is_empty()
    }

    /// Periodic autosave tick; returns `true` when the host should save.
    pub fn autosave_tick(&mut self, now: DateTime<Local>) -> bool {
        let has_content = self.has_content();
        self.autosave.tick(now, has_content)
    }

    /// Assemble the draft payload for the persistence collaborator.
    ///
    /// `style_data` is the opaque serialized style payload produced by the
    /// integration layer.
    pub fn draft(&self, style_data: String) -> Draft {
        Draft {
            content: self.content.clone(),
            subject: self.subject.clone(),
            recipient: self.recipient.clone(),
            style_data,
        }
    }

    /// Save the draft through the persistence collaborator and update
    /// autosave status.
    pub fn save_draft(
        &mut self,
        store: &mut dyn DraftStore,
        style_data: String,
        now: DateTime<Local>,
    ) {
        let draft = self.draft(style_data);
        self.autosave.save_with(store, &draft, now);
        self.notify(StateChangeType::Saved);
    }
}

impl Default for ComposeSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Alignment;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeInput;
    impl HostInput for FakeInput {
        fn focus(&mut self) {}
        fn set_selection(&mut self, _start: usize, _end: usize) {}
    }

    fn at(secs: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, 1, 9, 0, secs)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn test_version_bumps_and_subscribers_fire() {
        let mut session = ComposeSession::new();
        let seen: Arc<Mutex<Vec<StateChangeType>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.subscribe(Box::new(move |change| {
            sink.lock().unwrap().push(change.change_type);
        }));

        session.set_content(String::from("Dear Ada,"));
        session.set_subject(String::from("hello"));

        assert_eq!(session.version(), 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![StateChangeType::ContentChanged, StateChangeType::SubjectChanged]
        );
    }

    #[test]
    fn test_format_flow_keeps_selection_composable() {
        let mut session = ComposeSession::new();
        let mut host = FakeInput;
        session.set_content(String::from("Hello world"));
        session.update_selection(0, 5);

        assert_eq!(
            session.apply_format(FormatCommand::Bold, &mut host),
            CommandOutcome::Applied
        );
        // The refreshed active format reflects the appended interval, so the
        // next toggle is relative to it.
        assert!(session.active_format().unwrap().bold);

        session.apply_format(FormatCommand::Bold, &mut host);
        assert!(!session.active_format().unwrap().bold);
        assert_eq!(session.style_intervals().len(), 2);
    }

    #[test]
    fn test_format_with_no_selection_is_ignored() {
        let mut session = ComposeSession::new();
        let mut host = FakeInput;
        session.set_content(String::from("Hello"));

        let outcome = session.apply_format(FormatCommand::Italic, &mut host);
        assert_eq!(outcome, CommandOutcome::Ignored);
        assert_eq!(session.style_intervals().len(), 0);
        // No version bump for a no-op.
        assert_eq!(session.version(), 1);
    }

    #[test]
    fn test_alignment_changes_document_style_for_whole_document() {
        let mut session = ComposeSession::new();
        let mut host = FakeInput;
        session.set_content(String::from("Hello"));

        session.apply_format(
            FormatCommand::SetAlignment(Alignment::Center),
            &mut host,
        );
        assert_eq!(session.document_style().alignment, Alignment::Center);
        assert_eq!(session.style_intervals().len(), 0);
    }

    #[test]
    fn test_content_replacement_drops_out_of_range_selection() {
        let mut session = ComposeSession::new();
        session.set_content(String::from("Hello world"));
        session.update_selection(6, 11);
        assert!(session.selection().is_some());

        session.set_content(String::from("Hi"));
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_clear_content_discards_intervals() {
        let mut session = ComposeSession::new();
        let mut host = FakeInput;
        session.set_content(String::from("Hello"));
        session.update_selection(0, 5);
        session.apply_format(FormatCommand::Bold, &mut host);
        assert_eq!(session.style_intervals().len(), 1);

        session.clear_content();
        assert_eq!(session.style_intervals().len(), 0);
        assert_eq!(session.content(), "");
    }

    #[test]
    fn test_validate_send_reports_missing_fields() {
        let mut session = ComposeSession::new();
        let err = session.validate_send().unwrap_err();
        assert_eq!(
            err.missing,
            vec![
                RequiredField::Recipient,
                RequiredField::Subject,
                RequiredField::Content
            ]
        );
        assert_eq!(
            err.to_string(),
            "missing required fields: recipient, subject, content"
        );

        session.set_recipient(String::from("ada"));
        session.set_subject(String::from("hello"));
        session.set_content(String::from("Dear Ada,"));
        assert!(session.validate_send().is_ok());
    }

    #[test]
    fn test_save_draft_notifies_and_stamps_status() {
        #[derive(Default)]
        struct Recorder(Vec<Draft>);
        impl DraftStore for Recorder {
            fn save(&mut self, draft: &Draft) {
                self.0.push(draft.clone());
            }
        }

        let mut session = ComposeSession::new();
        session.set_content(String::from("Dear Ada,"));
        session.set_subject(String::from("hi"));
        session.set_recipient(String::from("ada"));

        let mut store = Recorder::default();
        session.save_draft(&mut store, String::from("{}"), at(42));

        assert_eq!(store.0.len(), 1);
        assert_eq!(store.0[0].content, "Dear Ada,");
        assert_eq!(store.0[0].style_data, "{}");
        assert_eq!(
            session.autosave().last_saved_label().as_deref(),
            Some("Last saved at 09:00:42")
        );
    }

    #[test]
    fn test_formatting_requests_eager_autosave() {
        let mut session = ComposeSession::new();
        let mut host = FakeInput;
        session.set_content(String::from("Hello"));
        session.update_selection(0, 5);
        session.apply_format(FormatCommand::Bold, &mut host);

        // The pending request fires on the very next tick.
        assert!(session.autosave_tick(at(0)));
    }
}
