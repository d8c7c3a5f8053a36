//! Formatting commands over the flat interval model.
//!
//! A command names one formatting operation the toolbar can issue. The
//! processor applies it to the current selection: every successful command
//! appends exactly one interval built from the active format plus the one
//! changed field, then restores focus and the original selection on the host
//! input. With no active selection every command is a silent no-op — the
//! toolbar buttons stay clickable while nothing is selected, so this must
//! never surface as an error.

use regex::Regex;
use std::sync::OnceLock;

use crate::host::HostInput;
use crate::intervals::{StyleInterval, StyleIntervalStore};
use crate::selection::SelectionTracker;
use crate::style::{Alignment, DocumentStyle, LINK_COLOR, ResolvedStyle, StyleAttrs};

/// A formatting operation.
///
/// A closed set of variants: each command carries exactly the value it
/// needs, so there is no "value ignored for this command" failure mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    /// Toggle bold relative to the active format.
    Bold,
    /// Toggle italic relative to the active format.
    Italic,
    /// Toggle underline relative to the active format.
    Underline,
    /// Set the font family for the selection.
    SetFont(String),
    /// Set the font size for the selection.
    SetSize(String),
    /// Set the text color for the selection.
    SetColor(String),
    /// Set the document-wide alignment.
    ///
    /// Alignment cannot vary per-range in the interval model; this mutates
    /// the document style and creates no interval.
    SetAlignment(Alignment),
    /// Mark the selection as a link to `url` (normalized, underlined, link
    /// color preset).
    InsertLink {
        /// Link target; a missing scheme is auto-corrected to `https://`.
        url: String,
    },
}

/// What applying a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// One interval was appended for the selection.
    Applied,
    /// The document style changed (alignment); no interval was created.
    DocumentStyleChanged,
    /// No active selection; nothing was mutated.
    Ignored,
}

fn scheme_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").expect("scheme pattern is valid"))
}

/// Normalize a link target: prepend `https://` when no scheme is present.
///
/// Idempotent: normalizing an already-normalized URL returns it unchanged.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if scheme_regex().is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Applies [`FormatCommand`]s to the interval store and document style.
pub struct FormatProcessor;

impl FormatProcessor {
    /// Apply `command` to the current selection.
    ///
    /// Alignment applies document-wide with or without a selection. Every
    /// other command requires a non-null selection and silently returns
    /// [`CommandOutcome::Ignored`] otherwise, leaving the store untouched.
    /// On success, focus and the original selection are restored on `host`.
    pub fn apply(
        command: FormatCommand,
        tracker: &SelectionTracker,
        store: &mut StyleIntervalStore,
        doc: &mut DocumentStyle,
        host: &mut dyn HostInput,
    ) -> CommandOutcome {
        if let FormatCommand::SetAlignment(alignment) = command {
            doc.alignment = alignment;
            if let Some(range) = tracker.range() {
                host.focus();
                host.set_selection(range.start, range.end);
            }
            return CommandOutcome::DocumentStyleChanged;
        }

        let Some(range) = tracker.range() else {
            return CommandOutcome::Ignored;
        };

        // The tracker keeps the snapshot current; recompute defensively only
        // when a caller skipped refresh.
        let active = match tracker.active_format() {
            Some(format) => format.clone(),
            None => store.resolve(range.start, doc),
        };

        let mut attrs = active.to_attrs();
        Self::overlay(&mut attrs, &active, command);

        store.add(StyleInterval::new(range.start, range.end, attrs));

        host.focus();
        host.set_selection(range.start, range.end);

        CommandOutcome::Applied
    }

    /// Overlay the command's changed field onto the copied active format.
    fn overlay(attrs: &mut StyleAttrs, active: &ResolvedStyle, command: FormatCommand) {
        match command {
            FormatCommand::Bold => attrs.bold = Some(!active.bold),
            FormatCommand::Italic => attrs.italic = Some(!active.italic),
            FormatCommand::Underline => attrs.underline = Some(!active.underline),
            FormatCommand::SetFont(font) => attrs.font = Some(font),
            FormatCommand::SetSize(size) => attrs.size = Some(size),
            FormatCommand::SetColor(color) => attrs.color = Some(color),
            FormatCommand::InsertLink { url } => {
                attrs.link_url = Some(normalize_url(&url));
                attrs.underline = Some(true);
                attrs.color = Some(LINK_COLOR.to_string());
            }
            // Handled before overlay.
            FormatCommand::SetAlignment(_) => {}
        }
    }
}
