//! Autosave timing and status bookkeeping.
//!
//! The controller decides *when* to save and tracks `is_saving` /
//! `last_saved`; the save itself is the caller-supplied persistence
//! collaborator. Two triggers exist: a periodic tick (~30 s) while the
//! buffer or subject is non-empty, and explicit on-demand requests issued
//! after formatting or content changes.
//!
//! All methods take the current time as a parameter, so hosts drive the
//! controller from whatever timer they have and tests stay deterministic.

use chrono::{DateTime, Duration, Local};

use crate::host::{Draft, DraftStore};

/// Default periodic autosave interval.
pub const DEFAULT_AUTOSAVE_SECS: i64 = 30;

/// Debounced persistence trigger with save-status bookkeeping.
#[derive(Debug, Clone)]
pub struct AutosaveController {
    interval: Duration,
    last_saved: Option<DateTime<Local>>,
    last_fired: Option<DateTime<Local>>,
    is_saving: bool,
    pending_request: bool,
}

impl AutosaveController {
    /// Create a controller with the default 30 s interval.
    pub fn new() -> Self {
        Self::with_interval_secs(DEFAULT_AUTOSAVE_SECS)
    }

    /// Create a controller with an explicit interval.
    pub fn with_interval_secs(secs: i64) -> Self {
        Self {
            interval: Duration::seconds(secs),
            last_saved: None,
            last_fired: None,
            is_saving: false,
            pending_request: false,
        }
    }

    /// Ask for a save at the next tick regardless of the interval (used
    /// after formatting/content changes at call sites that want an eager
    /// save).
    pub fn request_save(&mut self) {
        self.pending_request = true;
    }

    /// Periodic tick. Returns `true` when the caller should save now.
    ///
    /// The interval only runs while there is content to save; an empty
    /// draft never autosaves. A tick while a save is in flight returns
    /// `false` (the next tick retries).
    pub fn tick(&mut self, now: DateTime<Local>, has_content: bool) -> bool {
        if self.is_saving {
            return false;
        }
        if self.pending_request {
            return true;
        }
        if !has_content {
            return false;
        }

        match self.last_fired {
            // First contentful tick arms the interval.
            None => {
                self.last_fired = Some(now);
                false
            }
            Some(since) => now - since >= self.interval,
        }
    }

    /// Mark a save as started.
    pub fn begin_save(&mut self) {
        self.is_saving = true;
        self.pending_request = false;
    }

    /// Mark the in-flight save as finished at `now`.
    pub fn finish_save(&mut self, now: DateTime<Local>) {
        self.is_saving = false;
        self.last_saved = Some(now);
        self.last_fired = Some(now);
    }

    /// Run a full synchronous save through the persistence collaborator.
    pub fn save_with(&mut self, store: &mut dyn DraftStore, draft: &Draft, now: DateTime<Local>) {
        self.begin_save();
        store.save(draft);
        self.finish_save(now);
    }

    /// Whether a save is currently in flight.
    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    /// When the last save finished.
    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    /// Human-readable status line, e.g. `"Last saved at 14:30:05"`.
    pub fn last_saved_label(&self) -> Option<String> {
        self.last_saved
            .map(|t| format!("Last saved at {}", t.format("%H:%M:%S")))
    }

    /// Clear interval state on editor teardown.
    pub fn reset(&mut self) {
        self.last_fired = None;
        self.pending_request = false;
        self.is_saving = false;
    }
}

impl Default for AutosaveController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, 1, 14, 30, secs)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn test_interval_fires_after_thirty_seconds_with_content() {
        let mut autosave = AutosaveController::new();

        // First contentful tick arms the interval, does not fire.
        assert!(!autosave.tick(at(0), true));
        assert!(!autosave.tick(at(15), true));
        assert!(autosave.tick(at(30), true));
    }

    #[test]
    fn test_empty_draft_never_autosaves() {
        let mut autosave = AutosaveController::new();
        assert!(!autosave.tick(at(0), false));
        assert!(!autosave.tick(at(59), false));
    }

    #[test]
    fn test_on_demand_request_fires_immediately() {
        let mut autosave = AutosaveController::new();
        autosave.request_save();
        assert!(autosave.tick(at(1), true));

        autosave.begin_save();
        autosave.finish_save(at(2));
        // The request was consumed.
        assert!(!autosave.tick(at(3), true));
    }

    #[test]
    fn test_no_tick_while_saving() {
        let mut autosave = AutosaveController::with_interval_secs(1);
        autosave.tick(at(0), true);
        autosave.begin_save();
        assert!(autosave.is_saving());
        assert!(!autosave.tick(at(10), true));

        autosave.finish_save(at(10));
        assert!(!autosave.is_saving());
        assert!(autosave.tick(at(11), true));
    }

    #[test]
    fn test_last_saved_label_formats_wall_clock() {
        let mut autosave = AutosaveController::new();
        assert_eq!(autosave.last_saved_label(), None);

        autosave.begin_save();
        autosave.finish_save(at(5));
        assert_eq!(
            autosave.last_saved_label().as_deref(),
            Some("Last saved at 14:30:05")
        );
    }

    #[test]
    fn test_save_with_runs_collaborator_and_updates_status() {
        #[derive(Default)]
        struct Recorder(Vec<Draft>);
        impl DraftStore for Recorder {
            fn save(&mut self, draft: &Draft) {
                self.0.push(draft.clone());
            }
        }

        let mut autosave = AutosaveController::new();
        let mut store = Recorder::default();
        let draft = Draft {
            content: String::from("Dear Ada,"),
            subject: String::from("hello"),
            recipient: String::from("ada"),
            style_data: String::new(),
        };

        autosave.save_with(&mut store, &draft, at(7));
        assert_eq!(store.0.len(), 1);
        assert_eq!(store.0[0].subject, "hello");
        assert!(!autosave.is_saving());
        assert_eq!(autosave.last_saved(), Some(at(7)));
    }
}
