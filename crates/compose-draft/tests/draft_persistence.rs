//! Draft payloads and preferences wired through a live compose session.

use compose_core::{
    Alignment, BlockDocument, ComposeSession, DocRange, Draft, DraftStore, FormatCommand,
    HostInput, Mark, MemoryPreferences, StyleIntervalStore,
};
use compose_draft::{
    block_draft_json, flat_style_data_json, load_recent_colors, parse_block_draft,
    parse_flat_style_data, remember_color,
};

struct NoopInput;
impl HostInput for NoopInput {
    fn focus(&mut self) {}
    fn set_selection(&mut self, _start: usize, _end: usize) {}
}

#[derive(Default)]
struct RowStore(Vec<Draft>);
impl DraftStore for RowStore {
    fn save(&mut self, draft: &Draft) {
        self.0.push(draft.clone());
    }
}

#[test]
fn test_flat_draft_round_trip_preserves_resolution() {
    let mut session = ComposeSession::new();
    let mut input = NoopInput;
    session.set_content(String::from("Hello world"));
    session.set_subject(String::from("spring"));
    session.set_recipient(String::from("ada"));

    session.update_selection(0, 5);
    session.apply_format(FormatCommand::Bold, &mut input);
    session.update_selection(2, 8);
    session.apply_format(FormatCommand::SetColor(String::from("#aa0000")), &mut input);
    session.apply_format(FormatCommand::SetAlignment(Alignment::Right), &mut input);

    let style_data = flat_style_data_json(
        session.document_style(),
        session.style_intervals(),
        session.letter_style(),
    )
    .unwrap();

    // Persist through the collaborator.
    let mut rows = RowStore::default();
    let now = chrono::Local::now();
    session.save_draft(&mut rows, style_data, now);
    assert_eq!(rows.0.len(), 1);
    let saved = &rows.0[0];
    assert_eq!(saved.content, "Hello world");

    // A fresh store rebuilt from the payload resolves identically.
    let (doc_style, intervals, _letter) = parse_flat_style_data(&saved.style_data).unwrap();
    assert_eq!(doc_style.alignment, Alignment::Right);

    let mut rebuilt = StyleIntervalStore::new();
    for interval in intervals {
        rebuilt.add(interval);
    }
    let original = session.intervals().resolve(3, session.document_style());
    let restored = rebuilt.resolve(3, &doc_style);
    assert_eq!(restored.bold, original.bold);
    assert_eq!(restored.color, original.color);
    assert!(restored.bold);
    assert_eq!(restored.color, "#aa0000");
}

#[test]
fn test_block_draft_round_trip_through_json() {
    let mut doc = BlockDocument::from_text("Dear Ada,\nThe tulips came up early this year.");
    doc.set_mark(DocRange::new(10, 20), &Mark::Bold);
    doc.set_alignment(DocRange::new(0, 4), Alignment::Center);

    let json = block_draft_json(&doc).unwrap();
    let restored = parse_block_draft(&json).unwrap();

    assert_eq!(restored.text(), doc.text());
    assert_eq!(restored.pages()[0].paragraphs[0].align, Alignment::Center);

    let flat_original = doc.flatten_runs();
    let flat_restored = restored.flatten_runs();
    assert_eq!(flat_original.len(), flat_restored.len());
    for (a, b) in flat_original.iter().zip(flat_restored.iter()) {
        assert_eq!(a.0, b.0);
        assert_eq!(a.1.text, b.1.text);
        assert_eq!(a.1.marks, b.1.marks);
    }
}

#[test]
fn test_recent_colors_behind_injected_store() {
    let mut prefs = MemoryPreferences::new();

    remember_color(&mut prefs, "#ff0000");
    remember_color(&mut prefs, "#00ff00");
    remember_color(&mut prefs, "#0000ff");
    remember_color(&mut prefs, "#123456");

    assert_eq!(
        load_recent_colors(&prefs),
        vec!["#123456", "#0000ff", "#00ff00"]
    );
}
