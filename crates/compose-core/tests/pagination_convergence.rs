//! Pagination behavior against paper geometry and the heuristic measurer.

use compose_core::{
    BlockDocument, DocRange, HeuristicProbe, PageGeometry, PaperSize, PaginationEngine, RunMarks,
};

fn probe() -> HeuristicProbe {
    HeuristicProbe {
        page_width: 400.0,
        cell_width: 8.0,
        line_height: 24.0,
        paragraph_spacing: 8.0,
    }
}

#[test]
fn test_paper_dimensions_feed_page_geometry() {
    let dimensions = PaperSize::A6.dimensions().unwrap();
    let geometry = PageGeometry::from_dimensions(&dimensions, 40.0).unwrap();

    // A6 is 148mm tall at 3.7795275591 px/mm.
    assert!((geometry.page_height - 148.0 * 3.779_527_559_1).abs() < 0.01);
    assert!(geometry.usable() < geometry.page_height);
}

#[test]
fn test_long_letter_converges_and_preserves_text() {
    // A multi-sentence letter reaches a fixed point and keeps every
    // character.
    let body = "I hope this letter finds you well. \
The garden here has gone wild since spring arrived. \
Every morning the finches argue over the feeder. \
I have been reading the book you recommended last winter. \
The ending surprised me more than I expected it to. \
Write back when the harvest slows down. "
        .repeat(3);
    let mut doc = BlockDocument::from_text(body.trim_end());

    let mut engine = PaginationEngine::new(PageGeometry {
        page_height: 200.0,
        bottom_margin: 40.0,
    });
    let mut measurer = probe();

    let summary = engine.paginate(&mut doc, &mut measurer);
    assert!(summary.converged);
    assert!(doc.page_count() > 1);

    let rejoined: String = doc
        .pages()
        .iter()
        .flat_map(|p| p.paragraphs.iter())
        .map(|p| p.text())
        .collect();
    assert_eq!(rejoined, body.trim_end());

    // Footer numbers are consistent after convergence.
    let count = doc.page_count();
    for (idx, page) in doc.pages().iter().enumerate() {
        assert_eq!(page.page_number, idx + 1);
        assert_eq!(page.page_count, count);
    }

    // Idempotent on the already-paginated document.
    let again = engine.paginate(&mut doc, &mut measurer);
    assert!(again.converged);
    assert_eq!(again.changes, 0);
}

#[test]
fn test_typing_grows_pages_deleting_shrinks_content_only_explicitly() {
    // Pagination never removes a page while content grows; explicit
    // deletion may.
    let mut doc = BlockDocument::from_text("A quiet start. ");
    let mut engine = PaginationEngine::new(PageGeometry {
        page_height: 120.0,
        bottom_margin: 40.0,
    });
    let mut measurer = probe();

    engine.paginate(&mut doc, &mut measurer);
    let mut last_count = doc.page_count();

    for _ in 0..6 {
        let end = doc.char_len();
        doc.insert_text(
            end,
            "Another sentence stretches the page further down. ",
            &RunMarks::default(),
        );
        engine.paginate(&mut doc, &mut measurer);
        assert!(doc.page_count() >= last_count);
        last_count = doc.page_count();
    }
    assert!(last_count > 1);

    // Deleting most of the letter lets a later pass settle on fewer pages'
    // worth of content; page count never grows from the deletion itself.
    let len = doc.char_len();
    doc.delete_range(DocRange::new(10, len));
    engine.paginate(&mut doc, &mut measurer);
    assert!(doc.page_count() <= last_count);
}

#[test]
fn test_marks_survive_pagination_splits() {
    let body = "The first sentence carries on for quite a while here. \
The second sentence also carries on for quite a while here.";
    let mut doc = BlockDocument::from_text(body);
    doc.set_mark(DocRange::new(0, body.chars().count()), &compose_core::Mark::Italic);

    let mut engine = PaginationEngine::new(PageGeometry {
        page_height: 140.0,
        bottom_margin: 20.0,
    });
    let mut measurer = HeuristicProbe {
        page_width: 160.0,
        cell_width: 8.0,
        line_height: 24.0,
        paragraph_spacing: 8.0,
    };

    let summary = engine.paginate(&mut doc, &mut measurer);
    assert!(summary.converged);
    assert!(doc.page_count() >= 2);

    for page in doc.pages() {
        for paragraph in &page.paragraphs {
            for run in &paragraph.runs {
                assert!(run.marks.italic, "split lost a mark on {:?}", run.text);
            }
        }
    }
}
