//! End-to-end exercise of the engine: author a document through the store,
//! validate it, and run the export transforms and package round-trip.

use canvasmark_engine::blocks::{build_placeholder, empty_snapshot, inject_blocks};
use canvasmark_engine::diagnostics::{IssueKind, analyze};
use canvasmark_engine::document::{DocumentStore, build_package, parse_package, serialize_package};
use canvasmark_engine::markers::{MarkerId, build_marker_line, strip_markers};
use pretty_assertions::assert_eq;

fn author_document(store: &mut DocumentStore) {
    let content = [
        "# Field report".to_string(),
        String::new(),
        build_marker_line(MarkerId::PageBreak, None),
        String::new(),
        build_marker_line(MarkerId::NoBreakStart, None),
        "The table and its caption stay together.".to_string(),
        build_placeholder("table-1"),
        build_marker_line(MarkerId::NoBreakEnd, None),
        String::new(),
        "Closing remarks.".to_string(),
    ]
    .join("\n");

    store.set_title("Field report");
    store.set_content(content);

    let mut snapshot = empty_snapshot("table-1");
    snapshot.preview = Some("data:image/png;base64,table".to_string());
    snapshot.description = Some("Sampling table".to_string());
    store.register_block(snapshot);
}

#[test]
fn test_clean_document_diagnoses_and_exports() {
    let mut store = DocumentStore::new();
    author_document(&mut store);

    // Diagnostics see a well-formed document.
    let diagnostics = analyze(&store.document().content);
    assert!(!diagnostics.has_error);
    assert_eq!(diagnostics.entries.len(), 3);
    assert!(diagnostics.inline_issues.is_empty());

    let start = diagnostics
        .entries
        .iter()
        .find(|entry| entry.marker.id == MarkerId::NoBreakStart)
        .unwrap();
    let end = diagnostics
        .entries
        .iter()
        .find(|entry| entry.marker.id == MarkerId::NoBreakEnd)
        .unwrap();
    assert_eq!(start.paired_line, Some(end.line));
    assert_eq!(end.paired_line, Some(start.line));

    // Export: markers stripped, placeholder replaced by ready markup.
    let stripped = strip_markers(&store.document().content);
    let html = inject_blocks(&stripped, &store.document().blocks);
    assert!(!html.contains("{{page-break}}"));
    assert!(!html.contains("{{drawnix:table-1}}"));
    assert!(html.contains(r#"data-block-id="table-1""#));
    assert!(html.contains("data:image/png;base64,table"));
    assert!(html.contains("Sampling table"));
}

#[test]
fn test_broken_document_is_reported_not_rejected() {
    let mut store = DocumentStore::new();
    store.set_content("Intro {{page-break}} inline\n\n{{no-break-start}}\nunclosed region");

    let diagnostics = analyze(&store.document().content);
    assert!(diagnostics.has_error);
    assert_eq!(diagnostics.inline_issues.len(), 1);
    assert_eq!(diagnostics.inline_issues[0].kind, IssueKind::InlineUsage);
    assert_eq!(diagnostics.entries.len(), 1);
    assert_eq!(diagnostics.entries[0].issues[0].kind, IssueKind::MissingEnd);

    // Rendering still degrades gracefully for an unknown block.
    let html = inject_blocks(&build_placeholder("nowhere"), &store.document().blocks);
    assert!(html.contains("canvasmark-drawnix--missing"));
}

#[test]
fn test_package_round_trip_through_store() {
    let mut source = DocumentStore::new();
    author_document(&mut source);
    source.mark_saved();

    let json = serialize_package(&build_package(source.document())).unwrap();
    let pkg = parse_package(&json).unwrap();

    let mut restored = DocumentStore::new();
    restored.load_from_package(pkg);

    assert_eq!(restored.document().content, source.document().content);
    assert_eq!(restored.document().blocks, source.document().blocks);
    assert_eq!(restored.document().title, "Field report");
    assert!(!restored.is_dirty());

    // The restored document validates and renders identically.
    let diagnostics = analyze(&restored.document().content);
    assert!(!diagnostics.has_error);
    let html = inject_blocks(
        &strip_markers(&restored.document().content),
        &restored.document().blocks,
    );
    assert!(html.contains(r#"data-block-id="table-1""#));
}
