//! Integration tests for document assembly and the final file layout.

use chrono::{FixedOffset, TimeZone};
use pdf_scribe::config::DocumentConfig;
use pdf_scribe::object::{IndirectValue, Object, ObjectRef};
use pdf_scribe::rectangle::Rectangle;
use pdf_scribe::stream::{CacheStrategy, Stream};
use pdf_scribe::writer::{
    AFRelationship, Destination, Document, EmbeddedFile, GoToAction, Layer, Navigator, Page,
};
use pdf_scribe::Error;
use proptest::prelude::*;

fn config() -> DocumentConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    let date = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 17, 9, 30, 0)
        .unwrap();
    DocumentConfig::new()
        .with_creation_date(date)
        .with_filters_disabled(true)
}

fn letter() -> Rectangle {
    Rectangle::new(0.0, 0.0, 612.0, 792.0)
}

fn render(doc: Document) -> String {
    String::from_utf8_lossy(&doc.output(Vec::new()).unwrap()).into_owned()
}

/// Parse the xref table and check every offset points at `N 0 obj`.
fn check_xref(pdf: &[u8]) {
    let text = String::from_utf8_lossy(pdf);
    let start: usize = text
        .rsplit("startxref\n")
        .next()
        .and_then(|tail| tail.lines().next())
        .and_then(|n| n.parse().ok())
        .expect("startxref offset");
    let xref = String::from_utf8_lossy(&pdf[start..]).into_owned();
    assert!(xref.starts_with("xref\n0 "));
    let mut lines = xref.lines();
    let count: usize = lines
        .next()
        .and_then(|l| l.split(' ').nth(1))
        .and_then(|n| n.parse().ok())
        .unwrap();
    assert_eq!(lines.next(), Some("0000000000 65535 f "));
    for id in 1..count {
        let entry = lines.next().unwrap();
        let offset: usize = entry[..10].parse().unwrap();
        assert!(
            pdf[offset..].starts_with(format!("{} 0 obj\n", id).as_bytes()),
            "xref entry for object {} is off",
            id
        );
    }
}

#[test]
fn test_xref_offsets_match_objects() {
    let mut doc = Document::new(config().with_title("Offsets")).unwrap();
    let page = doc.add_page(Page::new(letter())).unwrap();
    doc.add_destination(Destination::xyz("intro", page, 72.0, 720.0));
    doc.register_stream(Stream::content(CacheStrategy::Memory, b"0 0 m 72 72 l S").unwrap())
        .unwrap();
    doc.add_embedded_file(
        EmbeddedFile::new("notes.txt", b"remember".to_vec())
            .with_af_relationship(AFRelationship::Supplement),
    )
    .unwrap();
    let bytes = doc.output(Vec::new()).unwrap();
    check_xref(&bytes);
    let pdf = String::from_utf8_lossy(&bytes);
    assert!(pdf.contains("/EmbeddedFiles"));
    assert!(pdf.contains("/AF ["));
    assert!(pdf.contains("/Title (Offsets)"));
}

#[test]
fn test_each_object_written_once() {
    let mut doc = Document::new(config()).unwrap();
    for _ in 0..3 {
        doc.add_page(Page::new(letter())).unwrap();
    }
    let count = doc.object_count();
    let pdf = render(doc);
    for id in 1..=count {
        assert_eq!(pdf.matches(&format!("\n{} 0 obj\n", id)).count(), 1);
    }
    assert!(pdf.contains("/Count 3"));
}

#[test]
fn test_lone_page_at_later_index_fails() {
    let mut doc = Document::new(config()).unwrap();
    doc.add_page(Page::at_index(letter(), 5)).unwrap();
    let mut sink = Vec::new();
    match doc.output(&mut sink) {
        Err(Error::IllegalState(msg)) => assert!(msg.contains("index 0")),
        other => panic!("expected a gap error, got {:?}", other.map(|_| ())),
    }
    assert!(sink.is_empty(), "a failed output must not write a partial file");
}

#[test]
fn test_many_destinations_keep_valid_xref() {
    let mut doc = Document::new(config()).unwrap();
    let page = doc.add_page(Page::new(letter())).unwrap();
    for i in 0..120 {
        doc.add_destination(Destination::fit(format!("d{:03}", i), page));
    }
    let bytes = doc.output(Vec::new()).unwrap();
    check_xref(&bytes);
    let pdf = String::from_utf8_lossy(&bytes);
    assert_eq!(pdf.matches("/Limits [").count(), 3);
}

#[test]
fn test_duplicate_index_fails() {
    let mut doc = Document::new(config()).unwrap();
    doc.add_page(Page::at_index(letter(), 2)).unwrap();
    let err = doc.add_page(Page::at_index(letter(), 2)).unwrap_err();
    assert!(matches!(err, Error::IllegalState(_)));
}

#[test]
fn test_navigator_resolves_forward_reference() {
    let mut doc = Document::new(config()).unwrap();
    let first = doc
        .register_named("slide-1", Navigator::new("slide-1").with_next("slide-2"))
        .unwrap();
    let second = doc
        .register_named("slide-2", Navigator::new("slide-2").with_prev("slide-1"))
        .unwrap();
    let pdf = render(doc);
    assert!(pdf.contains(&format!("/Next {}", second)));
    assert!(pdf.contains(&format!("/Prev {}", first)));
}

#[test]
fn test_unknown_layer_id_is_skipped() {
    let mut doc = Document::new(config()).unwrap();
    let action = pdf_scribe::writer::SetOcgStateAction::new("show").with_on(&["missing", "base"]);
    doc.register_named("show", action).unwrap();
    let base = doc.add_layer(Layer::new("base", "Base")).unwrap();
    let pdf = render(doc);
    assert!(pdf.contains(&format!("/State [/ON {}]", base)));
}

#[test]
fn test_goto_and_trailer_object() {
    let mut doc = Document::new(config()).unwrap();
    let page = doc.add_page(Page::new(letter())).unwrap();
    let goto = doc.register_object(GoToAction::to_page(page, 0.0, 792.0)).unwrap();
    let extra = doc
        .register_trailer_object(IndirectValue::new(vec![Object::Reference(goto)]))
        .unwrap();
    let pdf = render(doc);
    let goto_pos = pdf.find(&format!("\n{} 0 obj", goto.id)).unwrap();
    let extra_pos = pdf.find(&format!("\n{} 0 obj", extra.id)).unwrap();
    assert!(goto_pos < extra_pos);
    assert!(pdf.contains("/S /GoTo"));
}

#[test]
fn test_file_identifier_is_stable() {
    let build = || {
        let mut doc = Document::new(config()).unwrap();
        doc.add_page(Page::new(letter())).unwrap();
        render(doc)
    };
    assert_eq!(build(), build());
}

proptest! {
    /// Property: pages claimed in any order end up in index order in /Kids.
    #[test]
    fn pages_in_index_order(order in Just((0usize..6).collect::<Vec<_>>()).prop_shuffle()) {
        let mut doc = Document::new(config()).unwrap();
        let mut by_index: Vec<Option<ObjectRef>> = vec![None; 6];
        for index in &order {
            let reference = doc.add_page(Page::at_index(letter(), *index)).unwrap();
            by_index[*index] = Some(reference);
        }
        let kids: Vec<String> = by_index
            .into_iter()
            .map(|r| r.unwrap().to_string())
            .collect();
        let pdf = render(doc);
        let expected = format!("/Kids [{}]", kids.join(" "));
        prop_assert!(pdf.contains(&expected));
        prop_assert!(pdf.contains("/Count 6"));
    }
}
