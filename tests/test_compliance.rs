//! Integration tests for PDF/A, PDF/X and PDF/VT enforcement.

use pdf_scribe::compliance::{PdfALevel, PdfVtLevel, PdfXLevel, Profile};
use pdf_scribe::config::{DocumentConfig, PdfVersion};
use pdf_scribe::error::ConformanceError;
use pdf_scribe::rectangle::Rectangle;
use pdf_scribe::stream::{CacheStrategy, Stream};
use pdf_scribe::writer::{
    Document, EmbeddedFile, Font, FontDescriptor, FontFileKind, FontFlags, FontSubtype, Page,
};
use pdf_scribe::Error;

fn document(profile: Profile) -> Document {
    Document::new(DocumentConfig::new().with_profile(profile)).unwrap()
}

fn bare_font() -> Font {
    Font::new(FontSubtype::Type1, "Helvetica")
}

fn conformance_of(err: Error) -> ConformanceError {
    match err {
        Error::Conformance(e) => e,
        other => panic!("expected a conformance error, got {}", other),
    }
}

#[test]
fn test_unembedded_font_rejected_under_pdfa() {
    let mut doc = document(Profile::pdfa(PdfALevel::A1b));
    let err = conformance_of(doc.register_font(bare_font()).unwrap_err());
    assert_eq!(err.profile, "PDF/A-1b");
    assert!(err.message.contains("Helvetica"));
}

#[test]
fn test_unembedded_font_accepted_without_profile() {
    let mut doc = document(Profile::none());
    doc.register_font(bare_font()).unwrap();
    doc.add_page(Page::new(Rectangle::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();
    let pdf = doc.output(Vec::new()).unwrap();
    assert!(String::from_utf8_lossy(&pdf).contains("/BaseFont /Helvetica"));
}

#[test]
fn test_embedded_font_accepted_under_pdfa() {
    let mut doc = document(Profile::pdfa(PdfALevel::A2b));
    let program = doc
        .register_stream(Stream::truetype_font(CacheStrategy::Memory, b"\0\x01\0\0").unwrap())
        .unwrap();
    let descriptor = FontDescriptor::new(
        "DejaVuSans",
        FontFlags::NONSYMBOLIC,
        Rectangle::new(-1021.0, -463.0, 1793.0, 1232.0),
    )
    .with_font_file(FontFileKind::FontFile2, program);
    let font = Font::new(FontSubtype::TrueType, "DejaVuSans").with_descriptor(descriptor);
    assert!(font.is_embedded());
    doc.register_font(font).unwrap();
}

#[test]
fn test_embedded_files_by_part() {
    let file = || EmbeddedFile::new("invoice.xml", b"<Invoice/>".to_vec());

    let err = document(Profile::pdfa(PdfALevel::A2b))
        .add_embedded_file(file())
        .unwrap_err();
    assert!(err.is_conformance());

    document(Profile::pdfa(PdfALevel::A3b))
        .add_embedded_file(file())
        .unwrap();

    let err = document(Profile::pdfx(PdfXLevel::X4))
        .add_embedded_file(file())
        .unwrap_err();
    assert_eq!(conformance_of(err).profile, "PDF/X-4");
}

#[test]
fn test_pdfa1_is_bound_to_pdf_14() {
    let config = DocumentConfig::new()
        .with_version(PdfVersion::V1_7)
        .with_profile(Profile::pdfa(PdfALevel::A1b));
    let doc = Document::new(config).unwrap();
    assert!(doc.output(Vec::new()).unwrap_err().is_conformance());
}

#[test]
fn test_level_a_requires_structure() {
    let doc = document(Profile::pdfa(PdfALevel::A2a));
    let err = doc.output(Vec::new()).unwrap_err();
    assert!(conformance_of(err).message.contains("tagged"));

    let mut doc = document(Profile::pdfa(PdfALevel::A2a));
    doc.enable_accessibility().unwrap();
    let pdf = doc.output(Vec::new()).unwrap();
    assert!(String::from_utf8_lossy(&pdf).contains("/Marked true"));
}

#[test]
fn test_pdfx_requires_title_and_version() {
    let untitled = document(Profile::pdfx(PdfXLevel::X32003));
    assert!(untitled.output(Vec::new()).unwrap_err().is_conformance());

    let old = Document::new(
        DocumentConfig::new()
            .with_title("Proof")
            .with_profile(Profile::pdfx(PdfXLevel::X4)),
    )
    .unwrap();
    assert!(old.output(Vec::new()).unwrap_err().is_conformance());

    let doc = Document::new(
        DocumentConfig::new()
            .with_title("Proof")
            .with_version(PdfVersion::V1_6)
            .with_profile(Profile::pdfx(PdfXLevel::X4)),
    )
    .unwrap();
    let pdf = String::from_utf8_lossy(&doc.output(Vec::new()).unwrap()).into_owned();
    assert!(pdf.contains("/GTS_PDFXVersion (PDF/X-4)"));
    assert!(pdf.contains("/Trapped /False"));
}

#[test]
fn test_pdfvt_needs_pdfx4() {
    assert!(Profile::new(None, None, Some(PdfVtLevel::Vt1)).is_err());
    assert!(Profile::new(None, Some(PdfXLevel::X32003), Some(PdfVtLevel::Vt1)).is_err());

    let profile = Profile::new(None, Some(PdfXLevel::X4), Some(PdfVtLevel::Vt1)).unwrap();
    assert_eq!(profile.to_string(), "PDF/X-4 + PDF/VT-1");
}
