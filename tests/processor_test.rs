//! End-to-end tests for document processing.

use std::collections::BTreeMap;
use std::fs;
use std::sync::Mutex;

use pdfscene::model::ImageOrigin;
use pdfscene::source::{RawSpan, RawTextPage};
use pdfscene::{
    Bounds, DiscardStorage, DocumentSource, EmbeddedFont, Error, FontStyle, ImageAsset,
    JsonFormat, PageImageAssets, PageSize, PageStream, Processor, RawDocument,
    RectElement, Result, SkipReason, StorageSink,
};

const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn png(tag: u8) -> Vec<u8> {
    let mut data = PNG.to_vec();
    data.push(tag);
    data
}

/// Records every write in memory.
#[derive(Default)]
struct MemoryStorage {
    writes: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryStorage {
    fn paths(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, data)| data.clone())
    }
}

impl StorageSink for MemoryStorage {
    fn put_bytes(&self, data: &[u8], relative_path: &str, _content_type: &str) -> Result<String> {
        self.writes
            .lock()
            .unwrap()
            .push((relative_path.to_string(), data.to_vec()));
        Ok(format!("mem://{}", relative_path))
    }
}

/// Fails every write.
struct BrokenStorage;

impl StorageSink for BrokenStorage {
    fn put_bytes(&self, _data: &[u8], relative_path: &str, _content_type: &str) -> Result<String> {
        Err(Error::Storage(format!("disk full writing {}", relative_path)))
    }
}

/// A backend whose text extraction fails.
struct FailingSource;

impl DocumentSource for FailingSource {
    fn name(&self) -> &str {
        "broken.pdf"
    }

    fn page_numbers(&self) -> Vec<u32> {
        vec![1]
    }

    fn vector_stream(&self) -> Result<Vec<PageStream>> {
        Ok(Vec::new())
    }

    fn text_stream(&self) -> Result<Vec<RawTextPage>> {
        Err(Error::Source("text layer unreadable".to_string()))
    }

    fn embedded_fonts(&self) -> Result<Vec<EmbeddedFont>> {
        Ok(Vec::new())
    }

    fn page_image_assets(&self, _page: u32) -> Result<PageImageAssets> {
        Ok(PageImageAssets::default())
    }
}

fn roboto() -> EmbeddedFont {
    EmbeddedFont {
        id: Some(12),
        family_name: Some("Roboto".to_string()),
        subfamily_name: Some("Bold".to_string()),
        full_name: Some("Roboto Bold".to_string()),
        postscript_name: Some("Roboto-Bold".to_string()),
        ext: Some("ttf".to_string()),
        data: vec![0, 1, 0, 0],
    }
}

fn sample_document() -> RawDocument {
    let letter = Some(PageSize::new(612.0, 792.0));

    let vectors = vec![
        PageStream::new(
            1,
            letter,
            vec![
                RectElement::new(Bounds::new(0.0, 0.0, 612.0, 792.0))
                    .with_fill("#FFFFFF")
                    .into(),
                RectElement::new(Bounds::new(72.0, 110.0, 100.0, 0.5)).into(),
            ],
        ),
        PageStream::new(2, letter, vec![]),
    ];

    let mut heading = RawSpan::new(
        "Quarterly",
        [72.0, 100.0, 172.0, 112.0],
        12.0,
        "ABCDEF+Roboto-Bold",
    );
    heading.color = 0x336699;
    let blank = RawSpan::new("", [72.0, 200.0, 100.0, 212.0], 12.0, "Roboto-Bold");
    let text = vec![RawTextPage {
        number: 1,
        size: letter,
        spans: vec![heading, blank],
    }];

    let mut images = BTreeMap::new();
    images.insert(
        2,
        PageImageAssets {
            assets: vec![
                ImageAsset::inline(png(1), 10.0, 10.0, 100, 100),
                ImageAsset::xref(5, png(1), 300.0, 300.0, 100, 100),
                ImageAsset::xref(6, png(1), 400.0, 400.0, 50, 50),
            ],
            fallback: vec![],
        },
    );

    RawDocument {
        name: "report".to_string(),
        page_count: Some(2),
        vectors,
        text,
        fonts: vec![roboto(), roboto()],
        images,
    }
}

#[test]
fn test_process_writes_assets_and_pages() {
    let storage = MemoryStorage::default();
    let processor = Processor::new(storage).sequential();
    let result = processor.process(&sample_document()).unwrap();

    assert_eq!(result.reference, "mem://report.json");

    let paths = processor.storage().paths();
    assert_eq!(paths.iter().filter(|p| p.starts_with("fonts/")).count(), 1);
    assert!(paths.contains(&"fonts/Roboto_Bold.ttf".to_string()));
    // The same bitmap is written once no matter how often it is placed.
    assert_eq!(paths.iter().filter(|p| p.starts_with("images/")).count(), 1);
    assert_eq!(paths.last().unwrap(), "report.json");

    let pages = &result.document.pages;
    assert_eq!(pages.len(), 2);

    // Page 1: the white page rect is gone and the hairline became an underline.
    assert_eq!(pages[0].element_count(), 1);
    let heading = pages[0].pdf_items[0].as_text().unwrap();
    assert_eq!(heading.text, "Quarterly");
    assert!(heading.underline);
    assert_eq!(heading.font_family, "Roboto Bold");
    assert_eq!(heading.font_url.as_deref(), Some("mem://fonts/Roboto_Bold.ttf"));
    assert_eq!(heading.fill, "#336699");

    // Page 2: the inline duplicate is dropped, XObject images stay in order.
    let xrefs: Vec<u64> = pages[1]
        .pdf_items
        .iter()
        .filter_map(|e| e.as_image())
        .filter_map(|i| i.metadata.get("xref").and_then(|v| v.as_u64()))
        .collect();
    assert_eq!(xrefs, vec![5, 6]);

    let intake = &result.document.intake;
    assert_eq!(intake.skipped_for(SkipReason::EmptyText), 1);
    assert_eq!(intake.skipped_for(SkipReason::DuplicateImage), 1);
}

#[test]
fn test_counts_before_and_after() {
    let processor = Processor::new(DiscardStorage);
    let reconciled = processor.reconcile_document(&sample_document()).unwrap();

    let before = &reconciled.before[&1];
    assert_eq!(before.rect_count, 2);
    assert_eq!(before.text_count, 1);

    let after = reconciled.after();
    assert_eq!(after[&1].rect_count, 0);
    assert_eq!(after[&1].decorated_count, 1);
    assert_eq!(after[&2].image_count, 2);
}

#[test]
fn test_written_json_matches_pages() {
    let storage = MemoryStorage::default();
    let processor = Processor::new(storage).with_json_format(JsonFormat::Compact);
    let result = processor.process(&sample_document()).unwrap();

    let written = processor.storage().read("report.json").unwrap();
    let json = String::from_utf8(written).unwrap();
    assert!(!json.contains('\n'));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let pages = value.as_array().unwrap();
    assert_eq!(pages.len(), result.document.pages.len());
    assert_eq!(pages[0]["number"], 1);
    assert_eq!(pages[0]["size"]["width"], 612.0);
    assert_eq!(pages[0]["pdf_items"][0]["type"], "text");
    assert_eq!(pages[0]["pdf_items"][0]["fontFamily"], "Roboto Bold");
    assert_eq!(pages[1]["pdf_items"][0]["type"], "image");
}

#[test]
fn test_storage_failure_aborts_document() {
    let err = Processor::new(BrokenStorage)
        .process(&sample_document())
        .unwrap_err();

    match &err {
        Error::Processing { document, source } => {
            assert_eq!(document, "report");
            assert!(matches!(**source, Error::Storage(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_source_failure_aborts_document() {
    let storage = MemoryStorage::default();
    let processor = Processor::new(storage);
    let err = processor.process(&FailingSource).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to process broken.pdf: Source error: text layer unreadable"
    );
    assert!(processor.storage().paths().is_empty());
}

#[test]
fn test_empty_spans_do_not_count_towards_wash_images() {
    let letter = Some(PageSize::new(612.0, 792.0));
    let photo = pdfscene::ImageElement::new("photo", 0.0, 0.0, 300, 100);
    let document = RawDocument {
        name: "spans".to_string(),
        vectors: vec![PageStream::new(1, letter, vec![photo.into()])],
        text: vec![RawTextPage {
            number: 1,
            size: letter,
            spans: vec![
                RawSpan::new("a", [10.0, 10.0, 60.0, 22.0], 12.0, "Arial"),
                RawSpan::new("", [10.0, 40.0, 60.0, 52.0], 12.0, "Arial"),
            ],
        }],
        ..Default::default()
    };

    let result = Processor::new(DiscardStorage).process(&document).unwrap();
    let items = &result.document.pages[0].pdf_items;

    // One covered text is not a wash: the photo stays and hides the text.
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].as_image().unwrap().url, "photo");
    assert_eq!(result.document.intake.skipped_for(SkipReason::EmptyText), 1);
}

#[test]
fn test_unknown_fonts_fall_back_to_common_fonts() {
    let mut document = sample_document();
    document.fonts.clear();
    document.text[0].spans[0].font = "Helvetica-Oblique".to_string();

    let result = Processor::new(DiscardStorage)
        .with_common_fonts(vec![FontStyle::new(
            "Helvetica",
            "Helvetica Oblique",
            "Helvetica-Oblique",
        )])
        .process(&document)
        .unwrap();

    let heading = result.document.pages[0].pdf_items[0].as_text().unwrap();
    assert_eq!(heading.font_family, "Helvetica Oblique");
}

#[test]
fn test_local_storage_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan.extracted.json");
    let document = sample_document().with_name("");
    fs::write(&input, serde_json::to_vec(&document).unwrap()).unwrap();

    let out = dir.path().join("out");
    let reference = pdfscene::process_file(&input, &out).unwrap();

    assert_eq!(reference, out.join("scan.extracted.json").display().to_string());
    assert!(out.join("fonts/Roboto_Bold.ttf").exists());
    assert_eq!(fs::read_dir(out.join("images")).unwrap().count(), 1);

    let written = fs::read_to_string(out.join("scan.extracted.json")).unwrap();
    assert!(written.contains('\n'));
    let pages: Vec<serde_json::Value> = serde_json::from_str(&written).unwrap();
    assert_eq!(pages.len(), 2);
}

#[test]
fn test_document_from_json_exchange_format() {
    let json = br#"{
        "name": "minimal",
        "vectors": [
            { "number": 1, "size": { "width": 200, "height": 100 },
              "items": [{ "type": "rect", "left": 0, "top": 0, "width": 190, "height": 95 }] }
        ],
        "text": [
            { "number": 1, "spans": [{ "text": "Hi", "bbox": [10, 10, 30, 22], "size": 12, "font": "Arial" }] }
        ],
        "images": {
            "3": { "assets": [{ "data": [1, 2, 3], "origin": "inline", "width": 4, "height": 4, "left": 0, "top": 0, "mask_only": true }] }
        }
    }"#;

    let document = RawDocument::from_bytes(json).unwrap();
    assert_eq!(document.page_numbers(), vec![1, 3]);
    assert_eq!(document.images[&3].assets[0].origin, ImageOrigin::Inline);

    let result = Processor::new(DiscardStorage).process(&document).unwrap();
    let pages = &result.document.pages;

    assert_eq!(pages.len(), 1);
    assert!(pages[0].pdf_items[0].is_rect());
    assert!(pages[0].pdf_items[1].is_text());
    assert_eq!(result.document.intake.skipped_for(SkipReason::MaskOnlyImage), 1);
}

#[test]
fn test_unknown_page_is_out_of_range() {
    let document = sample_document();
    assert!(matches!(
        document.page_image_assets(9),
        Err(Error::PageOutOfRange(9, 2))
    ));
}
